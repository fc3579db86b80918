//! Three-sample moving average with hysteresis.
//!
//! The visible value only moves to the window average when the newest sample
//! sits at least `delta` away from that average, which keeps the display from
//! flickering between two neighbouring tenths.

const WINDOW: usize = 3;

#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    window: [f32; WINDOW],
    visible: Option<f32>,
    delta: f32,
}

impl SmoothingFilter {
    pub const fn new(delta: f32) -> Self {
        Self {
            window: [0.0; WINDOW],
            visible: None,
            delta,
        }
    }

    /// Feed one sample and return the value to show.
    pub fn apply(&mut self, sample: Option<f32>) -> Option<f32> {
        let value = sample?;

        if self.visible.is_none() {
            self.window = [value; WINDOW];
            self.visible = Some(value);
            return Some(value);
        }

        self.window.copy_within(1.., 0);
        self.window[WINDOW - 1] = value;

        let average = self.window.iter().sum::<f32>() / WINDOW as f32;
        let drift = value - average;
        if drift >= self.delta || -drift >= self.delta {
            self.visible = Some(average);
        }

        self.visible
    }

    pub fn visible(&self) -> Option<f32> {
        self.visible
    }

}
