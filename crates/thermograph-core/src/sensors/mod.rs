//! Sensor abstractions and the concrete measurement nodes.
//!
//! A node turns raw hardware access ([`AnalogInput`] or a
//! [`HygroThermometer`]) into a [`Reading`]. Failures never propagate past a
//! node: an unreadable or out-of-range sensor simply yields absent values.

pub mod combined;
pub mod filter;
pub mod linear;
pub mod service;
pub mod thermistor;

use log::{debug, info};
use thiserror_no_std::Error;

use crate::time::WallTime;

pub use combined::CombinedNode;
pub use filter::SmoothingFilter;
pub use linear::{LinearNode, Reference};
pub use service::{PollPolicy, SensorService};
pub use thermistor::ThermistorNode;

/// Full scale of the 10-bit analog inputs.
pub const ADC_MAX: u16 = 1023;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("Analog read failed")]
    AdcRead,
    #[error("{sensor} did not respond")]
    Timeout { sensor: &'static str },
    #[error("{sensor} checksum mismatch")]
    Checksum { sensor: &'static str },
    #[error("{sensor} initialization failed")]
    InitializationFailed { sensor: &'static str },
}

/// A single analog channel sampled in ADC counts (`0..=ADC_MAX`).
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        (**self).read_raw()
    }
}

/// Digital combined humidity/temperature sensor (DHT family).
pub trait HygroThermometer {
    fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Returns `(relative humidity %, temperature °C)`.
    fn read(&mut self) -> Result<(f32, f32), SensorError>;
}

/// One measurement. Each channel is absent when the sensor cannot provide it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
}

impl Reading {
    pub const EMPTY: Self = Self {
        temperature: None,
        humidity: None,
    };

    pub const fn temperature(celsius: f32) -> Self {
        Self {
            temperature: Some(celsius),
            humidity: None,
        }
    }

    pub const fn both(celsius: f32, humidity: f32) -> Self {
        Self {
            temperature: Some(celsius),
            humidity: Some(humidity),
        }
    }
}

/// Which physical sensor a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorId {
    #[default]
    Outdoor,
    Indoor,
}

impl SensorId {
    pub const ALL: [SensorId; 2] = [SensorId::Outdoor, SensorId::Indoor];

    pub const fn index(self) -> usize {
        match self {
            Self::Outdoor => 0,
            Self::Indoor => 1,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Outdoor => Self::Indoor,
            Self::Indoor => Self::Outdoor,
        }
    }

    /// Long label shown under the big digits.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Outdoor => "outside",
            Self::Indoor => "in the room",
        }
    }

    /// Suffix used in the one-line temperature text.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Outdoor => "out",
            Self::Indoor => "in",
        }
    }

    pub const fn chart_label(self) -> &'static str {
        match self {
            Self::Outdoor => "[outside]",
            Self::Indoor => "[room]",
        }
    }
}

/// Last known reading of every sensor, as read by the display modes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    values: [Reading; 2],
}

impl Readings {
    pub const fn new() -> Self {
        Self {
            values: [Reading::EMPTY; 2],
        }
    }

    pub fn get(&self, id: SensorId) -> Reading {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: SensorId, reading: Reading) {
        self.values[id.index()] = reading;
    }

    pub fn temperature(&self, id: SensorId) -> Option<f32> {
        self.get(id).temperature
    }

    pub fn humidity(&self, id: SensorId) -> Option<f32> {
        self.get(id).humidity
    }
}

// ---------------------------------------------------------------------------
// SensorNode
// ---------------------------------------------------------------------------

/// Every supported measurement node. Dispatch is a `match`, no trait objects.
pub enum SensorNode<A, H> {
    Thermistor(ThermistorNode<A>),
    Linear(LinearNode<A>),
    Combined(CombinedNode<H>),
}

impl<A: AnalogInput, H: HygroThermometer> SensorNode<A, H> {
    pub fn name(&self) -> &'static str {
        match self {
            SensorNode::Thermistor(_) => "thermistor",
            SensorNode::Linear(_) => "lm35",
            SensorNode::Combined(_) => "dht",
        }
    }

    pub fn init(&mut self) {
        match self {
            SensorNode::Thermistor(_) => {}
            SensorNode::Linear(node) => node.init(),
            SensorNode::Combined(node) => node.init(),
        }
        info!("{}: initialized", self.name());
    }

    pub fn sample(&mut self, now: WallTime) -> Reading {
        let reading = match self {
            SensorNode::Thermistor(node) => node.sample(),
            SensorNode::Linear(node) => node.sample(),
            SensorNode::Combined(node) => node.sample(),
        };
        debug!("{}: {} {:?}", self.name(), now, reading);
        reading
    }
}

/// A node plus the optional smoothing filter on its temperature channel.
pub struct TemperatureSource<A, H> {
    node: SensorNode<A, H>,
    filter: Option<SmoothingFilter>,
}

impl<A: AnalogInput, H: HygroThermometer> TemperatureSource<A, H> {
    pub fn new(node: SensorNode<A, H>) -> Self {
        Self { node, filter: None }
    }

    pub fn filtered(node: SensorNode<A, H>, delta: f32) -> Self {
        Self {
            node,
            filter: Some(SmoothingFilter::new(delta)),
        }
    }

    pub fn init(&mut self) {
        self.node.init();
    }

    pub fn sample(&mut self, now: WallTime) -> Reading {
        let mut reading = self.node.sample(now);
        if let Some(filter) = self.filter.as_mut() {
            reading.temperature = filter.apply(reading.temperature);
        }
        reading
    }
}
