//! Bit-banged DHT11/DHT22 single-wire reader.
//!
//! The data line is open drain with a pull-up. The host pulls it low to
//! request a frame, the sensor answers with an 80 µs low/high preamble and
//! then 40 bits, each a ~50 µs low followed by a high whose length encodes
//! the bit (~27 µs for 0, ~70 µs for 1).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info};
use thiserror_no_std::Error;

use thermograph_core::sensors::{HygroThermometer, SensorError};

/// Longest level we wait for before giving up.
const LEVEL_TIMEOUT_US: u32 = 100;

/// High pulses longer than this are a `1` bit.
const ONE_THRESHOLD_US: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhtKind {
    Dht11,
    Dht22,
}

impl DhtKind {
    pub const fn name(self) -> &'static str {
        match self {
            DhtKind::Dht11 => "dht11",
            DhtKind::Dht22 => "dht22",
        }
    }

    /// How long the start request holds the line low.
    const fn start_low_ms(self) -> u32 {
        match self {
            DhtKind::Dht11 => 18,
            DhtKind::Dht22 => 1,
        }
    }

    /// `(relative humidity %, temperature °C)` from a checked frame.
    fn decode(self, frame: [u8; 5]) -> (f32, f32) {
        match self {
            DhtKind::Dht11 => (
                f32::from(frame[0]) + f32::from(frame[1]) * 0.1,
                f32::from(frame[2]) + f32::from(frame[3] & 0x7F) * 0.1,
            ),
            DhtKind::Dht22 => {
                let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) * 0.1;
                let magnitude = f32::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) * 0.1;
                let temperature = if frame[2] & 0x80 != 0 {
                    -magnitude
                } else {
                    magnitude
                };
                (humidity, temperature)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DhtError {
    #[error("Data pin access failed")]
    Pin,
    #[error("No response from sensor")]
    Timeout,
    #[error("Checksum mismatch")]
    Checksum,
}

pub struct Dht<P, D> {
    pin: P,
    delay: D,
    kind: DhtKind,
}

impl<P, D> Dht<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D, kind: DhtKind) -> Self {
        Self { pin, delay, kind }
    }

    /// Request and receive one 5-byte frame, checksum verified.
    pub fn read_frame(&mut self) -> Result<[u8; 5], DhtError> {
        self.pin.set_low().map_err(|_| DhtError::Pin)?;
        self.delay.delay_ms(self.kind.start_low_ms());
        self.pin.set_high().map_err(|_| DhtError::Pin)?;

        // Bit timing does not survive an interrupt.
        let frame = critical_section::with(|_| self.receive())?;

        let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != frame[4] {
            debug!("{}: frame {:02x?}", self.kind.name(), frame);
            return Err(DhtError::Checksum);
        }
        Ok(frame)
    }

    fn receive(&mut self) -> Result<[u8; 5], DhtError> {
        self.wait_while(false)?;
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Wait while the line reads `high`, returning the elapsed microseconds.
    fn wait_while(&mut self, high: bool) -> Result<u32, DhtError> {
        for elapsed in 0..LEVEL_TIMEOUT_US {
            if self.pin.is_high().map_err(|_| DhtError::Pin)? != high {
                return Ok(elapsed);
            }
            self.delay.delay_us(1);
        }
        Err(DhtError::Timeout)
    }
}

impl<P, D> HygroThermometer for Dht<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), SensorError> {
        let sensor = self.kind.name();
        // Idle state is a released (high) line.
        self.pin
            .set_high()
            .map_err(|_| SensorError::InitializationFailed { sensor })?;
        info!("{}: init", sensor);
        Ok(())
    }

    fn read(&mut self) -> Result<(f32, f32), SensorError> {
        let sensor = self.kind.name();
        let frame = self.read_frame().map_err(|e| match e {
            DhtError::Pin | DhtError::Timeout => SensorError::Timeout { sensor },
            DhtError::Checksum => SensorError::Checksum { sensor },
        })?;
        Ok(self.kind.decode(frame))
    }
}
