//! Temperature sensor.

/// Unit suffix appended to temperature readings.
pub const TEMPERATURE_UNIT: &str = "C";

/// A temperature sensor driver. Reads are synchronous and bounded.
pub trait TemperatureSensor: Send + Sync {
    /// Current temperature in whole degrees Celsius.
    fn read_celsius(&self) -> i32;
}

/// Sensor that always reports the same value.
#[derive(Debug, Clone, Copy)]
pub struct StaticTemperatureSensor {
    celsius: i32,
}

impl StaticTemperatureSensor {
    pub fn new(celsius: i32) -> Self {
        Self { celsius }
    }
}

impl Default for StaticTemperatureSensor {
    fn default() -> Self {
        Self::new(21)
    }
}

impl TemperatureSensor for StaticTemperatureSensor {
    fn read_celsius(&self) -> i32 {
        self.celsius
    }
}
