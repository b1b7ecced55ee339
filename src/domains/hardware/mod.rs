//! Hardware collaborators consumed by resource handlers.
//!
//! Handlers only see the narrow traits defined here. The simulated
//! implementations let the node run on a host without a board attached.

mod led;
mod sensor;

pub use led::{Led, LedState, SimulatedLed};
pub use sensor::{StaticTemperatureSensor, TEMPERATURE_UNIT, TemperatureSensor};

use std::sync::Arc;

/// The set of hardware handles shared by all handlers.
#[derive(Clone)]
pub struct Hardware {
    /// Board identifier reported by `/riot/board`.
    pub board: String,

    pub led: Arc<dyn Led>,

    pub sensor: Arc<dyn TemperatureSensor>,
}

impl Hardware {
    pub fn new(
        board: impl Into<String>,
        led: Arc<dyn Led>,
        sensor: Arc<dyn TemperatureSensor>,
    ) -> Self {
        Self {
            board: board.into(),
            led,
            sensor,
        }
    }

    /// Simulated LED and a sensor that always reports `celsius`.
    pub fn simulated(board: impl Into<String>, celsius: i32) -> Self {
        Self::new(
            board,
            Arc::new(SimulatedLed::new()),
            Arc::new(StaticTemperatureSensor::new(celsius)),
        )
    }
}

impl std::fmt::Debug for Hardware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hardware")
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}
