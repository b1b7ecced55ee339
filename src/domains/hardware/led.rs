//! LED actuator.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Target state of the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

/// An LED driver. Switching is fire-and-forget: failures are not reported.
pub trait Led: Send + Sync {
    fn set(&self, state: LedState);
}

/// LED stand-in that remembers its state and logs each switch.
#[derive(Debug, Default)]
pub struct SimulatedLed {
    lit: AtomicBool,
}

impl SimulatedLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the simulated LED.
    pub fn state(&self) -> LedState {
        if self.lit.load(Ordering::Relaxed) {
            LedState::On
        } else {
            LedState::Off
        }
    }
}

impl Led for SimulatedLed {
    fn set(&self, state: LedState) {
        self.lit.store(state == LedState::On, Ordering::Relaxed);
        info!("LED switched {:?}", state);
    }
}
