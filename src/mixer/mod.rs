//! # Mixer Engine Module
//!
//! Converts one tick's stick/button input into one 8-byte motor command.
//!
//! Two interchangeable strategies emulate the two legacy hardware controllers
//! the app replaced, both driving the same vehicle wire format:
//!
//! - [`ContinuousMixer`], the ADC-driven joystick controller: synthetic
//!   12-bit counts, 3-sample moving average, deadzone + power-curve response,
//!   exponential smoothing, progressive turn clamp.
//! - [`ModalMixer`], the button-pad controller: fixed forward/reverse
//!   speeds with boost/brake in classic mode, proportional throttle in analog
//!   mode, no history.
//!
//! The scheduler owns exactly one mixer per connected session and invokes
//! [`MotorMixer::mix`] once per tick from a single sequential context; the
//! continuous strategy's rolling state is not safe to share between callers.

pub mod continuous;
pub mod modal;
pub mod response;

pub use continuous::ContinuousMixer;
pub use modal::ModalMixer;

use serde::Deserialize;

use crate::config::{MixerConfig, MixerSettings};
use crate::input::{ButtonState, StickSample};
use crate::protocol::MotorPacket;

/// One motor-mixing strategy.
///
/// `mix` must be total: any input within its documented domain (post-clamp)
/// and any valid prior state produce a well-formed packet. It never fails and
/// never panics.
pub trait MotorMixer: Send {
    /// Computes one motor packet from this tick's input and configuration,
    /// advancing any rolling state.
    fn mix(
        &mut self,
        stick: StickSample,
        buttons: ButtonState,
        config: &MixerConfig,
    ) -> MotorPacket;

    /// Zeroes all rolling state. Called at session start and end so no
    /// smoothing history leaks across connections.
    fn reset(&mut self);
}

impl MotorMixer for Box<dyn MotorMixer + Send> {
    fn mix(
        &mut self,
        stick: StickSample,
        buttons: ButtonState,
        config: &MixerConfig,
    ) -> MotorPacket {
        (**self).mix(stick, buttons, config)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Semantics selector for the mode-switchable strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// Fixed-speed hold buttons plus proportional steering.
    Classic,
    /// Proportional throttle and steering from the stick.
    Analog,
}

/// Which mixer strategy a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`ContinuousMixer`]
    Continuous,
    /// [`ModalMixer`]
    Modal,
}

/// Builds the configured strategy, fresh (zeroed) and ready for one session.
#[must_use]
pub fn build_mixer(settings: &MixerSettings) -> Box<dyn MotorMixer + Send> {
    match settings.strategy {
        StrategyKind::Continuous => Box::new(ContinuousMixer::new()),
        StrategyKind::Modal => Box::new(ModalMixer::new(settings.mode)),
    }
}
