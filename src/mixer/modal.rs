//! # Mode-Switchable Strategy
//!
//! Emulates the legacy button-pad controller. Two drive modes share one
//! steering path and one combine stage:
//!
//! - **Classic**: fixed forward/reverse speeds from the hold buttons, a
//!   boost delta, a brake cap, and a flat steering boost while standing
//!   still so pivot turns stay effective.
//! - **Analog**: proportional throttle straight from the stick.
//!
//! Unlike the continuous strategy there is no rolling state: every tick is a
//! pure function of the current input, mode, and configuration. Mode changes
//! go through [`ModalMixer::set_mode`], which returns the cleared button
//! latch state the caller must adopt, an explicit transition instead of a
//! side effect on adjacent state.

use super::response::shape;
use super::{DriveMode, MotorMixer};
use crate::config::MixerConfig;
use crate::input::{ButtonState, StickSample};
use crate::protocol::MotorPacket;

/// Steering deadzone as a fraction of full deflection.
const STEER_DEADZONE: f32 = 0.05;

/// Steering response curve exponent.
const STEER_EXPONENT: f32 = 1.1;

/// Steering output span in drive units.
const STEER_MAX_UNITS: f32 = 20.0;

/// Analog-mode throttle span in drive units.
const ANALOG_MAX_UNITS: f32 = 80.0;

/// The button-pad controller emulation.
///
/// # Examples
///
/// ```
/// use rover_bridge::config::MixerConfig;
/// use rover_bridge::input::{ButtonState, StickSample};
/// use rover_bridge::mixer::{DriveMode, ModalMixer, MotorMixer};
///
/// let mut mixer = ModalMixer::new(DriveMode::Classic);
/// let mut buttons = ButtonState::released();
/// buttons.press_forward();
///
/// let packet = mixer.mix(StickSample::centered(), buttons, &MixerConfig::default());
/// assert_eq!(packet.to_bytes(), [50, 1, 50, 1, 2, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct ModalMixer {
    mode: DriveMode,
}

impl ModalMixer {
    /// Creates a mixer in the given drive mode.
    #[must_use]
    pub fn new(mode: DriveMode) -> Self {
        Self { mode }
    }

    /// Returns the active drive mode.
    #[must_use]
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Switches the drive mode and returns the button latch state the caller
    /// must adopt: all latches cleared, so a held button never carries its
    /// meaning across modes.
    #[must_use]
    pub fn set_mode(&mut self, mode: DriveMode) -> ButtonState {
        self.mode = mode;
        ButtonState::released()
    }

    /// Base speed in drive units, before the global speed scale.
    fn base_speed(&self, stick: StickSample, buttons: ButtonState, config: &MixerConfig) -> f32 {
        match self.mode {
            DriveMode::Classic => {
                let tuning = &config.classic;
                let mut speed = if buttons.forward {
                    tuning.forward_speed
                } else if buttons.reverse {
                    -tuning.reverse_speed
                } else {
                    0.0
                };

                if buttons.boost && speed != 0.0 {
                    speed += speed.signum() * tuning.boost_delta;
                }

                // Brake applies after boost and clamps magnitude only.
                if buttons.brake {
                    speed = speed.signum() * speed.abs().min(tuning.brake_cap);
                }

                speed
            }
            DriveMode::Analog => stick.throttle * ANALOG_MAX_UNITS,
        }
    }

    /// Steering differential in drive units, before the global speed scale.
    fn steer_mixer(&self, stick: StickSample, speed: f32, config: &MixerConfig) -> f32 {
        let mut mixer = shape(stick.turn, STEER_DEADZONE, STEER_EXPONENT) * STEER_MAX_UNITS;

        // Without forward motion the fixed span is too weak to pivot the
        // vehicle; give it a flat kick.
        if self.mode == DriveMode::Classic && speed == 0.0 && mixer != 0.0 {
            mixer += mixer.signum() * config.classic.still_steer_boost;
        }

        mixer * config.steering_sensitivity.clamp(0.5, 2.5)
    }
}

impl MotorMixer for ModalMixer {
    fn mix(
        &mut self,
        stick: StickSample,
        buttons: ButtonState,
        config: &MixerConfig,
    ) -> MotorPacket {
        let stick = stick.clamped();
        let scale = config.max_speed_scale.clamp(0.0, 1.0);

        let speed = self.base_speed(stick, buttons, config) * scale;
        let mixer = self.steer_mixer(stick, speed, config) * scale;

        MotorPacket::from_wheels(speed + mixer, speed - mixer)
    }

    fn reset(&mut self) {
        // No rolling state; the mode itself survives session boundaries.
    }
}
