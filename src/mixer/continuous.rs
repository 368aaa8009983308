//! # Continuous Smoothing Strategy
//!
//! Emulates the legacy ADC-driven joystick controller. The original hardware
//! read each stick axis through a 12-bit converter centered at 1640 and the
//! vehicle firmware was tuned around that signal chain, so the emulation
//! reproduces it stage by stage: synthetic counts, a 3-sample moving average,
//! deadzone + power-curve response, exponential smoothing, and the
//! speed-dependent steering envelope.
//!
//! ## Signal chain per tick
//!
//! 1. Negate throttle (the controller's native forward is a negative raw
//!    axis value).
//! 2. Map each axis to a synthetic ADC count deviation from center.
//! 3. Average the last 3 ticks' counts per axis. Both axes share one
//!    rotating history index, so the output is a deterministic function of
//!    exactly the last three samples.
//! 4. Deadzone + curve mapping into drive units (throttle up to 80; turn up
//!    to a ceiling that grows with speed).
//! 5. Low-speed steering gain boost.
//! 6. Exponential smoothing against the previous tick's output, bypassed to
//!    an immediate zero when the throttle stick is released, so the vehicle
//!    never coasts.
//! 7. Progressive turn clamp.
//! 8. Differential combine around a minimum-kick base, one shared direction
//!    bit derived from the throttle sign.
//! 9. Straight-line minimum-speed floor, skipped while steering so the
//!    differential is never distorted.
//!
//! The rolling state (previous outputs + count history) is owned by exactly
//! one session and zeroed on [`reset`](MotorMixer::reset).

use super::response::shape;
use super::MotorMixer;
use crate::config::MixerConfig;
use crate::input::{ButtonState, StickSample};
use crate::protocol::{Direction, MotorPacket};

/// Half of the synthetic ADC range; full range is `0..=3280`, center 1640.
const ADC_HALF_RANGE: f32 = 1640.0;

/// Counts around center treated as exactly zero.
const DEADZONE_COUNTS: f32 = 164.0;

/// Response curve exponent for both axes.
const CURVE_EXPONENT: f32 = 1.4;

/// Throttle output span in drive units.
const THROTTLE_MAX_UNITS: f32 = 80.0;

/// Turn span at standstill.
const TURN_UNITS_BASE: f32 = 15.0;

/// Additional turn span unlocked quadratically with speed.
const TURN_UNITS_SPEED: f32 = 28.0;

/// Hard ceiling on the turn span.
const TURN_UNITS_CAP: f32 = 65.0;

/// Turn gain at full speed.
const TURN_GAIN_BASE: f32 = 1.15;

/// Extra turn gain faded in toward standstill.
const TURN_GAIN_LOW_SPEED: f32 = 0.45;

/// Fraction of the previous throttle output kept each tick.
const THROTTLE_KEEP: f32 = 0.85;

/// Fraction of the previous turn output kept each tick.
const TURN_KEEP: f32 = 0.72;

/// Progressive turn clamp at standstill.
const TURN_CLAMP_BASE: f32 = 22.0;

/// Additional turn clamp span unlocked linearly with speed.
const TURN_CLAMP_SPAN: f32 = 38.0;

/// Fixed base offset overcoming motor static friction.
const MIN_KICK: f32 = 6.0;

/// Minimum wheel magnitude while driving straight.
const STRAIGHT_FLOOR: f32 = 42.0;

/// The ADC joystick controller emulation.
///
/// # Examples
///
/// ```
/// use rover_bridge::config::MixerConfig;
/// use rover_bridge::input::{ButtonState, StickSample};
/// use rover_bridge::mixer::{ContinuousMixer, MotorMixer};
///
/// let mut mixer = ContinuousMixer::new();
/// let packet = mixer.mix(
///     StickSample::centered(),
///     ButtonState::released(),
///     &MixerConfig::default(),
/// );
/// assert_eq!(packet.to_bytes(), [6, 0, 6, 0, 2, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct ContinuousMixer {
    /// Previous tick's smoothed throttle output, drive units.
    prev_throttle: f32,
    /// Previous tick's smoothed turn output, drive units.
    prev_turn: f32,
    /// Last 3 ticks' throttle count deviations.
    throttle_counts: [i32; 3],
    /// Last 3 ticks' turn count deviations.
    turn_counts: [i32; 3],
    /// Rotating write index shared by both axes.
    history_index: usize,
}

impl Default for ContinuousMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinuousMixer {
    /// Creates a mixer in the resting (all-zero) state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prev_throttle: 0.0,
            prev_turn: 0.0,
            throttle_counts: [0; 3],
            turn_counts: [0; 3],
            history_index: 0,
        }
    }

    /// Writes both axes into the history at the shared index and returns the
    /// 3-sample averages as `(throttle, turn)` count deviations.
    fn smooth_counts(&mut self, throttle_count: i32, turn_count: i32) -> (f32, f32) {
        self.throttle_counts[self.history_index] = throttle_count;
        self.turn_counts[self.history_index] = turn_count;
        self.history_index = (self.history_index + 1) % 3;

        let throttle_avg = self.throttle_counts.iter().sum::<i32>() as f32 / 3.0;
        let turn_avg = self.turn_counts.iter().sum::<i32>() as f32 / 3.0;
        (throttle_avg, turn_avg)
    }
}

impl MotorMixer for ContinuousMixer {
    fn mix(
        &mut self,
        stick: StickSample,
        _buttons: ButtonState,
        config: &MixerConfig,
    ) -> MotorPacket {
        let stick = stick.clamped();

        // Native forward direction is a negative raw axis value.
        let raw_throttle = -stick.throttle;

        let throttle_count = (raw_throttle * ADC_HALF_RANGE).round() as i32;
        let turn_count = (stick.turn * ADC_HALF_RANGE).round() as i32;
        let (throttle_avg, turn_avg) = self.smooth_counts(throttle_count, turn_count);

        let deadzone = DEADZONE_COUNTS / ADC_HALF_RANGE;
        let throttle_units =
            shape(throttle_avg / ADC_HALF_RANGE, deadzone, CURVE_EXPONENT) * THROTTLE_MAX_UNITS;

        // Steering envelope follows the mapped stick position, not the
        // smoothed output.
        let speed_factor = (throttle_units.abs() / THROTTLE_MAX_UNITS).clamp(0.0, 1.0);

        let throttle_target = throttle_units * config.max_speed_scale.clamp(0.0, 1.0);

        let turn_ceiling =
            (TURN_UNITS_BASE + speed_factor * speed_factor * TURN_UNITS_SPEED).min(TURN_UNITS_CAP);
        let mut turn_target =
            shape(turn_avg / ADC_HALF_RANGE, deadzone, CURVE_EXPONENT) * turn_ceiling;
        turn_target *= TURN_GAIN_BASE + (1.0 - speed_factor) * TURN_GAIN_LOW_SPEED;
        turn_target *= config.steering_sensitivity.clamp(0.5, 2.5);

        // A released throttle stick stops immediately instead of decaying
        // through the exponential filter.
        let smoothed_throttle = if raw_throttle == 0.0 {
            0.0
        } else {
            THROTTLE_KEEP * self.prev_throttle + (1.0 - THROTTLE_KEEP) * throttle_target
        };

        let turn_limit = TURN_CLAMP_BASE + speed_factor * TURN_CLAMP_SPAN;
        let smoothed_turn = (TURN_KEEP * self.prev_turn + (1.0 - TURN_KEEP) * turn_target)
            .clamp(-turn_limit, turn_limit);

        self.prev_throttle = smoothed_throttle;
        self.prev_turn = smoothed_turn;

        let base = smoothed_throttle.abs() + MIN_KICK;
        let direction = if smoothed_throttle >= 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };

        let mut wheel_a = base + smoothed_turn;
        let mut wheel_b = base - smoothed_turn;

        // Straight-line floor so the vehicle reliably moves; never applied
        // while steering, which would distort the differential.
        if smoothed_turn == 0.0 && smoothed_throttle != 0.0 {
            wheel_a = raise_to_floor(wheel_a);
            wheel_b = raise_to_floor(wheel_b);
        }

        MotorPacket::with_direction(wheel_a, wheel_b, direction)
    }

    fn reset(&mut self) {
        self.prev_throttle = 0.0;
        self.prev_turn = 0.0;
        self.throttle_counts = [0; 3];
        self.turn_counts = [0; 3];
        self.history_index = 0;
    }
}

/// Raises a wheel value to the straight-line floor, preserving sign.
#[inline]
fn raise_to_floor(value: f32) -> f32 {
    if value.abs() < STRAIGHT_FLOOR {
        value.signum() * STRAIGHT_FLOOR
    } else {
        value
    }
}
