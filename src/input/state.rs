//! # Input State Types
//!
//! One control tick's worth of operator input: a normalized stick sample and
//! the hold-button latches.
//!
//! All analog values are normalized floats in `[-1.0, 1.0]`; the input widget
//! has already applied its radial deadzone and optional quantization (see
//! [`normalize`](super::normalize)). No history is kept here; the source
//! supplies a fresh snapshot every tick.

/// One normalized throttle/turn pair.
///
/// # Examples
///
/// ```
/// use rover_bridge::input::StickSample;
///
/// let sample = StickSample::new(0.5, -0.25);
/// assert_eq!(sample.throttle, 0.5);
/// assert_eq!(sample.turn, -0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickSample {
    /// Forward/backward axis. +1.0 = stick fully up.
    pub throttle: f32,
    /// Left/right axis. +1.0 = stick fully right.
    pub turn: f32,
}

impl StickSample {
    /// Creates a sample, clamping both axes to `[-1.0, 1.0]`.
    #[must_use]
    pub fn new(throttle: f32, turn: f32) -> Self {
        Self { throttle, turn }.clamped()
    }

    /// The centered (resting) sample.
    #[must_use]
    pub fn centered() -> Self {
        Self::default()
    }

    /// Returns the sample with both axes clamped to their documented domain.
    ///
    /// Out-of-range input is never an error anywhere in the crate; it is
    /// clamped at the boundary instead.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            throttle: self.throttle.clamp(-1.0, 1.0),
            turn: self.turn.clamp(-1.0, 1.0),
        }
    }
}

/// Hold-button latches for the classic drive mode.
///
/// Forward and reverse are mutually exclusive: asserting one through
/// [`press_forward`](Self::press_forward) / [`press_reverse`](Self::press_reverse)
/// clears the other.
///
/// # Examples
///
/// ```
/// use rover_bridge::input::ButtonState;
///
/// let mut buttons = ButtonState::default();
/// buttons.press_forward();
/// buttons.press_reverse();
/// assert!(!buttons.forward);
/// assert!(buttons.reverse);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Drive forward at the configured fixed speed.
    pub forward: bool,
    /// Drive backward at the configured fixed speed.
    pub reverse: bool,
    /// Add the boost delta to the current speed.
    pub boost: bool,
    /// Clamp the current speed down to the brake cap.
    pub brake: bool,
}

impl ButtonState {
    /// All buttons released.
    #[must_use]
    pub fn released() -> Self {
        Self::default()
    }

    /// Latches forward, clearing reverse.
    pub fn press_forward(&mut self) {
        self.forward = true;
        self.reverse = false;
    }

    /// Latches reverse, clearing forward.
    pub fn press_reverse(&mut self) {
        self.reverse = true;
        self.forward = false;
    }

    /// Releases both direction latches.
    pub fn release_direction(&mut self) {
        self.forward = false;
        self.reverse = false;
    }
}

/// One tick's complete input snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlFrame {
    pub stick: StickSample,
    pub buttons: ButtonState,
}

impl ControlFrame {
    /// Centered stick, all buttons released.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }
}
