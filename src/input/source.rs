//! # Input Source
//!
//! The seam between the touch widgets and the control loop.
//!
//! The widget side holds an [`InputFeed`] and overwrites the current frame
//! whenever the operator moves the stick or toggles a button; the scheduler
//! side holds the paired [`WatchSource`] and snapshots the latest frame once
//! per tick. No events are queued; only the freshest state matters at 20 Hz.

use tokio::sync::watch;

use super::state::{ButtonState, ControlFrame, StickSample};

/// Anything the control loop can sample once per tick.
///
/// Implementations must be cheap and non-blocking: the scheduler calls this
/// from its single sequential tick context.
pub trait InputSource: Send {
    /// Returns the current input snapshot.
    fn sample(&mut self) -> ControlFrame;
}

/// Creates a connected feed/source pair, seeded with `initial`.
///
/// # Examples
///
/// ```
/// use rover_bridge::input::{input_channel, ControlFrame, InputSource};
///
/// let (feed, mut source) = input_channel(ControlFrame::neutral());
/// feed.set_stick(0.5, 0.0);
/// assert_eq!(source.sample().stick.throttle, 0.5);
/// ```
#[must_use]
pub fn input_channel(initial: ControlFrame) -> (InputFeed, WatchSource) {
    let (tx, rx) = watch::channel(initial);
    (InputFeed { tx }, WatchSource { rx })
}

/// Widget-side handle publishing the current input frame.
#[derive(Debug)]
pub struct InputFeed {
    tx: watch::Sender<ControlFrame>,
}

impl InputFeed {
    /// Replaces the whole frame.
    pub fn publish(&self, frame: ControlFrame) {
        // Receiver side outlives the feed for the session; a dropped
        // receiver just means the loop already stopped.
        let _ = self.tx.send(frame);
    }

    /// Updates only the stick sample, clamping to `[-1, 1]`.
    pub fn set_stick(&self, throttle: f32, turn: f32) {
        self.tx.send_modify(|frame| {
            frame.stick = StickSample::new(throttle, turn);
        });
    }

    /// Updates only the button latches.
    pub fn set_buttons(&self, buttons: ButtonState) {
        self.tx.send_modify(|frame| frame.buttons = buttons);
    }
}

/// Scheduler-side source backed by the watch channel.
#[derive(Debug)]
pub struct WatchSource {
    rx: watch::Receiver<ControlFrame>,
}

impl InputSource for WatchSource {
    fn sample(&mut self) -> ControlFrame {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_frame() {
        let (_feed, mut source) = input_channel(ControlFrame::neutral());
        assert_eq!(source.sample(), ControlFrame::neutral());
    }

    #[test]
    fn test_set_stick_clamps() {
        let (feed, mut source) = input_channel(ControlFrame::neutral());
        feed.set_stick(2.0, -2.0);
        let frame = source.sample();
        assert_eq!(frame.stick.throttle, 1.0);
        assert_eq!(frame.stick.turn, -1.0);
    }

    #[test]
    fn test_set_buttons_keeps_stick() {
        let (feed, mut source) = input_channel(ControlFrame::neutral());
        feed.set_stick(0.25, 0.0);
        let mut buttons = ButtonState::released();
        buttons.press_forward();
        feed.set_buttons(buttons);

        let frame = source.sample();
        assert_eq!(frame.stick.throttle, 0.25);
        assert!(frame.buttons.forward);
    }

    #[test]
    fn test_sample_returns_latest_only() {
        let (feed, mut source) = input_channel(ControlFrame::neutral());
        feed.set_stick(0.1, 0.0);
        feed.set_stick(0.9, 0.0);
        assert_eq!(source.sample().stick.throttle, 0.9);
    }
}
