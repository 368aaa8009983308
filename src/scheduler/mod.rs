//! # Control-Loop Scheduler Module
//!
//! The fixed-rate loop between the input source and the vehicle link.
//!
//! This module handles:
//! - Sampling input and live configuration once per 50 ms tick
//! - Invoking the active mixer strategy exactly once per tick
//! - Forwarding each packet to the link, swallowing transient failures
//! - Session lifecycle: `Idle -> Running -> Idle`
//!
//! ## Session Lifecycle
//!
//! A [`DriveSession`] is the `Running` state made concrete: it owns the only
//! handle to the loop task, which in turn exclusively owns the mixer (and its
//! rolling state), the input source, and the link. [`DriveSession::spawn`]
//! must only be called with an already-connected link; it zeroes the mixer so
//! every session starts from the resting state. [`DriveSession::stop`]
//! signals the loop, awaits it, and drops the mixer state with the task; a
//! later session can never observe smoothing history from an earlier one,
//! and stopping can never leave a second loop running.
//!
//! ## Timing
//!
//! Ticks are strictly sequential: compute and send for one tick complete
//! before the next tick is awaited, so at most one packet is ever in flight.
//! If a send overruns the period the next tick runs late rather than
//! overlapping or being queued. Cancellation is observed at the wait point
//! only; an in-flight send is never aborted.

pub mod ticker;

pub use ticker::{IntervalTicker, Ticker};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::MixerConfig;
use crate::input::InputSource;
use crate::link::VehicleLink;
use crate::mixer::MotorMixer;

/// Default number of packets between status log lines (5 s at 20 Hz).
const LOG_INTERVAL_PACKETS: u64 = 100;

/// Counters reported when a session stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Packets accepted by the link.
    pub packets_sent: u64,
    /// Transient send failures swallowed by the loop.
    pub send_failures: u64,
}

/// The assembled but not yet running control loop.
pub struct DriveLoop<M, S, L, T> {
    mixer: M,
    source: S,
    link: L,
    ticker: T,
    config: watch::Receiver<MixerConfig>,
    log_every: u64,
}

impl<M, S, L, T> DriveLoop<M, S, L, T>
where
    M: MotorMixer + 'static,
    S: InputSource + 'static,
    L: VehicleLink + 'static,
    T: Ticker + 'static,
{
    /// Assembles a loop from its parts. The config receiver is snapshotted
    /// every tick, so slider edits apply on the next tick.
    pub fn new(
        mixer: M,
        source: S,
        link: L,
        ticker: T,
        config: watch::Receiver<MixerConfig>,
    ) -> Self {
        Self {
            mixer,
            source,
            link,
            ticker,
            config,
            log_every: LOG_INTERVAL_PACKETS,
        }
    }

    /// Overrides the status-log interval.
    #[must_use]
    pub fn log_every(mut self, packets: u64) -> Self {
        self.log_every = packets.max(1);
        self
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) -> LoopStats {
        let DriveLoop {
            mut mixer,
            mut source,
            mut link,
            mut ticker,
            config,
            log_every,
        } = self;

        let mut stats = LoopStats::default();
        info!("Control loop running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let frame = source.sample();
                    let mixer_config = *config.borrow();
                    let packet = mixer.mix(frame.stick, frame.buttons, &mixer_config);

                    match link.write_motor(&packet).await {
                        Ok(()) => {
                            stats.packets_sent += 1;
                            if stats.packets_sent % log_every == 0 {
                                info!(
                                    packets = stats.packets_sent,
                                    failures = stats.send_failures,
                                    "Control loop status"
                                );
                            }
                        }
                        Err(e) => {
                            // One dropped frame; the next tick's packet
                            // supersedes it within the validity window.
                            stats.send_failures += 1;
                            debug!("Failed to send packet: {}", e);
                        }
                    }
                }

                _ = shutdown.changed() => {
                    break;
                }
            }
        }

        info!(
            packets = stats.packets_sent,
            failures = stats.send_failures,
            "Control loop stopped"
        );
        stats
    }
}

/// A running control-loop session.
pub struct DriveSession {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<LoopStats>,
}

impl DriveSession {
    /// Zeroes the mixer state and starts the loop on a background task.
    ///
    /// The caller must hand over an already-connected link; the session
    /// takes exclusive ownership of every moving part until [`stop`](Self::stop).
    #[must_use]
    pub fn spawn<M, S, L, T>(drive_loop: DriveLoop<M, S, L, T>) -> Self
    where
        M: MotorMixer + 'static,
        S: InputSource + 'static,
        L: VehicleLink + 'static,
        T: Ticker + 'static,
    {
        let mut drive_loop = drive_loop;
        drive_loop.mixer.reset();

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(drive_loop.run(shutdown_rx));
        Self { shutdown, handle }
    }

    /// Whether the loop task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the loop at its next wait point and returns its counters.
    ///
    /// Consumes the session: once stopped, the mixer state is gone and a new
    /// session must be spawned to drive again.
    pub async fn stop(self) -> LoopStats {
        let _ = self.shutdown.send(true);
        self.handle.await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::ticker::manual::{manual_ticker, TickHandle};
    use super::*;
    use crate::config::MixerConfig;
    use crate::input::{input_channel, ButtonState, ControlFrame, InputFeed};
    use crate::link::mocks::MockLink;
    use crate::mixer::{ContinuousMixer, DriveMode, ModalMixer, MotorMixer};
    use crate::input::StickSample;
    use crate::protocol::MotorPacket;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixture {
        ticks: TickHandle,
        feed: InputFeed,
        config: watch::Sender<MixerConfig>,
        link: MockLink,
        session: DriveSession,
    }

    fn start_session<M: MotorMixer + 'static>(mixer: M) -> Fixture {
        let (ticks, ticker) = manual_ticker();
        let (feed, source) = input_channel(ControlFrame::neutral());
        let (config, config_rx) = watch::channel(MixerConfig::default());
        let link = MockLink::new();

        let drive_loop = DriveLoop::new(mixer, source, link.clone(), ticker, config_rx);
        let session = DriveSession::spawn(drive_loop);

        Fixture {
            ticks,
            feed,
            config,
            link,
            session,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("condition not met in time");
    }

    #[tokio::test]
    async fn test_one_packet_per_tick() {
        let fixture = start_session(ContinuousMixer::new());

        for _ in 0..3 {
            fixture.ticks.fire();
        }
        let link = fixture.link.clone();
        wait_until(move || link.motor_frames().len() == 3).await;

        let stats = fixture.session.stop().await;
        assert_eq!(stats.packets_sent, 3);
        assert_eq!(stats.send_failures, 0);
    }

    #[tokio::test]
    async fn test_session_starts_from_reset_state() {
        let mut mixer = ContinuousMixer::new();
        // Pollute the rolling state before handing the mixer over
        for _ in 0..12 {
            mixer.mix(
                StickSample::new(1.0, 1.0),
                ButtonState::released(),
                &MixerConfig::default(),
            );
        }

        let fixture = start_session(mixer);
        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || !link.motor_frames().is_empty()).await;

        assert_eq!(fixture.link.motor_frames()[0], [6, 0, 6, 0, 2, 0, 0, 0]);
        fixture.session.stop().await;
    }

    #[tokio::test]
    async fn test_transient_failure_does_not_halt_loop() {
        let fixture = start_session(ContinuousMixer::new());
        fixture.link.set_write_error("radio glitch");

        fixture.ticks.fire();
        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || link.attempts() == 2).await;

        fixture.link.clear_write_error();
        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || link.motor_frames().len() == 1).await;

        let stats = fixture.session.stop().await;
        assert_eq!(stats.send_failures, 2);
        assert_eq!(stats.packets_sent, 1);
    }

    #[tokio::test]
    async fn test_stop_terminates_loop() {
        let fixture = start_session(ContinuousMixer::new());
        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || link.motor_frames().len() == 1).await;

        fixture.session.stop().await;

        // Further ticks must go nowhere
        fixture.ticks.fire();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fixture.link.motor_frames().len(), 1);
    }

    #[tokio::test]
    async fn test_is_running_reflects_lifecycle() {
        let fixture = start_session(ContinuousMixer::new());
        assert!(fixture.session.is_running());
        let stats = fixture.session.stop().await;
        assert_eq!(stats.send_failures, 0);
    }

    #[tokio::test]
    async fn test_input_changes_apply_next_tick() {
        let fixture = start_session(ModalMixer::new(DriveMode::Classic));

        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || fixture_frames(&link) == 1).await;
        assert_eq!(fixture.link.motor_frames()[0], [0, 1, 0, 1, 2, 0, 0, 0]);

        let mut buttons = ButtonState::released();
        buttons.press_forward();
        fixture.feed.set_buttons(buttons);

        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || fixture_frames(&link) == 2).await;
        assert_eq!(fixture.link.motor_frames()[1], [50, 1, 50, 1, 2, 0, 0, 0]);

        fixture.session.stop().await;
    }

    fn fixture_frames(link: &MockLink) -> usize {
        link.motor_frames().len()
    }

    #[tokio::test]
    async fn test_config_edits_apply_next_tick() {
        let fixture = start_session(ModalMixer::new(DriveMode::Classic));
        let mut buttons = ButtonState::released();
        buttons.press_forward();
        fixture.feed.set_buttons(buttons);

        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || fixture_frames(&link) == 1).await;
        assert_eq!(fixture.link.motor_frames()[0], [50, 1, 50, 1, 2, 0, 0, 0]);

        let halved = MixerConfig {
            max_speed_scale: 0.5,
            ..MixerConfig::default()
        };
        fixture.config.send(halved).unwrap();

        fixture.ticks.fire();
        let link = fixture.link.clone();
        wait_until(move || fixture_frames(&link) == 2).await;
        assert_eq!(fixture.link.motor_frames()[1], [25, 1, 25, 1, 2, 0, 0, 0]);

        fixture.session.stop().await;
    }

    /// Link wrapper that trips a counter if a second write starts while one
    /// is still in flight.
    struct OverlapGuard {
        inner: MockLink,
        in_flight: Arc<AtomicBool>,
        overlaps: Arc<AtomicU64>,
    }

    #[async_trait]
    impl VehicleLink for OverlapGuard {
        async fn write_motor(&mut self, packet: &MotorPacket) -> crate::error::Result<()> {
            if self.in_flight.swap(true, Ordering::SeqCst) {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
            let result = self.inner.write_motor(packet).await;
            self.in_flight.store(false, Ordering::SeqCst);
            result
        }

        async fn write_color(
            &mut self,
            color: &crate::protocol::ColorCommand,
        ) -> crate::error::Result<()> {
            self.inner.write_color(color).await
        }
    }

    #[tokio::test]
    async fn test_at_most_one_send_in_flight() {
        let (ticks, ticker) = manual_ticker();
        let (_feed, source) = input_channel(ControlFrame::neutral());
        let (_config, config_rx) = watch::channel(MixerConfig::default());

        let inner = MockLink::new();
        let overlaps = Arc::new(AtomicU64::new(0));
        let guard = OverlapGuard {
            inner: inner.clone(),
            in_flight: Arc::new(AtomicBool::new(false)),
            overlaps: overlaps.clone(),
        };

        let drive_loop = DriveLoop::new(ContinuousMixer::new(), source, guard, ticker, config_rx);
        let session = DriveSession::spawn(drive_loop);

        // Fire a burst far faster than the slowed-down link can send
        for _ in 0..8 {
            ticks.fire();
        }
        let link = inner.clone();
        wait_until(move || link.motor_frames().len() == 8).await;

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        session.stop().await;
    }
}
