//! # Vehicle Link Module
//!
//! Trait abstraction over the wireless link's two writable characteristics.
//!
//! Device discovery, connection establishment, and reconnection UX live in
//! the surrounding application; the core only needs "write 8 motor bytes"
//! and "write 3 color bytes" against an already-connected session. Both
//! operations are opaque and fallible; a failed motor write is a single
//! dropped frame that the next tick's packet supersedes.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::protocol::{ColorCommand, MotorPacket};

/// Write access to a connected vehicle.
#[async_trait]
pub trait VehicleLink: Send {
    /// Writes one motor command to the motor characteristic.
    async fn write_motor(&mut self, packet: &MotorPacket) -> Result<()>;

    /// Writes one color command to the color characteristic. Not time-gated.
    async fn write_color(&mut self, color: &ColorCommand) -> Result<()>;
}

/// Link that logs every frame instead of radioing it.
///
/// Stands in for a real transport in the demo binary and when bring-up
/// hardware is unavailable.
#[derive(Debug, Default)]
pub struct TraceLink {
    motor_writes: u64,
}

impl TraceLink {
    /// Creates a new trace link.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleLink for TraceLink {
    async fn write_motor(&mut self, packet: &MotorPacket) -> Result<()> {
        self.motor_writes += 1;
        debug!(frame = self.motor_writes, bytes = ?packet.to_bytes(), "motor write");
        Ok(())
    }

    async fn write_color(&mut self, color: &ColorCommand) -> Result<()> {
        debug!(bytes = ?color.to_bytes(), "color write");
        Ok(())
    }
}
