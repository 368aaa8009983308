//! # Motor Command Packet
//!
//! Encodes per-wheel drive commands into the rover's fixed 8-byte motor
//! characteristic format.
//!
//! ## Wire Format
//!
//! | Offset | Field    | Range | Meaning                      |
//! |--------|----------|-------|------------------------------|
//! | 0      | Speed A  | 0-100 | Motor A PWM magnitude        |
//! | 1      | Dir A    | 0/1   | Motor A direction            |
//! | 2      | Speed B  | 0-100 | Motor B PWM magnitude        |
//! | 3      | Dir B    | 0/1   | Motor B direction            |
//! | 4      | Duration | 2     | Validity window, x100 ms     |
//! | 5-7    | Reserved | 0     | Unused                       |
//!
//! The duration byte is the packet's self-expiring validity window: if no new
//! packet arrives within ~200 ms the vehicle firmware fail-safe-stops. The
//! control loop renews the command every 50 ms, so a single dropped frame is
//! inconsequential.
//!
//! ## Usage
//!
//! ```
//! use rover_bridge::protocol::MotorPacket;
//!
//! let packet = MotorPacket::from_wheels(60.0, -20.0);
//! assert_eq!(packet.to_bytes(), [60, 1, 20, 0, 2, 0, 0, 0]);
//! ```

/// Motor packet length in bytes
pub const MOTOR_PACKET_LEN: usize = 8;

/// Maximum wheel PWM magnitude
pub const SPEED_MAX: u8 = 100;

/// Packet validity window in 100 ms units (~200 ms)
pub const DURATION_TICKS: u8 = 2;

/// Wheel rotation direction as encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Dir bit 0
    Reverse,
    /// Dir bit 1
    Forward,
}

impl Direction {
    /// Direction for a signed wheel value: non-negative drives forward.
    #[must_use]
    pub fn from_signed(value: f32) -> Self {
        if value >= 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Wire encoding of the direction bit.
    #[must_use]
    pub fn bit(self) -> u8 {
        match self {
            Direction::Reverse => 0,
            Direction::Forward => 1,
        }
    }
}

/// One motor command frame.
///
/// A value produced fresh each tick and handed to the transport; it has no
/// identity beyond one transmission. Speeds are always within `0..=100` and
/// direction bits within `{0, 1}` regardless of the mixer math that produced
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPacket {
    /// Motor A PWM magnitude (0-100)
    pub speed_a: u8,
    /// Motor A direction
    pub dir_a: Direction,
    /// Motor B PWM magnitude (0-100)
    pub speed_b: u8,
    /// Motor B direction
    pub dir_b: Direction,
    /// Validity window in 100 ms units
    pub duration_ticks: u8,
}

impl MotorPacket {
    /// Builds a packet from signed wheel values, deriving each wheel's
    /// direction from its own sign.
    ///
    /// Values are clamped to ±100 before the magnitude is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use rover_bridge::protocol::MotorPacket;
    ///
    /// // Pivot turn: opposite-sign wheels
    /// let packet = MotorPacket::from_wheels(40.0, -40.0);
    /// assert_eq!(packet.to_bytes(), [40, 1, 40, 0, 2, 0, 0, 0]);
    /// ```
    #[must_use]
    pub fn from_wheels(a: f32, b: f32) -> Self {
        Self {
            speed_a: clamp_speed(a),
            dir_a: Direction::from_signed(a),
            speed_b: clamp_speed(b),
            dir_b: Direction::from_signed(b),
            duration_ticks: DURATION_TICKS,
        }
    }

    /// Builds a packet from signed wheel values with one shared direction
    /// bit.
    ///
    /// The legacy joystick controller encodes travel direction once, from the
    /// throttle sign; wheel values only contribute magnitude.
    #[must_use]
    pub fn with_direction(a: f32, b: f32, direction: Direction) -> Self {
        Self {
            speed_a: clamp_speed(a),
            dir_a: direction,
            speed_b: clamp_speed(b),
            dir_b: direction,
            duration_ticks: DURATION_TICKS,
        }
    }

    /// Encodes the packet into its 8-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; MOTOR_PACKET_LEN] {
        [
            self.speed_a.min(SPEED_MAX),
            self.dir_a.bit(),
            self.speed_b.min(SPEED_MAX),
            self.dir_b.bit(),
            self.duration_ticks,
            0,
            0,
            0,
        ]
    }

    /// The all-stop command: both wheels at zero magnitude.
    #[must_use]
    pub fn stop() -> Self {
        Self::from_wheels(0.0, 0.0)
    }
}

/// Clamps a signed wheel value to ±100 and rounds the magnitude to a wire
/// byte.
#[inline]
fn clamp_speed(value: f32) -> u8 {
    value.clamp(-100.0, 100.0).abs().round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_constants() {
        assert_eq!(MOTOR_PACKET_LEN, 8);
        assert_eq!(SPEED_MAX, 100);
        assert_eq!(DURATION_TICKS, 2);
    }

    #[test]
    fn test_direction_bits() {
        assert_eq!(Direction::Forward.bit(), 1);
        assert_eq!(Direction::Reverse.bit(), 0);
    }

    #[test]
    fn test_direction_from_signed() {
        assert_eq!(Direction::from_signed(1.0), Direction::Forward);
        assert_eq!(Direction::from_signed(0.0), Direction::Forward);
        assert_eq!(Direction::from_signed(-0.1), Direction::Reverse);
    }

    #[test]
    fn test_from_wheels_per_wheel_direction() {
        let packet = MotorPacket::from_wheels(60.0, -20.0);
        assert_eq!(packet.speed_a, 60);
        assert_eq!(packet.dir_a, Direction::Forward);
        assert_eq!(packet.speed_b, 20);
        assert_eq!(packet.dir_b, Direction::Reverse);
    }

    #[test]
    fn test_with_direction_shares_bit() {
        let packet = MotorPacket::with_direction(26.0, -14.0, Direction::Reverse);
        // Magnitudes only; both wheels carry the shared direction
        assert_eq!(packet.to_bytes(), [26, 0, 14, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_speed_clamps_to_100() {
        let packet = MotorPacket::from_wheels(150.0, -3000.0);
        assert_eq!(packet.speed_a, 100);
        assert_eq!(packet.speed_b, 100);
    }

    #[test]
    fn test_speed_rounds() {
        let packet = MotorPacket::from_wheels(41.5, 41.4);
        assert_eq!(packet.speed_a, 42);
        assert_eq!(packet.speed_b, 41);
    }

    #[test]
    fn test_to_bytes_layout() {
        let packet = MotorPacket::from_wheels(100.0, 100.0);
        let bytes = packet.to_bytes();
        assert_eq!(bytes.len(), MOTOR_PACKET_LEN);
        assert_eq!(bytes[4], DURATION_TICKS);
        assert_eq!(&bytes[5..], &[0, 0, 0], "Reserved bytes must be zero");
    }

    #[test]
    fn test_stop_packet() {
        assert_eq!(MotorPacket::stop().to_bytes(), [0, 1, 0, 1, 2, 0, 0, 0]);
    }
}
