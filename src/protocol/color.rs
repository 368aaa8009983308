//! # Color Command
//!
//! Three raw RGB bytes written to the rover's color characteristic. Unlike
//! motor commands, color writes are not time-gated and carry no validity
//! window.

/// Color command length in bytes
pub const COLOR_COMMAND_LEN: usize = 3;

/// One RGB color command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCommand {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorCommand {
    /// Creates a new color command.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Encodes the command into its 3-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; COLOR_COMMAND_LEN] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes() {
        assert_eq!(ColorCommand::new(255, 0, 128).to_bytes(), [255, 0, 128]);
    }

    #[test]
    fn test_length() {
        assert_eq!(ColorCommand::new(1, 2, 3).to_bytes().len(), COLOR_COMMAND_LEN);
    }
}
