//! # Vehicle Protocol Module
//!
//! Wire types for the rover's command characteristics.
//!
//! This module handles:
//! - Motor command packet encoding (8 bytes, two wheels + validity window)
//! - Color command encoding (3 raw RGB bytes)
//! - Defensive clamping of all numeric fields to their wire ranges

pub mod color;
pub mod packet;

pub use color::ColorCommand;
pub use packet::{Direction, MotorPacket};
