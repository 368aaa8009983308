//! # Input Module
//!
//! Operator input handling for the on-screen touch controls.
//!
//! This module handles:
//! - Normalized stick samples and discrete button latches
//! - Widget-side radial deadzone and bit-depth quantization
//! - A watch-channel input source sampled once per control tick
//!
//! The mixer engine consumes values already in clean `[-1, 1]` float form;
//! the normalization step belongs to the input widget and is never re-applied
//! downstream.

pub mod normalize;
pub mod source;
pub mod state;

pub use normalize::StickNormalizer;
pub use source::{input_channel, InputFeed, InputSource, WatchSource};
pub use state::{ButtonState, ControlFrame, StickSample};
