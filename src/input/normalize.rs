//! # Stick Normalization
//!
//! Widget-side conditioning of the raw 2D touch position into the clean
//! `[-1, 1]` floats the mixer engine consumes.
//!
//! ## Radial deadzone
//!
//! The 2D stick vector is clamped to the unit circle, then each axis is
//! independently zeroed inside the deadzone band and linearly rescaled past
//! it, so full deflection still reaches ±1.0.
//!
//! ## Quantization
//!
//! Touch coordinates are far finer than the legacy controller's ADC ever was.
//! An optional round-trip through `2^bits` integer buckets, symmetric about
//! zero, reproduces the stepped feel of the original hardware.
//!
//! ## Usage
//!
//! ```
//! use rover_bridge::input::StickNormalizer;
//!
//! let norm = StickNormalizer::new(0.1, None);
//!
//! // Inside the deadzone
//! assert_eq!(norm.apply(0.05, -0.05), (0.0, 0.0));
//!
//! // Full deflection preserved
//! let (x, _) = norm.apply(1.0, 0.0);
//! assert!((x - 1.0).abs() < 0.001);
//! ```

/// Applies the radial deadzone and optional bucket quantization.
#[derive(Debug, Clone, Copy)]
pub struct StickNormalizer {
    /// Deadzone as a fraction of the input radius (0.0 to 0.5).
    deadzone: f32,
    /// Half the number of quantization levels, `None` for full resolution.
    half_levels: Option<f32>,
}

impl Default for StickNormalizer {
    fn default() -> Self {
        Self::new(0.1, Some(8))
    }
}

impl StickNormalizer {
    /// Creates a normalizer with the given deadzone fraction and optional
    /// quantization bit depth. Out-of-range parameters are clamped.
    #[must_use]
    pub fn new(deadzone: f32, quantize_bits: Option<u8>) -> Self {
        Self {
            deadzone: deadzone.clamp(0.0, 0.5),
            half_levels: quantize_bits.map(|bits| {
                let bits = bits.clamp(1, 16);
                (1u32 << bits) as f32 / 2.0
            }),
        }
    }

    /// Returns the configured deadzone fraction.
    #[must_use]
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Conditions one raw 2D stick position.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Raw touch offsets relative to the stick center, in units
    ///   of the stick radius
    ///
    /// # Returns
    ///
    /// The normalized `(x, y)` pair, each in `[-1.0, 1.0]`.
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let (x, y) = self.clamp_radial(x, y);
        let x = self.quantize(self.rescale_axis(x));
        let y = self.quantize(self.rescale_axis(y));
        (x, y)
    }

    /// Clamps the 2D vector to the unit circle, preserving its direction.
    fn clamp_radial(&self, x: f32, y: f32) -> (f32, f32) {
        let magnitude = (x * x + y * y).sqrt();
        if magnitude > 1.0 {
            (x / magnitude, y / magnitude)
        } else {
            (x, y)
        }
    }

    /// Zeroes one axis inside the deadzone and linearly rescales the rest of
    /// its range back to `0..=1`.
    fn rescale_axis(&self, value: f32) -> f32 {
        let magnitude = value.abs();
        if magnitude <= self.deadzone {
            0.0
        } else {
            value.signum() * (magnitude - self.deadzone) / (1.0 - self.deadzone)
        }
    }

    /// Rounds through the symmetric integer buckets, if configured.
    fn quantize(&self, value: f32) -> f32 {
        match self.half_levels {
            Some(half) => ((value * half).round() / half).clamp(-1.0, 1.0),
            None => value,
        }
    }
}
