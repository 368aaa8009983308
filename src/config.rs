//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::input::StickNormalizer;
use crate::mixer::{DriveMode, StrategyKind};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub mixer: MixerSettings,

    #[serde(default)]
    pub classic: ClassicTuning,

    #[serde(default)]
    pub input: InputConfig,
}

/// Control-loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    #[serde(default = "default_log_every_packets")]
    pub log_every_packets: u64,
}

/// Mixer strategy selection and the operator-facing sliders
#[derive(Debug, Deserialize, Clone)]
pub struct MixerSettings {
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,

    #[serde(default = "default_mode")]
    pub mode: DriveMode,

    #[serde(default = "default_max_speed_scale")]
    pub max_speed_scale: f32,

    #[serde(default = "default_steering_sensitivity")]
    pub steering_sensitivity: f32,
}

/// Fixed speeds and deltas for the classic button mode
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ClassicTuning {
    #[serde(default = "default_forward_speed")]
    pub forward_speed: f32,

    /// Reverse speed magnitude; the sign is applied by the mixer.
    #[serde(default = "default_reverse_speed")]
    pub reverse_speed: f32,

    #[serde(default = "default_boost_delta")]
    pub boost_delta: f32,

    #[serde(default = "default_brake_cap")]
    pub brake_cap: f32,

    /// Flat additive steering boost while the vehicle is not moving, so
    /// pivot turns stay effective without forward motion.
    #[serde(default = "default_still_steer_boost")]
    pub still_steer_boost: f32,
}

/// Input widget configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_input_deadzone")]
    pub deadzone: f32,

    /// Quantization bit depth, omit for full touch resolution.
    #[serde(default = "default_quantize_bits")]
    pub quantize_bits: Option<u8>,
}

/// Live per-tick mixer configuration.
///
/// Snapshotted by the scheduler every tick, so slider edits published through
/// the config watch channel take effect on the next tick without restarting
/// the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    /// Global speed scale, 0.0 to 1.0.
    pub max_speed_scale: f32,
    /// Steering response scale, 0.5 to 2.5.
    pub steering_sensitivity: f32,
    /// Classic-mode tuning constants.
    pub classic: ClassicTuning,
}

// Default value functions
fn default_tick_rate_hz() -> u32 { 20 }
fn default_log_every_packets() -> u64 { 100 }

fn default_strategy() -> StrategyKind { StrategyKind::Continuous }
fn default_mode() -> DriveMode { DriveMode::Analog }
fn default_max_speed_scale() -> f32 { 1.0 }
fn default_steering_sensitivity() -> f32 { 1.0 }

fn default_forward_speed() -> f32 { 50.0 }
fn default_reverse_speed() -> f32 { 40.0 }
fn default_boost_delta() -> f32 { 20.0 }
fn default_brake_cap() -> f32 { 20.0 }
fn default_still_steer_boost() -> f32 { 20.0 }

fn default_input_deadzone() -> f32 { 0.1 }
fn default_quantize_bits() -> Option<u8> { Some(8) }

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            log_every_packets: default_log_every_packets(),
        }
    }
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            mode: default_mode(),
            max_speed_scale: default_max_speed_scale(),
            steering_sensitivity: default_steering_sensitivity(),
        }
    }
}

impl Default for ClassicTuning {
    fn default() -> Self {
        Self {
            forward_speed: default_forward_speed(),
            reverse_speed: default_reverse_speed(),
            boost_delta: default_boost_delta(),
            brake_cap: default_brake_cap(),
            still_steer_boost: default_still_steer_boost(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: default_input_deadzone(),
            quantize_bits: default_quantize_bits(),
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            max_speed_scale: default_max_speed_scale(),
            steering_sensitivity: default_steering_sensitivity(),
            classic: ClassicTuning::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rover_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The fixed control-loop period derived from the tick rate.
    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / u64::from(self.control.tick_rate_hz))
    }

    /// Builds the widget-side stick normalizer.
    #[must_use]
    pub fn stick_normalizer(&self) -> StickNormalizer {
        StickNormalizer::new(self.input.deadzone, self.input.quantize_bits)
    }

    /// Assembles the live per-tick mixer configuration.
    #[must_use]
    pub fn mixer_config(&self) -> MixerConfig {
        MixerConfig {
            max_speed_scale: self.mixer.max_speed_scale,
            steering_sensitivity: self.mixer.steering_sensitivity,
            classic: self.classic,
        }
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.control.tick_rate_hz == 0 || self.control.tick_rate_hz > 100 {
            return Err(crate::error::DriveError::Config(
                toml::de::Error::custom("tick_rate_hz must be between 1 and 100")
            ));
        }

        if self.control.log_every_packets == 0 {
            return Err(crate::error::DriveError::Config(
                toml::de::Error::custom("log_every_packets must be greater than 0")
            ));
        }

        if self.mixer.max_speed_scale < 0.0 || self.mixer.max_speed_scale > 1.0 {
            return Err(crate::error::DriveError::Config(
                toml::de::Error::custom("max_speed_scale must be between 0.0 and 1.0")
            ));
        }

        if self.mixer.steering_sensitivity < 0.5 || self.mixer.steering_sensitivity > 2.5 {
            return Err(crate::error::DriveError::Config(
                toml::de::Error::custom("steering_sensitivity must be between 0.5 and 2.5")
            ));
        }

        // Validate classic-mode tuning against the wire speed range
        for (name, value) in [
            ("forward_speed", self.classic.forward_speed),
            ("reverse_speed", self.classic.reverse_speed),
        ] {
            if value <= 0.0 || value > 100.0 {
                return Err(crate::error::DriveError::Config(
                    toml::de::Error::custom(format!("{} must be between 0 and 100", name))
                ));
            }
        }

        for (name, value) in [
            ("boost_delta", self.classic.boost_delta),
            ("brake_cap", self.classic.brake_cap),
            ("still_steer_boost", self.classic.still_steer_boost),
        ] {
            if value < 0.0 || value > 100.0 {
                return Err(crate::error::DriveError::Config(
                    toml::de::Error::custom(format!("{} must be between 0 and 100", name))
                ));
            }
        }

        if self.input.deadzone < 0.0 || self.input.deadzone > 0.5 {
            return Err(crate::error::DriveError::Config(
                toml::de::Error::custom("input deadzone must be between 0.0 and 0.5")
            ));
        }

        if let Some(bits) = self.input.quantize_bits {
            if bits == 0 || bits > 16 {
                return Err(crate::error::DriveError::Config(
                    toml::de::Error::custom("quantize_bits must be between 1 and 16")
                ));
            }
        }

        Ok(())
    }
}
