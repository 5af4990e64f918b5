use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::clock::usec_to_cycles;

/// MCU clock frequency of the target board.
pub const DEFAULT_FREQUENCY_HZ: u64 = 16_000_000;

/// One display refresh of the emulated controller, in simulated microseconds.
pub const DEFAULT_DECAY_PERIOD_US: u64 = 7_572;

/// Renders happen once per this many decay ticks.
pub const DEFAULT_RENDER_MULTIPLIER: u64 = 12;

// Default luma constants keep a roughly 2:1 increment:decay ratio; larger
// decay shortens the perceived trail.
pub const DEFAULT_LUMA_DECAY: u8 = 85;
pub const DEFAULT_LUMA_INC: u8 = 171;

pub const DEFAULT_PIXEL_SCALE: u32 = 2;

/// Tunable simulation parameters.
///
/// Loadable from a TOML file with per-field defaults; invalid values are
/// rejected at setup, never clamped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// On-screen size of one display pixel, in host pixels.
    pub pixel_scale: u32,
    /// Intensity subtracted from every luma pixel per decay tick.
    pub luma_decay: u8,
    /// Intensity added to lit luma pixels per decay tick.
    pub luma_inc: u8,
    /// Decay tick period in simulated microseconds.
    pub decay_period_us: u64,
    /// Render tick period as a multiple of the decay period.
    pub render_multiplier: u64,
    /// Emulated core clock frequency in Hz.
    pub frequency_hz: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pixel_scale: DEFAULT_PIXEL_SCALE,
            luma_decay: DEFAULT_LUMA_DECAY,
            luma_inc: DEFAULT_LUMA_INC,
            decay_period_us: DEFAULT_DECAY_PERIOD_US,
            render_multiplier: DEFAULT_RENDER_MULTIPLIER,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }
}

impl SimConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: SimConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        info!("loaded simulation config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_scale == 0 {
            return Err(ConfigError::InvalidPixelScale(self.pixel_scale));
        }
        if self.decay_period_us == 0 {
            return Err(ConfigError::InvalidValue("decay_period_us"));
        }
        if self.render_multiplier == 0 {
            return Err(ConfigError::InvalidValue("render_multiplier"));
        }
        if self.frequency_hz == 0 {
            return Err(ConfigError::InvalidValue("frequency_hz"));
        }
        Ok(())
    }

    /// Decay tick period in cycles.
    pub fn decay_period_cycles(&self) -> u64 {
        usec_to_cycles(self.frequency_hz, self.decay_period_us)
    }

    /// Render tick period in cycles.
    pub fn render_period_cycles(&self) -> u64 {
        self.decay_period_cycles() * self.render_multiplier
    }
}

/// Setup-time configuration failures. All of these are fatal to startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("pixel scale must be positive (got {0})")]
    InvalidPixelScale(u32),

    #[error("{0} must be positive")]
    InvalidValue(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(String),

    #[error("unknown key name '{0}'")]
    UnknownKey(String),
}
