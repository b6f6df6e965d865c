//! Configuration system for the coherence simulator.
//!
//! This module defines the configuration structures used to parameterize a cache
//! hierarchy. It provides:
//! 1. **Defaults:** Reference geometry, memory fill value, and core count.
//! 2. **Structures:** Hierarchical config for cores, line geometry, and main memory.
//! 3. **Validation:** Consistency checks producing the `LineGeometry` a system is built from.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or via `Config::default()`.
//! Once a system is built its configuration cannot change.

use serde::Deserialize;

use crate::common::{ConfigError, LineGeometry};

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants;

    /// Number of cores, one L1 cache each.
    pub const CORES: usize = constants::DEFAULT_CORES;

    /// Cache line size in address units.
    pub const LINE_SIZE: u64 = constants::DEFAULT_LINE_SIZE;

    /// Word size in address units; also the bit width of a word's value.
    pub const WORD_SIZE: u32 = constants::DEFAULT_WORD_SIZE;

    /// Value of every never-written word of main memory.
    pub const DEFAULT_VALUE: u64 = constants::DEFAULT_VALUE;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use mesi_core::config::Config;
///
/// let json = r#"{
///     "cores": 4,
///     "geometry": { "line_size": 64, "word_size": 16 },
///     "memory": { "default_value": 0 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cores, 4);
/// assert_eq!(config.validate().unwrap().words_per_line(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Number of cores (and L1 caches).
    #[serde(default = "Config::default_cores")]
    pub cores: usize,

    /// Line and word sizes.
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Main memory contents.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Returns the default core count.
    const fn default_cores() -> usize {
        defaults::CORES
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    /// The result is not validated; see [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the configuration for consistency.
    ///
    /// # Returns
    ///
    /// The line geometry the configuration describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if there are no cores, the geometry is inconsistent,
    /// or the memory fill value does not fit in one word.
    pub fn validate(&self) -> Result<LineGeometry, ConfigError> {
        if self.cores == 0 {
            return Err(ConfigError::NoCores);
        }
        let geometry = self.geometry.build()?;
        geometry.check_value(self.memory.default_value)?;
        Ok(geometry)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cores: defaults::CORES,
            geometry: GeometryConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Cache line geometry configuration.
///
/// Sizes share one unit with addresses. The word size doubles as the bit width of
/// a stored value, so it must lie in `1..=64` and divide the line size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GeometryConfig {
    /// Size of one cache line.
    #[serde(default = "GeometryConfig::default_line_size")]
    pub line_size: u64,

    /// Size of one word.
    #[serde(default = "GeometryConfig::default_word_size")]
    pub word_size: u32,
}

impl GeometryConfig {
    /// Returns the default line size.
    const fn default_line_size() -> u64 {
        defaults::LINE_SIZE
    }

    /// Returns the default word size.
    const fn default_word_size() -> u32 {
        defaults::WORD_SIZE
    }

    /// Builds the validated geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Geometry`] if the sizes are inconsistent.
    pub fn build(&self) -> Result<LineGeometry, ConfigError> {
        LineGeometry::new(self.line_size, self.word_size).ok_or(ConfigError::Geometry {
            line_size: self.line_size,
            word_size: self.word_size,
        })
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            line_size: defaults::LINE_SIZE,
            word_size: defaults::WORD_SIZE,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Value every word holds before it is first written.
    #[serde(default = "MemoryConfig::default_value")]
    pub default_value: u64,
}

impl MemoryConfig {
    /// Returns the default memory fill value.
    const fn default_value() -> u64 {
        defaults::DEFAULT_VALUE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_value: defaults::DEFAULT_VALUE,
        }
    }
}
