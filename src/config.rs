//! Cache configuration.
//!
//! Plain data describing a cache before it is built. Every struct here
//! deserializes with `serde`, filling absent fields with the defaults below,
//! so a cache can be described in a config file:
//!
//! ```
//! use tiercache::config::{CachePolicy, LevelConfig};
//!
//! let config: LevelConfig = serde_json::from_str(r#"{ "policy": "durable-lfu" }"#).unwrap();
//! assert_eq!(config.policy, CachePolicy::DurableLfu);
//! assert_eq!(config.capacity, 10);
//! assert_eq!(config.eviction_factor, 0.2);
//! ```
//!
//! | Field             | Default                                   |
//! |-------------------|-------------------------------------------|
//! | `policy`          | `simple`                                  |
//! | `capacity`        | 10                                        |
//! | `eviction_factor` | 0.2                                       |
//! | `base_directory`  | [`default_base_directory`](crate::dirs::default_base_directory) |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::dirs::default_base_directory;
use crate::error::ConfigError;
use crate::policy::eviction::EvictionFactor;

/// Default capacity of every level.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default eviction factor of every LFU level.
pub const DEFAULT_EVICTION_FACTOR: f32 = 0.2;

/// Eviction policy selector.
///
/// Config documents go through [`FromStr`], so `"LFU"` is accepted there
/// exactly as it is by `"LFU".parse()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CachePolicy {
    /// Bounded map dropping its eldest insertion.
    #[default]
    Simple,
    /// In-memory LFU with batch eviction.
    Lfu,
    /// LFU with values persisted as files.
    DurableLfu,
}

impl CachePolicy {
    /// Selector string accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::Simple => "simple",
            CachePolicy::Lfu => "lfu",
            CachePolicy::DurableLfu => "durable-lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(CachePolicy::Simple),
            "lfu" => Ok(CachePolicy::Lfu),
            "durable-lfu" => Ok(CachePolicy::DurableLfu),
            other => Err(ConfigError::new(format!(
                "unsupported cache policy '{other}' (expected simple, lfu or durable-lfu)"
            ))),
        }
    }
}

impl TryFrom<String> for CachePolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_eviction_factor() -> f32 {
    DEFAULT_EVICTION_FACTOR
}

fn validate(capacity: usize, eviction_factor: f32) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::new("capacity must be > 0"));
    }
    EvictionFactor::new(eviction_factor).map(|_| ())
}

/// Description of a single cache.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    #[serde(default)]
    pub policy: CachePolicy,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_eviction_factor")]
    pub eviction_factor: f32,
    /// Only read by the durable policy.
    #[serde(default)]
    pub base_directory: Option<PathBuf>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            policy: CachePolicy::default(),
            capacity: DEFAULT_CAPACITY,
            eviction_factor: DEFAULT_EVICTION_FACTOR,
            base_directory: None,
        }
    }
}

impl LevelConfig {
    /// Checks capacity and eviction factor without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self.capacity, self.eviction_factor)
    }

    /// Configured base directory, or the platform default.
    pub fn resolved_base_directory(&self) -> PathBuf {
        self.base_directory
            .clone()
            .unwrap_or_else(default_base_directory)
    }
}

/// Description of a two-level cache: in-memory LFU over durable LFU.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoLevelConfig {
    #[serde(default = "default_capacity")]
    pub first_level_capacity: usize,
    #[serde(default = "default_eviction_factor")]
    pub first_level_eviction_factor: f32,
    #[serde(default = "default_capacity")]
    pub second_level_capacity: usize,
    #[serde(default = "default_eviction_factor")]
    pub second_level_eviction_factor: f32,
    #[serde(default)]
    pub base_directory: Option<PathBuf>,
}

impl Default for TwoLevelConfig {
    fn default() -> Self {
        Self {
            first_level_capacity: DEFAULT_CAPACITY,
            first_level_eviction_factor: DEFAULT_EVICTION_FACTOR,
            second_level_capacity: DEFAULT_CAPACITY,
            second_level_eviction_factor: DEFAULT_EVICTION_FACTOR,
            base_directory: None,
        }
    }
}

impl TwoLevelConfig {
    /// Checks both levels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self.first_level_capacity, self.first_level_eviction_factor)?;
        validate(self.second_level_capacity, self.second_level_eviction_factor)
    }

    /// Configured base directory, or the platform default.
    pub fn resolved_base_directory(&self) -> PathBuf {
        self.base_directory
            .clone()
            .unwrap_or_else(default_base_directory)
    }
}
