pub use crate::builder::{AnyCache, CacheBuilder, DurableTwoLevelCache, TwoLevelCacheBuilder};
pub use crate::config::{CachePolicy, LevelConfig, TwoLevelConfig};
pub use crate::ds::FrequencyTracker;
pub use crate::error::{CacheError, ConfigError};
pub use crate::policy::durable_lfu::DurableLfuCache;
pub use crate::policy::eviction::EvictionFactor;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::simple::SimpleCache;
pub use crate::policy::two_level::TwoLevelCache;
pub use crate::traits::{Cache, Cacheable, Countable, Frequency};
