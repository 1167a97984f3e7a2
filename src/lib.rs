//! tiercache: LFU caches with batch eviction and a two-level (memory over
//! disk) composition.
//!
//! - [`policy::lfu::LfuCache`]: in-memory LFU evicting a fraction of capacity
//!   at once.
//! - [`policy::durable_lfu::DurableLfuCache`]: the same policy with values
//!   stored as one file each.
//! - [`policy::two_level::TwoLevelCache`]: a fast level whose evictions are
//!   demoted to a slow level.
//! - [`builder`]: runtime policy selection and the standard two-level setup.

pub mod builder;
pub mod config;
pub mod dirs;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod serializer;
pub mod store;
pub mod traits;
