pub mod durable_lfu;
pub mod eviction;
pub mod lfu;
pub mod simple;
pub mod two_level;
