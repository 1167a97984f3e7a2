pub mod frequency_tracker;

pub use frequency_tracker::FrequencyTracker;
