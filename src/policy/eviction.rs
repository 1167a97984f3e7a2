//! Batch eviction shared by the LFU family.
//!
//! When a full LFU cache receives a genuinely new key it evicts a batch of
//! entries instead of a single victim. The batch size is driven by an
//! [`EvictionFactor`]: the fraction of capacity to free.
//!
//! ## Eviction Flow
//!
//! ```text
//!   target = capacity × factor            (f32, never rounded)
//!   deleted = 0
//!
//!   while deleted < target:
//!       tier = keys at the lowest frequency (snapshot)
//!       for key in tier:
//!           if !(deleted < target): deleted += 1; break
//!           deleted += 1
//!           evict key                     (store + tracker)
//!       ── tier exhausted → lowest frequency has advanced, loop again
//! ```
//!
//! The counter is compared with `<` against a floating target, so the batch
//! is the number of integers `n ≥ 0` with `n < target`: a target of `2.0`
//! evicts two entries, `2.4` evicts three, `0.2` evicts one. Tiers are
//! drained lowest first; the next tier is only touched once the lower one is
//! empty.
//!
//! A victim that cannot be evicted stops the batch. Victims already taken are
//! still returned, and the error only surfaces when nothing was evicted.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{trace, warn};

use crate::ds::FrequencyTracker;
use crate::error::{CacheError, ConfigError};

/// Fraction of capacity evicted as one batch, validated to lie in `(0, 1]`.
///
/// # Example
///
/// ```
/// use tiercache::policy::eviction::EvictionFactor;
///
/// let factor = EvictionFactor::new(0.5).unwrap();
/// assert_eq!(factor.batch_target(10), 5.0);
///
/// assert!(EvictionFactor::new(0.0).is_err());
/// assert!(EvictionFactor::new(1.01).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EvictionFactor(f32);

impl EvictionFactor {
    /// Evict the whole cache when full.
    pub const FULL: EvictionFactor = EvictionFactor(1.0);

    /// Validates `value` and wraps it.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `value` is not in `(0, 1]` (NaN included).
    pub fn new(value: f32) -> Result<Self, ConfigError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::new(format!(
                "eviction factor must be greater than 0 and less than or equal to 1, got {value}"
            )))
        }
    }

    /// Returns the raw factor.
    pub fn get(self) -> f32 {
        self.0
    }

    /// Floating eviction target for a cache of `capacity` entries.
    pub fn batch_target(self, capacity: usize) -> f32 {
        capacity as f32 * self.0
    }
}

impl TryFrom<f32> for EvictionFactor {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Evicts lowest-frequency keys until `target` is met.
///
/// `evict_one` removes a key's value from the backing store; the tracker
/// entry is dropped here. Keys whose value is already gone from the store are
/// untracked but not reported.
///
/// If `evict_one` fails, the failing key stays tracked and the batch stops.
/// Pairs taken before the failure are returned as `Ok`; the error is returned
/// only when the batch has nothing to hand back.
pub(crate) fn evict_batch<K, V, F>(
    tracker: &mut FrequencyTracker<K>,
    target: f32,
    mut evict_one: F,
) -> Result<Vec<(K, V)>, CacheError>
where
    K: Eq + Hash + Clone + Debug,
    F: FnMut(&K) -> Result<Option<V>, CacheError>,
{
    let mut evicted = Vec::new();
    let mut currently_deleted: usize = 0;

    while (currently_deleted as f32) < target {
        let tier = tracker.keys_at_lowest_frequency();
        if tier.is_empty() {
            break;
        }
        let tier_frequency = tracker.lowest_frequency();

        for key in tier {
            let below_target = (currently_deleted as f32) < target;
            currently_deleted += 1;
            if !below_target {
                break;
            }

            let value = match evict_one(&key) {
                Ok(value) => value,
                Err(err) if evicted.is_empty() => return Err(err),
                Err(err) => {
                    warn!(key = ?key, error = %err, kept = evicted.len(), "eviction batch cut short");
                    return Ok(evicted);
                }
            };
            tracker.remove(&key);
            trace!(key = ?key, frequency = tier_frequency, "evicted entry");
            if let Some(value) = value {
                evicted.push((key, value));
            }
        }
    }

    Ok(evicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(tiers: &[(u64, &[u32])]) -> FrequencyTracker<u32> {
        let mut tracker = FrequencyTracker::new();
        for (freq, keys) in tiers {
            for key in *keys {
                tracker.remember_frequency(*freq, *key);
            }
        }
        tracker
    }

    fn run(tracker: &mut FrequencyTracker<u32>, target: f32) -> Vec<u32> {
        let mut keys: Vec<u32> = evict_batch(tracker, target, |k| Ok(Some(*k)))
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        keys.sort();
        keys
    }

    mod factor {
        use super::*;

        #[test]
        fn accepts_open_closed_interval() {
            assert!(EvictionFactor::new(f32::MIN_POSITIVE).is_ok());
            assert!(EvictionFactor::new(0.2).is_ok());
            assert_eq!(EvictionFactor::new(1.0).unwrap(), EvictionFactor::FULL);
        }

        #[test]
        fn rejects_out_of_range() {
            for bad in [0.0, -0.1, 1.000_001, f32::NAN, f32::INFINITY] {
                let err = EvictionFactor::new(bad).unwrap_err();
                assert!(err.message().contains("eviction factor"));
            }
        }

        #[test]
        fn try_from_matches_new() {
            assert!(EvictionFactor::try_from(0.3).is_ok());
            assert!(EvictionFactor::try_from(3.0).is_err());
        }

        #[test]
        fn batch_target_is_not_rounded() {
            let factor = EvictionFactor::new(0.25).unwrap();
            assert_eq!(factor.batch_target(10), 2.5);
        }
    }

    mod batch {
        use super::*;

        #[test]
        fn integral_target_evicts_exactly_target() {
            let mut tracker = tracker_with(&[(0, &[1, 2, 3, 4])]);
            let evicted = run(&mut tracker, 2.0);
            assert_eq!(evicted.len(), 2);
            assert_eq!(tracker.len(), 2);
        }

        #[test]
        fn fractional_target_evicts_ceiling() {
            let mut tracker = tracker_with(&[(0, &[1, 2, 3, 4])]);
            assert_eq!(run(&mut tracker, 2.5).len(), 3);

            let mut tracker = tracker_with(&[(0, &[1, 2, 3, 4])]);
            assert_eq!(run(&mut tracker, 0.2).len(), 1);
        }

        #[test]
        fn exhausted_tier_escalates_to_next_frequency() {
            let mut tracker = tracker_with(&[(0, &[1]), (1, &[2]), (5, &[3])]);
            assert_eq!(run(&mut tracker, 2.0), vec![1, 2]);
            assert_eq!(tracker.lowest_frequency(), 5);
            tracker.debug_validate_invariants();
        }

        #[test]
        fn lower_tier_drained_before_higher() {
            let mut tracker = tracker_with(&[(0, &[1, 2, 3]), (2, &[4, 5])]);
            assert_eq!(run(&mut tracker, 3.0), vec![1, 2, 3]);
            assert_eq!(tracker.lowest_frequency(), 2);
        }

        #[test]
        fn stops_when_tracker_runs_dry() {
            let mut tracker = tracker_with(&[(0, &[1])]);
            assert_eq!(run(&mut tracker, 4.0), vec![1]);
            assert!(tracker.is_empty());
        }

        #[test]
        fn missing_store_value_is_untracked_but_not_reported() {
            let mut tracker = tracker_with(&[(0, &[1, 2])]);
            let evicted: Vec<(u32, u32)> =
                evict_batch(&mut tracker, 2.0, |k| Ok((*k == 2).then_some(*k))).unwrap();
            assert_eq!(evicted, vec![(2, 2)]);
            assert!(tracker.is_empty());
        }

        #[test]
        fn store_error_aborts_batch() {
            let mut tracker = tracker_with(&[(0, &[1])]);
            let result: Result<Vec<(u32, u32)>, _> =
                evict_batch(&mut tracker, 1.0, |k| Err(CacheError::not_found(k)));
            assert!(result.is_err());
            assert_eq!(tracker.len(), 1);
        }

        #[test]
        fn failure_after_first_victim_keeps_collected_pairs() {
            let mut tracker = tracker_with(&[(0, &[1]), (1, &[2]), (2, &[3])]);
            let evicted: Vec<(u32, u32)> = evict_batch(&mut tracker, 3.0, |k| {
                if *k == 2 {
                    Err(CacheError::not_found(k))
                } else {
                    Ok(Some(*k))
                }
            })
            .unwrap();

            assert_eq!(evicted, vec![(1, 1)]);
            assert!(tracker.contains(&2));
            assert!(tracker.contains(&3));
            assert_eq!(tracker.len(), 2);
            tracker.debug_validate_invariants();
        }
    }
}
