//! Persisted round statistics
//!
//! Three plain decimal strings in the key-value store:
//! - `highscore`: best final score over every completed round
//! - `completions`: number of rounds played to the end
//! - `avgAt100`: running average of seconds spent at the starting score

use crate::platform::Storage;

pub const HIGH_SCORE_KEY: &str = "highscore";
pub const COMPLETIONS_KEY: &str = "completions";
pub const AVERAGE_KEY: &str = "avgAt100";

/// Snapshot of the persisted statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// `None` until a round has been completed
    pub high_score: Option<i32>,
    pub completions: u32,
    /// Seconds at the starting score, averaged over completed rounds
    pub average_at_max_score: Option<u32>,
}

/// Read and parse one stored number. Garbage counts as no record.
fn read<T: std::str::FromStr>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unreadable `{}` value {:?}", key, raw);
            None
        }
    }
}

fn write(storage: &mut dyn Storage, key: &str, value: String) {
    if let Err(e) = storage.set(key, &value) {
        log::warn!("Could not save `{}`: {}", key, e);
    }
}

impl Statistics {
    /// Load statistics; missing keys are the no-record baseline
    pub fn load(storage: &dyn Storage) -> Self {
        Self {
            high_score: read(storage, HIGH_SCORE_KEY),
            completions: read(storage, COMPLETIONS_KEY).unwrap_or(0),
            average_at_max_score: read(storage, AVERAGE_KEY),
        }
    }

    /// Whether `score` would replace the stored high score
    pub fn beats_high_score(&self, score: i32) -> bool {
        self.high_score.is_none_or(|best| score > best)
    }

    /// Fold one completed round into the stored statistics.
    ///
    /// Reads the current values, updates them and writes them back. The new
    /// average is truncated to whole seconds. Returns what was written.
    pub fn record_round(storage: &mut dyn Storage, score: i32, elapsed_at_max_score: u32) -> Self {
        let previous = Self::load(storage);

        let high_score = if previous.beats_high_score(score) {
            write(storage, HIGH_SCORE_KEY, score.to_string());
            log::info!("New high score: {}", score);
            Some(score)
        } else {
            previous.high_score
        };

        let completions = previous.completions + 1;
        let total = u64::from(previous.average_at_max_score.unwrap_or(0))
            * u64::from(previous.completions)
            + u64::from(elapsed_at_max_score);
        let average = (total / u64::from(completions)) as u32;

        write(storage, COMPLETIONS_KEY, completions.to_string());
        write(storage, AVERAGE_KEY, average.to_string());

        Self {
            high_score,
            completions,
            average_at_max_score: Some(average),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_empty_storage_is_baseline() {
        let storage = MemoryStorage::new();
        assert_eq!(Statistics::load(&storage), Statistics::default());
        assert!(Statistics::default().beats_high_score(-40));
    }

    #[test]
    fn test_first_completion() {
        let mut storage = MemoryStorage::new();
        let stats = Statistics::record_round(&mut storage, 98, 37);
        assert_eq!(stats.completions, 1);
        assert_eq!(stats.high_score, Some(98));
        assert_eq!(storage.get(COMPLETIONS_KEY).as_deref(), Some("1"));
        assert_eq!(storage.get(AVERAGE_KEY).as_deref(), Some("37"));
        assert_eq!(storage.get(HIGH_SCORE_KEY).as_deref(), Some("98"));
    }

    #[test]
    fn test_running_average_truncates() {
        let mut storage = MemoryStorage::new();
        storage.insert(COMPLETIONS_KEY, "2");
        storage.insert(AVERAGE_KEY, "10");
        storage.insert(HIGH_SCORE_KEY, "100");

        let stats = Statistics::record_round(&mut storage, 60, 15);
        // (10 * 2 + 15) / 3 = 11.67
        assert_eq!(stats.average_at_max_score, Some(11));
        assert_eq!(stats.completions, 3);
        assert_eq!(stats.high_score, Some(100));
        assert_eq!(storage.get(HIGH_SCORE_KEY).as_deref(), Some("100"));
    }

    #[test]
    fn test_equal_score_does_not_rewrite() {
        let mut storage = MemoryStorage::new();
        storage.insert(HIGH_SCORE_KEY, "90");
        assert!(!Statistics::load(&storage).beats_high_score(90));
        let stats = Statistics::record_round(&mut storage, 90, 0);
        assert_eq!(stats.high_score, Some(90));
    }

    #[test]
    fn test_garbage_treated_as_missing() {
        let mut storage = MemoryStorage::new();
        storage.insert(COMPLETIONS_KEY, "lots");
        storage.insert(HIGH_SCORE_KEY, "NaN");
        let stats = Statistics::load(&storage);
        assert_eq!(stats.completions, 0);
        assert_eq!(stats.high_score, None);
    }

    #[test]
    fn test_failed_writes_still_report() {
        let mut storage = MemoryStorage::read_only();
        let stats = Statistics::record_round(&mut storage, 70, 5);
        assert_eq!(stats.completions, 1);
        assert!(storage.is_empty());
    }
}
