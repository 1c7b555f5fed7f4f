//! Best score record
//!
//! A single integer persisted under `bestScore`. The in-memory value is
//! authoritative for the running process; the store is a best-effort mirror.

use crate::persistence::KeyValueStore;

/// Best score across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// Storage key (shared with earlier releases of the game)
    pub const STORAGE_KEY: &'static str = "bestScore";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Read the record once at startup
    ///
    /// Absent, unparsable or unreadable records all count as 0.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(value) => {
                    log::info!("Loaded best score {}", value);
                    Self { value }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed best score {:?}", raw);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Best score unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Raise the record to `score` if it beats it, persisting the new value
    ///
    /// Returns true when the record changed, even if the write failed.
    pub fn record(&mut self, score: u32, store: &mut impl KeyValueStore) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        if let Err(e) = store.set(Self::STORAGE_KEY, &score.to_string()) {
            log::warn!("Failed to persist best score {}: {}", score, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_absent_record_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn test_malformed_record_is_zero() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn test_record_only_raises() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::new(5);

        assert!(!best.record(3, &mut store));
        assert!(!best.record(5, &mut store));
        assert_eq!(store.get(BestScore::STORAGE_KEY).unwrap(), None);

        assert!(best.record(6, &mut store));
        assert_eq!(best.value(), 6);
        assert_eq!(BestScore::load(&store).value(), 6);
    }

    #[test]
    fn test_write_failure_keeps_memory_value() {
        let mut store = MemoryStore::read_only();
        let mut best = BestScore::default();
        assert!(best.record(4, &mut store));
        assert_eq!(best.value(), 4);
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn test_read_failure_is_zero() {
        let store = MemoryStore::unavailable();
        assert_eq!(BestScore::load(&store).value(), 0);
    }
}
