//! High score persistence
//!
//! Backends:
//! - `LocalStore`: browser LocalStorage (wasm only)
//! - `MemoryStore`: in-process, for native runs and tests
//!
//! The stored value is a plain decimal integer. Anything unreadable is treated
//! as no score at all.

/// Where the best score lives between sessions
pub trait ScoreStore {
    /// Stored best score, or 0 if missing or corrupt
    fn load_high_score(&self) -> u32;
    /// Best-effort; failures are logged, never surfaced
    fn save_high_score(&mut self, score: u32);
}

/// Parse a stored value. Leading/trailing whitespace is tolerated, anything
/// else that is not a non-negative integer reads as 0.
pub fn parse_high_score(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// Keeps the raw stored string in memory, as LocalStorage would
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    /// Start with an arbitrary stored string (possibly garbage)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&self) -> u32 {
        self.raw.as_deref().map(parse_high_score).unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u32) {
        self.raw = Some(score.to_string());
    }
}

/// Browser LocalStorage under [`HIGH_SCORE_KEY`](crate::consts::HIGH_SCORE_KEY)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load_high_score(&self) -> u32 {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score starts at 0");
            return 0;
        };
        match storage.get_item(crate::consts::HIGH_SCORE_KEY) {
            Ok(Some(raw)) => parse_high_score(&raw),
            _ => 0,
        }
    }

    fn save_high_score(&mut self, score: u32) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        if storage
            .set_item(crate::consts::HIGH_SCORE_KEY, &score.to_string())
            .is_err()
        {
            log::warn!("Failed to write {}", crate::consts::HIGH_SCORE_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_high_score() {
        assert_eq!(parse_high_score("17"), 17);
        assert_eq!(parse_high_score(" 17\n"), 17);
        assert_eq!(parse_high_score(""), 0);
        assert_eq!(parse_high_score("-4"), 0);
        assert_eq!(parse_high_score("12abc"), 0);
        assert_eq!(parse_high_score("99999999999999"), 0);
    }

    #[test]
    fn test_memory_store_corrupt_reads_zero() {
        let store = MemoryStore::with_raw("{not a number}");
        assert_eq!(store.load_high_score(), 0);
        assert_eq!(MemoryStore::default().load_high_score(), 0);
    }

    #[test]
    fn test_memory_store_saves() {
        let mut store = MemoryStore::default();
        store.save_high_score(23);
        assert_eq!(store.load_high_score(), 23);
    }
}
