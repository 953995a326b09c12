//! Best score tracking
//!
//! A single number that only ever goes up. Loading and saving goes through a
//! [`ScoreStore`](crate::persistence::ScoreStore).

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// The best score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Whether a finished run with this score would set a new best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from a store (0 when nothing usable is stored)
    pub fn load(store: &dyn ScoreStore) -> Self {
        let best = store.load_high_score();
        log::info!("Loaded high score: {}", best);
        Self::new(best)
    }

    pub fn save(&self, store: &mut dyn ScoreStore) {
        store.save_high_score(self.best);
        log::info!("High score saved ({})", self.best);
    }
}
