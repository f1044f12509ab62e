//! Riddle bank: draws without replacement, refills when exhausted

use rand::Rng;

use crate::tuning::Challenge;

/// Normalize an answer for comparison (trimmed, lowercase)
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Case-insensitive, whitespace-trimmed equality
pub fn answers_match(expected: &str, given: &str) -> bool {
    normalize_answer(expected) == normalize_answer(given)
}

/// One-letter hint for an answer ("Echo" -> 'E')
pub fn hint_letter(answer: &str) -> Option<char> {
    answer
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
}

/// Shared pool of riddles for one play-through
#[derive(Debug, Clone)]
pub struct ChallengeBank {
    pool: Vec<Challenge>,
    /// Indices into `pool` not yet drawn in the current pass
    remaining: Vec<usize>,
}

impl ChallengeBank {
    pub fn new(pool: Vec<Challenge>) -> Self {
        let remaining = (0..pool.len()).collect();
        Self { pool, remaining }
    }

    /// Draw a riddle uniformly from the unused ones, refilling first if none are left
    ///
    /// Returns `None` only for an empty pool, which config validation rules out.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<Challenge> {
        if self.remaining.is_empty() {
            log::debug!("Riddle pool exhausted, refilling {} riddles", self.pool.len());
            self.refill();
        }
        if self.remaining.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..self.remaining.len());
        let index = self.remaining.swap_remove(pick);
        self.pool.get(index).cloned()
    }

    /// Restore every riddle to the unused set
    pub fn refill(&mut self) {
        self.remaining = (0..self.pool.len()).collect();
    }

    /// Riddles left before the next refill
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}
