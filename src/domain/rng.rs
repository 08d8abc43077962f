//! Deterministic RNG owned by the game state.
//!
//! A small linear congruential generator, reproducible from a 32-bit seed.
//! All in-match randomness (initial shuffle, drop_card selection) flows
//! through this; same seed + same input sequence gives identical games.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRng {
    state: u32,
}

impl GameRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG constants.
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform index in `0..max` via rejection sampling (no modulo bias).
    pub fn next_range(&mut self, max: usize) -> usize {
        debug_assert!(max > 0, "next_range requires max > 0");
        let m = max as u32;
        let limit = u32::MAX - (u32::MAX % m);
        loop {
            let x = self.next_u32();
            if x < limit {
                return (x % m) as usize;
            }
        }
    }

    /// Mix a salt into the generator state before the next draw.
    ///
    /// drop_card reseeds with a perturbation derived from the opponent's
    /// hand size so the selection stays reproducible from the match seed.
    pub fn perturb(&mut self, salt: u32) {
        self.state ^= salt.wrapping_mul(0x9E37_79B9);
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(i + 1);
            items.swap(i, j);
        }
    }

    /// Sample without consuming generator state. The bot's metric pick
    /// rides the match seed but must not advance the match RNG.
    pub fn peek_range(&self, max: usize) -> usize {
        let mut copy = *self;
        copy.next_range(max)
    }
}
