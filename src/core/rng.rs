//! Deterministic deck ordering.
//!
//! Deck order is decided once, at match setup, from a seed the match
//! store keeps alongside the document. Replaying setup with the same seed
//! produces the same decks and opening hands.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for deck shuffles.
///
/// ```
/// use rust_tcg::core::DeckRng;
///
/// let mut a = DeckRng::new(7);
/// let mut b = DeckRng::new(7);
/// let mut deck_a: Vec<u32> = (0..40).collect();
/// let mut deck_b = deck_a.clone();
///
/// a.shuffle(&mut deck_a);
/// b.shuffle(&mut deck_b);
/// assert_eq!(deck_a, deck_b);
/// ```
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = DeckRng::new(42);
        let mut deck: Vec<u32> = (0..30).collect();
        rng.shuffle(&mut deck);

        let mut sorted = deck.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..30).collect::<Vec<_>>());
        assert_ne!(deck, sorted);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a: Vec<u32> = (0..30).collect();
        let mut b = a.clone();
        DeckRng::new(1).shuffle(&mut a);
        DeckRng::new(2).shuffle(&mut b);
        assert_ne!(a, b);
    }
}
