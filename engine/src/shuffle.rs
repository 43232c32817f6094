//! Randomness providers that decide first-round pairings.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Produces a permutation of the participant list. Called once per bracket build.
pub trait Shuffler {
    fn shuffle(&mut self, participants: &[String]) -> Vec<String>;
}

/// Uniform shuffle backed by `StdRng`. Seeded brackets are reproducible.
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: StdRng,
}

impl SeededShuffler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Default for SeededShuffler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, participants: &[String]) -> Vec<String> {
        let mut shuffled = participants.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled
    }
}

/// Leaves the order untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl Shuffler for KeepOrder {
    fn shuffle(&mut self, participants: &[String]) -> Vec<String> {
        participants.to_vec()
    }
}
