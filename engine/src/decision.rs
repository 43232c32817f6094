//! Decision sources: whoever picks the winner of a two-sided match.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks the winner between two contestants.
///
/// Called with `(slot_a, slot_b)` in that order and may block (e.g. on a human).
/// The returned name must equal one of the two arguments; the engine rejects
/// anything else. `Err` aborts resolution with the given reason.
pub trait DecisionSource {
    fn decide(&mut self, slot_a: &str, slot_b: &str) -> Result<String, String>;
}

impl<F> DecisionSource for F
where
    F: FnMut(&str, &str) -> String,
{
    fn decide(&mut self, slot_a: &str, slot_b: &str) -> Result<String, String> {
        Ok(self(slot_a, slot_b))
    }
}

/// Fair coin flip between the two contestants.
#[derive(Debug, Clone)]
pub struct CoinFlip {
    rng: StdRng,
}

impl CoinFlip {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn flip<'a>(&mut self, slot_a: &'a str, slot_b: &'a str) -> &'a str {
        if self.rng.gen_bool(0.5) { slot_a } else { slot_b }
    }
}

impl Default for CoinFlip {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DecisionSource for CoinFlip {
    fn decide(&mut self, slot_a: &str, slot_b: &str) -> Result<String, String> {
        Ok(self.flip(slot_a, slot_b).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_decision_sources() {
        let mut calls = 0;
        let mut first = |a: &str, _b: &str| {
            calls += 1;
            a.to_string()
        };
        assert_eq!(first.decide("Ann", "Bo"), Ok("Ann".to_string()));
        drop(first);
        assert_eq!(calls, 1);
    }

    #[test]
    fn coin_flip_always_returns_a_contestant() {
        let mut coin = CoinFlip::new(Some(3));
        for _ in 0..50 {
            let w = coin.decide("Ann", "Bo").unwrap();
            assert!(w == "Ann" || w == "Bo");
        }
    }

    #[test]
    fn coin_flip_eventually_picks_both_sides() {
        let mut coin = CoinFlip::new(Some(11));
        let picks: Vec<&str> = (0..64).map(|_| coin.flip("Ann", "Bo")).collect();
        assert!(picks.contains(&"Ann"));
        assert!(picks.contains(&"Bo"));
    }

    #[test]
    fn seeded_coin_flips_repeat() {
        let mut one = CoinFlip::new(Some(99));
        let mut two = CoinFlip::new(Some(99));
        for _ in 0..20 {
            assert_eq!(one.flip("Ann", "Bo"), two.flip("Ann", "Bo"));
        }
    }
}
