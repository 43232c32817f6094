pub mod bracket;
pub mod decision;
pub mod error;
pub mod history;
pub mod shuffle;
mod tree;

pub use bracket::Bracket;
pub use decision::{CoinFlip, DecisionSource};
pub use error::{BracketError, BracketResult};
pub use history::BracketReport;
pub use shuffle::{KeepOrder, SeededShuffler, Shuffler};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Match sequence number. Assigned in creation order across the whole bracket, starting at 1.
pub type MatchId = u32;

/// One pairing at a given round.
///
/// `id` and `round` are fixed at creation. Slots are assigned once, the winner
/// is recorded once, and neither is ever cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    round: u32,
    slot_a: Option<String>,
    slot_b: Option<String>,
    winner: Option<String>,
    is_bye: bool,
    is_completed: bool,
}

impl Match {
    pub fn new(id: MatchId, round: u32) -> Self {
        Self {
            id,
            round,
            slot_a: None,
            slot_b: None,
            winner: None,
            is_bye: false,
            is_completed: false,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn slot_a(&self) -> Option<&str> {
        self.slot_a.as_deref()
    }

    pub fn slot_b(&self) -> Option<&str> {
        self.slot_b.as_deref()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn is_bye(&self) -> bool {
        self.is_bye
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// True once either slot has been filled.
    pub fn has_slots(&self) -> bool {
        self.slot_a.is_some() || self.slot_b.is_some()
    }

    /// The losing side of a completed, non-bye match.
    pub fn loser(&self) -> Option<&str> {
        if self.is_bye {
            return None;
        }
        let winner = self.winner.as_deref()?;
        [self.slot_a.as_deref(), self.slot_b.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| *name != winner)
    }

    /// Fill both slots. A single present slot makes this a bye that is won immediately.
    pub fn assign_slots(
        &mut self,
        slot_a: Option<String>,
        slot_b: Option<String>,
    ) -> BracketResult<()> {
        if self.has_slots() {
            return Err(BracketError::SlotsAlreadyAssigned { match_id: self.id });
        }

        match (slot_a, slot_b) {
            (None, None) => Err(BracketError::EmptyMatch { match_id: self.id }),
            (Some(a), Some(b)) => {
                self.slot_a = Some(a);
                self.slot_b = Some(b);
                Ok(())
            }
            (a, b) => {
                // Exactly one side present.
                let sole = a.clone().or_else(|| b.clone());
                self.slot_a = a;
                self.slot_b = b;
                self.is_bye = true;
                self.winner = sole;
                self.is_completed = true;
                Ok(())
            }
        }
    }

    /// Record the winner of a two-sided match.
    pub fn record_winner(&mut self, winner: &str) -> BracketResult<()> {
        if self.is_completed {
            return Err(BracketError::AlreadyCompleted { match_id: self.id });
        }
        let (Some(a), Some(b)) = (self.slot_a.as_deref(), self.slot_b.as_deref()) else {
            return Err(BracketError::NotResolved);
        };
        if winner.trim().is_empty() || (winner != a && winner != b) {
            return Err(BracketError::InvalidWinner {
                match_id: self.id,
                winner: winner.to_string(),
                slot_a: a.to_string(),
                slot_b: b.to_string(),
            });
        }
        self.winner = Some(winner.to_string());
        self.is_completed = true;
        Ok(())
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.slot_a.as_deref().unwrap_or("TBD");
        let b = self.slot_b.as_deref().unwrap_or("TBD");
        if self.is_bye {
            let sole = self.winner.as_deref().unwrap_or(a);
            return write!(f, "Round {}, Match {}: {} (BYE)", self.round, self.id, sole);
        }
        match self.winner.as_deref() {
            Some(winner) if self.is_completed => write!(
                f,
                "Round {}, Match {}: {} vs {} → Winner: {}",
                self.round, self.id, a, b, winner
            ),
            _ => write!(
                f,
                "Round {}, Match {}: {} vs {} (Pending)",
                self.round, self.id, a, b
            ),
        }
    }
}

/// A two-sided pairing waiting on a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    pub match_id: MatchId,
    pub round: u32,
    pub slot_a: String,
    pub slot_b: String,
}

/// Number of rounds a bracket of `participants` entrants needs: ⌈log2 P⌉.
pub fn round_count(participants: usize) -> u32 {
    if participants < 2 {
        return 0;
    }
    usize::BITS - (participants - 1).leading_zeros()
}

/// Total matches the halving-with-promotion rule creates for `participants` entrants.
///
/// Every round holds ⌈n/2⌉ matches for the n entries reaching it, so an odd
/// entry count adds a bye match on top of the `P - 1` eliminations.
pub fn match_count(participants: usize) -> usize {
    if participants < 2 {
        return 0;
    }
    let mut total = 0;
    let mut entries = participants;
    while entries > 1 {
        let matches = entries.div_ceil(2);
        total += matches;
        entries = matches;
    }
    total
}
