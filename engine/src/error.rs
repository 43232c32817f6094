use crate::MatchId;
use std::fmt;

pub type BracketResult<T> = Result<T, BracketError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// Fewer than two participants were handed to the builder.
    InvalidInput { count: usize },
    /// A decision named someone who is not in the match.
    InvalidWinner {
        match_id: MatchId,
        winner: String,
        slot_a: String,
        slot_b: String,
    },
    /// Champion or history requested before every match completed.
    NotResolved,
    SlotsAlreadyAssigned { match_id: MatchId },
    EmptyMatch { match_id: MatchId },
    AlreadyCompleted { match_id: MatchId },
    /// A winner was submitted for a match that is not the pending one.
    OutOfTurn {
        expected: Option<MatchId>,
        got: MatchId,
    },
    DecisionFailed { match_id: MatchId, reason: String },
    Export(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::InvalidInput { count } => {
                write!(f, "At least 2 participants required, got {count}")
            }
            BracketError::InvalidWinner {
                match_id,
                winner,
                slot_a,
                slot_b,
            } => write!(
                f,
                "Invalid winner for match {match_id}: {winner:?} is neither {slot_a:?} nor {slot_b:?}"
            ),
            BracketError::NotResolved => write!(f, "Bracket has not been fully resolved"),
            BracketError::SlotsAlreadyAssigned { match_id } => {
                write!(f, "Match {match_id} already has its contestants")
            }
            BracketError::EmptyMatch { match_id } => {
                write!(f, "Match {match_id} has no contestants")
            }
            BracketError::AlreadyCompleted { match_id } => {
                write!(f, "Match {match_id} is already completed")
            }
            BracketError::OutOfTurn { expected, got } => match expected {
                Some(expected) => write!(
                    f,
                    "Match {got} is not pending; match {expected} is waiting on a decision"
                ),
                None => write!(f, "Match {got} is not pending; no match is waiting"),
            },
            BracketError::DecisionFailed { match_id, reason } => {
                write!(f, "Decision for match {match_id} failed: {reason}")
            }
            BracketError::Export(msg) => write!(f, "Export failed: {msg}"),
        }
    }
}

impl std::error::Error for BracketError {}
