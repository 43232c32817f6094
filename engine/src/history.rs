//! Serializable snapshot of a finished bracket.

use crate::{Bracket, BracketError, BracketResult, Match};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketReport {
    pub generated_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub champion: String,
    pub rounds: u32,
    /// Creation order: round ascending, then id ascending.
    pub matches: Vec<Match>,
}

impl BracketReport {
    /// Snapshot a resolved bracket. Fails with `NotResolved` otherwise.
    pub fn from_bracket(bracket: &Bracket) -> BracketResult<Self> {
        Self::from_bracket_at(bracket, Utc::now())
    }

    pub fn from_bracket_at(bracket: &Bracket, generated_at: DateTime<Utc>) -> BracketResult<Self> {
        let champion = bracket.winner()?.to_string();
        let matches = bracket.all_matches()?.to_vec();
        Ok(Self {
            generated_at,
            participants: bracket.participants().to_vec(),
            champion,
            rounds: bracket.round_count(),
            matches,
        })
    }

    pub fn to_json(&self) -> BracketResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BracketError::Export(format!("serialize report failed: {e}")))
    }

    /// Parse a saved report. Every match must read as one a finished bracket
    /// could have produced, and the champion must have won the last one.
    pub fn from_json(content: &str) -> BracketResult<Self> {
        let report: Self = serde_json::from_str(content)
            .map_err(|e| BracketError::Export(format!("invalid report json: {e}")))?;
        report.validate()?;
        Ok(report)
    }

    fn validate(&self) -> BracketResult<()> {
        for m in &self.matches {
            let replayed = replay(m).map_err(|e| {
                BracketError::Export(format!("inconsistent match {} in report: {e}", m.id()))
            })?;
            if replayed != *m {
                return Err(BracketError::Export(format!(
                    "inconsistent match {} in report",
                    m.id()
                )));
            }
        }
        let last_winner = self.matches.last().and_then(Match::winner);
        if last_winner != Some(self.champion.as_str()) {
            return Err(BracketError::Export(format!(
                "champion {} did not win the final",
                self.champion
            )));
        }
        Ok(())
    }

    /// Write the report as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> BracketResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| BracketError::Export(format!("create dir failed: {e}")))?;
        }
        let payload = self.to_json()?;
        std::fs::write(path, payload)
            .map_err(|e| BracketError::Export(format!("write {} failed: {e}", path.display())))
    }

    /// Non-bye matches decided on the way to the title.
    pub fn decided_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| !m.is_bye())
    }
}

/// Rebuild a completed match through the normal mutation path.
fn replay(m: &Match) -> BracketResult<Match> {
    let mut fresh = Match::new(m.id(), m.round());
    fresh.assign_slots(
        m.slot_a().map(str::to_string),
        m.slot_b().map(str::to_string),
    )?;
    if !fresh.is_completed() {
        fresh.record_winner(m.winner().unwrap_or_default())?;
    }
    Ok(fresh)
}
