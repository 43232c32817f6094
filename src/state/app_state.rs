use crate::app::MenuItem;
use crate::roster::validate_new_name;
use knockout_engine::{Bracket, CoinFlip, Contest};

// ---------------------------------------------------------------------------
// Registration state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RegistrationState {
    pub names: Vec<String>,
    pub input: String,
    pub message: Option<String>,
}

impl RegistrationState {
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.message = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Add the typed name. Rejections are left in `message`.
    pub fn submit_input(&mut self) -> bool {
        match validate_new_name(&self.names, &self.input) {
            Ok(name) => {
                self.message = Some(format!("Registered {name}"));
                self.names.push(name);
                self.input.clear();
                true
            }
            Err(reason) => {
                self.message = Some(reason);
                false
            }
        }
    }

    pub fn remove_last(&mut self) {
        if let Some(name) = self.names.pop() {
            self.message = Some(format!("Removed {name}"));
        }
    }

    pub fn is_ready(&self) -> bool {
        self.names.len() >= 2
    }
}

// ---------------------------------------------------------------------------
// Tournament state
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn pick(self, contest: &Contest) -> &str {
        match self {
            Side::A => &contest.slot_a,
            Side::B => &contest.slot_b,
        }
    }
}

#[derive(Debug, Default)]
pub struct TournamentState {
    pub bracket: Option<Bracket>,
    /// Pairing waiting for a decision. `None` once the champion is crowned.
    pub contest: Option<Contest>,
    pub selected: Side,
    /// Decisions in the order they were made, newest last.
    pub recent: Vec<String>,
    pub coin: CoinFlip,
}

impl TournamentState {
    pub fn is_complete(&self) -> bool {
        self.bracket.as_ref().is_some_and(Bracket::is_resolved)
    }

    /// Per-round match counts, first round first.
    pub fn round_sizes(&self) -> Vec<usize> {
        let Some(bracket) = &self.bracket else {
            return Vec::new();
        };
        (1..=bracket.round_count())
            .map(|r| bracket.matches_in_round(r).len())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Bracket view state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketViewState {
    /// Zero-based round shown in the leftmost column.
    pub first_round: usize,
    /// Vertical scroll offset for when matches exceed terminal height.
    pub scroll_offset: u16,
    /// Keep the pending match in view until the user scrolls by hand.
    pub follow_current: bool,
}

impl BracketViewState {
    pub fn next_round(&mut self, round_count: usize) {
        if self.first_round + 1 < round_count {
            self.first_round += 1;
            self.scroll_offset = 0;
        }
    }

    pub fn prev_round(&mut self) {
        if self.first_round > 0 {
            self.first_round -= 1;
            self.scroll_offset = 0;
        }
    }

    pub fn scroll_down(&mut self) {
        self.follow_current = false;
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.follow_current = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// Transient notice shown in the footer, e.g. where the export went.
    pub notice: Option<String>,
    pub registration: RegistrationState,
    pub tournament: TournamentState,
    pub bracket_view: BracketViewState,
    pub results_scroll: u16,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            bracket_view: BracketViewState {
                follow_current: true,
                ..BracketViewState::default()
            },
            ..Self::default()
        }
    }
}
