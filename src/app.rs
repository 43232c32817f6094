use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Side};
use anyhow::Context;
use knockout_engine::{Bracket, BracketReport, CoinFlip, SeededShuffler};
use log::{error, info};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Registration,
    Match,
    Bracket,
    Results,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        log::set_max_level(settings.log_level);

        let mut state = AppState::new();
        state.tournament.coin = CoinFlip::new(settings.seed);
        Self { settings, state }
    }

    // -----------------------------------------------------------------------
    // Tournament lifecycle
    // -----------------------------------------------------------------------

    /// Shuffle and pair `roster`, then move to the first match.
    pub fn start_tournament(&mut self, roster: Vec<String>) {
        let mut shuffler = SeededShuffler::new(self.settings.seed);
        let bracket = match Bracket::build(&roster, &mut shuffler) {
            Ok(bracket) => bracket,
            Err(e) => {
                self.on_error(e.to_string());
                return;
            }
        };
        info!(
            "bracket ready: {} participants, {} rounds, {} matches",
            roster.len(),
            bracket.round_count(),
            bracket.matches().len()
        );

        self.state.last_error = None;
        self.state.tournament.bracket = Some(bracket);
        self.state.tournament.recent.clear();
        self.state.bracket_view.first_round = 0;
        self.state.bracket_view.scroll_offset = 0;
        self.state.active_tab = MenuItem::Match;

        if self.settings.auto {
            self.simulate_rest();
        } else {
            self.refresh_contest();
        }
    }

    /// Pull the next pairing from the engine, finishing up when there is none.
    fn refresh_contest(&mut self) {
        let Some(bracket) = self.state.tournament.bracket.as_mut() else {
            return;
        };
        match bracket.next_contest() {
            Ok(contest) => {
                let finished = contest.is_none();
                self.state.tournament.contest = contest;
                self.state.tournament.selected = Side::A;
                if finished {
                    self.on_complete();
                }
            }
            Err(e) => self.on_error(e.to_string()),
        }
    }

    fn on_complete(&mut self) {
        self.update_tab(MenuItem::Results);
        self.state.results_scroll = 0;
        if self.settings.export_path.is_some() {
            match self.export() {
                Ok(notice) => self.state.notice = Some(notice),
                Err(e) => self.on_error(format!("{e:#}")),
            }
        }
    }

    fn export(&self) -> anyhow::Result<String> {
        let (Some(path), Some(bracket)) =
            (&self.settings.export_path, &self.state.tournament.bracket)
        else {
            anyhow::bail!("nothing to export");
        };
        let report = BracketReport::from_bracket(bracket)?;
        report
            .save(path)
            .with_context(|| format!("export to {}", path.display()))?;
        info!("bracket exported to {}", path.display());
        Ok(format!("Saved bracket to {}", path.display()))
    }

    /// The resolved bracket, once there is a champion.
    pub fn finished_bracket(&self) -> Option<&Bracket> {
        self.state
            .tournament
            .bracket
            .as_ref()
            .filter(|b| b.is_resolved())
    }

    // -----------------------------------------------------------------------
    // Decisions
    // -----------------------------------------------------------------------

    pub fn select_side(&mut self, side: Side) {
        self.state.tournament.selected = side;
    }

    pub fn confirm_selection(&mut self) {
        let Some(contest) = &self.state.tournament.contest else {
            return;
        };
        let winner = self.state.tournament.selected.pick(contest).to_string();
        self.submit(winner);
    }

    /// Flip a coin for the pending match.
    pub fn simulate_current(&mut self) {
        let Some(contest) = &self.state.tournament.contest else {
            return;
        };
        let winner = self
            .state
            .tournament
            .coin
            .flip(&contest.slot_a, &contest.slot_b)
            .to_string();
        self.submit(winner);
    }

    /// Flip coins for every remaining match.
    pub fn simulate_rest(&mut self) {
        let tournament = &mut self.state.tournament;
        let Some(bracket) = tournament.bracket.as_mut() else {
            return;
        };
        let before = bracket.completed_count();
        let outcome = bracket.resolve(&mut tournament.coin).map(str::to_string);
        let simulated = bracket.completed_count() - before;

        match outcome {
            Ok(champion) => {
                tournament
                    .recent
                    .push(format!("Simulated {simulated} matches, {champion} takes the title"));
            }
            Err(e) => self.on_error(e.to_string()),
        }
        self.refresh_contest();
    }

    fn submit(&mut self, winner: String) {
        let tournament = &mut self.state.tournament;
        let (Some(bracket), Some(contest)) = (tournament.bracket.as_mut(), &tournament.contest)
        else {
            return;
        };
        match bracket.submit_winner(contest.match_id, &winner) {
            Ok(()) => {
                let loser = if contest.slot_a == winner {
                    &contest.slot_b
                } else {
                    &contest.slot_a
                };
                tournament.recent.push(format!(
                    "Round {}, Match {}: {winner} def. {loser}",
                    contest.round, contest.match_id
                ));
                self.state.last_error = None;
            }
            Err(e) => self.on_error(e.to_string()),
        }
        self.refresh_contest();
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    pub fn register_input(&mut self) {
        self.state.registration.submit_input();
    }

    /// Start with the registered names once there are enough of them.
    pub fn finish_registration(&mut self) {
        if !self.state.registration.is_ready() {
            self.state.registration.message =
                Some("Register at least 2 participants first".to_string());
            return;
        }
        let roster = self.state.registration.names.clone();
        self.start_tournament(roster);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    /// Flip between the match card and the bracket; the results tab replaces
    /// the match card once the tournament is over.
    pub fn cycle_view(&mut self) {
        let primary = if self.state.tournament.is_complete() {
            MenuItem::Results
        } else {
            MenuItem::Match
        };
        match self.state.active_tab {
            MenuItem::Bracket => self.update_tab(primary),
            MenuItem::Match | MenuItem::Results => self.update_tab(MenuItem::Bracket),
            _ => {}
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Bracket navigation
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        let rounds = self.state.tournament.round_sizes().len();
        self.state.bracket_view.next_round(rounds);
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket_view.prev_round();
    }

    pub fn bracket_scroll_down(&mut self) {
        self.state.bracket_view.scroll_down();
    }

    pub fn bracket_scroll_up(&mut self) {
        self.state.bracket_view.scroll_up();
    }

    pub fn bracket_follow_current(&mut self) {
        self.state.bracket_view.follow_current = true;
    }

    pub fn results_scroll_down(&mut self) {
        self.state.results_scroll = self.state.results_scroll.saturating_add(1);
    }

    pub fn results_scroll_up(&mut self) {
        self.state.results_scroll = self.state.results_scroll.saturating_sub(1);
    }

    pub fn on_error(&mut self, message: String) {
        error!("{message}");
        self.state.last_error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(auto: bool, seed: u64) -> App {
        let settings = AppSettings {
            auto,
            seed: Some(seed),
            ..AppSettings::default()
        };
        App::new(settings)
    }

    fn roster(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{i}")).collect()
    }

    #[test]
    fn starting_opens_the_first_match() {
        let mut app = app(false, 3);
        app.start_tournament(roster(4));
        assert_eq!(app.state.active_tab, MenuItem::Match);
        let contest = app.state.tournament.contest.clone().unwrap();
        assert_eq!(contest.round, 1);
        assert!(app.finished_bracket().is_none());
    }

    #[test]
    fn picking_every_slot_a_crowns_a_champion() {
        let mut app = app(false, 5);
        app.start_tournament(roster(5));
        let mut decisions = 0;
        while app.state.tournament.contest.is_some() {
            app.select_side(Side::A);
            app.confirm_selection();
            decisions += 1;
        }
        assert_eq!(decisions, 4);
        assert_eq!(app.state.tournament.recent.len(), 4);
        assert!(app.state.last_error.is_none());
        assert_eq!(app.state.active_tab, MenuItem::Results);
        assert!(app.finished_bracket().is_some());
    }

    #[test]
    fn side_b_pick_is_recorded() {
        let mut app = app(false, 1);
        app.start_tournament(roster(2));
        let contest = app.state.tournament.contest.clone().unwrap();
        app.select_side(Side::B);
        app.confirm_selection();
        let bracket = app.finished_bracket().unwrap();
        assert_eq!(bracket.winner().unwrap(), contest.slot_b);
        assert!(app.state.tournament.recent[0].contains("def."));
    }

    #[test]
    fn simulate_current_advances_one_match() {
        let mut app = app(false, 9);
        app.start_tournament(roster(8));
        let first = app.state.tournament.contest.clone().unwrap();
        app.simulate_current();
        let next = app.state.tournament.contest.clone().unwrap();
        assert_ne!(first.match_id, next.match_id);
        assert_eq!(app.state.tournament.recent.len(), 1);
    }

    #[test]
    fn auto_mode_finishes_before_the_first_frame() {
        let mut app = app(true, 11);
        app.start_tournament(roster(12));
        assert!(app.state.tournament.contest.is_none());
        assert!(app.finished_bracket().is_some());
        assert_eq!(app.state.active_tab, MenuItem::Results);
    }

    #[test]
    fn same_seed_same_champion() {
        let champion = |seed| {
            let mut app = app(true, seed);
            app.start_tournament(roster(16));
            app.finished_bracket().unwrap().winner().unwrap().to_string()
        };
        assert_eq!(champion(42), champion(42));
    }

    #[test]
    fn registration_needs_two_names() {
        let mut app = app(false, 1);
        app.state.registration.input = "Solo".to_string();
        app.register_input();
        app.finish_registration();
        assert_eq!(app.state.active_tab, MenuItem::Registration);
        assert!(app.state.registration.message.is_some());

        app.state.registration.input = "Duo".to_string();
        app.register_input();
        app.finish_registration();
        assert_eq!(app.state.active_tab, MenuItem::Match);
    }

    #[test]
    fn cycle_view_switches_between_card_and_bracket() {
        let mut app = app(false, 2);
        app.start_tournament(roster(3));
        app.cycle_view();
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
        app.cycle_view();
        assert_eq!(app.state.active_tab, MenuItem::Match);
    }

    #[test]
    fn completion_exports_when_configured() {
        let dir = std::env::temp_dir().join(format!("knockout-app-{}", std::process::id()));
        let path = dir.join("final.json");
        let settings = AppSettings {
            auto: true,
            seed: Some(4),
            export_path: Some(path.clone()),
            ..AppSettings::default()
        };
        let mut app = App::new(settings);
        app.start_tournament(roster(6));

        assert!(app.state.notice.as_deref().unwrap().contains("final.json"));
        let report = BracketReport::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.champion, app.finished_bracket().unwrap().winner().unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app(false, 1);
        app.start_tournament(roster(4));
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Match);
    }
}
