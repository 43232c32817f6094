use crate::app::{App, MenuItem};
use crate::state::app_state::Side;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub fn handle_key_bindings(key_event: KeyEvent, app: &mut App) -> KeyOutcome {
    let quit = matches!(
        (key_event.code, key_event.modifiers),
        (Char('c'), KeyModifiers::CONTROL)
    );
    if quit {
        return KeyOutcome::Quit;
    }

    if app.state.show_intro {
        match key_event.code {
            KeyCode::Enter => app.dismiss_intro(),
            Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    // Typing a name takes every printable key.
    if app.state.active_tab == MenuItem::Registration {
        match key_event.code {
            KeyCode::Enter => app.register_input(),
            KeyCode::Esc => app.finish_registration(),
            KeyCode::Backspace if app.state.registration.input.is_empty() => {
                app.state.registration.remove_last()
            }
            KeyCode::Backspace => app.state.registration.backspace(),
            Char(c) => app.state.registration.push_char(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        (_, Char('q'), _) => return KeyOutcome::Quit,

        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),
        (_, KeyCode::Tab, _) => app.cycle_view(),

        // Deciding the current match
        (MenuItem::Match, Char('1') | KeyCode::Left, _) => app.select_side(Side::A),
        (MenuItem::Match, Char('2') | KeyCode::Right, _) => app.select_side(Side::B),
        (MenuItem::Match | MenuItem::Bracket, KeyCode::Enter, _) => app.confirm_selection(),
        (MenuItem::Match | MenuItem::Bracket, Char('/'), _) => app.simulate_current(),
        (MenuItem::Match | MenuItem::Bracket, Char('s'), _) => app.simulate_rest(),

        // Bracket navigation
        (MenuItem::Bracket, Char('1'), _) => app.select_side(Side::A),
        (MenuItem::Bracket, Char('2'), _) => app.select_side(Side::B),
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => app.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => app.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => app.bracket_scroll_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => app.bracket_scroll_up(),
        (MenuItem::Bracket, Char('c'), _) => app.bracket_follow_current(),

        // Results navigation
        (MenuItem::Results, Char('j') | KeyCode::Down, _) => app.results_scroll_down(),
        (MenuItem::Results, Char('k') | KeyCode::Up, _) => app.results_scroll_up(),

        // Global
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }
    KeyOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;

    fn press(app: &mut App, code: KeyCode) -> KeyOutcome {
        handle_key_bindings(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn started(n: usize) -> App {
        let mut app = App::new(AppSettings {
            seed: Some(7),
            ..AppSettings::default()
        });
        app.dismiss_intro();
        app.start_tournament((1..=n).map(|i| format!("P{i}")).collect());
        app
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = App::new(AppSettings::default());
        let ctrl_c = KeyEvent::new(Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_bindings(ctrl_c, &mut app), KeyOutcome::Quit);
    }

    #[test]
    fn intro_waits_for_enter() {
        let mut app = App::new(AppSettings::default());
        assert_eq!(press(&mut app, Char('x')), KeyOutcome::Continue);
        assert!(app.state.show_intro);
        press(&mut app, KeyCode::Enter);
        assert!(!app.state.show_intro);
    }

    #[test]
    fn registration_captures_typed_names() {
        let mut app = App::new(AppSettings::default());
        app.dismiss_intro();
        for c in "qa".chars() {
            assert_eq!(press(&mut app, Char(c)), KeyOutcome::Continue);
        }
        press(&mut app, KeyCode::Enter);
        for c in "Bo".chars() {
            press(&mut app, Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.registration.names, vec!["qa", "Bo"]);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.active_tab, MenuItem::Match);
    }

    #[test]
    fn arrow_and_enter_decide_the_match() {
        let mut app = started(2);
        let contest = app.state.tournament.contest.clone().unwrap();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state.tournament.selected, Side::B);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.finished_bracket().unwrap().winner().unwrap(), contest.slot_b);
    }

    #[test]
    fn s_simulates_everything() {
        let mut app = started(9);
        press(&mut app, Char('s'));
        assert!(app.finished_bracket().is_some());
        assert_eq!(app.state.active_tab, MenuItem::Results);
    }

    #[test]
    fn tab_and_round_keys_drive_the_bracket_view() {
        let mut app = started(16);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
        press(&mut app, Char('l'));
        press(&mut app, Char('l'));
        assert_eq!(app.state.bracket_view.first_round, 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state.bracket_view.first_round, 1);
        press(&mut app, Char('j'));
        assert!(!app.state.bracket_view.follow_current);
        press(&mut app, Char('c'));
        assert!(app.state.bracket_view.follow_current);
    }

    #[test]
    fn q_quits_outside_registration() {
        let mut app = started(4);
        assert_eq!(press(&mut app, Char('q')), KeyOutcome::Quit);
    }
}
