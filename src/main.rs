mod app;
mod components;
mod draw;
mod keys;
mod report;
mod roster;
mod state;
mod ui;

use crate::app::App;
use crate::keys::KeyOutcome;
use crate::state::app_settings::{AppSettings, CliCommand, parse_args, usage_text};
use anyhow::{Context, bail};
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use knockout_engine::{Bracket, BracketReport, CoinFlip, SeededShuffler};
use std::io::Stdout;
use std::{io, panic};
use tui::{Terminal, backend::CrosstermBackend};

fn main() -> anyhow::Result<()> {
    let Some(settings) = handle_cli_args() else {
        return Ok(());
    };

    let roster = roster::load_roster(settings.roster_file.as_deref(), &settings.names)?;

    if settings.headless {
        let Some(roster) = roster else {
            bail!("--no-tui needs participants, pass names or --file");
        };
        return run_headless(&settings, roster);
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);

    let mut app = App::new(settings);
    if let Some(roster) = roster {
        app.start_tournament(roster);
    }

    let result = main_ui_loop(&mut terminal, &mut app);
    cleanup_terminal()?;
    result?;

    if let Some(bracket) = app.finished_bracket() {
        report::print_report(bracket, app.settings.color)?;
    }
    Ok(())
}

/// `None` when the arguments were fully handled (help, version).
fn handle_cli_args() -> Option<AppSettings> {
    match parse_args(std::env::args().skip(1), |key| std::env::var(key).ok()) {
        Ok(CliCommand::Run(settings)) => Some(settings),
        Ok(CliCommand::Help) => {
            println!("{}", usage_text());
            None
        }
        Ok(CliCommand::Version) => {
            println!("knockout {}", env!("CARGO_PKG_VERSION"));
            None
        }
        Err(e) => {
            eprintln!("{e:#}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn run_headless(settings: &AppSettings, roster: Vec<String>) -> anyhow::Result<()> {
    let mut bracket = Bracket::build(&roster, &mut SeededShuffler::new(settings.seed))?;
    bracket.resolve(&mut CoinFlip::new(settings.seed))?;

    if let Some(path) = &settings.export_path {
        BracketReport::from_bracket(&bracket)?
            .save(path)
            .with_context(|| format!("export to {}", path.display()))?;
    }
    report::print_report(&bracket, settings.color)
}

fn main_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        draw::draw(terminal, app).context("draw failed")?;

        match crossterm_event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if keys::handle_key_bindings(key_event, app) == KeyOutcome::Quit {
                    return Ok(());
                }
            }
            // Redrawn at the top of the loop.
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

fn cleanup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
