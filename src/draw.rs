use std::io::Stdout;

use knockout_engine::{Bracket, Match};
use tui::backend::CrosstermBackend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::Banner;
use crate::components::bracket::{BracketGrid, BracketView};
use crate::components::theme::{Tone, resolve, round_label};
use crate::state::app_state::Side;
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 4] = &["Register", "Match", "Bracket", "Results"];

const RECENT_RESULTS: usize = 8;

pub fn draw(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> std::io::Result<()> {
    let size = terminal.size()?;
    if size.width <= 10 || size.height <= 10 {
        return Ok(());
    }

    terminal.draw(|f| {
        let area = f.area();
        if app.state.show_intro {
            draw_intro(f, area, app);
            return;
        }

        let layout = LayoutAreas::new(area, app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Registration => draw_registration(f, layout.main, app),
            MenuItem::Match => draw_match(f, layout.main, app),
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Results => draw_results(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_footer(f, layout.footer, app);
    })?;
    Ok(())
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Knockout ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, roster_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Banner::with_subtitle("single-elimination tournament", Tone::Secondary),
        banner_area,
    );

    let roster = match &app.state.tournament.bracket {
        Some(bracket) => format!(
            "{} participants, {} rounds, {} matches",
            bracket.participants().len(),
            bracket.round_count(),
            bracket.matches().len()
        ),
        None => "No participants yet, you will register them next".to_string(),
    };
    f.render_widget(
        Paragraph::new(roster)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        roster_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to begin")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_for = |item: MenuItem| match item {
        MenuItem::Registration => Some(0),
        MenuItem::Match => Some(1),
        MenuItem::Bracket => Some(2),
        MenuItem::Results => Some(3),
        MenuItem::Help => None,
    };
    let tab_index = tab_for(app.state.active_tab)
        .or_else(|| tab_for(app.state.previous_tab))
        .unwrap_or(0);

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_registration(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Registration ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height < 6 {
        return;
    }

    let reg = &app.state.registration;
    let [help_area, input_area, message_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(
            "Enter adds a name. Backspace on an empty line removes the last one. Esc starts.",
        )
        .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );

    let input_block =
        default_border(Color::Yellow).title(format!(" Participant {} ", reg.names.len() + 1));
    let input_inner = input_block.inner(input_area);
    f.render_widget(input_block, input_area);
    f.render_widget(
        Paragraph::new(format!("> {}_", reg.input)).style(Style::default().fg(Color::Yellow)),
        input_inner,
    );

    if let Some(message) = &reg.message {
        f.render_widget(
            Paragraph::new(message.as_str()).style(Style::default().fg(Color::Gray)),
            message_area,
        );
    }

    let visible = list_area.height as usize;
    let skip = reg.names.len().saturating_sub(visible);
    let lines: Vec<Line> = reg
        .names
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, name)| {
            Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(name.as_str()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list_area);
}

fn draw_match(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Match ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tournament = &app.state.tournament;
    let (Some(bracket), Some(contest)) = (&tournament.bracket, &tournament.contest) else {
        draw_placeholder(f, inner, "No match waiting. Press Tab for the bracket.");
        return;
    };

    let [header_area, _gap, cards_area, path_area, keys_area, _gap2, recent_area] =
        Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

    let total_rounds = bracket.round_count();
    let header = vec![
        Line::from(Span::styled(
            round_label(contest.round, total_rounds),
            resolve(Tone::Accent),
        )),
        Line::from(Span::styled(
            format!(
                "Round {} of {}  |  Match {}  |  {}/{} matches complete",
                contest.round,
                total_rounds,
                contest.match_id,
                bracket.completed_count(),
                bracket.matches().len()
            ),
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(header).alignment(Alignment::Center), header_area);

    let [left, vs, right] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(cards_area);
    let selected = tournament.selected;
    draw_contestant_card(f, left, "1", &contest.slot_a, selected == Side::A);
    draw_contestant_card(f, right, "2", &contest.slot_b, selected == Side::B);
    let [_, vs_line, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(vs);
    f.render_widget(
        Paragraph::new("vs").style(resolve(Tone::Dim)).alignment(Alignment::Center),
        vs_line,
    );

    let path = bracket.path_to_final(contest.match_id);
    let ahead: Vec<String> = path.iter().skip(1).map(|m| format!("Match {}", m.id())).collect();
    let road = if ahead.is_empty() {
        "The winner of this match is the champion".to_string()
    } else {
        format!("Winner advances to {}", ahead.join(" -> "))
    };
    f.render_widget(
        Paragraph::new(road)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        path_area,
    );

    f.render_widget(
        Paragraph::new("1/← slot A   2/→ slot B   Enter confirm   / simulate   s simulate rest")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        keys_area,
    );

    draw_recent(f, recent_area, &tournament.recent);
}

fn draw_contestant_card(f: &mut Frame, area: Rect, key: &str, name: &str, selected: bool) {
    let (color, style) = if selected {
        (
            Color::Yellow,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        (Color::DarkGray, Style::default().fg(Color::White))
    };
    let block = default_border(color).title(format!(" {key} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_, name_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Paragraph::new(name).style(style).alignment(Alignment::Center),
        name_area,
    );
}

fn draw_recent(f: &mut Frame, area: Rect, recent: &[String]) {
    if area.height == 0 || recent.is_empty() {
        return;
    }
    let mut lines = vec![Line::from(Span::styled(
        "Recent results",
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        recent
            .iter()
            .rev()
            .take(RECENT_RESULTS.min(area.height.saturating_sub(1) as usize))
            .map(|r| Line::from(Span::styled(r.as_str(), Style::default().fg(Color::White)))),
    );
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(bracket) = app.state.tournament.bracket.as_ref() else {
        let block = default_border(Color::White).title(" Bracket ");
        let inner = block.inner(area);
        f.render_widget(block, area);
        draw_placeholder(f, inner, "Register participants to build the bracket");
        return;
    };

    let total_rounds = bracket.round_count();
    let sizes = app.state.tournament.round_sizes();
    let view = &mut app.state.bracket_view;
    let block = default_border(Color::White).title(format!(
        " Bracket  |  {} participants  |  h/l rounds  j/k scroll  c follow ",
        bracket.participants().len()
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 4 {
        return;
    }

    let [labels_area, grid_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    let grid = BracketGrid::compute(grid_area.width, &sizes, view.first_round);
    view.first_round = grid.first_round;

    let rounds: Vec<Vec<&Match>> = (0..grid.visible_rounds())
        .map(|d| bracket.matches_in_round((grid.first_round + d + 1) as u32))
        .collect();

    for (d, col) in grid.round_cols.iter().enumerate() {
        let round = (grid.first_round + d + 1) as u32;
        let x = labels_area.x + col;
        let width = grid.cell_width.min((labels_area.x + labels_area.width).saturating_sub(x));
        if width == 0 {
            continue;
        }
        f.render_widget(
            Paragraph::new(round_label(round, total_rounds)).style(resolve(Tone::Accent)),
            Rect::new(x, labels_area.y, width, 1),
        );
    }

    let current = app.state.tournament.contest.as_ref().map(|c| c.match_id);
    if view.follow_current
        && let Some(pending) = current.and_then(|id| bracket.match_by_id(id))
        && let Some(depth) = (pending.round() as usize).checked_sub(grid.first_round + 1)
        && let Some(index) = rounds
            .get(depth)
            .and_then(|r| r.iter().position(|m| m.id() == pending.id()))
    {
        view.scroll_offset = grid.scroll_to(depth, index, grid_area.height, view.scroll_offset);
    }
    let max_scroll = grid.total_height.saturating_sub(grid_area.height);
    view.scroll_offset = view.scroll_offset.min(max_scroll);

    f.render_widget(
        BracketView {
            rounds: &rounds,
            grid: &grid,
            current,
            scroll_offset: view.scroll_offset,
        },
        grid_area,
    );
}

fn draw_results(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White).title(" Results ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bracket) = app.state.tournament.bracket.as_ref().filter(|b| b.is_resolved()) else {
        draw_placeholder(f, inner, "The champion appears here once the final is decided");
        return;
    };
    let Ok(champion) = bracket.winner() else {
        return;
    };

    let [banner_area, body_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Banner::with_subtitle(format!("CHAMPION: {champion}"), Tone::Winner),
        banner_area,
    );

    let paragraph = Paragraph::new(results_lines(bracket)).wrap(Wrap { trim: false });
    let total = paragraph.line_count(body_area.width) as u16;
    let max_scroll = total.saturating_sub(body_area.height);
    app.state.results_scroll = app.state.results_scroll.min(max_scroll);
    f.render_widget(paragraph.scroll((app.state.results_scroll, 0)), body_area);
}

fn results_lines(bracket: &Bracket) -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Road to the title", heading))];
    if let Ok(path) = bracket.champion_path() {
        for m in path.iter().filter(|m| !m.is_bye()) {
            let opponent = m.loser().unwrap_or("-");
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<14}", round_label(m.round(), bracket.round_count())),
                    resolve(Tone::Accent),
                ),
                Span::raw(format!("def. {opponent}")),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Match history", heading)));
    for m in bracket.matches() {
        let style = if m.is_bye() {
            resolve(Tone::Dim)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("  > {m}"), style)));
    }
    lines
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1 / ←", "pick slot A"),
        ("2 / →", "pick slot B"),
        ("Enter", "confirm the highlighted pick"),
        ("/", "simulate the current match"),
        ("s", "simulate every remaining match"),
        ("Tab", "switch between match and bracket"),
        ("h / l", "previous / next round in the bracket"),
        ("j / k", "scroll the bracket or results"),
        ("c", "follow the current match in the bracket"),
        ("f", "toggle full screen"),
        ("\"", "toggle the log pane"),
        ("Esc", "close help"),
        ("q / Ctrl-C", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), resolve(Tone::Accent)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_separator(' ')
        .output_target(false);
    f.render_widget(logs, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(err) = &app.state.last_error {
        (err.as_str(), Style::default().fg(Color::Red))
    } else if let Some(notice) = &app.state.notice {
        (notice.as_str(), Style::default().fg(Color::Green))
    } else {
        ("q quit  ? help  \" logs", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}
