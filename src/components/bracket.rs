use knockout_engine::{Match, MatchId};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{Tone, resolve};

/// Rows per match cell: slot A line, status line, slot B line.
pub const MATCH_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

const CELL_W_FULL: u16 = 22;
const CELL_W_MIN: u16 = 12;

/// Last status row a cell may use; its slot B line and one spare row stay addressable.
const MAX_CENTER_ROW: u32 = u16::MAX as u32 - 2;

/// Rows reserved for one match at `depth` columns to the right of the leftmost.
/// SH[0] = MATCH_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
pub fn slot_height(depth: usize) -> u16 {
    (0..depth).fold(MATCH_HEIGHT, |sh, _| sh.saturating_mul(2).saturating_add(1))
}

/// Pre-computed position for one match.
#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row of the status line, relative to the grid origin. Not scroll-adjusted.
    pub center_row: u16,
    pub col: u16,
    pub cell_width: u16,
    /// Column index within the visible window (0 = leftmost shown round).
    pub depth: usize,
    /// Index of the match within its round, in id order.
    pub index: usize,
}

/// Layout for a window of consecutive rounds, leftmost round first.
///
/// Match `j` of one round is fed by matches `2j` and `2j + 1` of the round
/// before it; the second feeder is missing when that round has an odd count.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    pub cells: Vec<MatchCell>,
    pub round_cols: Vec<u16>,
    pub cell_width: u16,
    pub total_height: u16,
    /// Zero-based round index of the leftmost visible column.
    pub first_round: usize,
    offsets: Vec<usize>,
}

impl BracketGrid {
    /// `round_sizes[r]` is the number of matches in round `r + 1`.
    ///
    /// As many rounds as fit at `CELL_W_MIN` are shown starting at
    /// `first_round`. Center rows follow the triangle formula:
    ///   center[d][i] = SH[d]/2 + i * (SH[d] + 1)
    /// which gives [1, 5, 9, ..] for the leftmost column, [3, 11, ..] for the next.
    /// Matches whose rows fall past the addressable range are left out of the grid.
    pub fn compute(terminal_width: u16, round_sizes: &[usize], first_round: usize) -> Self {
        let first_round = first_round.min(round_sizes.len().saturating_sub(1));
        let remaining = round_sizes.len().saturating_sub(first_round).max(1);
        let fit = ((terminal_width + CONNECTOR_WIDTH) / (CELL_W_MIN + CONNECTOR_WIDTH)).max(1);
        let visible = remaining.min(fit as usize);

        let connector_total = CONNECTOR_WIDTH * (visible as u16 - 1);
        let per_col = terminal_width.saturating_sub(connector_total) / visible as u16;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols: Vec<u16> = (0..visible).map(|d| stride * d as u16).collect();

        let mut cells = Vec::new();
        let mut offsets = vec![0];
        for d in 0..visible {
            let count = round_sizes.get(first_round + d).copied().unwrap_or(0);
            let sh = u32::from(slot_height(d));
            for i in 0..count {
                let center = u64::from(sh / 2) + i as u64 * u64::from(sh + 1);
                let Some(center_row) = u16::try_from(center)
                    .ok()
                    .filter(|&row| u32::from(row) <= MAX_CENTER_ROW)
                else {
                    break;
                };
                cells.push(MatchCell {
                    center_row,
                    col: round_cols[d],
                    cell_width,
                    depth: d,
                    index: i,
                });
            }
            offsets.push(cells.len());
        }

        let leftmost = round_sizes.get(first_round).copied().unwrap_or(0) as u64;
        let rows = (leftmost * u64::from(MATCH_HEIGHT + 1)).saturating_sub(1);
        let total_height = rows.min(u64::from(MAX_CENTER_ROW) + 2) as u16;

        Self {
            cells,
            round_cols,
            cell_width,
            total_height,
            first_round,
            offsets,
        }
    }

    pub fn visible_rounds(&self) -> usize {
        self.round_cols.len()
    }

    pub fn cells_for_depth(&self, depth: usize) -> &[MatchCell] {
        match (self.offsets.get(depth), self.offsets.get(depth + 1)) {
            (Some(&start), Some(&end)) => &self.cells[start..end],
            _ => &[],
        }
    }

    /// Scroll offset that brings the status row of `index` in column `depth` into view.
    pub fn scroll_to(&self, depth: usize, index: usize, view_height: u16, current: u16) -> u16 {
        let Some(cell) = self.cells_for_depth(depth).get(index) else {
            return current;
        };
        let top = cell.center_row.saturating_sub(1);
        let bottom = cell.center_row + 1;
        if top < current {
            top
        } else if view_height > 0 && bottom >= current.saturating_add(view_height) {
            bottom + 1 - view_height
        } else {
            current
        }
    }
}

/// Renders the visible window of a bracket.
pub struct BracketView<'a> {
    /// Matches per visible column, same window as `grid`.
    pub rounds: &'a [Vec<&'a Match>],
    /// Rebuild on resize or when the window moves.
    pub grid: &'a BracketGrid,
    /// Match waiting for a decision.
    pub current: Option<MatchId>,
    pub scroll_offset: u16,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CELL_W_MIN || area.height < MATCH_HEIGHT {
            return;
        }

        for cell in &self.grid.cells {
            let m = self.rounds.get(cell.depth).and_then(|r| r.get(cell.index)).copied();
            let current = m.is_some_and(|m| Some(m.id()) == self.current);
            draw_match_cell(m, cell, current, area, self.scroll_offset, buf);
        }

        for depth in 0..self.grid.visible_rounds().saturating_sub(1) {
            let children = self.grid.cells_for_depth(depth);
            let parents = self.grid.cells_for_depth(depth + 1);
            let conn_x = area.x + self.grid.round_cols[depth] + self.grid.cell_width;

            for (j, parent) in parents.iter().enumerate() {
                let Some(top) = children.get(2 * j) else {
                    continue;
                };
                let bottom = children.get(2 * j + 1).map(|c| c.center_row);
                draw_connector(
                    top.center_row,
                    parent.center_row,
                    bottom,
                    conn_x,
                    area,
                    self.scroll_offset,
                    buf,
                );
            }
        }
    }
}

/// Convert a grid row to an absolute screen y. `None` when scrolled out of view.
fn screen_y(row: u16, scroll: u16, area: Rect) -> Option<u16> {
    let rel = row.checked_sub(scroll)?;
    (rel < area.height).then_some(area.y + rel)
}

fn draw_match_cell(
    m: Option<&Match>,
    cell: &MatchCell,
    current: bool,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width - x) as usize;
    let width = cell.cell_width as usize;

    let base = if current {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let rows = [
        cell.center_row.saturating_sub(1),
        cell.center_row,
        cell.center_row.saturating_add(1),
    ];
    for (line, row) in rows.into_iter().enumerate() {
        let Some(sy) = screen_y(row, scroll, area) else {
            continue;
        };
        let (content, style) = match (m, line) {
            (None, _) => (" ".repeat(width), base),
            (Some(m), 1) => {
                let tone = if current { Tone::Current } else { Tone::Dim };
                (format_status_line(m, current, width), resolve(tone))
            }
            (Some(m), _) => {
                let slot = if line == 0 { m.slot_a() } else { m.slot_b() };
                let won = slot.is_some() && slot == m.winner();
                let lost = m.is_completed() && !won;
                let style = if won {
                    resolve(Tone::Winner)
                } else if lost {
                    resolve(Tone::Dim)
                } else {
                    base
                };
                (format_slot_line(slot, m.is_bye(), width), style)
            }
        };
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, style);
    }
}

/// `" name        "` padded or truncated to `width`.
fn format_slot_line(slot: Option<&str>, bye: bool, width: usize) -> String {
    let name = match slot {
        Some(name) => name,
        None if bye => "-",
        None => "TBD",
    };
    let name_w = width.saturating_sub(2);
    let mut trimmed: String = name.chars().take(name_w).collect();
    if name.chars().count() > name_w && name_w > 1 {
        trimmed.pop();
        trimmed.push('~');
    }
    format!(" {:<name_w$} ", trimmed)
        .chars()
        .take(width)
        .collect()
}

fn format_status_line(m: &Match, current: bool, width: usize) -> String {
    let state = if m.is_bye() {
        "BYE"
    } else if m.is_completed() {
        "FINAL"
    } else if current {
        "> NOW"
    } else {
        ""
    };
    let raw = format!(" #{:<3} {state}", m.id());
    format!("{raw:<width$}").chars().take(width).collect()
}

/// Box-drawing lines from one or two children to their parent.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
///
/// With a single child the vertical runs straight from the child row to the parent row.
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: Option<u16>,
    conn_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = resolve(Tone::Dim);
    let (col_a, col_b, col_c) = (conn_x, conn_x + 1, conn_x + 2);
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(sy) = screen_y(row, scroll, area)
        {
            put_char(buf, x, sy, ch, style);
        }
    };

    match r_bot {
        Some(r_bot) => {
            put(col_a, r_top, '─');
            put(col_b, r_top, '┐');
            for row in (r_top + 1)..r_mid {
                put(col_b, row, '│');
            }
            put(col_a, r_mid, '─');
            put(col_b, r_mid, '├');
            put(col_c, r_mid, '─');
            for row in (r_mid + 1)..r_bot {
                put(col_b, row, '│');
            }
            put(col_a, r_bot, '─');
            put(col_b, r_bot, '┘');
        }
        None if r_top == r_mid => {
            put(col_a, r_top, '─');
            put(col_b, r_top, '─');
            put(col_c, r_top, '─');
        }
        None => {
            put(col_a, r_top, '─');
            put(col_b, r_top, '┐');
            for row in (r_top + 1)..r_mid {
                put(col_b, row, '│');
            }
            put(col_b, r_mid, '└');
            put(col_c, r_mid, '─');
        }
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knockout_engine::{Bracket, KeepOrder};

    fn centers(grid: &BracketGrid, depth: usize) -> Vec<u16> {
        grid.cells_for_depth(depth).iter().map(|c| c.center_row).collect()
    }

    #[test]
    fn slot_heights_double_plus_one() {
        let heights: Vec<u16> = (0..5).map(slot_height).collect();
        assert_eq!(heights, vec![3, 7, 15, 31, 63]);
    }

    #[test]
    fn sixteen_entrants_fill_four_columns() {
        let grid = BracketGrid::compute(120, &[8, 4, 2, 1], 0);
        assert_eq!(grid.visible_rounds(), 4);
        assert_eq!(grid.cells.len(), 15);
        assert_eq!(centers(&grid, 0), vec![1, 5, 9, 13, 17, 21, 25, 29]);
        assert_eq!(centers(&grid, 1), vec![3, 11, 19, 27]);
        assert_eq!(centers(&grid, 2), vec![7, 23]);
        assert_eq!(centers(&grid, 3), vec![15]);
        assert_eq!(grid.total_height, 31);
    }

    #[test]
    fn huge_field_is_cut_to_addressable_rows() {
        let mut sizes = vec![20_000usize];
        while *sizes.last().unwrap() > 1 {
            sizes.push(sizes.last().unwrap().div_ceil(2));
        }
        let grid = BracketGrid::compute(200, &sizes, 0);

        let first = centers(&grid, 0);
        assert!(!first.is_empty() && first.len() < 20_000);
        assert!(first.windows(2).all(|w| w[1] == w[0] + 4));
        assert!(grid.cells.iter().all(|c| u32::from(c.center_row) <= MAX_CENTER_ROW));
        assert_eq!(grid.total_height, u16::MAX);

        let last = first.len() - 1;
        let scroll = grid.scroll_to(0, last, 40, 0);
        assert!(scroll + 40 > first[last]);

        let deep = BracketGrid::compute(200, &sizes, 3);
        assert_eq!(deep.first_round, 3);
        assert_eq!(centers(&deep, 0).len(), 2_500);
    }

    #[test]
    fn parent_center_is_midpoint_of_children() {
        let grid = BracketGrid::compute(200, &[16, 8, 4, 2, 1], 0);
        for depth in 0..4usize {
            let children = grid.cells_for_depth(depth);
            for (j, parent) in grid.cells_for_depth(depth + 1).iter().enumerate() {
                let top = children[2 * j].center_row;
                let bot = children[2 * j + 1].center_row;
                assert_eq!(parent.center_row, (top + bot) / 2, "depth={depth} parent={j}");
            }
        }
    }

    #[test]
    fn lone_feeder_sits_above_its_parent() {
        // 5 entrants: rounds of 3, 2, 1 matches. The third opener feeds round 2 alone.
        let grid = BracketGrid::compute(120, &[3, 2, 1], 0);
        let lone = grid.cells_for_depth(0)[2].center_row;
        let parent = grid.cells_for_depth(1)[1].center_row;
        assert!(lone < parent);
        assert_eq!(grid.total_height, 11);
    }

    #[test]
    fn narrow_terminal_shows_a_window_of_rounds() {
        let grid = BracketGrid::compute(40, &[16, 8, 4, 2, 1], 2);
        assert_eq!(grid.visible_rounds(), 2);
        assert_eq!(grid.first_round, 2);
        // The leftmost visible column is laid out as a first column.
        assert_eq!(centers(&grid, 0), vec![1, 5, 9, 13]);
        assert_eq!(centers(&grid, 1), vec![3, 11]);
    }

    #[test]
    fn window_start_is_clamped() {
        let grid = BracketGrid::compute(200, &[2, 1], 9);
        assert_eq!(grid.first_round, 1);
        assert_eq!(grid.visible_rounds(), 1);
        assert!(grid.cells_for_depth(3).is_empty());
    }

    #[test]
    fn cell_width_caps_at_full_width_limit() {
        let grid = BracketGrid::compute(300, &[4, 2, 1], 0);
        assert_eq!(grid.cell_width, CELL_W_FULL);
        assert!(grid.cells.iter().all(|c| c.cell_width == CELL_W_FULL));
    }

    #[test]
    fn scroll_follows_the_selected_match() {
        let grid = BracketGrid::compute(120, &[8, 4, 2, 1], 0);
        // Last opener is rows 28..=30.
        assert_eq!(grid.scroll_to(0, 7, 10, 0), 21);
        assert_eq!(grid.scroll_to(0, 0, 10, 21), 0);
        assert_eq!(grid.scroll_to(0, 1, 10, 0), 0);
        assert_eq!(grid.scroll_to(0, 99, 10, 4), 4);
    }

    #[test]
    fn slot_lines_keep_their_width() {
        assert_eq!(format_slot_line(Some("Ann"), false, 14).chars().count(), 14);
        let long = format_slot_line(Some("Jacksonville State Gamecocks"), false, 14);
        assert_eq!(long.chars().count(), 14);
        assert!(long.contains('~'));
        assert_eq!(format_slot_line(None, false, 8).trim(), "TBD");
        assert_eq!(format_slot_line(None, true, 8).trim(), "-");
    }

    #[test]
    fn status_line_reflects_match_state() {
        let roster: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let mut bracket = Bracket::build(&roster, &mut KeepOrder).unwrap();
        let contest = bracket.next_contest().unwrap().unwrap();

        let first = bracket.match_by_id(contest.match_id).unwrap();
        assert!(format_status_line(first, true, 16).contains("NOW"));
        assert!(format_status_line(bracket.match_by_id(2).unwrap(), false, 16).contains("BYE"));

        bracket.submit_winner(contest.match_id, "A").unwrap();
        let done = bracket.match_by_id(contest.match_id).unwrap();
        assert!(format_status_line(done, false, 16).contains("FINAL"));
        assert_eq!(format_status_line(done, false, 16).chars().count(), 16);
    }

    #[test]
    fn view_draws_names_and_connectors() {
        let roster: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let bracket = Bracket::build(&roster, &mut KeepOrder).unwrap();
        let rounds: Vec<Vec<&Match>> = (1..=bracket.round_count())
            .map(|r| bracket.matches_in_round(r))
            .collect();
        let grid = BracketGrid::compute(60, &[2, 1], 0);

        let area = Rect::new(0, 0, 60, grid.total_height);
        let mut buf = Buffer::empty(area);
        BracketView { rounds: &rounds, grid: &grid, current: Some(1), scroll_offset: 0 }
            .render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
        };
        assert!(row(0).contains(" A "));
        assert!(row(2).contains(" B "));
        assert!(row(1).contains("┐"));
        assert!(row(3).contains("├"));
        assert!(row(5).contains("┘"));
        assert!(row(3).contains("#3"));
    }
}
