use tui::layout::{Constraint, Layout, Rect};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
const LOG_PANE_PERCENT: u16 = 30;

/// Areas for one frame of the main draw loop.
#[derive(Debug, PartialEq)]
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub footer: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(FOOTER_HEIGHT)]).areas(area);

        let (tab_bar, rest) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], body)
        } else {
            let [tab, rest] =
                Layout::vertical([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Fill(1)])
                    .areas(body);
            (Self::split_tab_bar(tab), rest)
        };

        let (main, logs) = if show_logs {
            let [main, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(rest);
            (main, Some(logs))
        } else {
            (rest, None)
        };

        Self { tab_bar, main, footer, logs }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_tabs_and_footer() {
        let areas = LayoutAreas::new(Rect::new(0, 0, 100, 40), false, false);
        assert_eq!(areas.tab_bar[0].height, TAB_BAR_HEIGHT);
        assert_eq!(areas.main.y, TAB_BAR_HEIGHT);
        assert_eq!(areas.main.height, 40 - TAB_BAR_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(areas.footer.y, 39);
        assert!(areas.logs.is_none());
    }

    #[test]
    fn full_screen_drops_the_tab_bar() {
        let areas = LayoutAreas::new(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(areas.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(areas.main.y, 0);
    }

    #[test]
    fn log_pane_takes_the_bottom_of_the_body() {
        let areas = LayoutAreas::new(Rect::new(0, 0, 100, 40), true, true);
        let logs = areas.logs.unwrap();
        assert_eq!(areas.main.bottom(), logs.y);
        assert_eq!(logs.bottom(), areas.footer.y);
    }
}
