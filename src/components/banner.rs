use crate::components::theme::{Tone, resolve, title_rows};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// Boxed title art with an optional line underneath.
#[derive(Default)]
pub struct Banner {
    pub subtitle: Option<String>,
    pub subtitle_tone: Option<Tone>,
}

impl Banner {
    pub fn with_subtitle(subtitle: impl Into<String>, tone: Tone) -> Self {
        Self {
            subtitle: Some(subtitle.into()),
            subtitle_tone: Some(tone),
        }
    }
}

impl Widget for Banner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" KNOCKOUT "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(Tone::Primary));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let rows = title_rows();
        let art_fits = inner.width as usize > rows[0].chars().count() && inner.height >= 5;
        let mut y = inner.y;
        if art_fits {
            for row in rows {
                let line = Line::from(Span::styled(row, resolve(Tone::Primary)));
                render_centered(line, inner, y, buf);
                y += 1;
            }
        } else {
            let line = Line::from(Span::styled("K N O C K O U T", resolve(Tone::Accent)));
            render_centered(line, inner, y, buf);
            y += 1;
        }

        if let Some(subtitle) = self.subtitle {
            let tone = self.subtitle_tone.unwrap_or(Tone::Secondary);
            render_centered(Line::from(Span::styled(subtitle, resolve(tone))), inner, y, buf);
        }
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let limit = x.saturating_add(max_width);
    let mut cx = x;
    for span in &line.spans {
        let style: Style = span.style;
        let run: String = span
            .content
            .chars()
            .take(limit.saturating_sub(cx) as usize)
            .collect();
        if run.is_empty() {
            break;
        }
        buf.set_string(cx, y, &run, style);
        cx += run.chars().count() as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn wide_area_shows_art_and_subtitle() {
        let area = Rect::new(0, 0, 60, 7);
        let mut buf = Buffer::empty(area);
        Banner::with_subtitle("CHAMPION: Ann", Tone::Winner).render(area, &mut buf);
        assert!(row_text(&buf, 1).contains(title_rows()[0].trim()));
        assert!(row_text(&buf, 5).contains("CHAMPION: Ann"));
    }

    #[test]
    fn narrow_area_falls_back_to_text_title() {
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        Banner::default().render(area, &mut buf);
        assert!(row_text(&buf, 1).contains("K N O C K O U T"));
    }

    #[test]
    fn tiny_area_renders_plain_name() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        Banner::default().render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("KNOCKOUT"));
    }
}
