use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Primary,
    Secondary,
    Accent,
    Dim,
    Winner,
    Current,
}

pub fn resolve(tone: Tone) -> Style {
    match tone {
        Tone::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        Tone::Secondary => Style::default().fg(Color::Rgb(255, 103, 31)),
        Tone::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Tone::Dim => Style::default().fg(Color::Indexed(240)),
        Tone::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Tone::Current => Style::default().fg(Color::Black).bg(Color::Yellow),
    }
}

pub fn title_rows() -> [&'static str; 4] {
    [
        r" _  __ _  _  ___   ___ _  __ ___  _   _ _____ ",
        r"| |/ /| \| |/ _ \ / __| |/ // _ \| | | |_   _|",
        r"| ' < | .` | (_) | (__| ' <| (_) | |_| | | |  ",
        r"|_|\_\|_|\_|\___/ \___|_|\_\\___/ \___/  |_|  ",
    ]
}

/// Display name for a round, counted back from the final.
pub fn round_label(round: u32, total_rounds: u32) -> String {
    match total_rounds.saturating_sub(round) {
        0 => "FINAL".to_string(),
        1 => "SEMIFINALS".to_string(),
        2 => "QUARTERFINALS".to_string(),
        _ => format!("ROUND {round}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rows_share_a_width() {
        let rows = title_rows();
        assert!(rows.iter().all(|r| r.chars().count() == rows[0].chars().count()));
    }

    #[test]
    fn rounds_are_named_from_the_final_back() {
        assert_eq!(round_label(5, 5), "FINAL");
        assert_eq!(round_label(4, 5), "SEMIFINALS");
        assert_eq!(round_label(3, 5), "QUARTERFINALS");
        assert_eq!(round_label(2, 5), "ROUND 2");
        assert_eq!(round_label(1, 1), "FINAL");
    }
}
