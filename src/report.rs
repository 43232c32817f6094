use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use knockout_engine::Bracket;
use std::io::Write;

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Plain,
    Rule,
    Heading,
    Champion,
    Entry,
    Bye,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Plain => None,
            Tone::Rule => Some(Color::Cyan),
            Tone::Heading => Some(Color::Green),
            Tone::Champion => Some(Color::Yellow),
            Tone::Entry => Some(Color::White),
            Tone::Bye => Some(Color::DarkGrey),
        }
    }
}

/// Lines of the end-of-tournament summary. Fails if there is no champion yet.
pub fn report_lines(bracket: &Bracket, fancy: bool) -> anyhow::Result<Vec<(Tone, String)>> {
    let champion = bracket.winner()?;
    let rule = if fancy { "━" } else { "-" }.repeat(RULE_WIDTH);

    let mut lines = vec![
        (Tone::Plain, String::new()),
        (Tone::Rule, rule.clone()),
        (Tone::Heading, "TOURNAMENT COMPLETE!".to_string()),
        (Tone::Rule, rule.clone()),
        (Tone::Plain, String::new()),
        (Tone::Champion, format!("CHAMPION: {champion}")),
        (Tone::Plain, String::new()),
        (Tone::Rule, rule.clone()),
        (Tone::Heading, "MATCH HISTORY:".to_string()),
        (Tone::Plain, String::new()),
    ];
    for m in bracket.all_matches()? {
        let tone = if m.is_bye() { Tone::Bye } else { Tone::Entry };
        lines.push((tone, format!("  > {m}")));
    }
    lines.push((Tone::Plain, String::new()));
    lines.push((Tone::Rule, rule));
    Ok(lines)
}

pub fn write_report<W: Write>(out: &mut W, bracket: &Bracket, color: bool) -> anyhow::Result<()> {
    for (tone, text) in report_lines(bracket, color)? {
        match tone.color().filter(|_| color) {
            Some(fg) => {
                if matches!(tone, Tone::Heading | Tone::Champion) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    out,
                    SetForegroundColor(fg),
                    Print(text),
                    ResetColor,
                    SetAttribute(Attribute::Reset),
                    Print("\n")
                )?;
            }
            None => writeln!(out, "{text}")?,
        }
    }
    out.flush()?;
    Ok(())
}

pub fn print_report(bracket: &Bracket, color: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), bracket, color)
}
