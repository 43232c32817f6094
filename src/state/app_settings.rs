use anyhow::{Context, bail};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    /// Seeds both the pairing shuffle and simulated results.
    pub seed: Option<u64>,
    pub export_path: Option<PathBuf>,
    pub roster_file: Option<PathBuf>,
    /// Participant names given directly on the command line.
    pub names: Vec<String>,
    /// Simulate every match before the UI opens.
    pub auto: bool,
    /// Skip the UI and print the result straight to stdout. Implies `auto`.
    pub headless: bool,
    pub color: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            seed: None,
            export_path: None,
            roster_file: None,
            names: Vec::new(),
            auto: false,
            headless: false,
            color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(AppSettings),
    Help,
    Version,
}

impl AppSettings {
    /// Defaults overridden by `KNOCKOUT_*` environment variables and `NO_COLOR`.
    pub fn from_env<F>(env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(seed) = var("KNOCKOUT_SEED") {
            settings.seed = Some(parse_seed(&seed).context("KNOCKOUT_SEED")?);
        }
        if let Some(path) = var("KNOCKOUT_EXPORT") {
            settings.export_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = var("KNOCKOUT_LOG") {
            settings.log_level = LevelFilter::from_str(level.trim())
                .with_context(|| format!("KNOCKOUT_LOG: unknown level {level:?}"))?;
        }
        if env("NO_COLOR").is_some() {
            settings.color = false;
        }
        Ok(settings)
    }
}

/// Parse command-line arguments (without the program name) on top of the environment.
pub fn parse_args<I, F>(args: I, env: F) -> anyhow::Result<CliCommand>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut settings = AppSettings::from_env(env)?;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "-f" | "--file" => {
                let path = args.next().context("--file needs a path")?;
                settings.roster_file = Some(PathBuf::from(path));
            }
            "-s" | "--seed" => {
                let seed = args.next().context("--seed needs a number")?;
                settings.seed = Some(parse_seed(&seed)?);
            }
            "-o" | "--export" => {
                let path = args.next().context("--export needs a path")?;
                settings.export_path = Some(PathBuf::from(path));
            }
            "--auto" => settings.auto = true,
            "--no-tui" => {
                settings.headless = true;
                settings.auto = true;
            }
            "--full-screen" => settings.full_screen = true,
            "--" => settings.names.extend(args.by_ref()),
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("Unknown argument: {flag}"),
            _ => settings.names.push(arg),
        }
    }

    Ok(CliCommand::Run(settings))
}

fn parse_seed(raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("invalid seed {raw:?}, expected a non-negative integer"))
}

pub fn usage_text() -> &'static str {
    "knockout - single-elimination tournament in your terminal

Usage:
  knockout [OPTIONS] [NAME...]
  knockout --file teams.csv
  knockout --help
  knockout --version

Options:
  -f, --file PATH     Load participants from a comma or newline separated file
  -s, --seed N        Seed the pairing shuffle and simulated results
  -o, --export PATH   Write the finished bracket as JSON
      --auto          Simulate every match, then show the result
      --no-tui        Simulate every match and print the result without the UI
      --full-screen   Start without the tab bar

With no names and no file, participants are entered on a registration screen.

Environment:
  KNOCKOUT_SEED       Default for --seed
  KNOCKOUT_EXPORT     Default for --export
  KNOCKOUT_LOG        Log level: error, warn, info, debug, trace (default info)
  NO_COLOR            Disable colors in the final report"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> anyhow::Result<CliCommand> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parse_args(args.iter().map(|s| s.to_string()), |k| env.get(k).cloned())
    }

    fn run(args: &[&str], env: &[(&str, &str)]) -> AppSettings {
        match parse(args, env).unwrap() {
            CliCommand::Run(settings) => settings,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn no_args_gives_defaults() {
        assert_eq!(run(&[], &[]), AppSettings::default());
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help", "--bogus"], &[]).unwrap(), CliCommand::Help);
        assert_eq!(parse(&["-V"], &[]).unwrap(), CliCommand::Version);
    }

    #[test]
    fn positional_names_and_flags() {
        let s = run(&["Ann", "--seed", "42", "Bo", "-o", "out.json", "--auto"], &[]);
        assert_eq!(s.names, vec!["Ann", "Bo"]);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.export_path, Some(PathBuf::from("out.json")));
        assert!(s.auto);
        assert!(!s.headless);
    }

    #[test]
    fn no_tui_implies_auto() {
        let s = run(&["--no-tui", "-f", "teams.csv"], &[]);
        assert!(s.headless && s.auto);
        assert_eq!(s.roster_file, Some(PathBuf::from("teams.csv")));
    }

    #[test]
    fn double_dash_passes_names_through() {
        let s = run(&["--", "-dash-name", "Bo"], &[]);
        assert_eq!(s.names, vec!["-dash-name", "Bo"]);
    }

    #[test]
    fn environment_supplies_defaults_and_flags_win() {
        let env = [
            ("KNOCKOUT_SEED", "7"),
            ("KNOCKOUT_LOG", "debug"),
            ("KNOCKOUT_EXPORT", "env.json"),
            ("NO_COLOR", "1"),
        ];
        let s = run(&["--seed", "9"], &env);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.log_level, LevelFilter::Debug);
        assert_eq!(s.export_path, Some(PathBuf::from("env.json")));
        assert!(!s.color);
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let s = run(&[], &[("KNOCKOUT_SEED", "  "), ("KNOCKOUT_LOG", "")]);
        assert_eq!(s.seed, None);
        assert_eq!(s.log_level, LevelFilter::Info);
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse(&["--seed", "minus-one"], &[]).is_err());
        assert!(parse(&["--seed"], &[]).is_err());
        assert!(parse(&["--file"], &[]).is_err());
        assert!(parse(&["--frobnicate"], &[]).is_err());
        assert!(parse(&[], &[("KNOCKOUT_LOG", "loud")]).is_err());
    }
}
