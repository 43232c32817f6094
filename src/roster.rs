use anyhow::{Context, bail};
use std::path::Path;

/// Split raw text on commas and newlines into trimmed, non-empty names.
pub fn parse_names(content: &str) -> Vec<String> {
    content
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop case-insensitive duplicates, keeping the first spelling.
pub fn dedup_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !contains_name(&unique, &name) {
            unique.push(name);
        }
    }
    unique
}

pub fn contains_name(names: &[String], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    names.iter().any(|n| n.to_lowercase() == candidate)
}

/// Check a name typed on the registration screen against the names already entered.
pub fn validate_new_name(existing: &[String], candidate: &str) -> Result<String, String> {
    let name = candidate.trim();
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.contains(',') {
        return Err("Names cannot contain commas".to_string());
    }
    if contains_name(existing, name) {
        return Err(format!("{name} is already registered"));
    }
    Ok(name.to_string())
}

/// Build the roster from an optional file plus names given on the command line.
///
/// Returns `None` when neither source was given, so participants are entered
/// interactively instead.
pub fn load_roster(file: Option<&Path>, names: &[String]) -> anyhow::Result<Option<Vec<String>>> {
    if file.is_none() && names.is_empty() {
        return Ok(None);
    }

    let mut collected = Vec::new();
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read participants from {}", path.display()))?;
        collected.extend(parse_names(&content));
    }
    collected.extend(names.iter().flat_map(|arg| parse_names(arg)));

    let roster = dedup_names(collected);
    if roster.len() < 2 {
        bail!(
            "need at least 2 unique participants, got {}",
            roster.len()
        );
    }
    log::debug!("loaded {} participants", roster.len());
    Ok(Some(roster))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_splits_on_commas_and_newlines() {
        let names = parse_names("Ann, Bo\nCy,,\r\n  Di  \n\n");
        assert_eq!(names, strings(&["Ann", "Bo", "Cy", "Di"]));
    }

    #[test]
    fn dedup_keeps_first_spelling() {
        let names = dedup_names(strings(&["Ann", "bo", "ANN", "Bo", "Cy"]));
        assert_eq!(names, strings(&["Ann", "bo", "Cy"]));
    }

    #[test]
    fn dedup_handles_non_ascii_case() {
        let names = dedup_names(strings(&["Élan", "ÉLAN", "élan"]));
        assert_eq!(names, strings(&["Élan"]));
    }

    #[test]
    fn new_names_are_validated() {
        let existing = strings(&["Ann"]);
        assert_eq!(validate_new_name(&existing, "  Bo "), Ok("Bo".to_string()));
        assert!(validate_new_name(&existing, "   ").is_err());
        assert!(validate_new_name(&existing, "ann").is_err());
        assert!(validate_new_name(&existing, "A,B").is_err());
    }

    #[test]
    fn nothing_given_means_interactive() {
        assert!(load_roster(None, &[]).unwrap().is_none());
    }

    #[test]
    fn command_line_names_may_be_comma_separated() {
        let roster = load_roster(None, &strings(&["Ann,Bo", "Cy"])).unwrap().unwrap();
        assert_eq!(roster, strings(&["Ann", "Bo", "Cy"]));
    }

    #[test]
    fn file_and_args_are_merged() {
        let path = std::env::temp_dir().join(format!("knockout-roster-{}.csv", std::process::id()));
        std::fs::write(&path, "Ann,Bo\nCy\n").unwrap();

        let roster = load_roster(Some(&path), &strings(&["Di", "bo"])).unwrap().unwrap();
        assert_eq!(roster, strings(&["Ann", "Bo", "Cy", "Di"]));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn too_few_unique_names_is_an_error() {
        let err = load_roster(None, &strings(&["Ann", "ANN"])).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_roster(Some(Path::new("/no/such/roster.csv")), &[]).unwrap_err();
        assert!(err.to_string().contains("/no/such/roster.csv"));
    }
}
