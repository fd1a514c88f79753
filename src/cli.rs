//! CLI command implementations for Obelisk.

pub(crate) mod evolve;
pub(crate) mod rollout;
pub(crate) mod search;

mod output;

use std::error::Error;
use std::fmt;
use std::path::Path;

use obelisk::game::check_invariants;
use obelisk::PlayerState;

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("invalid JSON: {e}"))
    }
}

impl From<obelisk::GameError> for CliError {
    fn from(e: obelisk::GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<obelisk::gp::EvolutionError> for CliError {
    fn from(e: obelisk::gp::EvolutionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<obelisk::search::SearchError> for CliError {
    fn from(e: obelisk::search::SearchError) -> Self {
        Self::new(e.to_string())
    }
}

/// The five factions used when no roster file is given.
pub(crate) fn reference_roster() -> Vec<PlayerState> {
    vec![
        PlayerState::new(2, 1, 2, 1),
        PlayerState::new(2, 1, 1, 2),
        PlayerState::new(2, 1, 2, 1),
        PlayerState::new(1, 2, 2, 1),
        PlayerState::new(1, 2, 2, 1),
    ]
}

/// Load a JSON array of players, or the reference roster if `path` is `None`.
pub(crate) fn load_roster(path: Option<&Path>) -> Result<Vec<PlayerState>, CliError> {
    let Some(path) = path else {
        return Ok(reference_roster());
    };

    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("cannot read roster {}: {e}", path.display())))?;
    let roster: Vec<PlayerState> = serde_json::from_str(&text)?;
    if roster.is_empty() {
        return Err(CliError::new("roster is empty"));
    }
    if let Some(violation) = check_invariants(&roster).into_iter().next() {
        return Err(CliError::new(format!("invalid roster: {violation}")));
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn roster_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn test_reference_roster_without_file() {
        assert_eq!(load_roster(None).unwrap(), reference_roster());
    }

    #[test]
    fn test_roster_file_loads() {
        let file = roster_file(r#"[{"walls": 3, "soldiers": 2, "barracks": 1, "obelisks": 1, "defense": 1}]"#);
        let roster = load_roster(Some(file.path())).unwrap();
        assert_eq!(roster, vec![PlayerState::new(3, 2, 1, 1).with_defense(1)]);
    }

    #[test]
    fn test_out_of_range_roster_rejected() {
        let file = roster_file(r#"[{"walls": 12, "soldiers": 1, "barracks": 1, "obelisks": 1}]"#);
        assert!(load_roster(Some(file.path())).is_err());

        let file = roster_file(r#"[{"walls": 1, "soldiers": -4, "barracks": 1, "obelisks": 1}]"#);
        assert!(load_roster(Some(file.path())).is_err());
    }

    #[test]
    fn test_empty_roster_rejected() {
        let file = roster_file("[]");
        assert!(load_roster(Some(file.path())).is_err());
    }
}
