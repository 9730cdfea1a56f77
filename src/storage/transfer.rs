//! JSON import/export of a whole tournament.

use crate::models::Tournament;
use crate::storage::store::StoreError;
use serde_json::Value;
use std::collections::HashSet;

/// File name offered for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "tournament-data.json";

/// Import rejected; `message` is meant for the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportError {
    pub message: String,
}

impl ImportError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ImportError {}

/// Parse user-supplied text as a tournament.
///
/// Requires `players`, `rounds` and a non-null `currentRound`; other fields fall back to
/// defaults (`bestOfThree` is false when absent). Every seat must name a rostered player.
pub fn import_tournament(text: &str) -> Result<Tournament, ImportError> {
    let result = parse_import(text);
    if let Err(e) = &result {
        log::warn!("tournament import rejected: {}", e);
    }
    result
}

fn parse_import(text: &str) -> Result<Tournament, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::new(format!("Invalid JSON: {}", e)))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ImportError::new("Invalid tournament data: expected a JSON object"))?;
    for field in ["players", "rounds"] {
        if !obj.contains_key(field) {
            return Err(ImportError::new(format!(
                "Invalid tournament data: missing \"{}\"",
                field
            )));
        }
    }
    if obj.get("currentRound").map_or(true, Value::is_null) {
        return Err(ImportError::new(
            "Invalid tournament data: \"currentRound\" is not defined",
        ));
    }

    let tournament: Tournament = serde_json::from_value(value)
        .map_err(|e| ImportError::new(format!("Invalid tournament data: {}", e)))?;

    let roster: HashSet<_> = tournament.players.iter().map(|p| p.id).collect();
    let unknown_seat = tournament
        .rounds
        .iter()
        .flatten()
        .chain(tournament.third_place_match.iter())
        .flat_map(|m| m.players.iter())
        .filter_map(|s| s.player_id())
        .any(|id| !roster.contains(&id));
    if unknown_seat {
        return Err(ImportError::new(
            "Invalid tournament data: a matchup refers to a player not in \"players\"",
        ));
    }
    if tournament.tournament_started && tournament.current_round >= tournament.rounds.len() {
        return Err(ImportError::new(
            "Invalid tournament data: \"currentRound\" is past the last round",
        ));
    }
    Ok(tournament)
}

/// Pretty-printed JSON for download.
pub fn export_tournament(tournament: &Tournament) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(tournament)?)
}
