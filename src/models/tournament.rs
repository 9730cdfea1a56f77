//! Tournament state, format, and errors.

use crate::models::game::{MatchRef, Matchup};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Format has no matchup generator (double-elimination).
    UnsupportedFormat(TournamentType),
    /// Result value is not valid for the tournament's mode.
    UnrecognizedResult,
    /// Rollback requested on a matchup that has no result.
    NotDecided,
    /// Draws cannot decide an elimination match.
    DrawNotAllowed,
    /// Bye matchups are decided at generation and cannot be changed.
    ByeMatchup,
    /// Result has already been carried into a later round or the third-place match.
    ResultLocked,
    /// No matchup at the given address.
    MatchNotFound(MatchRef),
    /// Player id not in the roster.
    PlayerNotFound(PlayerId),
    /// Not every matchup in the current round has a result.
    IncompleteResults,
    /// Need at least 2 players to start.
    NotEnoughPlayers,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::UnsupportedFormat(t) => write!(f, "Unsupported tournament format: {}", t),
            TournamentError::UnrecognizedResult => write!(f, "Unrecognized result"),
            TournamentError::NotDecided => write!(f, "Matchup has no result to modify"),
            TournamentError::DrawNotAllowed => write!(f, "Draws are not allowed in single-elimination"),
            TournamentError::ByeMatchup => write!(f, "Bye matchups cannot be changed"),
            TournamentError::ResultLocked => {
                write!(f, "Result has already been used to build a later match")
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::IncompleteResults => write!(f, "Not all matches have a result"),
            TournamentError::NotEnoughPlayers => write!(f, "Need at least 2 players to start"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Bracket format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentType {
    #[default]
    SingleElimination,
    RoundRobin,
    /// Accepted on the wire, rejected by the generator.
    DoubleElimination,
}

impl std::fmt::Display for TournamentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentType::SingleElimination => "single-elimination",
            TournamentType::RoundRobin => "round-robin",
            TournamentType::DoubleElimination => "double-elimination",
        };
        f.write_str(s)
    }
}

/// Full tournament state: roster, rounds of matchups, and settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    #[serde(default = "Uuid::new_v4")]
    pub id: TournamentId,
    pub players: Vec<Player>,
    /// Rounds in play order; each inner vec is one round's matchups.
    pub rounds: Vec<Vec<Matchup>>,
    #[serde(default)]
    pub tournament_started: bool,
    /// Index into `rounds`.
    pub current_round: usize,
    #[serde(default)]
    pub tournament_type: TournamentType,
    #[serde(default)]
    pub best_of_three: bool,
    /// Played between the two semifinal losers (single-elimination).
    #[serde(default)]
    pub third_place_match: Option<Matchup>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in setup (not started) with no players.
    pub fn new(tournament_type: TournamentType, best_of_three: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            rounds: Vec::new(),
            tournament_started: false,
            current_round: 0,
            tournament_type,
            best_of_three,
            third_place_match: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a tournament with initial players. Still in setup until started.
    pub fn with_players(
        players: Vec<Player>,
        tournament_type: TournamentType,
        best_of_three: bool,
    ) -> Self {
        Self {
            players,
            ..Self::new(tournament_type, best_of_three)
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Matchups of the current round (empty before start).
    pub fn current_matchups(&self) -> &[Matchup] {
        self.rounds
            .get(self.current_round)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn matchup(&self, at: MatchRef) -> Option<&Matchup> {
        match at {
            MatchRef::Round { round, match_number } => self
                .rounds
                .get(round)?
                .iter()
                .find(|m| m.match_number == match_number),
            MatchRef::ThirdPlace => self.third_place_match.as_ref(),
        }
    }

    /// Add a player (setup only). Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        if self.tournament_started {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::InvalidState);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let player = Player::new(name_trimmed);
        let id = player.id;
        self.players.push(player);
        self.touch();
        Ok(id)
    }

    /// Add several players at once (setup only). Either every name is added or none is.
    pub fn add_players<I, S>(&mut self, names: I) -> Result<Vec<PlayerId>, TournamentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut staged = self.clone();
        let ids = names
            .into_iter()
            .map(|name| staged.add_player(name))
            .collect::<Result<Vec<_>, _>>()?;
        *self = staged;
        Ok(ids)
    }

    /// Remove a player by id (setup only).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.tournament_started {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        self.touch();
        Ok(())
    }

    /// Change the format (setup only).
    pub fn set_tournament_type(&mut self, tournament_type: TournamentType) -> Result<(), TournamentError> {
        if self.tournament_started {
            return Err(TournamentError::InvalidState);
        }
        self.tournament_type = tournament_type;
        self.touch();
        Ok(())
    }

    /// Toggle best-of-three scoring (setup only).
    pub fn set_best_of_three(&mut self, best_of_three: bool) -> Result<(), TournamentError> {
        if self.tournament_started {
            return Err(TournamentError::InvalidState);
        }
        self.best_of_three = best_of_three;
        self.touch();
        Ok(())
    }

    /// Restart: back to setup with the same players (ids and names) and settings. Clears rounds and stats.
    pub fn restart_tournament(&mut self) -> Result<(), TournamentError> {
        if !self.tournament_started {
            return Err(TournamentError::InvalidState);
        }
        let players = std::mem::take(&mut self.players)
            .into_iter()
            .map(|p| Player {
                id: p.id,
                ..Player::new(p.name)
            })
            .collect();
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::with_players(players, self.tournament_type, self.best_of_three);
        self.id = id;
        self.created_at = created_at;
        Ok(())
    }

    /// Players ordered for display: score, wins, ties (high first), then losses (low first), then name.
    pub fn standings(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.wins.cmp(&a.wins))
                .then(b.ties.cmp(&a.ties))
                .then(a.losses.cmp(&b.losses))
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    /// True once every match that will ever be played has a result.
    pub fn is_complete(&self) -> bool {
        if !self.tournament_started {
            return false;
        }
        let all_decided = self.rounds.iter().flatten().all(Matchup::is_decided)
            && self
                .third_place_match
                .as_ref()
                .map_or(true, Matchup::is_decided);
        match self.tournament_type {
            TournamentType::RoundRobin => all_decided,
            TournamentType::SingleElimination => {
                all_decided
                    && self.current_round + 1 == self.rounds.len()
                    && self.current_matchups().len() == 1
            }
            TournamentType::DoubleElimination => false,
        }
    }

    /// Refresh `updated_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
