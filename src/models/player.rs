//! Player record and the per-result stat delta applied to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a player (matchups refer to players by id).
pub type PlayerId = Uuid;

/// A player in the tournament roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    /// Final (or tied) bracket position; single-elimination only.
    #[serde(default)]
    pub placement: Option<u32>,
}

impl Player {
    /// Create a new player with the given name. Stats start at zero, no placement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            placement: None,
        }
    }

    /// Add a result delta to this player's stats.
    pub(crate) fn apply(&mut self, delta: StatDelta) {
        self.score += delta.score;
        self.wins += delta.wins;
        self.losses += delta.losses;
        self.ties += delta.ties;
    }

    /// Remove a previously applied delta. Saturates so a hand-edited import can't underflow.
    pub(crate) fn revert(&mut self, delta: StatDelta) {
        self.score = self.score.saturating_sub(delta.score);
        self.wins = self.wins.saturating_sub(delta.wins);
        self.losses = self.losses.saturating_sub(delta.losses);
        self.ties = self.ties.saturating_sub(delta.ties);
    }
}

/// Change to one player's stats caused by a single match result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatDelta {
    pub score: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl StatDelta {
    pub const WIN: StatDelta = StatDelta { score: 0, wins: 1, losses: 0, ties: 0 };
    pub const LOSS: StatDelta = StatDelta { score: 0, wins: 0, losses: 1, ties: 0 };
    pub const TIE: StatDelta = StatDelta { score: 0, wins: 0, losses: 0, ties: 1 };

    /// Same delta, worth `points`.
    pub const fn with_score(self, points: u32) -> Self {
        Self { score: points, ..self }
    }
}
