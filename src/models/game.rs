//! Matchup, seats, and match result values.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// One side of a matchup: a real player or a bye placeholder.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Player(PlayerId),
    Bye,
}

impl Seat {
    pub fn is_bye(&self) -> bool {
        matches!(self, Seat::Bye)
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            Seat::Player(id) => Some(*id),
            Seat::Bye => None,
        }
    }
}

/// Best-of-one outcome. Serialized as the integer tag `1`, `2` or `0`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Outcome {
    Draw,
    FirstWins,
    SecondWins,
}

impl TryFrom<u8> for Outcome {
    type Error = TournamentError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Outcome::Draw),
            1 => Ok(Outcome::FirstWins),
            2 => Ok(Outcome::SecondWins),
            _ => Err(TournamentError::UnrecognizedResult),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> u8 {
        match outcome {
            Outcome::Draw => 0,
            Outcome::FirstWins => 1,
            Outcome::SecondWins => 2,
        }
    }
}

/// Games won by each side in a best-of-three series.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesScore {
    pub first_player_wins: u8,
    pub second_player_wins: u8,
}

impl SeriesScore {
    pub fn new(first_player_wins: u8, second_player_wins: u8) -> Self {
        Self {
            first_player_wins,
            second_player_wins,
        }
    }
}

/// Recorded result of a matchup: an integer tag (best-of-one) or a series score (best-of-three).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchResult {
    Single(Outcome),
    BestOfThree(SeriesScore),
}

impl MatchResult {
    /// Which seat won, if anyone did. `None` for draws and for series scores outside the table.
    pub fn winner_index(&self) -> Option<usize> {
        match *self {
            MatchResult::Single(Outcome::FirstWins) => Some(0),
            MatchResult::Single(Outcome::SecondWins) => Some(1),
            MatchResult::Single(Outcome::Draw) => None,
            MatchResult::BestOfThree(s) => match (s.first_player_wins, s.second_player_wins) {
                (2, 0) | (2, 1) => Some(0),
                (0, 2) | (1, 2) => Some(1),
                _ => None,
            },
        }
    }
}

impl From<Outcome> for MatchResult {
    fn from(outcome: Outcome) -> Self {
        MatchResult::Single(outcome)
    }
}

impl From<SeriesScore> for MatchResult {
    fn from(score: SeriesScore) -> Self {
        MatchResult::BestOfThree(score)
    }
}

/// A single pairing within a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub players: [Seat; 2],
    /// None until decided.
    #[serde(default)]
    pub result: Option<MatchResult>,
    /// 1-based, sequential within its round.
    pub match_number: u32,
}

impl Matchup {
    pub fn new(first: Seat, second: Seat, match_number: u32) -> Self {
        Self {
            players: [first, second],
            result: None,
            match_number,
        }
    }

    /// Real player against a bye. Decided on creation as a first-seat win.
    pub fn bye(player: PlayerId, match_number: u32) -> Self {
        Self {
            players: [Seat::Player(player), Seat::Bye],
            result: Some(MatchResult::Single(Outcome::FirstWins)),
            match_number,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_bye(&self) -> bool {
        self.players.iter().any(Seat::is_bye)
    }

    /// Seat of the winner, when decided and decisive.
    pub fn winner(&self) -> Option<Seat> {
        self.result
            .and_then(|r| r.winner_index())
            .map(|i| self.players[i])
    }

    /// Seat of the loser, when decided and decisive.
    pub fn loser(&self) -> Option<Seat> {
        self.result
            .and_then(|r| r.winner_index())
            .map(|i| self.players[1 - i])
    }
}

/// Address of a matchup inside a tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchRef {
    /// `round` is the 0-based round index; `match_number` is 1-based within it.
    Round {
        round: usize,
        #[serde(rename = "matchNumber")]
        match_number: u32,
    },
    ThirdPlace,
}
