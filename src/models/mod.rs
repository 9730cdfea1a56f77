//! Data structures for the tournament: players, matchups, tournament state.

mod game;
mod player;
mod tournament;

pub use game::{MatchRef, MatchResult, Matchup, Outcome, Seat, SeriesScore};
pub use player::{Player, PlayerId, StatDelta};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentType};
