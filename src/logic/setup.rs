//! Setup phase: start the tournament by generating the opening round.

use crate::logic::matchups::generate_matchups;
use crate::models::{Tournament, TournamentError};
use rand::Rng;

/// Start the tournament with the thread-local RNG. See [`start_tournament_with_rng`].
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    start_tournament_with_rng(tournament, &mut rand::thread_rng())
}

/// Start the tournament: require 2 players, generate round one, mark started.
pub fn start_tournament_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.tournament_started {
        return Err(TournamentError::InvalidState);
    }
    if tournament.players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers);
    }
    let round = generate_matchups(&tournament.players, tournament.tournament_type, rng)?;
    log::info!(
        "tournament {} started: {} players, {}, {} matchups",
        tournament.id,
        tournament.players.len(),
        tournament.tournament_type,
        round.len()
    );
    tournament.rounds = vec![round];
    tournament.current_round = 0;
    tournament.third_place_match = None;
    tournament.tournament_started = true;
    tournament.touch();
    Ok(())
}
