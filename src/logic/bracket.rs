//! Single-elimination bracket: round advancement, placements, and the third-place match.
//!
//! Placement rules, with `remaining` = rounds still to come after a given round:
//! - final (`remaining == 0`): winner 1st, loser 2nd;
//! - semifinal (`remaining == 1`): losers wait for the third-place match (3rd/4th). If only
//!   one semifinal had a real opponent, its loser takes 3rd outright;
//! - earlier rounds: loser ties at `2^remaining + 1`.

use crate::logic::matchups::pair_consecutive;
use crate::models::{
    MatchRef, Matchup, PlayerId, Seat, Tournament, TournamentError, TournamentType,
};

/// Rounds still to be played after a round with `matchups` matchups (`ceil(log2(matchups))`).
pub fn remaining_rounds(matchups: usize) -> u32 {
    matchups.max(1).next_power_of_two().trailing_zeros()
}

/// Tied placement given to a player knocked out with `remaining` rounds still to play.
pub fn elimination_placement(remaining: u32) -> u32 {
    2u32.pow(remaining) + 1
}

/// Build the next round from the current round's winners, in match order.
///
/// Every current matchup must be decided. Fails once the final has been generated.
pub fn advance_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.tournament_started {
        return Err(TournamentError::InvalidState);
    }
    match tournament.tournament_type {
        TournamentType::SingleElimination => {}
        TournamentType::RoundRobin => return Err(TournamentError::InvalidState),
        other => return Err(TournamentError::UnsupportedFormat(other)),
    }

    let current = tournament.current_matchups();
    if current.len() <= 1 {
        return Err(TournamentError::InvalidState);
    }
    if !current.iter().all(Matchup::is_decided) {
        return Err(TournamentError::IncompleteResults);
    }
    let winners: Vec<PlayerId> = current
        .iter()
        .filter_map(|m| m.winner().and_then(|s| s.player_id()))
        .collect();

    let next = pair_consecutive(&winners);
    log::info!(
        "tournament {}: round {} -> {} matchups",
        tournament.id,
        tournament.current_round + 2,
        next.len()
    );
    tournament.rounds.push(next);
    tournament.current_round = tournament.rounds.len() - 1;
    tournament.touch();
    Ok(())
}

/// Derive placements after a decisive result was recorded at `at`.
pub(crate) fn on_result_recorded(tournament: &mut Tournament, at: MatchRef) -> Result<(), TournamentError> {
    let matchup = tournament
        .matchup(at)
        .ok_or(TournamentError::MatchNotFound(at))?;
    let (Some(winner), Some(loser)) = (matchup.winner(), matchup.loser()) else {
        return Ok(());
    };

    let round = match at {
        MatchRef::ThirdPlace => {
            set_placement(tournament, winner, 3);
            set_placement(tournament, loser, 4);
            return Ok(());
        }
        MatchRef::Round { round, .. } => round,
    };

    match remaining_rounds(tournament.rounds[round].len()) {
        0 => {
            set_placement(tournament, winner, 1);
            set_placement(tournament, loser, 2);
        }
        1 => resolve_semifinals(tournament, round),
        remaining => set_placement(tournament, loser, elimination_placement(remaining)),
    }
    Ok(())
}

/// Once every semifinal is decided, seed the third-place match (or award 3rd to a lone loser).
fn resolve_semifinals(tournament: &mut Tournament, round: usize) {
    if tournament.third_place_match.is_some() {
        return;
    }
    let semis = &tournament.rounds[round];
    if !semis.iter().all(Matchup::is_decided) {
        return;
    }
    let losers: Vec<PlayerId> = semis
        .iter()
        .filter_map(|m| m.loser().and_then(|s| s.player_id()))
        .collect();
    match losers.as_slice() {
        [a, b] => {
            log::info!("tournament {}: third-place match created", tournament.id);
            tournament.third_place_match =
                Some(Matchup::new(Seat::Player(*a), Seat::Player(*b), 1));
        }
        [only] => set_placement(tournament, Seat::Player(*only), 3),
        _ => {}
    }
}

/// Fail with `ResultLocked` if the result at `at` has already fed a later match.
pub(crate) fn ensure_unlocked(tournament: &Tournament, at: MatchRef) -> Result<(), TournamentError> {
    let MatchRef::Round { round, .. } = at else {
        return Ok(());
    };
    if round + 1 < tournament.rounds.len() {
        return Err(TournamentError::ResultLocked);
    }
    let is_semifinal = tournament
        .rounds
        .get(round)
        .is_some_and(|r| remaining_rounds(r.len()) == 1);
    let third_place_played = tournament
        .third_place_match
        .as_ref()
        .is_some_and(Matchup::is_decided);
    if is_semifinal && third_place_played {
        return Err(TournamentError::ResultLocked);
    }
    Ok(())
}

/// Undo placements after the result at `at` was rolled back.
pub(crate) fn on_result_removed(tournament: &mut Tournament, at: MatchRef, participants: [Seat; 2]) {
    for seat in participants {
        clear_placement(tournament, seat);
    }
    if let MatchRef::Round { round, .. } = at {
        let is_semifinal = remaining_rounds(tournament.rounds[round].len()) == 1;
        if is_semifinal && tournament.third_place_match.take().is_some() {
            log::info!("tournament {}: third-place match withdrawn", tournament.id);
        }
    }
}

fn set_placement(tournament: &mut Tournament, seat: Seat, placement: u32) {
    if let Some(p) = seat
        .player_id()
        .and_then(|id| tournament.players.iter_mut().find(|p| p.id == id))
    {
        p.placement = Some(placement);
    }
}

fn clear_placement(tournament: &mut Tournament, seat: Seat) {
    if let Some(p) = seat
        .player_id()
        .and_then(|id| tournament.players.iter_mut().find(|p| p.id == id))
    {
        p.placement = None;
    }
}
