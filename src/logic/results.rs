//! Result recording: apply a match result to player stats, and roll it back.
//!
//! These are the only functions that change a player's score, wins, losses or ties.

use crate::logic::bracket;
use crate::models::{
    MatchRef, MatchResult, Matchup, Outcome, Player, PlayerId, StatDelta, Tournament,
    TournamentError, TournamentType,
};

/// Scoring mode for [`record_result`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecordOptions {
    pub best_of_three: bool,
}

/// Stat changes for (first, second) player caused by `result`.
///
/// Best-of-one awards no score: a win is wins+1 / losses+1, a draw is ties+1 each.
/// Best-of-three uses the series table (3/0, 2/1, 1/1 points).
pub fn result_deltas(result: MatchResult) -> Result<[StatDelta; 2], TournamentError> {
    use StatDelta as D;
    let deltas = match result {
        MatchResult::Single(Outcome::FirstWins) => [D::WIN, D::LOSS],
        MatchResult::Single(Outcome::SecondWins) => [D::LOSS, D::WIN],
        MatchResult::Single(Outcome::Draw) => [D::TIE, D::TIE],
        MatchResult::BestOfThree(s) => match (s.first_player_wins, s.second_player_wins) {
            (2, 0) => [D::WIN.with_score(3), D::LOSS],
            (0, 2) => [D::LOSS, D::WIN.with_score(3)],
            (2, 1) => [D::WIN.with_score(2), D::LOSS.with_score(1)],
            (1, 2) => [D::LOSS.with_score(1), D::WIN.with_score(2)],
            (1, 1) => [D::TIE.with_score(1), D::TIE.with_score(1)],
            _ => return Err(TournamentError::UnrecognizedResult),
        },
    };
    Ok(deltas)
}

/// Check that `result` is the kind the mode expects and is a legal value.
pub fn validate_result(result: MatchResult, options: RecordOptions) -> Result<(), TournamentError> {
    let kind_ok = matches!(
        (result, options.best_of_three),
        (MatchResult::Single(_), false) | (MatchResult::BestOfThree(_), true)
    );
    if !kind_ok {
        return Err(TournamentError::UnrecognizedResult);
    }
    result_deltas(result).map(|_| ())
}

/// Record `result` on `matchup`, updating the two players in `roster`.
///
/// A matchup that already has a result is left alone and `Ok` is returned, so a repeated
/// submission never scores twice.
pub fn record_result(
    roster: &mut [Player],
    matchup: &mut Matchup,
    result: MatchResult,
    options: RecordOptions,
) -> Result<(), TournamentError> {
    if matchup.is_decided() {
        log::debug!("match {} already decided, ignoring result", matchup.match_number);
        return Ok(());
    }
    validate_result(result, options)?;
    let deltas = result_deltas(result)?;
    let seats = seat_indexes(roster, matchup)?;
    for (idx, delta) in seats.into_iter().zip(deltas) {
        if let Some(i) = idx {
            roster[i].apply(delta);
        }
    }
    matchup.result = Some(result);
    log::debug!("match {} recorded: {:?}", matchup.match_number, result);
    Ok(())
}

/// Undo the recorded result: every stat the recording added is subtracted and the matchup
/// becomes undecided again.
pub fn rollback_result(roster: &mut [Player], matchup: &mut Matchup) -> Result<(), TournamentError> {
    let result = matchup.result.ok_or(TournamentError::NotDecided)?;
    if matchup.has_bye() {
        return Err(TournamentError::ByeMatchup);
    }
    let deltas = result_deltas(result)?;
    let seats = seat_indexes(roster, matchup)?;
    for (idx, delta) in seats.into_iter().zip(deltas) {
        if let Some(i) = idx {
            roster[i].revert(delta);
        }
    }
    matchup.result = None;
    log::debug!("match {} rolled back", matchup.match_number);
    Ok(())
}

/// Roster index for each seat (None for a bye). Fails before any mutation if a player is missing.
fn seat_indexes(roster: &[Player], matchup: &Matchup) -> Result<[Option<usize>; 2], TournamentError> {
    let find = |id: PlayerId| {
        roster
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))
    };
    let mut out = [None, None];
    for (slot, seat) in out.iter_mut().zip(matchup.players.iter()) {
        if let Some(id) = seat.player_id() {
            *slot = Some(find(id)?);
        }
    }
    Ok(out)
}

/// Mutable matchup at `at`, borrowed from the round list or the third-place slot.
pub(crate) fn locate_mut<'a>(
    rounds: &'a mut [Vec<Matchup>],
    third_place: &'a mut Option<Matchup>,
    at: MatchRef,
) -> Result<&'a mut Matchup, TournamentError> {
    let found = match at {
        MatchRef::Round { round, match_number } => rounds
            .get_mut(round)
            .and_then(|r| r.iter_mut().find(|m| m.match_number == match_number)),
        MatchRef::ThirdPlace => third_place.as_mut(),
    };
    found.ok_or(TournamentError::MatchNotFound(at))
}

/// Record a result on a tournament matchup. In single-elimination, draws are rejected and
/// placements are derived from decisive results.
pub fn submit_result(
    tournament: &mut Tournament,
    at: MatchRef,
    result: MatchResult,
) -> Result<(), TournamentError> {
    if !tournament.tournament_started {
        return Err(TournamentError::InvalidState);
    }
    let options = RecordOptions {
        best_of_three: tournament.best_of_three,
    };
    let elimination = tournament.tournament_type == TournamentType::SingleElimination;

    let Tournament {
        players,
        rounds,
        third_place_match,
        ..
    } = &mut *tournament;
    let matchup = locate_mut(rounds, third_place_match, at)?;
    if matchup.is_decided() {
        log::debug!("{:?} already decided, ignoring result", at);
        return Ok(());
    }
    validate_result(result, options)?;
    if elimination && result.winner_index().is_none() {
        return Err(TournamentError::DrawNotAllowed);
    }
    record_result(players, matchup, result, options)?;

    if elimination {
        bracket::on_result_recorded(tournament, at)?;
    }
    tournament.touch();
    Ok(())
}

/// Clear the result of a tournament matchup and undo its stats (and, in single-elimination,
/// the placements it produced).
pub fn modify_result(tournament: &mut Tournament, at: MatchRef) -> Result<(), TournamentError> {
    if !tournament.tournament_started {
        return Err(TournamentError::InvalidState);
    }
    let elimination = tournament.tournament_type == TournamentType::SingleElimination;
    if elimination {
        bracket::ensure_unlocked(tournament, at)?;
    }

    let Tournament {
        players,
        rounds,
        third_place_match,
        ..
    } = &mut *tournament;
    let matchup = locate_mut(rounds, third_place_match, at)?;
    let participants = matchup.players;
    rollback_result(players, matchup)?;

    if elimination {
        bracket::on_result_removed(tournament, at, participants);
    }
    tournament.touch();
    Ok(())
}
