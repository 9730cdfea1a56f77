//! Integration tests for single-elimination progression and placements.

use matchup_tournament_web::{
    advance_round, modify_result, start_tournament_with_rng, submit_result, MatchRef, MatchResult,
    Outcome, Player, SeriesScore, Tournament, TournamentError, TournamentType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn bracket(n: usize, best_of_three: bool) -> Tournament {
    let players = (0..n).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players(players, TournamentType::SingleElimination, best_of_three);
    start_tournament_with_rng(&mut t, &mut StdRng::seed_from_u64(9)).unwrap();
    t
}

/// Decide every open matchup in the current round as a first-seat win.
fn play_current_round(t: &mut Tournament) {
    let round = t.current_round;
    let open: Vec<u32> = t
        .current_matchups()
        .iter()
        .filter(|m| !m.is_decided())
        .map(|m| m.match_number)
        .collect();
    for match_number in open {
        submit_result(t, MatchRef::Round { round, match_number }, Outcome::FirstWins.into()).unwrap();
    }
}

/// placement -> number of players holding it
fn placement_counts(t: &Tournament) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for p in &t.players {
        if let Some(place) = p.placement {
            *counts.entry(place).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn eight_player_bracket_runs_to_completion() {
    let mut t = bracket(8, false);
    assert_eq!(t.current_matchups().len(), 4);

    play_current_round(&mut t);
    assert_eq!(placement_counts(&t), BTreeMap::from([(5, 4)]));

    advance_round(&mut t).unwrap();
    assert_eq!(t.current_round, 1);
    assert_eq!(t.current_matchups().len(), 2);

    play_current_round(&mut t);
    // Semifinal losers wait for the third-place match.
    assert_eq!(placement_counts(&t), BTreeMap::from([(5, 4)]));
    let third = t.third_place_match.clone().expect("third-place match created");
    let semi_losers: Vec<_> = t.rounds[1].iter().filter_map(|m| m.loser()).collect();
    assert_eq!(third.players.to_vec(), semi_losers);

    advance_round(&mut t).unwrap();
    assert_eq!(t.current_matchups().len(), 1);
    play_current_round(&mut t);
    assert!(!t.is_complete());

    submit_result(&mut t, MatchRef::ThirdPlace, Outcome::SecondWins.into()).unwrap();
    assert!(t.is_complete());
    assert_eq!(
        placement_counts(&t),
        BTreeMap::from([(1, 1), (2, 1), (3, 1), (4, 1), (5, 4)])
    );

    let final_match = &t.rounds[2][0];
    let champion = final_match.winner().and_then(|s| s.player_id()).unwrap();
    assert_eq!(t.get_player(champion).unwrap().placement, Some(1));
    let third_winner = third.players[1].player_id().unwrap();
    assert_eq!(t.get_player(third_winner).unwrap().placement, Some(3));

    assert_eq!(advance_round(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn five_player_bracket_with_byes() {
    let mut t = bracket(5, false);
    assert_eq!(t.current_matchups().len(), 3);

    play_current_round(&mut t);
    assert_eq!(placement_counts(&t), BTreeMap::from([(5, 2)]));

    advance_round(&mut t).unwrap();
    assert_eq!(t.current_matchups().len(), 2);
    assert_eq!(t.current_matchups().iter().filter(|m| m.has_bye()).count(), 1);

    play_current_round(&mut t);
    // Only one real semifinal loser: straight to third.
    assert!(t.third_place_match.is_none());
    assert_eq!(placement_counts(&t), BTreeMap::from([(3, 1), (5, 2)]));

    advance_round(&mut t).unwrap();
    play_current_round(&mut t);
    assert!(t.is_complete());
    assert_eq!(
        placement_counts(&t),
        BTreeMap::from([(1, 1), (2, 1), (3, 1), (5, 2)])
    );
}

#[test]
fn bye_win_awards_no_stats() {
    let t = bracket(3, false);
    let bye = t.current_matchups().iter().find(|m| m.has_bye()).unwrap();
    let id = bye.players[0].player_id().unwrap();
    let p = t.get_player(id).unwrap();
    assert_eq!((p.score, p.wins, p.losses, p.ties), (0, 0, 0, 0));
}

#[test]
fn two_players_is_a_final() {
    let mut t = bracket(2, true);
    submit_result(
        &mut t,
        MatchRef::Round { round: 0, match_number: 1 },
        SeriesScore::new(1, 2).into(),
    )
    .unwrap();
    assert!(t.is_complete());
    assert_eq!(placement_counts(&t), BTreeMap::from([(1, 1), (2, 1)]));
    assert_eq!(advance_round(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn draws_are_rejected() {
    let mut t = bracket(4, false);
    let at = MatchRef::Round { round: 0, match_number: 1 };
    assert_eq!(
        submit_result(&mut t, at, Outcome::Draw.into()),
        Err(TournamentError::DrawNotAllowed)
    );

    let mut t = bracket(4, true);
    assert_eq!(
        submit_result(&mut t, at, SeriesScore::new(1, 1).into()),
        Err(TournamentError::DrawNotAllowed)
    );
    assert!(t.matchup(at).unwrap().result.is_none());
}

#[test]
fn advance_needs_every_result() {
    let mut t = bracket(8, false);
    submit_result(
        &mut t,
        MatchRef::Round { round: 0, match_number: 1 },
        Outcome::FirstWins.into(),
    )
    .unwrap();
    assert_eq!(advance_round(&mut t), Err(TournamentError::IncompleteResults));
}

#[test]
fn round_robin_has_no_next_round() {
    let players = (0..4).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players(players, TournamentType::RoundRobin, false);
    start_tournament_with_rng(&mut t, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(advance_round(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn earlier_round_is_locked_after_advancing() {
    let mut t = bracket(8, false);
    play_current_round(&mut t);
    let at = MatchRef::Round { round: 0, match_number: 1 };

    // Still editable while it is the current round.
    modify_result(&mut t, at).unwrap();
    assert!(t.matchup(at).unwrap().result.is_none());
    assert_eq!(placement_counts(&t), BTreeMap::from([(5, 3)]));
    submit_result(&mut t, at, Outcome::SecondWins.into()).unwrap();

    advance_round(&mut t).unwrap();
    assert_eq!(modify_result(&mut t, at), Err(TournamentError::ResultLocked));
}

#[test]
fn semifinal_rollback_withdraws_unplayed_third_place_match() {
    let mut t = bracket(4, false);
    play_current_round(&mut t);
    assert!(t.third_place_match.is_some());

    let at = MatchRef::Round { round: 0, match_number: 2 };
    modify_result(&mut t, at).unwrap();
    assert!(t.third_place_match.is_none());

    submit_result(&mut t, at, Outcome::SecondWins.into()).unwrap();
    assert!(t.third_place_match.is_some());

    submit_result(&mut t, MatchRef::ThirdPlace, Outcome::FirstWins.into()).unwrap();
    assert_eq!(placement_counts(&t), BTreeMap::from([(3, 1), (4, 1)]));
    assert_eq!(modify_result(&mut t, at), Err(TournamentError::ResultLocked));

    // The third-place match itself can still be corrected.
    modify_result(&mut t, MatchRef::ThirdPlace).unwrap();
    assert!(placement_counts(&t).is_empty());
}

#[test]
fn final_rollback_clears_top_placements() {
    let mut t = bracket(2, false);
    let at = MatchRef::Round { round: 0, match_number: 1 };
    submit_result(&mut t, at, Outcome::FirstWins.into()).unwrap();
    modify_result(&mut t, at).unwrap();
    assert!(placement_counts(&t).is_empty());
    assert!(t.players.iter().all(|p| p.wins == 0 && p.losses == 0));
    assert!(!t.is_complete());
}

#[test]
fn bye_matchup_cannot_be_modified() {
    let mut t = bracket(3, false);
    let bye_number = t
        .current_matchups()
        .iter()
        .find(|m| m.has_bye())
        .map(|m| m.match_number)
        .unwrap();
    let at = MatchRef::Round { round: 0, match_number: bye_number };
    assert_eq!(modify_result(&mut t, at), Err(TournamentError::ByeMatchup));
    assert_eq!(
        t.matchup(at).unwrap().result,
        Some(MatchResult::Single(Outcome::FirstWins))
    );
}

#[test]
fn restart_keeps_names_and_clears_progress() {
    let mut t = bracket(4, false);
    play_current_round(&mut t);
    let id = t.id;
    t.restart_tournament().unwrap();
    assert_eq!(t.id, id);
    assert!(!t.tournament_started);
    assert!(t.rounds.is_empty());
    assert!(t.third_place_match.is_none());
    let mut names: Vec<_> = t.players.iter().map(|p| p.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["P0", "P1", "P2", "P3"]);
    assert!(t.players.iter().all(|p| p.wins == 0 && p.placement.is_none()));
}
