//! Matchup generation: random single-elimination pairings and round-robin schedules.

use crate::models::{Matchup, Player, PlayerId, Seat, TournamentError, TournamentType};
use rand::seq::SliceRandom;
use rand::Rng;

/// Build the opening round for `players` in the given format.
///
/// Single-elimination shuffles the roster and pairs neighbours (odd player out gets a bye,
/// already decided as a win). Round-robin lists every pair once, `(i, j)` with `i < j`.
/// Input players are not modified.
pub fn generate_matchups<R: Rng + ?Sized>(
    players: &[Player],
    format: TournamentType,
    rng: &mut R,
) -> Result<Vec<Matchup>, TournamentError> {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    match format {
        TournamentType::SingleElimination => {
            let mut shuffled = ids;
            shuffled.shuffle(rng);
            Ok(pair_consecutive(&shuffled))
        }
        TournamentType::RoundRobin => Ok(round_robin(&ids)),
        TournamentType::DoubleElimination => Err(TournamentError::UnsupportedFormat(format)),
    }
}

/// Pair ids in order: (0,1), (2,3), ... An unpaired last id faces a bye.
pub fn pair_consecutive(ids: &[PlayerId]) -> Vec<Matchup> {
    ids.chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let match_number = i as u32 + 1;
            match pair {
                [a, b] => Matchup::new(Seat::Player(*a), Seat::Player(*b), match_number),
                [a] => Matchup::bye(*a, match_number),
                _ => unreachable!("chunks(2) yields one or two ids"),
            }
        })
        .collect()
}

fn round_robin(ids: &[PlayerId]) -> Vec<Matchup> {
    let mut matchups = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            let match_number = matchups.len() as u32 + 1;
            matchups.push(Matchup::new(Seat::Player(a), Seat::Player(b), match_number));
        }
    }
    matchups
}
