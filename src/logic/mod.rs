//! Tournament business logic: matchup generation, result recording, bracket progression.

mod bracket;
mod matchups;
mod results;
mod setup;

pub use bracket::{advance_round, elimination_placement, remaining_rounds};
pub use matchups::{generate_matchups, pair_consecutive};
pub use results::{
    modify_result, record_result, result_deltas, rollback_result, submit_result, validate_result,
    RecordOptions,
};
pub use setup::{start_tournament, start_tournament_with_rng};
