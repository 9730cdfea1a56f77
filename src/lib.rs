//! Tournament matchup web app: library with models, matchup/scoring logic, and storage.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    advance_round, generate_matchups, modify_result, record_result, rollback_result,
    start_tournament, start_tournament_with_rng, submit_result, RecordOptions,
};
pub use models::{
    MatchRef, MatchResult, Matchup, Outcome, Player, PlayerId, Seat, SeriesScore, Tournament,
    TournamentError, TournamentId, TournamentType,
};
pub use storage::{
    export_tournament, import_tournament, parse_roster_csv, ImportError, JsonFileStore, MemoryStore,
    StoreError, TournamentStore,
};
