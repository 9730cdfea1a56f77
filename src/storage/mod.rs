//! Persistence and file formats: keyed stores, JSON import/export, CSV rosters.

mod roster;
mod store;
mod transfer;

pub use roster::parse_roster_csv;
pub use store::{JsonFileStore, MemoryStore, StoreError, TournamentStore};
pub use transfer::{export_tournament, import_tournament, ImportError, EXPORT_FILE_NAME};
