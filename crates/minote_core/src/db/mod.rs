//! SQLite bootstrap for `SqliteKvStore`.
//!
//! Opening a connection always runs pending migrations first; failures are
//! reported as `StoreError` so callers see one error type for the store.
//! Schema version lives in `PRAGMA user_version`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
