//! `rota-store` — persistence for schedule entries.
//!
//! Two interchangeable backends implement the [`ScheduleStore`] trait:
//!
//! | Backend       | Medium                | Atomicity mechanism          |
//! |---------------|-----------------------|------------------------------|
//! | [`SqliteStore`] | SQLite database file | real database transaction    |
//! | [`JsonStore`]   | single JSON document | temp-file + rename replace   |
//!
//! Callers must not assume which backend they hold; the engine sees only the
//! trait. The store is the sole source of truth — nothing is cached between
//! calls.

pub mod error;
pub mod json;
pub mod sqlite;
pub mod types;

pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use sqlite::SqliteStore;
pub use types::ScheduleEntry;

use chrono::NaiveDate;

/// Contract every schedule backend satisfies.
///
/// Ordering guarantee: every listing method returns entries ascending by
/// date, with id ascending as the tie-break, stable across reads.
pub trait ScheduleStore: Send + Sync {
    /// All entries, ascending by date.
    fn list_all(&self) -> Result<Vec<ScheduleEntry>>;

    /// Look up a single entry by id.
    fn get(&self, id: i64) -> Result<Option<ScheduleEntry>>;

    /// The latest date in the store, or `None` when empty.
    fn max_date(&self) -> Result<Option<NaiveDate>>;

    /// Insert a new entry, returning its assigned id.
    ///
    /// Fails with [`StoreError::DuplicateName`] when the name is taken.
    fn insert(&self, name: &str, date: NaiveDate) -> Result<i64>;

    /// Reassign one entry's date. Fails with [`StoreError::NotFound`].
    fn update_date(&self, id: i64, date: NaiveDate) -> Result<()>;

    /// Remove one entry. Fails with [`StoreError::NotFound`].
    fn delete(&self, id: i64) -> Result<()>;

    /// Entries dated strictly before `today`, ascending.
    fn select_past_due(&self, today: NaiveDate) -> Result<Vec<ScheduleEntry>>;

    /// Entries dated strictly after `date`, ascending.
    fn select_after(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>>;

    /// Apply a set of date reassignments, and optionally one deletion, as a
    /// single all-or-nothing unit.
    ///
    /// Either every listed id is updated (and `delete_id` removed) or the
    /// store is left untouched. A missing id anywhere in the batch fails the
    /// whole batch with [`StoreError::NotFound`].
    fn apply_batch(&self, updates: &[(i64, NaiveDate)], delete_id: Option<i64>) -> Result<()>;
}
