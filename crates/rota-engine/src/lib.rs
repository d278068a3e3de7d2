//! `rota-engine` — scheduling logic over the abstract store contract.
//!
//! # Overview
//!
//! The engine owns the date-reindexing rules of the round-robin schedule:
//!
//! | Operation         | Effect on dates                                      |
//! |-------------------|------------------------------------------------------|
//! | `create_user`     | new entry lands at max + 7 days (today when empty)   |
//! | `update_schedule` | bulk reassignment, applied as one atomic batch       |
//! | `rotate`          | past-due entries pushed past the max in 7-day steps  |
//! | `delete_user`     | later entries compact leftward by one position       |
//!
//! The engine holds no state between calls; every operation re-reads the
//! store, and every multi-step mutation goes through one atomic batch so
//! readers never observe a partial reshuffle.

pub mod engine;
pub mod error;
pub mod parse;

pub use engine::{ScheduleEngine, ScheduleView, UserRef};
pub use error::{EngineError, Result};
