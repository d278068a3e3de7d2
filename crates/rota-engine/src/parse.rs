//! Input parsing for the two frontend wire formats: user references of the
//! form `"<prefix>-<id>"` and dates in `MM/DD/YYYY`.

use chrono::NaiveDate;

use crate::error::{EngineError, Result};

/// Extract the numeric id from a frontend user reference.
///
/// The frontend tags ids with an element prefix (e.g. `"user-42"`); the id
/// is the segment after the first `-`.
pub fn user_id(user_ref: &str) -> Result<i64> {
    user_ref
        .split('-')
        .nth(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| EngineError::BadUserRef(user_ref.to_string()))
}

/// Parse an input-format `MM/DD/YYYY` date string.
pub fn date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%m/%d/%Y")
        .map_err(|_| EngineError::DateParse(date_str.to_string()))
}
