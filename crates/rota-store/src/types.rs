use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the schedule: who presents, and when.
///
/// `date` carries no time-of-day; the schedule is a pure calendar sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
}
