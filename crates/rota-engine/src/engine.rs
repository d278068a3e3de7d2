use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, instrument};

use rota_store::ScheduleStore;

use crate::error::{EngineError, Result};
use crate::parse;

/// The rotation step: every reindexing operation moves dates in whole weeks.
fn step() -> Duration {
    Duration::days(7)
}

/// `{id, name}` pair as the frontend consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    pub id: i64,
    pub name: String,
}

/// The schedule as two parallel lists, both ascending by date.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub users: Vec<UserRef>,
    pub dates: Vec<NaiveDate>,
}

/// Scheduling operations over any [`ScheduleStore`] backend.
///
/// Stateless between calls — the store is consulted fresh on every
/// operation, and all multi-step mutations go through `apply_batch`.
pub struct ScheduleEngine {
    store: Arc<dyn ScheduleStore>,
}

impl ScheduleEngine {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    /// The saved schedule: users and dates in matching order.
    pub fn get_schedule(&self) -> Result<ScheduleView> {
        let entries = self.store.list_all()?;
        let mut view = ScheduleView {
            users: Vec::with_capacity(entries.len()),
            dates: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            view.users.push(UserRef {
                id: entry.id,
                name: entry.name,
            });
            view.dates.push(entry.date);
        }
        Ok(view)
    }

    /// Bulk date reassignment from frontend input.
    ///
    /// All parsing happens before any store call, and the writes land as one
    /// atomic batch — a bad entry anywhere means zero writes. A reference to
    /// an id that no longer exists is the caller's stale data, reported as
    /// [`EngineError::NotFound`]. Returns the number of pairs applied.
    #[instrument(skip_all, fields(pairs = user_refs.len()))]
    pub fn update_schedule(&self, user_refs: &[String], date_strs: &[String]) -> Result<usize> {
        if user_refs.len() != date_strs.len() {
            return Err(EngineError::LengthMismatch {
                users: user_refs.len(),
                dates: date_strs.len(),
            });
        }

        let updates = user_refs
            .iter()
            .zip(date_strs)
            .map(|(u, d)| Ok((parse::user_id(u)?, parse::date(d)?)))
            .collect::<Result<Vec<_>>>()?;

        self.store.apply_batch(&updates, None).map_err(|e| match e {
            rota_store::StoreError::NotFound { id } => EngineError::NotFound { id },
            other => EngineError::Store(other),
        })?;
        info!(count = updates.len(), "schedule updated");
        Ok(updates.len())
    }

    /// Rotate dates that are older than `today`.
    ///
    /// Past-due entries are pushed onto the end of the queue in their
    /// original relative order, each landing exactly one week after the
    /// previous reassignment (the first lands one week past the prior
    /// maximum). Returns the number of entries moved; zero past-due entries
    /// is a no-op, not an error.
    #[instrument(skip(self), fields(%today))]
    pub fn rotate(&self, today: NaiveDate) -> Result<usize> {
        let past_due = self.store.select_past_due(today)?;
        if past_due.is_empty() {
            return Ok(0);
        }

        // Rows exist, so a maximum must too; its absence means the store is
        // answering inconsistently and nothing should be written.
        let mut ref_date = self
            .store
            .max_date()?
            .ok_or(EngineError::Inconsistent("entries exist but no max date"))?;

        let mut updates = Vec::with_capacity(past_due.len());
        for entry in &past_due {
            ref_date = ref_date + step();
            updates.push((entry.id, ref_date));
        }

        self.store.apply_batch(&updates, None)?;
        info!(count = updates.len(), new_max = %ref_date, "stale dates rotated forward");
        Ok(updates.len())
    }

    /// Add a new user at the end of the queue.
    ///
    /// The slot is one week after the current maximum date, or `today` when
    /// the schedule is empty. Returns the assigned id.
    #[instrument(skip(self))]
    pub fn create_user(&self, name: &str, today: NaiveDate) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(EngineError::EmptyName);
        }

        let date = match self.store.max_date()? {
            Some(max) => max + step(),
            None => today,
        };

        let id = self.store.insert(name, date)?;
        info!(id, name, %date, "user created");
        Ok(id)
    }

    /// Remove a user and close the date gap they leave behind.
    ///
    /// Every entry dated after the target shifts back by one position: the
    /// first survivor takes the deleted entry's date, the next takes the
    /// date the first vacated, and so on. Entries dated at or before the
    /// target are untouched. The reassignments and the deletion land as one
    /// atomic unit. Returns the deleted id.
    #[instrument(skip(self))]
    pub fn delete_user(&self, id: i64) -> Result<i64> {
        let target = self
            .store
            .get(id)?
            .ok_or(EngineError::NotFound { id })?;

        let later = self.store.select_after(target.date)?;
        let mut updates = Vec::with_capacity(later.len());
        let mut gap = target.date;
        for entry in &later {
            updates.push((entry.id, gap));
            gap = entry.date;
        }

        self.store.apply_batch(&updates, Some(id))?;
        info!(id, name = %target.name, shifted = updates.len(), "user deleted, gap closed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_store::SqliteStore;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn engine() -> ScheduleEngine {
        ScheduleEngine::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    fn engine_with(entries: &[(&str, &str)]) -> ScheduleEngine {
        let store = SqliteStore::open_in_memory().unwrap();
        for (name, date) in entries {
            store.insert(name, d(date)).unwrap();
        }
        ScheduleEngine::new(Arc::new(store))
    }

    fn dates_of(engine: &ScheduleEngine) -> Vec<(String, NaiveDate)> {
        let view = engine.get_schedule().unwrap();
        view.users
            .into_iter()
            .zip(view.dates)
            .map(|(u, date)| (u.name, date))
            .collect()
    }

    #[test]
    fn get_schedule_returns_parallel_lists_in_date_order() {
        let engine = engine_with(&[
            ("carol", "2024-01-15"),
            ("alice", "2024-01-01"),
            ("bob", "2024-01-08"),
        ]);
        let view = engine.get_schedule().unwrap();
        assert_eq!(view.users.len(), view.dates.len());
        let names: Vec<_> = view.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
        assert!(view.dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn update_schedule_length_mismatch_writes_nothing() {
        let engine = engine_with(&[("alice", "2024-01-01")]);
        let err = engine
            .update_schedule(
                &["user-1".into(), "user-2".into()],
                &["01/01/2024".into()],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::LengthMismatch { users: 2, dates: 1 }));
        assert_eq!(dates_of(&engine)[0].1, d("2024-01-01"));
    }

    #[test]
    fn update_schedule_bad_date_fails_before_any_write() {
        let engine = engine_with(&[("alice", "2024-01-01"), ("bob", "2024-01-08")]);
        let err = engine
            .update_schedule(
                &["user-1".into(), "user-2".into()],
                &["02/01/2024".into(), "not-a-date".into()],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::DateParse(_)));
        // First pair parsed fine but must not have been applied.
        assert_eq!(dates_of(&engine)[0].1, d("2024-01-01"));
    }

    #[test]
    fn update_schedule_unknown_id_is_not_found_and_writes_nothing() {
        let engine = engine_with(&[("alice", "2024-01-01")]);
        let err = engine
            .update_schedule(
                &["user-1".into(), "user-99".into()],
                &["02/01/2024".into(), "03/01/2024".into()],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { id: 99 }));
        // The batch rolled back, so alice keeps her original date.
        assert_eq!(dates_of(&engine)[0].1, d("2024-01-01"));
    }

    #[test]
    fn update_schedule_round_trips() {
        let engine = engine_with(&[("alice", "2024-01-01"), ("bob", "2024-01-08")]);
        let count = engine
            .update_schedule(
                &["user-1".into(), "user-2".into()],
                &["03/01/2024".into(), "02/01/2024".into()],
            )
            .unwrap();
        assert_eq!(count, 2);
        // bob's new date now sorts first.
        assert_eq!(
            dates_of(&engine),
            vec![
                ("bob".to_string(), d("2024-02-01")),
                ("alice".to_string(), d("2024-03-01")),
            ]
        );
    }

    #[test]
    fn rotate_is_a_noop_without_past_due_entries() {
        let engine = engine_with(&[("alice", "2024-06-01")]);
        assert_eq!(engine.rotate(d("2024-01-01")).unwrap(), 0);
        assert_eq!(dates_of(&engine)[0].1, d("2024-06-01"));
    }

    #[test]
    fn rotate_pushes_past_due_beyond_the_max_in_week_steps() {
        // today=2024-02-01; alice and bob are past due, carol holds the max.
        let engine = engine_with(&[
            ("alice", "2024-01-01"),
            ("bob", "2024-01-08"),
            ("carol", "2024-03-01"),
        ]);
        let count = engine.rotate(d("2024-02-01")).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            dates_of(&engine),
            vec![
                ("carol".to_string(), d("2024-03-01")),
                ("alice".to_string(), d("2024-03-08")),
                ("bob".to_string(), d("2024-03-15")),
            ]
        );
    }

    #[test]
    fn rotate_twice_only_moves_new_stragglers() {
        let engine = engine_with(&[("alice", "2024-01-01"), ("bob", "2024-03-01")]);
        assert_eq!(engine.rotate(d("2024-02-01")).unwrap(), 1);
        // alice now sits at 2024-03-08; nothing is past due any more.
        assert_eq!(engine.rotate(d("2024-02-01")).unwrap(), 0);
    }

    #[test]
    fn create_user_on_empty_store_uses_today() {
        let engine = engine();
        engine.create_user("alice", d("2024-05-01")).unwrap();
        assert_eq!(dates_of(&engine), vec![("alice".to_string(), d("2024-05-01"))]);
    }

    #[test]
    fn create_user_appends_one_week_after_max() {
        let engine = engine();
        engine.create_user("alice", d("2024-05-01")).unwrap();
        engine.create_user("bob", d("2024-05-01")).unwrap();
        assert_eq!(dates_of(&engine)[1], ("bob".to_string(), d("2024-05-08")));
    }

    #[test]
    fn create_user_rejects_blank_names() {
        let engine = engine();
        assert!(matches!(
            engine.create_user("", d("2024-05-01")),
            Err(EngineError::EmptyName)
        ));
        assert!(matches!(
            engine.create_user("   ", d("2024-05-01")),
            Err(EngineError::EmptyName)
        ));
    }

    #[test]
    fn create_user_duplicate_surfaces_as_store_error() {
        let engine = engine();
        engine.create_user("alice", d("2024-05-01")).unwrap();
        assert!(matches!(
            engine.create_user("alice", d("2024-05-01")),
            Err(EngineError::Store(_))
        ));
    }

    #[test]
    fn delete_user_unknown_id_is_not_found() {
        let engine = engine();
        assert!(matches!(
            engine.delete_user(99),
            Err(EngineError::NotFound { id: 99 })
        ));
    }

    #[test]
    fn delete_compacts_later_dates_by_position() {
        // Alice=01-01, Bob=01-08, Carol=01-15; delete Bob.
        let engine = engine_with(&[
            ("alice", "2024-01-01"),
            ("bob", "2024-01-08"),
            ("carol", "2024-01-15"),
        ]);
        let bob_id = engine
            .get_schedule()
            .unwrap()
            .users
            .iter()
            .find(|u| u.name == "bob")
            .unwrap()
            .id;
        assert_eq!(engine.delete_user(bob_id).unwrap(), bob_id);
        assert_eq!(
            dates_of(&engine),
            vec![
                ("alice".to_string(), d("2024-01-01")),
                ("carol".to_string(), d("2024-01-08")),
            ]
        );
        // The freed slot at the end is what the next create picks up.
        engine.create_user("dave", d("2024-01-20")).unwrap();
        assert_eq!(
            dates_of(&engine)[2],
            ("dave".to_string(), d("2024-01-15"))
        );
    }

    #[test]
    fn delete_leaves_earlier_entries_alone() {
        let engine = engine_with(&[
            ("alice", "2024-01-01"),
            ("bob", "2024-01-08"),
            ("carol", "2024-01-15"),
            ("dana", "2024-01-22"),
        ]);
        let carol_id = engine
            .get_schedule()
            .unwrap()
            .users
            .iter()
            .find(|u| u.name == "carol")
            .unwrap()
            .id;
        engine.delete_user(carol_id).unwrap();
        assert_eq!(
            dates_of(&engine),
            vec![
                ("alice".to_string(), d("2024-01-01")),
                ("bob".to_string(), d("2024-01-08")),
                ("dana".to_string(), d("2024-01-15")),
            ]
        );
    }

    #[test]
    fn delete_last_entry_shifts_nothing() {
        let engine = engine_with(&[("alice", "2024-01-01"), ("bob", "2024-01-08")]);
        let bob_id = engine
            .get_schedule()
            .unwrap()
            .users
            .iter()
            .find(|u| u.name == "bob")
            .unwrap()
            .id;
        engine.delete_user(bob_id).unwrap();
        assert_eq!(dates_of(&engine), vec![("alice".to_string(), d("2024-01-01"))]);
    }

    // The engine must behave identically over the document backend.
    #[test]
    fn delete_compaction_matches_on_json_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = rota_store::JsonStore::open(dir.path().join("schedule.json"));
        let engine = ScheduleEngine::new(Arc::new(store));
        engine.create_user("alice", d("2024-01-01")).unwrap();
        engine.create_user("bob", d("2024-01-01")).unwrap();
        engine.create_user("carol", d("2024-01-01")).unwrap();
        // alice=01-01, bob=01-08, carol=01-15 by the max+7 rule.
        let bob_id = engine
            .get_schedule()
            .unwrap()
            .users
            .iter()
            .find(|u| u.name == "bob")
            .unwrap()
            .id;
        engine.delete_user(bob_id).unwrap();
        assert_eq!(
            dates_of(&engine),
            vec![
                ("alice".to_string(), d("2024-01-01")),
                ("carol".to_string(), d("2024-01-08")),
            ]
        );
    }
}
