//! Document backend: the whole schedule lives in one JSON file.
//!
//! Every mutation is a read-modify-write of the full document, committed by
//! writing a sibling temp file and renaming it over the original. The rename
//! is what makes batches all-or-nothing: readers see either the old document
//! or the new one, never a half-written file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::ScheduleEntry;
use crate::ScheduleStore;

/// On-disk shape of the document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    next_id: i64,
    entries: Vec<ScheduleEntry>,
}

impl Document {
    /// Entries sorted ascending by date, id as tie-break.
    fn sorted(&self) -> Vec<ScheduleEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| (e.date, e.id));
        entries
    }
}

/// JSON-document-backed schedule store.
///
/// The mutex serializes read-modify-write cycles; the file itself is the
/// source of truth and is re-read on every operation.
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Use the document at `path`, creating it (and its parent directory)
    /// on first write. A missing file reads as an empty schedule.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document {
                next_id: 1,
                entries: Vec::new(),
            });
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Commit the document atomically: write a temp sibling, then rename.
    fn persist(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), entries = doc.entries.len(), "document replaced");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

impl ScheduleStore for JsonStore {
    fn list_all(&self) -> Result<Vec<ScheduleEntry>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.sorted())
    }

    fn get(&self, id: i64) -> Result<Option<ScheduleEntry>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.entries.into_iter().find(|e| e.id == id))
    }

    fn max_date(&self) -> Result<Option<NaiveDate>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.entries.iter().map(|e| e.date).max())
    }

    fn insert(&self, name: &str, date: NaiveDate) -> Result<i64> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load()?;
        if doc.entries.iter().any(|e| e.name == name) {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = doc.next_id;
        doc.next_id += 1;
        doc.entries.push(ScheduleEntry {
            id,
            name: name.to_string(),
            date,
        });
        self.persist(&doc)?;
        Ok(id)
    }

    fn update_date(&self, id: i64, date: NaiveDate) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load()?;
        let entry = doc
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound { id })?;
        entry.date = date;
        self.persist(&doc)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load()?;
        let before = doc.entries.len();
        doc.entries.retain(|e| e.id != id);
        if doc.entries.len() == before {
            return Err(StoreError::NotFound { id });
        }
        self.persist(&doc)
    }

    fn select_past_due(&self, today: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let _guard = self.lock.lock().unwrap();
        let mut out = self.load()?.sorted();
        out.retain(|e| e.date < today);
        Ok(out)
    }

    fn select_after(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let _guard = self.lock.lock().unwrap();
        let mut out = self.load()?.sorted();
        out.retain(|e| e.date > date);
        Ok(out)
    }

    fn apply_batch(&self, updates: &[(i64, NaiveDate)], delete_id: Option<i64>) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut doc = self.load()?;
        // Stage every change in memory first; nothing touches disk until the
        // whole batch has been validated.
        for &(id, date) in updates {
            let entry = doc
                .entries
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or(StoreError::NotFound { id })?;
            entry.date = date;
        }
        if let Some(id) = delete_id {
            let before = doc.entries.len();
            doc.entries.retain(|e| e.id != id);
            if doc.entries.len() == before {
                return Err(StoreError::NotFound { id });
            }
        }
        self.persist(&doc)?;
        debug!(
            updates = updates.len(),
            deleted = delete_id.is_some(),
            "batch written"
        );
        Ok(())
    }
}
