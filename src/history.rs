//! Review and pruning of a course's download records.
//!
//! [`HistoryView`] holds only presentation state (filter text and
//! selection); the records themselves stay in the [`RecordStore`] it is
//! rendered against. Callers persist the store after a deletion.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{Result, SyncError};
use crate::models::{CourseId, FileRecord, RecordStore};
use crate::store::{clear_records, record_count, KeyValueStore};

/// One rendered history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub id: u64,
    pub name: String,
    pub time: DateTime<Local>,
    pub selected: bool,
}

/// A render pass over the record store.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub rows: Vec<HistoryRow>,
    /// Records in the store.
    pub total: usize,
    /// Rows passing the filter.
    pub visible: usize,
    /// Selected rows among the visible ones.
    pub selected: usize,
    /// Every visible row is selected (false when nothing is visible).
    pub all_selected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    filter: String,
    selected: BTreeSet<u64>,
}

impl HistoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(filter: &str) -> Self {
        let mut view = Self::new();
        view.set_filter(filter);
        view
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
    }

    fn matches(&self, record: &FileRecord) -> bool {
        self.filter.is_empty() || record.name.to_lowercase().contains(&self.filter)
    }

    /// Records passing the filter, oldest first.
    pub fn visible<'s>(&self, store: &'s RecordStore) -> Vec<&'s FileRecord> {
        let mut rows: Vec<_> = store.iter().filter(|r| self.matches(r)).collect();
        rows.sort_by(|a, b| a.time.cmp(&b.time).then(a.id.cmp(&b.id)));
        rows
    }

    #[must_use]
    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    /// Flip one row's selection. Returns the new state.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: u64) {
        self.selected.insert(id);
    }

    /// Select every visible row, or clear them all if they already are.
    pub fn toggle_all(&mut self, store: &RecordStore) {
        let ids: Vec<u64> = self.visible(store).iter().map(|r| r.id).collect();
        if ids.iter().all(|id| self.selected.contains(id)) {
            for id in &ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids);
        }
    }

    /// Render the current filter and selection. Drops selections of records that no longer exist.
    pub fn render(&mut self, store: &RecordStore) -> HistoryPage {
        self.selected.retain(|id| store.contains(*id));

        let rows: Vec<HistoryRow> = self
            .visible(store)
            .into_iter()
            .map(|r| HistoryRow {
                id: r.id,
                name: r.name.clone(),
                time: r.time,
                selected: self.selected.contains(&r.id),
            })
            .collect();
        let selected = rows.iter().filter(|r| r.selected).count();

        HistoryPage {
            total: store.len(),
            visible: rows.len(),
            selected,
            all_selected: !rows.is_empty() && selected == rows.len(),
            rows,
        }
    }

    /// Delete the selected rows that are visible under the current filter.
    ///
    /// `confirm` receives the number of rows about to go; declining leaves
    /// the store untouched and yields [`SyncError::NotConfirmed`].
    pub fn delete_selected(
        &mut self,
        store: &mut RecordStore,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<usize> {
        let doomed: Vec<u64> = self
            .visible(store)
            .iter()
            .map(|r| r.id)
            .filter(|id| self.selected.contains(id))
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }
        if !confirm(doomed.len()) {
            return Err(SyncError::NotConfirmed);
        }
        for id in &doomed {
            store.remove(*id);
            self.selected.remove(id);
        }
        tracing::info!("removed {} download record(s)", doomed.len());
        Ok(doomed.len())
    }
}

/// Clear a course's download history after confirmation. Returns the number of records removed.
///
/// Works on unreadable histories too; those count as zero records.
pub fn reset_history<S: KeyValueStore + ?Sized>(
    kv: &mut S,
    course: CourseId,
    confirm: impl FnOnce(usize) -> bool,
) -> Result<usize> {
    let count = record_count(&*kv, course);
    if !confirm(count) {
        return Err(SyncError::NotConfirmed);
    }
    let removed = clear_records(kv, course)?;
    tracing::info!("download history for course {course} cleared ({removed} record(s))");
    Ok(removed)
}
