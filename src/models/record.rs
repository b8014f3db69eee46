use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A downloaded file as remembered by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Remote file ID.
    pub id: u64,
    /// Display name at download time.
    pub name: String,
    /// When the download was dispatched (client-local).
    pub time: DateTime<Local>,
}

impl FileRecord {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, time: DateTime<Local>) -> Self {
        Self {
            id,
            name: name.into(),
            time,
        }
    }
}

/// On-disk value shape: the ID is the map key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    name: String,
    time: DateTime<Local>,
}

/// Mapping from remote file ID to its record, for one course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: BTreeMap<u64, FileRecord>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON object form `{"<id>": {"name": .., "time": ..}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<u64, StoredEntry> = serde_json::from_str(json)?;
        let records = entries
            .into_iter()
            .map(|(id, e)| (id, FileRecord::new(id, e.name, e.time)))
            .collect();
        Ok(Self { records })
    }

    /// Import a legacy bare ID list. Names are unknown and times are the epoch.
    pub fn from_legacy_json(json: &str) -> Result<Self> {
        let ids: Vec<u64> = serde_json::from_str(json)?;
        let epoch = DateTime::<Utc>::default().with_timezone(&Local);
        let records = ids
            .into_iter()
            .map(|id| (id, FileRecord::new(id, "", epoch)))
            .collect();
        Ok(Self { records })
    }

    /// Serialize to the JSON object form.
    pub fn to_json(&self) -> Result<String> {
        let entries: BTreeMap<u64, StoredEntry> = self
            .records
            .values()
            .map(|r| {
                (
                    r.id,
                    StoredEntry {
                        name: r.name.clone(),
                        time: r.time,
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string(&entries)?)
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&FileRecord> {
        self.records.get(&id)
    }

    /// Insert a record. An existing record for the same ID is kept.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id, record);
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<FileRecord> {
        self.records.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }
}
