use crate::error::Result;
use crate::models::{CourseId, RecordStore};

use super::KeyValueStore;

/// Key the record store for a course lives under.
#[must_use]
pub fn record_key(course: CourseId) -> String {
    format!("canvas_downloaded_files_{course}")
}

/// Key of the older bare-ID list format.
#[must_use]
pub fn legacy_key(course: CourseId) -> String {
    format!("canvas_downloaded_file_ids_{course}")
}

/// Load a course's records, importing the legacy ID list when that is all there is.
pub fn load_records<S: KeyValueStore + ?Sized>(kv: &S, course: CourseId) -> Result<RecordStore> {
    if let Some(json) = kv.get(&record_key(course))? {
        return RecordStore::from_json(&json);
    }
    if let Some(json) = kv.get(&legacy_key(course))? {
        let store = RecordStore::from_legacy_json(&json)?;
        tracing::info!(
            "imported {} legacy download ids for course {course}",
            store.len()
        );
        return Ok(store);
    }
    Ok(RecordStore::new())
}

/// Persist a course's records, retiring any legacy entry.
pub fn save_records<S: KeyValueStore + ?Sized>(
    kv: &mut S,
    course: CourseId,
    store: &RecordStore,
) -> Result<()> {
    kv.set(&record_key(course), &store.to_json()?)?;
    kv.remove(&legacy_key(course))?;
    Ok(())
}

/// Number of records stored for a course. Unreadable entries count as zero.
pub fn record_count<S: KeyValueStore + ?Sized>(kv: &S, course: CourseId) -> usize {
    match load_records(kv, course) {
        Ok(store) => store.len(),
        Err(e) => {
            tracing::warn!("download history for course {course} is unreadable: {e}");
            0
        }
    }
}

/// Drop every record for a course, readable or not. Returns how many were removed.
pub fn clear_records<S: KeyValueStore + ?Sized>(kv: &mut S, course: CourseId) -> Result<usize> {
    let removed = record_count(&*kv, course);
    kv.remove(&record_key(course))?;
    kv.remove(&legacy_key(course))?;
    Ok(removed)
}
