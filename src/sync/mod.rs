//! Check a course for files not yet downloaded and fetch them.

pub mod resolver;
pub mod sanitize;

#[cfg(test)]
pub mod test_utils;

use chrono::Local;
use serde::Serialize;

use crate::api::CanvasApi;
use crate::download::Downloader;
use crate::error::Result;
use crate::models::{CourseId, FileRecord};
use crate::store::{load_records, save_records, KeyValueStore};

pub use resolver::FolderPathResolver;
pub use sanitize::{local_path, sanitize_path};

/// Per-run knobs.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Top-level local folder for the course.
    pub course_folder: String,
    /// Record files even when their download failed.
    pub record_failed_downloads: bool,
}

/// Everything one sync run needs. Created at sync start, consumed by [`run_sync`].
pub struct SyncContext<'a> {
    pub course: CourseId,
    pub api: &'a dyn CanvasApi,
    pub downloader: &'a dyn Downloader,
    pub store: &'a mut dyn KeyValueStore,
    pub options: SyncOptions,
}

/// A file handed to the downloader.
#[derive(Debug, Clone, Serialize)]
pub struct QueuedFile {
    pub id: u64,
    pub name: String,
    pub path: String,
}

/// A file whose download reported an error.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub error: String,
    /// Whether the file was recorded anyway (and so will not be retried).
    pub recorded: bool,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub course: CourseId,
    pub message: String,
    /// Files in the remote listing.
    pub listed: usize,
    /// Listed files skipped because they were already recorded.
    pub already_downloaded: usize,
    /// Files dispatched to the downloader.
    pub queued: usize,
    /// New records written.
    pub recorded: usize,
    /// Remote folder lookups performed.
    pub folder_lookups: usize,
    pub files: Vec<QueuedFile>,
    pub failed: Vec<FailedFile>,
}

/// Download every listed file whose ID is not in the course's record store.
///
/// A listing failure aborts before anything is written. Folder failures
/// only shorten the affected paths. Download failures are reported per
/// file; by default the file is still recorded. The store is persisted
/// once, after all downloads have been dispatched.
pub fn run_sync(ctx: SyncContext<'_>) -> Result<SyncReport> {
    let SyncContext {
        course,
        api,
        downloader,
        store,
        options,
    } = ctx;

    let mut records = load_records(&*store, course)?;
    let listing = api.list_files(course)?;
    let listed = listing.len();

    let new_files: Vec<_> = listing
        .into_iter()
        .filter(|f| !records.contains(f.id))
        .collect();

    let mut report = SyncReport {
        course,
        message: String::new(),
        listed,
        already_downloaded: listed - new_files.len(),
        queued: 0,
        recorded: 0,
        folder_lookups: 0,
        files: Vec::new(),
        failed: Vec::new(),
    };

    if new_files.is_empty() {
        report.message = "No new files found.".into();
        return Ok(report);
    }

    let mut resolver = FolderPathResolver::new(api);
    for file in new_files {
        let folder_path = resolver.resolve(file.folder_id);
        let path = local_path(&options.course_folder, &folder_path, &file.display_name);
        tracing::info!("downloading {path}");

        let queued_at = Local::now();
        let outcome = downloader.download(&file.url, &path);
        report.queued += 1;

        let record_it = match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to download {}: {e}", file.display_name);
                report.failed.push(FailedFile {
                    id: file.id,
                    name: file.display_name.clone(),
                    path: path.clone(),
                    error: e.to_string(),
                    recorded: options.record_failed_downloads,
                });
                options.record_failed_downloads
            }
        };

        if record_it
            && records.insert(FileRecord::new(file.id, &file.display_name, queued_at))
        {
            report.recorded += 1;
        }
        report.files.push(QueuedFile {
            id: file.id,
            name: file.display_name,
            path,
        });
    }

    save_records(store, course, &records)?;

    report.folder_lookups = resolver.lookups();
    report.message = format!("Queued {} new file(s) for download.", report.queued);
    Ok(report)
}
