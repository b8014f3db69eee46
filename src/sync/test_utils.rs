//! In-memory stand-ins for the remote API and the downloader.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local};

use crate::api::CanvasApi;
use crate::download::Downloader;
use crate::error::{Result, SyncError};
use crate::models::{CourseId, RemoteFile, RemoteFolder};

#[derive(Default)]
pub struct FakeApi {
    pub files: Vec<RemoteFile>,
    pub folders: HashMap<u64, RemoteFolder>,
    pub listing_fails: bool,
    pub folder_calls: RefCell<HashMap<u64, usize>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(mut self, id: u64, name: &str, parent: Option<u64>) -> Self {
        self.folders.insert(
            id,
            RemoteFolder {
                name: name.into(),
                parent_folder_id: parent,
            },
        );
        self
    }

    pub fn file(mut self, id: u64, name: &str, folder: Option<u64>) -> Self {
        self.files.push(RemoteFile {
            id,
            display_name: name.into(),
            folder_id: folder,
            url: format!("https://canvas.test/files/{id}/download"),
        });
        self
    }

    pub fn calls_for(&self, folder_id: u64) -> usize {
        self.folder_calls
            .borrow()
            .get(&folder_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_folder_calls(&self) -> usize {
        self.folder_calls.borrow().values().sum()
    }
}

impl CanvasApi for FakeApi {
    fn list_files(&self, _course: CourseId) -> Result<Vec<RemoteFile>> {
        if self.listing_fails {
            return Err(SyncError::Listing {
                detail: "HTTP 500 Internal Server Error".into(),
            });
        }
        Ok(self.files.clone())
    }

    fn get_folder(&self, folder_id: u64) -> Result<RemoteFolder> {
        *self.folder_calls.borrow_mut().entry(folder_id).or_default() += 1;
        self.folders
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| SyncError::Folder {
                folder_id,
                detail: "HTTP 404 Not Found".into(),
            })
    }
}

#[derive(Default)]
pub struct RecordingDownloader {
    pub failing_urls: HashSet<String>,
    pub dispatched: RefCell<Vec<(String, String)>>,
    /// When each download call began.
    pub started: RefCell<Vec<DateTime<Local>>>,
}

impl RecordingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, file_id: u64) -> Self {
        self.failing_urls
            .insert(format!("https://canvas.test/files/{file_id}/download"));
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.dispatched
            .borrow()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl Downloader for RecordingDownloader {
    fn download(&self, url: &str, relative_path: &str) -> Result<()> {
        self.started.borrow_mut().push(Local::now());
        self.dispatched
            .borrow_mut()
            .push((url.to_string(), relative_path.to_string()));
        if self.failing_urls.contains(url) {
            return Err(SyncError::Download {
                path: relative_path.to_string(),
                detail: "HTTP 403 Forbidden".into(),
            });
        }
        Ok(())
    }
}
