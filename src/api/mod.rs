//! Remote course-management API.

pub mod http;

use crate::error::Result;
use crate::models::{CourseId, RemoteFile, RemoteFolder};

pub use http::HttpCanvasApi;

/// The two remote lookups a sync needs.
pub trait CanvasApi {
    /// Flat listing of a course's files (single page).
    fn list_files(&self, course: CourseId) -> Result<Vec<RemoteFile>>;

    /// Metadata for one folder.
    fn get_folder(&self, folder_id: u64) -> Result<RemoteFolder>;
}
