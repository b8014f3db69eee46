use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load file list: {detail}")]
    Listing { detail: String },

    #[error("failed to fetch folder {folder_id}: {detail}")]
    Folder { folder_id: u64, detail: String },

    #[error("download failed for {path}: {detail}")]
    Download { path: String, detail: String },

    #[error("invalid course: {input}")]
    InvalidCourse { input: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("cancelled: confirmation declined")]
    NotConfirmed,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
