//! Hands a remote URL and a local relative path to whatever performs the transfer.

pub mod http;

use crate::error::Result;

pub use http::HttpDownloader;

/// Transfers one remote resource to a path relative to the download root.
pub trait Downloader {
    fn download(&self, url: &str, relative_path: &str) -> Result<()>;
}
