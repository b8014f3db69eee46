use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use reqwest::blocking::Client;

use crate::api::http::build_client;
use crate::config::ApiSettings;
use crate::error::{Result, SyncError};

use super::Downloader;

/// Streams files over HTTP into the download root.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    root: PathBuf,
}

impl HttpDownloader {
    pub fn new(settings: &ApiSettings, root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            root: root.into(),
        })
    }

    /// Join a relative path onto the root, refusing anything that would escape it.
    fn destination(&self, relative_path: &str) -> Result<PathBuf> {
        let rel = Path::new(relative_path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative_path.is_empty() {
            return Err(SyncError::Download {
                path: relative_path.to_string(),
                detail: "path escapes the download root".into(),
            });
        }
        Ok(self.root.join(rel))
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, relative_path: &str) -> Result<()> {
        let dest = self.destination(relative_path)?;
        let download_err = |detail: String| SyncError::Download {
            path: relative_path.to_string(),
            detail,
        };

        let mut res = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_err(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(download_err(format!("HTTP {status}")));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&dest)?;
        if let Err(e) = res.copy_to(&mut file) {
            drop(file);
            let _ = fs::remove_file(&dest);
            return Err(download_err(e.to_string()));
        }
        Ok(())
    }
}
