use serde::Deserialize;

/// One entry of the course file listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub id: u64,
    pub display_name: String,
    /// Containing folder; `None` for files at the course root.
    #[serde(default)]
    pub folder_id: Option<u64>,
    pub url: String,
}

/// Folder metadata as returned by the folder lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFolder {
    pub name: String,
    #[serde(default)]
    pub parent_folder_id: Option<u64>,
}
