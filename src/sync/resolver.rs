use std::collections::{HashMap, HashSet};

use crate::api::CanvasApi;

/// Resolves folder IDs to `a/b/c/` paths by walking parent links.
///
/// Every successfully resolved folder is memoized for the lifetime of the
/// resolver, so siblings and descendants never re-walk a shared ancestor.
/// A folder that cannot be fetched resolves to `""` and is not cached.
pub struct FolderPathResolver<'a> {
    api: &'a dyn CanvasApi,
    cache: HashMap<u64, String>,
    lookups: usize,
}

impl<'a> FolderPathResolver<'a> {
    pub fn new(api: &'a dyn CanvasApi) -> Self {
        Self {
            api,
            cache: HashMap::new(),
            lookups: 0,
        }
    }

    /// Path of the folder with a trailing slash, or `""` for the course root.
    pub fn resolve(&mut self, folder_id: Option<u64>) -> String {
        let mut on_walk = HashSet::new();
        self.resolve_inner(folder_id, &mut on_walk)
    }

    fn resolve_inner(&mut self, folder_id: Option<u64>, on_walk: &mut HashSet<u64>) -> String {
        let Some(id) = folder_id else {
            return String::new();
        };
        if let Some(path) = self.cache.get(&id) {
            tracing::debug!("folder {id} cached as {path:?}");
            return path.clone();
        }
        if !on_walk.insert(id) {
            tracing::warn!("folder {id} is its own ancestor; truncating path");
            return String::new();
        }

        self.lookups += 1;
        let folder = match self.api.get_folder(id) {
            Ok(folder) => folder,
            Err(e) => {
                tracing::warn!("{e}; files in it are placed without a folder path");
                return String::new();
            }
        };

        let parent_path = self.resolve_inner(folder.parent_folder_id, on_walk);
        let path = format!("{parent_path}{}/", folder.name);
        self.cache.insert(id, path.clone());
        path
    }

    /// Remote folder lookups issued so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Number of memoized folders.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
