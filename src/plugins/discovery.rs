use std::path::{Path, PathBuf};

use super::PluginError;
use super::manifest::PluginManifest;

/// Finds plugin directories on disk, independent of the marketplace listing.
pub struct PluginDiscovery;

impl PluginDiscovery {
    /// Immediate children of `root` that carry a plugin manifest, sorted.
    pub fn scan(root: &Path) -> Result<Vec<PathBuf>, PluginError> {
        let mut found = Vec::new();
        if !root.is_dir() {
            return Ok(found);
        }

        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() && Self::is_plugin_root(&path) {
                found.push(path);
            }
        }

        found.sort();
        Ok(found)
    }

    pub fn is_plugin_root(dir: &Path) -> bool {
        PluginManifest::locate(dir).is_some()
    }
}
