use std::path::{Path, PathBuf};

use crate::common::normalize_relative;
use crate::plugins::PluginError;

/// Returns a plugin document exactly as stored on disk.
///
/// `relative_doc_path` is resolved against the plugin directory and may not
/// leave it. The document must be UTF-8; a non-UTF-8 file fails with
/// `PluginError::Io` of kind `InvalidData`. Use [`resolve_document_bytes`]
/// for arbitrary content.
pub fn resolve_document(plugin_path: &Path, relative_doc_path: &str) -> Result<String, PluginError> {
    read_document(plugin_path, Path::new(relative_doc_path))
}

/// Like [`resolve_document`], but returns the raw bytes.
pub fn resolve_document_bytes(
    plugin_path: &Path,
    relative_doc_path: &str,
) -> Result<Vec<u8>, PluginError> {
    let full_path = document_path(plugin_path, Path::new(relative_doc_path))?;
    Ok(std::fs::read(&full_path)?)
}

pub(crate) fn read_document(plugin_root: &Path, relative: &Path) -> Result<String, PluginError> {
    let full_path = document_path(plugin_root, relative)?;
    Ok(std::fs::read_to_string(&full_path)?)
}

fn document_path(plugin_root: &Path, relative: &Path) -> Result<PathBuf, PluginError> {
    let normalized =
        normalize_relative(relative).map_err(|reason| PluginError::InvalidDocumentPath {
            path: relative.display().to_string(),
            reason: reason.to_string(),
        })?;

    let full_path = plugin_root.join(normalized);
    if !full_path.is_file() {
        return Err(PluginError::DocumentNotFound { path: full_path });
    }

    tracing::debug!(path = %full_path.display(), "Reading document");
    Ok(full_path)
}
