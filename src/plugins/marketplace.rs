use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PluginError;
use super::manifest::PLUGIN_CONFIG_DIR;
use crate::common::normalize_relative;

pub(crate) const MARKETPLACE_FILE: &str = "marketplace.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceOwner {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceEntry {
    pub name: String,
    /// Plugin directory relative to the repository root.
    #[serde(alias = "path")]
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MarketplaceEntry {
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.source)
    }

    /// Name of the directory the entry points at, if any.
    pub fn dir_name(&self) -> Option<&str> {
        Path::new(&self.source)
            .file_name()
            .and_then(|n| n.to_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<MarketplaceOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub plugins: Vec<MarketplaceEntry>,
}

impl MarketplaceManifest {
    pub fn path(root: &Path) -> PathBuf {
        root.join(PLUGIN_CONFIG_DIR).join(MARKETPLACE_FILE)
    }

    pub fn load(root: &Path) -> Result<Self, PluginError> {
        let manifest_path = Self::path(root);
        if !manifest_path.is_file() {
            return Err(PluginError::ManifestNotFound {
                path: manifest_path,
            });
        }
        let content = std::fs::read_to_string(&manifest_path)?;
        Self::parse(&content, &manifest_path)
    }

    pub fn parse(content: &str, manifest_path: &Path) -> Result<Self, PluginError> {
        let manifest: Self =
            serde_json::from_str(content).map_err(|e| PluginError::ManifestParseError {
                path: manifest_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        for entry in &manifest.plugins {
            if !seen.insert(entry.name.as_str()) {
                return Err(PluginError::DuplicatePluginName {
                    name: entry.name.clone(),
                    manifest: manifest_path.to_path_buf(),
                });
            }
            if let Err(reason) = normalize_relative(Path::new(&entry.source)) {
                return Err(PluginError::ManifestParseError {
                    path: manifest_path.to_path_buf(),
                    reason: format!("plugin '{}' source '{}': {reason}", entry.name, entry.source),
                });
            }
        }

        tracing::debug!(
            path = %manifest_path.display(),
            plugins = manifest.plugins.len(),
            "Loaded marketplace manifest"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_marketplace(root: &Path, body: &str) {
        let config_dir = root.join(PLUGIN_CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(MARKETPLACE_FILE), body).unwrap();
    }

    #[test]
    fn test_load_preserves_declaration_order() {
        let dir = tempdir().unwrap();
        write_marketplace(
            dir.path(),
            r#"{
                "name": "dotnet-skills",
                "owner": {"name": "Docs Team"},
                "plugins": [
                    {"name": "observability-skill", "source": "./observability-skill", "description": "OTel"},
                    {"name": "blazor-skill", "source": "./blazor-skill", "description": "Blazor"},
                    {"name": "elasticsearch-skill", "path": "elasticsearch-skill", "description": "ES"}
                ]
            }"#,
        );

        let manifest = MarketplaceManifest::load(dir.path()).unwrap();
        let names: Vec<&str> = manifest.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["observability-skill", "blazor-skill", "elasticsearch-skill"]
        );
        assert_eq!(manifest.plugins[2].source, "elasticsearch-skill");
        assert_eq!(manifest.owner.unwrap().name, "Docs Team");
    }

    #[test]
    fn test_entry_resolve_and_dir_name() {
        let entry = MarketplaceEntry {
            name: "blazor-skill".into(),
            source: "./plugins/blazor-skill".into(),
            description: String::new(),
            version: None,
            category: None,
        };
        assert_eq!(
            entry.resolve(Path::new("/repo")),
            PathBuf::from("/repo/./plugins/blazor-skill")
        );
        assert_eq!(entry.dir_name(), Some("blazor-skill"));
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let err = MarketplaceManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempdir().unwrap();
        write_marketplace(dir.path(), r#"{"plugins": "nope"}"#);
        let err = MarketplaceManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::ManifestParseError { .. }));
    }

    #[test]
    fn test_duplicate_name() {
        let dir = tempdir().unwrap();
        write_marketplace(
            dir.path(),
            r#"{"plugins": [
                {"name": "same", "source": "./a"},
                {"name": "same", "source": "./b"}
            ]}"#,
        );
        let err = MarketplaceManifest::load(dir.path()).unwrap_err();
        assert!(
            matches!(err, PluginError::DuplicatePluginName { ref name, .. } if name == "same")
        );
    }

    #[test]
    fn test_source_escaping_root_rejected() {
        let dir = tempdir().unwrap();
        write_marketplace(
            dir.path(),
            r#"{"plugins": [{"name": "evil", "source": "../outside"}]}"#,
        );
        let err = MarketplaceManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::ManifestParseError { ref reason, .. } if reason.contains("evil")));
    }
}
