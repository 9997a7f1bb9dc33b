use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PluginError;

pub(crate) const PLUGIN_CONFIG_DIR: &str = ".claude-plugin";
pub(crate) const PLUGIN_MANIFEST_FILE: &str = "plugin.json";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$")
            .expect("valid version regex")
    })
}

/// `MAJOR.MINOR.PATCH`, ignoring any pre-release or build suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FromStr for PluginVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = version_regex().captures(s.trim()).ok_or(())?;
        let part = |i: usize| -> Result<u64, ()> {
            caps.get(i)
                .ok_or(())?
                .as_str()
                .parse::<u64>()
                .map_err(|_| ())
        };
        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PluginAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl PluginManifest {
    /// Location of the manifest for a plugin directory.
    ///
    /// `.claude-plugin/plugin.json` wins over a bare `plugin.json`.
    pub fn locate(root_dir: &Path) -> Option<PathBuf> {
        [
            root_dir.join(PLUGIN_CONFIG_DIR).join(PLUGIN_MANIFEST_FILE),
            root_dir.join(PLUGIN_MANIFEST_FILE),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    pub fn load(root_dir: &Path) -> Result<Self, PluginError> {
        let manifest_path =
            Self::locate(root_dir).ok_or_else(|| PluginError::ManifestNotFound {
                path: root_dir.join(PLUGIN_CONFIG_DIR).join(PLUGIN_MANIFEST_FILE),
            })?;
        let content = std::fs::read_to_string(&manifest_path)?;
        Self::parse(&content, &manifest_path)
    }

    pub fn parse(content: &str, manifest_path: &Path) -> Result<Self, PluginError> {
        let manifest: Self =
            serde_json::from_str(content).map_err(|e| PluginError::ManifestParseError {
                path: manifest_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if manifest.name.trim().is_empty() {
            return Err(PluginError::InvalidName {
                name: manifest.name,
                reason: "must not be empty".into(),
            });
        }

        if manifest.parsed_version().is_none() {
            return Err(PluginError::InvalidVersionFormat {
                version: manifest.version,
                path: manifest_path.to_path_buf(),
            });
        }

        Ok(manifest)
    }

    pub fn parsed_version(&self) -> Option<PluginVersion> {
        self.version.parse().ok()
    }
}
