//! Loader configuration.
//!
//! ```rust
//! use skill_catalog::config::{LoaderConfig, ReferencePolicy};
//!
//! let config = LoaderConfig::default()
//!     .reference_policy(ReferencePolicy::Deny)
//!     .documents_dir("docs");
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "SKILL_CATALOG_";

pub const DEFAULT_SKILLS_DIR: &str = "skills";
pub const DEFAULT_DOCUMENTS_DIR: &str = "references";
pub const DEFAULT_PLUGIN_ROOT_VAR: &str = "${CLAUDE_PLUGIN_ROOT}";

/// How documents present on disk but absent from `SKILL.md` are treated.
///
/// References to documents that do not exist are always an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Record a `ReferenceIssue` and log a warning.
    #[default]
    Warn,
    /// Fail with `DocumentReferenceMismatch`.
    Deny,
}

impl std::str::FromStr for ReferencePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" | "warning" => Ok(Self::Warn),
            "deny" | "error" => Ok(Self::Deny),
            other => Err(crate::Error::Config(format!(
                "Unknown reference policy '{other}' (expected 'warn' or 'deny')"
            ))),
        }
    }
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub reference_policy: ReferencePolicy,
    /// Directory under a plugin root holding skill folders.
    pub skills_dir: String,
    /// Directory under a skill folder holding numbered documents.
    pub documents_dir: String,
    /// Placeholder for the plugin root used inside `SKILL.md` prose.
    pub plugin_root_var: String,
    /// Warn when a manifest name differs from its directory name.
    pub check_name_matches_dir: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            reference_policy: ReferencePolicy::default(),
            skills_dir: DEFAULT_SKILLS_DIR.to_string(),
            documents_dir: DEFAULT_DOCUMENTS_DIR.to_string(),
            plugin_root_var: DEFAULT_PLUGIN_ROOT_VAR.to_string(),
            check_name_matches_dir: true,
        }
    }
}

impl LoaderConfig {
    /// Defaults overridden by `SKILL_CATALOG_*` environment variables.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Self::default();
        if let Some(policy) = lookup("REFERENCE_POLICY") {
            config.reference_policy = policy.parse()?;
        }
        if let Some(dir) = lookup("SKILLS_DIR") {
            config.skills_dir = dir;
        }
        if let Some(dir) = lookup("DOCUMENTS_DIR") {
            config.documents_dir = dir;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    pub fn skills_dir(mut self, dir: impl Into<String>) -> Self {
        self.skills_dir = dir.into();
        self
    }

    pub fn documents_dir(mut self, dir: impl Into<String>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    pub fn plugin_root_var(mut self, var: impl Into<String>) -> Self {
        self.plugin_root_var = var.into();
        self
    }

    pub fn check_name_matches_dir(mut self, check: bool) -> Self {
        self.check_name_matches_dir = check;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        validate_dir_name("skills_dir", &self.skills_dir)?;
        validate_dir_name("documents_dir", &self.documents_dir)?;
        if self.plugin_root_var.trim().is_empty() {
            return Err(crate::Error::Config(
                "plugin_root_var must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_dir_name(field: &str, value: &str) -> crate::Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(crate::Error::Config(format!(
            "{field} must be a single directory name, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.reference_policy, ReferencePolicy::Warn);
        assert_eq!(config.skills_dir, "skills");
        assert_eq!(config.documents_dir, "references");
        assert_eq!(config.plugin_root_var, "${CLAUDE_PLUGIN_ROOT}");
        assert!(config.check_name_matches_dir);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("warn".parse::<ReferencePolicy>().unwrap(), ReferencePolicy::Warn);
        assert_eq!("DENY".parse::<ReferencePolicy>().unwrap(), ReferencePolicy::Deny);
        assert_eq!(" error ".parse::<ReferencePolicy>().unwrap(), ReferencePolicy::Deny);
        assert!("strict".parse::<ReferencePolicy>().is_err());
        assert_eq!(ReferencePolicy::Deny.to_string(), "deny");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = LoaderConfig::from_lookup(lookup_from(&[
            ("REFERENCE_POLICY", "deny"),
            ("DOCUMENTS_DIR", "docs"),
        ]))
        .unwrap();
        assert_eq!(config.reference_policy, ReferencePolicy::Deny);
        assert_eq!(config.documents_dir, "docs");
        assert_eq!(config.skills_dir, "skills");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(LoaderConfig::from_lookup(lookup_from(&[("REFERENCE_POLICY", "loud")])).is_err());
        assert!(LoaderConfig::from_lookup(lookup_from(&[("SKILLS_DIR", "../up")])).is_err());
    }

    #[test]
    fn test_validate_rejects_paths() {
        assert!(LoaderConfig::default().documents_dir("").validate().is_err());
        assert!(LoaderConfig::default().documents_dir("a/b").validate().is_err());
        assert!(LoaderConfig::default().skills_dir("/abs").validate().is_err());
        assert!(LoaderConfig::default().plugin_root_var(" ").validate().is_err());
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{"reference_policy":"deny"}"#).unwrap();
        assert_eq!(config.reference_policy, ReferencePolicy::Deny);
        assert_eq!(config.documents_dir, "references");
    }
}
