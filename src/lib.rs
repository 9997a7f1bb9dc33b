//! # skill-catalog
//!
//! Loader for documentation-only agent plugins ("skills").
//!
//! A repository lists its plugins in `.claude-plugin/marketplace.json`. Each
//! plugin carries a `plugin.json` manifest and a single `SKILL.md` index whose
//! prose references numbered documents (`01-overview.md`, `02-...`). This
//! crate validates that layout and hands a host the resulting catalog.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skill_catalog::{LoaderConfig, PluginCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), skill_catalog::Error> {
//!     let catalog = PluginCatalog::load("./skills-repo", &LoaderConfig::from_env()?).await?;
//!
//!     for failure in catalog.failures() {
//!         eprintln!("skipped {}: {}", failure.plugin, failure.error);
//!     }
//!     for plugin in catalog.find_skills("Which render mode should this page use?") {
//!         println!("{} -> {}", plugin.qualified_skill_name(), plugin.skill.trigger_description);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Single operations
//!
//! ```rust,no_run
//! use std::path::Path;
//! use skill_catalog::{load_marketplace, load_plugin, load_skill_index, resolve_document};
//!
//! # fn main() -> Result<(), skill_catalog::PluginError> {
//! let root = Path::new("./skills-repo");
//! for entry in load_marketplace(root)? {
//!     let plugin_dir = entry.resolve(root);
//!     let manifest = load_plugin(&plugin_dir)?;
//!     let skill = load_skill_index(&plugin_dir)?;
//!     let first = &skill.document_refs[0];
//!     let text = resolve_document(&plugin_dir, &first.path.to_string_lossy())?;
//!     println!("{} {}: {} ({} bytes)", manifest.name, manifest.version, first.title, text.len());
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod plugins;
pub mod prelude;
pub mod skills;

pub use config::{LoaderConfig, ReferencePolicy};
pub use plugins::{
    ErrorKind, LoadedPlugin, MarketplaceEntry, MarketplaceManifest, PluginCatalog, PluginError,
    PluginLoadFailure, PluginManifest, PluginVersion, load_marketplace, load_plugin,
};
pub use skills::{
    DocumentRef, ReferenceIssue, SkillDescriptor, SkillIndexLoader, load_skill_index,
    load_skill_index_with, resolve_document, resolve_document_bytes,
};

/// Error type for skill-catalog operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A manifest, skill index, or document failed to load.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Invalid loader configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No loaded plugin has this name.
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    /// A blocking load task panicked or was cancelled.
    #[error("Loader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A file the layout requires is absent
    NotFound,
    /// Structured data could not be parsed
    Parse,
    /// Duplicate names, bad versions, broken numbering, invalid settings
    Validation,
    /// `SKILL.md` and the documents on disk disagree
    ReferentialIntegrity,
    /// IO failures and panicked loader tasks
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Plugin(err) => match err.kind() {
                ErrorKind::NotFound => ErrorCategory::NotFound,
                ErrorKind::Parse => ErrorCategory::Parse,
                ErrorKind::Validation => ErrorCategory::Validation,
                ErrorKind::ReferentialIntegrity => ErrorCategory::ReferentialIntegrity,
                ErrorKind::Io => ErrorCategory::Internal,
            },
            Error::UnknownPlugin(_) => ErrorCategory::NotFound,
            Error::Config(_) => ErrorCategory::Validation,
            Error::Task(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type alias for skill-catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
