//! Prelude module for convenient imports.
//!
//! ```rust
//! use skill_catalog::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

pub use crate::common::Named;
pub use crate::config::{LoaderConfig, ReferencePolicy};
pub use crate::plugins::{
    LoadedPlugin, MarketplaceEntry, PluginCatalog, PluginError, PluginManifest,
    load_marketplace, load_plugin,
};
pub use crate::skills::{
    DocumentRef, ReferenceIssue, SkillDescriptor, load_skill_index, resolve_document,
};
