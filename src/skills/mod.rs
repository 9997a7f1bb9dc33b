//! Skill indexes (`SKILL.md`) and their numbered reference documents.
//!
//! ```text
//! skills/
//! └── blazor/
//!     ├── SKILL.md
//!     └── references/
//!         ├── 01-overview.md
//!         └── 02-render-modes.md
//! ```

mod document;
mod index;
mod index_loader;
pub mod references;

use std::path::Path;

pub use document::{resolve_document, resolve_document_bytes};
pub use index::{DocumentRef, ReferenceIssue, SkillDescriptor};
pub use index_loader::{SkillFrontmatter, SkillIndexLoader};

use crate::config::LoaderConfig;
use crate::plugins::PluginError;

/// Loads the skill index of the plugin at `plugin_path` with default settings.
pub fn load_skill_index(plugin_path: &Path) -> Result<SkillDescriptor, PluginError> {
    load_skill_index_with(plugin_path, &LoaderConfig::default())
}

pub fn load_skill_index_with(
    plugin_path: &Path,
    config: &LoaderConfig,
) -> Result<SkillDescriptor, PluginError> {
    SkillIndexLoader::new(config.clone()).load(plugin_path)
}
