//! Plugin manifests, the marketplace listing, and the repository catalog.
//!
//! # Directory Structure
//!
//! ```text
//! repo/
//! ├── .claude-plugin/
//! │   └── marketplace.json
//! └── blazor-skill/
//!     ├── .claude-plugin/
//!     │   └── plugin.json
//!     └── skills/
//!         └── blazor/
//!             ├── SKILL.md
//!             └── references/
//!                 └── 01-overview.md
//! ```
//!
//! Skills are exposed as `plugin-name:skill-name`.

mod catalog;
mod discovery;
mod error;
mod loader;
mod manifest;
mod marketplace;
pub mod namespace;

use std::path::Path;

pub use catalog::{PluginCatalog, PluginLoadFailure};
pub use discovery::PluginDiscovery;
pub use error::{ErrorKind, PluginError};
pub use loader::{LoadedPlugin, PluginLoader};
pub use manifest::{PluginAuthor, PluginManifest, PluginVersion};
pub use marketplace::{MarketplaceEntry, MarketplaceManifest, MarketplaceOwner};

/// Plugin entries of the marketplace manifest under `root`, in declaration order.
pub fn load_marketplace(root: &Path) -> Result<Vec<MarketplaceEntry>, PluginError> {
    MarketplaceManifest::load(root).map(|m| m.plugins)
}

/// The manifest of the plugin at `plugin_path`, with its version validated.
pub fn load_plugin(plugin_path: &Path) -> Result<PluginManifest, PluginError> {
    PluginManifest::load(plugin_path)
}
