use std::path::{Path, PathBuf};

use serde::Serialize;

use super::PluginError;
use super::manifest::PluginManifest;
use super::marketplace::MarketplaceEntry;
use super::namespace;
use crate::config::LoaderConfig;
use crate::skills::{SkillDescriptor, SkillIndexLoader};

/// A plugin whose manifest and skill index both loaded.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPlugin {
    pub entry: MarketplaceEntry,
    pub manifest: PluginManifest,
    pub root_dir: PathBuf,
    pub skill: SkillDescriptor,
}

impl LoadedPlugin {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// `plugin-name:skill-name`.
    pub fn qualified_skill_name(&self) -> String {
        namespace::namespaced(self.name(), &self.skill.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PluginLoader {
    config: LoaderConfig,
}

impl PluginLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Loads the plugin a marketplace entry points at.
    pub fn load(&self, root: &Path, entry: &MarketplaceEntry) -> Result<LoadedPlugin, PluginError> {
        if namespace::is_namespaced(&entry.name) {
            return Err(PluginError::InvalidName {
                name: entry.name.clone(),
                reason: format!(
                    "must not contain namespace separator '{}'",
                    namespace::NAMESPACE_SEP
                ),
            });
        }

        let root_dir = entry.resolve(root);
        let manifest = PluginManifest::load(&root_dir)?;
        self.check_names(entry, &manifest);

        let skill = SkillIndexLoader::new(self.config.clone()).load(&root_dir)?;

        Ok(LoadedPlugin {
            entry: entry.clone(),
            manifest,
            root_dir,
            skill,
        })
    }

    fn check_names(&self, entry: &MarketplaceEntry, manifest: &PluginManifest) {
        if manifest.name != entry.name {
            tracing::warn!(
                plugin = %entry.name,
                manifest_name = %manifest.name,
                "Plugin manifest name differs from marketplace entry"
            );
        }
        if self.config.check_name_matches_dir
            && let Some(dir_name) = entry.dir_name()
            && dir_name != manifest.name
        {
            tracing::warn!(
                plugin = %manifest.name,
                dir = %dir_name,
                "Plugin manifest name differs from its directory name"
            );
        }
    }
}
