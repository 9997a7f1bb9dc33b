//! Repository-wide plugin catalog.
//!
//! Loading never stops at a broken plugin: failures are kept next to the
//! plugins that did load so the host can report them and carry on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;

use super::PluginError;
use super::discovery::PluginDiscovery;
use super::loader::{LoadedPlugin, PluginLoader};
use super::marketplace::{MarketplaceEntry, MarketplaceManifest};
use super::namespace;
use crate::config::LoaderConfig;
use crate::skills::{DocumentRef, SkillDescriptor};

#[derive(Debug)]
pub struct PluginLoadFailure {
    pub plugin: String,
    pub path: PathBuf,
    pub error: PluginError,
}

#[derive(Debug)]
pub struct PluginCatalog {
    root: PathBuf,
    marketplace: MarketplaceManifest,
    plugins: Vec<LoadedPlugin>,
    failures: Vec<PluginLoadFailure>,
    unlisted: Vec<PathBuf>,
}

impl PluginCatalog {
    /// Loads every plugin listed in the marketplace manifest under `root`.
    ///
    /// Only a missing or invalid marketplace manifest is an error; per-plugin
    /// problems end up in [`PluginCatalog::failures`].
    pub async fn load(root: impl Into<PathBuf>, config: &LoaderConfig) -> crate::Result<Self> {
        config.validate()?;
        let root = root.into();

        let marketplace = {
            let root = root.clone();
            tokio::task::spawn_blocking(move || MarketplaceManifest::load(&root)).await??
        };

        let loader = Arc::new(PluginLoader::new(config.clone()));
        let tasks = marketplace.plugins.iter().cloned().map(|entry| {
            let loader = Arc::clone(&loader);
            let root = root.clone();
            async move {
                let name = entry.name.clone();
                let path = entry.resolve(&root);
                let result = tokio::task::spawn_blocking(move || loader.load(&root, &entry))
                    .await
                    .unwrap_or_else(|e| {
                        Err(PluginError::ResourceLoad {
                            plugin: name.clone(),
                            message: e.to_string(),
                        })
                    });
                (name, path, result)
            }
        });

        let mut plugins = Vec::new();
        let mut failures = Vec::new();
        for (plugin, path, result) in join_all(tasks).await {
            match result {
                Ok(loaded) => plugins.push(loaded),
                Err(error) => {
                    tracing::warn!(
                        plugin = %plugin,
                        path = %path.display(),
                        error = %error,
                        "Skipping plugin that failed to load"
                    );
                    failures.push(PluginLoadFailure {
                        plugin,
                        path,
                        error,
                    });
                }
            }
        }

        let unlisted = Self::find_unlisted(&root, &marketplace.plugins);

        tracing::info!(
            root = %root.display(),
            loaded = plugins.len(),
            failed = failures.len(),
            unlisted = unlisted.len(),
            "Plugin catalog loaded"
        );

        Ok(Self {
            root,
            marketplace,
            plugins,
            failures,
            unlisted,
        })
    }

    fn find_unlisted(root: &Path, entries: &[MarketplaceEntry]) -> Vec<PathBuf> {
        let listed: Vec<PathBuf> = entries
            .iter()
            .filter_map(|e| crate::common::normalize_relative(Path::new(&e.source)).ok())
            .map(|rel| root.join(rel))
            .collect();

        match PluginDiscovery::scan(root) {
            Ok(found) => found
                .into_iter()
                .filter(|dir| !listed.contains(dir))
                .inspect(|dir| {
                    tracing::warn!(
                        dir = %dir.display(),
                        "Plugin directory is not listed in the marketplace manifest"
                    );
                })
                .collect(),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unlisted plugin scan");
                Vec::new()
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marketplace(&self) -> &MarketplaceManifest {
        &self.marketplace
    }

    /// Loaded plugins in marketplace declaration order.
    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    pub fn plugin(&self, name: &str) -> Option<&LoadedPlugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugin(name).is_some()
    }

    pub fn failures(&self) -> &[PluginLoadFailure] {
        &self.failures
    }

    /// Plugin directories on disk that the marketplace does not list.
    pub fn unlisted(&self) -> &[PathBuf] {
        &self.unlisted
    }

    /// Looks up a skill by `plugin:skill` or by bare skill name.
    pub fn skill(&self, name: &str) -> Option<&SkillDescriptor> {
        match namespace::parse(name) {
            Some((plugin, skill)) => self
                .plugin(plugin)
                .map(|p| &p.skill)
                .filter(|s| s.name == skill),
            None => self
                .plugins
                .iter()
                .map(|p| &p.skill)
                .find(|s| s.name == name),
        }
    }

    /// Skills relevant to `context`, most relevant first.
    pub fn find_skills(&self, context: &str) -> Vec<&LoadedPlugin> {
        let mut scored: Vec<(usize, &LoadedPlugin)> = self
            .plugins
            .iter()
            .map(|p| (p.skill.relevance(context), p))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, p)| p).collect()
    }

    pub fn documents(&self, plugin: &str) -> Option<&[DocumentRef]> {
        self.plugin(plugin).map(|p| p.skill.document_refs.as_slice())
    }

    pub fn resolve_document(&self, plugin: &str, relative_path: &str) -> crate::Result<String> {
        let loaded = self
            .plugin(plugin)
            .ok_or_else(|| crate::Error::UnknownPlugin(plugin.to_string()))?;
        Ok(crate::skills::resolve_document(loaded.root_dir(), relative_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_plugin(root: &Path, name: &str, triggers: &[&str]) {
        let plugin_dir = root.join(name);
        std::fs::create_dir_all(plugin_dir.join(".claude-plugin")).unwrap();
        std::fs::write(
            plugin_dir.join(".claude-plugin/plugin.json"),
            format!(r#"{{"name":"{name}","description":"Test","version":"1.0.0"}}"#),
        )
        .unwrap();
        let skill_name = name.trim_end_matches("-skill");
        let refs = plugin_dir.join("skills").join(skill_name).join("references");
        std::fs::create_dir_all(&refs).unwrap();
        std::fs::write(refs.join("01-intro.md"), format!("{name} intro")).unwrap();
        let triggers_yaml: String = if triggers.is_empty() {
            String::new()
        } else {
            let items: String = triggers.iter().map(|t| format!("  - {t}\n")).collect();
            format!("triggers:\n{items}")
        };
        std::fs::write(
            plugin_dir.join("skills").join(skill_name).join("SKILL.md"),
            format!(
                "---\nname: {skill_name}\ndescription: {name} docs\n{triggers_yaml}---\nreferences/01-intro.md"
            ),
        )
        .unwrap();
    }

    fn write_marketplace(root: &Path, names: &[&str]) {
        let entries: Vec<String> = names
            .iter()
            .map(|n| format!(r#"{{"name":"{n}","source":"./{n}","description":"{n}"}}"#))
            .collect();
        std::fs::create_dir_all(root.join(".claude-plugin")).unwrap();
        std::fs::write(
            root.join(".claude-plugin/marketplace.json"),
            format!(r#"{{"plugins":[{}]}}"#, entries.join(",")),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let dir = tempdir().unwrap();
        create_plugin(dir.path(), "alpha-skill", &["alpha"]);
        create_plugin(dir.path(), "beta-skill", &["beta"]);
        write_marketplace(dir.path(), &["beta-skill", "alpha-skill"]);

        let catalog = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();

        assert_eq!(catalog.plugin_count(), 2);
        assert_eq!(catalog.plugins()[0].name(), "beta-skill");
        assert!(catalog.has_plugin("alpha-skill"));
        assert!(!catalog.has_plugin("gamma-skill"));
        assert!(catalog.failures().is_empty());
        assert!(catalog.unlisted().is_empty());
    }

    #[tokio::test]
    async fn test_broken_plugin_does_not_block_others() {
        let dir = tempdir().unwrap();
        create_plugin(dir.path(), "alpha-skill", &[]);
        std::fs::create_dir(dir.path().join("broken-skill")).unwrap();
        write_marketplace(dir.path(), &["alpha-skill", "broken-skill"]);

        let catalog = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();

        assert_eq!(catalog.plugin_count(), 1);
        assert_eq!(catalog.failures().len(), 1);
        let failure = &catalog.failures()[0];
        assert_eq!(failure.plugin, "broken-skill");
        assert!(matches!(failure.error, PluginError::ManifestNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_marketplace_is_fatal() {
        let dir = tempdir().unwrap();
        let err = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Plugin(PluginError::ManifestNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let config = LoaderConfig::default().skills_dir("../skills");
        let err = PluginCatalog::load(dir.path(), &config).await.unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[tokio::test]
    async fn test_unlisted_plugins_reported() {
        let dir = tempdir().unwrap();
        create_plugin(dir.path(), "alpha-skill", &[]);
        create_plugin(dir.path(), "stray-skill", &[]);
        write_marketplace(dir.path(), &["alpha-skill"]);

        let catalog = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(catalog.unlisted(), [dir.path().join("stray-skill")]);
    }

    #[tokio::test]
    async fn test_skill_lookup_and_search() {
        let dir = tempdir().unwrap();
        create_plugin(dir.path(), "alpha-skill", &["shared", "first"]);
        create_plugin(dir.path(), "beta-skill", &["shared"]);
        write_marketplace(dir.path(), &["alpha-skill", "beta-skill"]);

        let catalog = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();

        assert_eq!(catalog.skill("alpha").unwrap().name, "alpha");
        assert_eq!(catalog.skill("beta-skill:beta").unwrap().name, "beta");
        assert!(catalog.skill("beta-skill:alpha").is_none());
        assert!(catalog.skill("nope").is_none());

        let found = catalog.find_skills("a shared first question");
        let names: Vec<&str> = found.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["alpha-skill", "beta-skill"]);
        assert!(catalog.find_skills("unrelated").is_empty());
    }

    #[tokio::test]
    async fn test_resolve_document() {
        let dir = tempdir().unwrap();
        create_plugin(dir.path(), "alpha-skill", &[]);
        write_marketplace(dir.path(), &["alpha-skill"]);

        let catalog = PluginCatalog::load(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();

        let docs = catalog.documents("alpha-skill").unwrap();
        let path = docs[0].path.display().to_string();
        assert_eq!(
            catalog.resolve_document("alpha-skill", &path).unwrap(),
            "alpha-skill intro"
        );
        assert!(catalog.resolve_document("missing", &path).is_err());
    }
}
