//! Builds a `SkillDescriptor` from a plugin's `SKILL.md` and its numbered
//! documents.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::references::{BodyReference, extract_references};
use super::{DocumentRef, ReferenceIssue, SkillDescriptor};
use crate::common::{NumberedFile, is_skill_file, numbered_files, parse_frontmatter, title_from_slug};
use crate::config::{LoaderConfig, ReferencePolicy};
use crate::plugins::PluginError;

/// Frontmatter schema for `SKILL.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillFrontmatter {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillIndexLoader {
    config: LoaderConfig,
}

impl SkillIndexLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Finds the single `SKILL.md` of a plugin: either directly in the skills
    /// directory or one level below it.
    pub fn locate(&self, plugin_path: &Path) -> Result<PathBuf, PluginError> {
        let skills_root = plugin_path.join(&self.config.skills_dir);
        let mut found = Vec::new();

        if skills_root.is_dir() {
            for entry in std::fs::read_dir(&skills_root)? {
                let path = entry?.path();
                if path.is_file() && is_skill_file(&path) {
                    found.push(path);
                } else if path.is_dir() {
                    for inner in std::fs::read_dir(&path)? {
                        let inner = inner?.path();
                        if inner.is_file() && is_skill_file(&inner) {
                            found.push(inner);
                        }
                    }
                }
            }
        }

        found.sort();
        match found.len() {
            0 => Err(PluginError::SkillIndexNotFound { path: skills_root }),
            1 => Ok(found.remove(0)),
            _ => Err(PluginError::MultipleSkillIndexes {
                path: skills_root,
                found,
            }),
        }
    }

    pub fn load(&self, plugin_path: &Path) -> Result<SkillDescriptor, PluginError> {
        let skill_file = self.locate(plugin_path)?;
        let content = std::fs::read_to_string(&skill_file)?;
        self.parse(&content, plugin_path, &skill_file)
    }

    /// Parses index content that lives at `skill_file` inside `plugin_path`.
    pub fn parse(
        &self,
        content: &str,
        plugin_path: &Path,
        skill_file: &Path,
    ) -> Result<SkillDescriptor, PluginError> {
        let doc = parse_frontmatter::<SkillFrontmatter>(content).map_err(|e| {
            PluginError::SkillIndexParseError {
                path: skill_file.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let fm = doc.frontmatter;
        if fm.name.trim().is_empty() {
            return Err(PluginError::SkillIndexParseError {
                path: skill_file.to_path_buf(),
                reason: "name must not be empty".into(),
            });
        }

        let skill_dir = skill_file.parent().unwrap_or(plugin_path);
        let documents_dir = {
            let nested = skill_dir.join(&self.config.documents_dir);
            if nested.is_dir() { nested } else { skill_dir.to_path_buf() }
        };

        let files = ordered_documents(&documents_dir)?;
        let rel_skill_dir = relative_to(skill_dir, plugin_path);
        let body_refs = extract_references(&doc.body, &self.config.plugin_root_var, &rel_skill_dir);

        let disk: Vec<PathBuf> = files
            .iter()
            .map(|f| relative_to(&f.path, plugin_path))
            .collect();
        check_missing(&body_refs, &disk, plugin_path, skill_file)?;
        let issues = self.check_unreferenced(&body_refs, &disk, skill_file)?;

        let document_refs = files
            .iter()
            .zip(&disk)
            .map(|(file, rel)| DocumentRef {
                sequence_number: file.number,
                path: rel.clone(),
                title: matching_reference(&body_refs, rel)
                    .and_then(|r| r.title.clone())
                    .unwrap_or_else(|| title_from_slug(&file.slug)),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            skill = %fm.name,
            documents = document_refs.len(),
            issues = issues.len(),
            "Loaded skill index"
        );

        Ok(SkillDescriptor {
            name: fm.name,
            trigger_description: fm.description,
            triggers: fm.triggers,
            plugin_root: plugin_path.to_path_buf(),
            skill_file: relative_to(skill_file, plugin_path),
            documents_dir: relative_to(&documents_dir, plugin_path),
            document_refs,
            issues,
        })
    }

    fn check_unreferenced(
        &self,
        body_refs: &[BodyReference],
        disk: &[PathBuf],
        skill_file: &Path,
    ) -> Result<Vec<ReferenceIssue>, PluginError> {
        let unreferenced: Vec<&PathBuf> = disk
            .iter()
            .filter(|rel| matching_reference(body_refs, rel).is_none())
            .collect();

        if unreferenced.is_empty() {
            return Ok(Vec::new());
        }

        match self.config.reference_policy {
            ReferencePolicy::Deny => Err(PluginError::DocumentReferenceMismatch {
                index: skill_file.to_path_buf(),
                detail: format!("not referenced by the index: {}", join_paths(&unreferenced)),
            }),
            ReferencePolicy::Warn => Ok(unreferenced
                .into_iter()
                .map(|path| {
                    tracing::warn!(
                        index = %skill_file.display(),
                        document = %path.display(),
                        "Document is not referenced by SKILL.md"
                    );
                    ReferenceIssue::Unreferenced { path: path.clone() }
                })
                .collect()),
        }
    }
}

/// Numbered documents sorted by sequence number, rejecting repeats and gaps.
fn ordered_documents(dir: &Path) -> Result<Vec<NumberedFile>, PluginError> {
    let mut files = numbered_files(dir)?;
    files.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));

    for pair in files.windows(2) {
        if pair[0].number == pair[1].number {
            return Err(PluginError::DuplicateSequenceNumber {
                number: pair[0].number,
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
            });
        }
    }

    for (expected, file) in (1u32..).zip(&files) {
        if file.number != expected {
            return Err(PluginError::SequenceGap {
                dir: dir.to_path_buf(),
                expected,
                found: file.number,
            });
        }
    }

    Ok(files)
}

/// A reference matches a document by resolved path. A bare file name with
/// no directory part also matches a document of that name in the documents
/// directory.
fn matching_reference<'a>(refs: &'a [BodyReference], rel: &Path) -> Option<&'a BodyReference> {
    let file_name = rel.file_name().and_then(|n| n.to_str());
    refs.iter()
        .find(|r| r.resolved.as_deref() == Some(rel))
        .or_else(|| {
            refs.iter()
                .find(|r| r.is_bare() && file_name.is_some() && r.file_name() == file_name)
        })
}

fn check_missing(
    body_refs: &[BodyReference],
    disk: &[PathBuf],
    plugin_path: &Path,
    skill_file: &Path,
) -> Result<(), PluginError> {
    let disk_names: HashSet<&str> = disk
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();

    let missing: Vec<&str> = body_refs
        .iter()
        .filter(|r| {
            let on_disk = r
                .resolved
                .as_ref()
                .is_some_and(|p| plugin_path.join(p).is_file());
            let by_name =
                r.is_bare() && r.file_name().is_some_and(|n| disk_names.contains(n));
            !on_disk && !by_name
        })
        .map(|r| r.raw.as_str())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PluginError::DocumentReferenceMismatch {
            index: skill_file.to_path_buf(),
            detail: format!("referenced but missing on disk: {}", missing.join(", ")),
        })
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn join_paths(paths: &[&PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
