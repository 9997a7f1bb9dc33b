//! Skill descriptor: the metadata an agent sees before reading any document.
//!
//! A descriptor carries the trigger description and the ordered list of
//! reference documents. Document bodies stay on disk until requested.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::document;
use crate::common::Named;
use crate::plugins::PluginError;

/// A numbered reference document belonging to a skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Position in the recommended reading order, starting at 1.
    pub sequence_number: u32,
    /// Path relative to the plugin root.
    pub path: PathBuf,
    pub title: String,
}

impl DocumentRef {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Reads the document verbatim.
    pub fn load(&self, plugin_root: &Path) -> Result<String, PluginError> {
        document::read_document(plugin_root, &self.path)
    }
}

/// Advisory mismatch between `SKILL.md` and the documents on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceIssue {
    /// A numbered document exists but the index never mentions it.
    Unreferenced { path: PathBuf },
}

impl std::fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreferenced { path } => {
                write!(f, "{} is not referenced by SKILL.md", path.display())
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillDescriptor {
    pub name: String,

    /// Free text the agent uses to decide whether the skill applies.
    pub trigger_description: String,

    /// Optional keywords for fast matching.
    #[serde(default)]
    pub triggers: Vec<String>,

    pub plugin_root: PathBuf,

    /// `SKILL.md`, relative to the plugin root.
    pub skill_file: PathBuf,

    /// Directory scanned for numbered documents, relative to the plugin root.
    pub documents_dir: PathBuf,

    pub document_refs: Vec<DocumentRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ReferenceIssue>,
}

impl SkillDescriptor {
    pub fn document(&self, sequence_number: u32) -> Option<&DocumentRef> {
        self.document_refs
            .iter()
            .find(|d| d.sequence_number == sequence_number)
    }

    pub fn document_by_name(&self, file_name: &str) -> Option<&DocumentRef> {
        self.document_refs
            .iter()
            .find(|d| d.file_name() == Some(file_name))
    }

    pub fn load_document(&self, sequence_number: u32) -> Result<String, PluginError> {
        let doc = self
            .document(sequence_number)
            .ok_or_else(|| PluginError::DocumentNotFound {
                path: self.documents_dir.join(format!("{sequence_number:02}-*.md")),
            })?;
        doc.load(&self.plugin_root)
    }

    pub fn load_skill_file(&self) -> Result<String, PluginError> {
        document::read_document(&self.plugin_root, &self.skill_file)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Check if input matches any trigger keyword.
    pub fn matches_triggers(&self, input: &str) -> bool {
        self.relevance(input) > 0
    }

    /// Number of trigger keywords found in `input`, plus one if the skill
    /// name itself appears. Zero means the skill does not apply.
    pub fn relevance(&self, input: &str) -> usize {
        let input_lower = input.to_lowercase();
        let trigger_hits = self
            .triggers
            .iter()
            .filter(|t| !t.trim().is_empty())
            .filter(|t| input_lower.contains(&t.to_lowercase()))
            .count();
        let name_hit = usize::from(input_lower.contains(&self.name.to_lowercase()));
        trigger_hits + name_hit
    }
}

impl Named for SkillDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}
