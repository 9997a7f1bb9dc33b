use std::path::PathBuf;

/// Coarse classification of loader failures, for hosts that only care
/// whether a plugin is missing, malformed, or inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Validation,
    ReferentialIntegrity,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid manifest at {path}: {reason}")]
    ManifestParseError { path: PathBuf, reason: String },

    #[error("Duplicate plugin name '{name}' in {manifest}")]
    DuplicatePluginName { name: String, manifest: PathBuf },

    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid version '{version}' in {path}: expected MAJOR.MINOR.PATCH")]
    InvalidVersionFormat { version: String, path: PathBuf },

    #[error("No SKILL.md found under {path}")]
    SkillIndexNotFound { path: PathBuf },

    #[error("Expected exactly one SKILL.md under {path}, found {}", found.len())]
    MultipleSkillIndexes { path: PathBuf, found: Vec<PathBuf> },

    #[error("Invalid skill index at {path}: {reason}")]
    SkillIndexParseError { path: PathBuf, reason: String },

    #[error("Document reference mismatch in {index}: {detail}")]
    DocumentReferenceMismatch { index: PathBuf, detail: String },

    #[error("Duplicate sequence number {number:02}: {first} and {second}")]
    DuplicateSequenceNumber {
        number: u32,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Document numbering in {dir} is not contiguous: expected {expected:02}, found {found:02}")]
    SequenceGap {
        dir: PathBuf,
        expected: u32,
        found: u32,
    },

    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    #[error("Invalid document path '{path}': {reason}")]
    InvalidDocumentPath { path: String, reason: String },

    #[error("Failed to load resources for plugin '{plugin}': {message}")]
    ResourceLoad { plugin: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PluginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestNotFound { .. }
            | Self::SkillIndexNotFound { .. }
            | Self::DocumentNotFound { .. } => ErrorKind::NotFound,
            Self::ManifestParseError { .. } | Self::SkillIndexParseError { .. } => {
                ErrorKind::Parse
            }
            Self::DuplicatePluginName { .. }
            | Self::InvalidName { .. }
            | Self::InvalidVersionFormat { .. }
            | Self::MultipleSkillIndexes { .. }
            | Self::DuplicateSequenceNumber { .. }
            | Self::SequenceGap { .. }
            | Self::InvalidDocumentPath { .. } => ErrorKind::Validation,
            Self::DocumentReferenceMismatch { .. } => ErrorKind::ReferentialIntegrity,
            Self::ResourceLoad { .. } | Self::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
