//! Extraction of document references from `SKILL.md` prose.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::common::{normalize_relative, parse_numbered_name};

fn doc_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[^\s()\[\]<>"'`,;|]*\d{2,}-[^\s()\[\]<>"'`,;|/\\]+\.md"#)
            .expect("valid document path regex")
    })
}

fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(\s*([^)\s]+)\s*\)").expect("valid markdown link regex"))
}

/// A numbered document mentioned in the index body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyReference {
    /// The path as written.
    pub raw: String,
    /// Path relative to the plugin root, `None` when it climbs outside it.
    pub resolved: Option<PathBuf>,
    /// Link text when the reference was written as a Markdown link.
    pub title: Option<String>,
}

impl BodyReference {
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.raw).file_name().and_then(|n| n.to_str())
    }

    /// Written as a file name alone, with no directory part.
    pub fn is_bare(&self) -> bool {
        Path::new(&self.raw)
            .parent()
            .is_some_and(|p| p.as_os_str().is_empty())
    }
}

/// Collects numbered-document references from `body`, deduplicated in order
/// of first appearance.
///
/// Paths starting with `plugin_root_var` resolve against the plugin root;
/// other paths resolve against `skill_dir` (itself relative to the plugin
/// root).
pub fn extract_references(body: &str, plugin_root_var: &str, skill_dir: &Path) -> Vec<BodyReference> {
    let mut titles: HashMap<&str, String> = HashMap::new();
    for caps in markdown_link_regex().captures_iter(body) {
        if let (Some(text), Some(target)) = (caps.get(1), caps.get(2)) {
            let text = text.as_str().trim().trim_matches('`').trim();
            let target = target.as_str();
            let target = target.split(['#', '?']).next().unwrap_or(target);
            if !text.is_empty() {
                titles.entry(target).or_insert_with(|| text.to_string());
            }
        }
    }

    let mut refs: Vec<BodyReference> = Vec::new();
    for m in doc_path_regex().find_iter(body) {
        let raw = m.as_str();
        if is_url(raw) {
            continue;
        }
        let Some(file_name) = Path::new(raw).file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if parse_numbered_name(file_name).is_none() {
            continue;
        }

        let resolved = resolve(raw, plugin_root_var, skill_dir);
        let title = titles.get(raw).cloned();

        let existing = refs.iter_mut().find(|r| match (&r.resolved, &resolved) {
            (Some(a), Some(b)) => a == b,
            (None, None) => r.raw == raw,
            _ => false,
        });
        match existing {
            Some(existing) => {
                if existing.title.is_none() {
                    existing.title = title;
                }
            }
            None => refs.push(BodyReference {
                raw: raw.to_string(),
                resolved,
                title,
            }),
        }
    }

    refs
}

fn is_url(raw: &str) -> bool {
    raw.contains("://")
}

fn resolve(raw: &str, plugin_root_var: &str, skill_dir: &Path) -> Option<PathBuf> {
    let joined = match raw.strip_prefix(plugin_root_var) {
        Some(rest) => PathBuf::from(rest.trim_start_matches(['/', '\\'])),
        None => skill_dir.join(raw),
    };
    normalize_relative(&joined).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAR: &str = "${CLAUDE_PLUGIN_ROOT}";

    #[test]
    fn test_extract_plain_and_placeholder_paths() {
        let body = "Read `references/01-overview.md` first.\n\
                    Then ${CLAUDE_PLUGIN_ROOT}/skills/blazor/references/02-render-modes.md.";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].raw, "references/01-overview.md");
        assert_eq!(
            refs[0].resolved,
            Some(PathBuf::from("skills/blazor/references/01-overview.md"))
        );
        assert_eq!(
            refs[1].resolved,
            Some(PathBuf::from("skills/blazor/references/02-render-modes.md"))
        );
        assert_eq!(refs[1].file_name(), Some("02-render-modes.md"));
    }

    #[test]
    fn test_extract_markdown_link_titles() {
        let body = "| # | Doc |\n|---|---|\n| 1 | [Getting Started](references/01-getting-started.md) |\n\
                    See also references/01-getting-started.md again.";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].title.as_deref(), Some("Getting Started"));
    }

    #[test]
    fn test_same_file_via_different_spellings_is_deduplicated() {
        let body = "references/03-forms.md and ${CLAUDE_PLUGIN_ROOT}/skills/blazor/references/03-forms.md";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_ignores_unnumbered_markdown() {
        let body = "See README.md, CONTRIBUTING.md and v2-notes.md.";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));
        assert!(refs.is_empty());
    }

    #[test]
    fn test_skips_urls() {
        let body = "references/01-overview.md and upstream \
                    https://github.com/org/repo/blob/main/docs/05-upstream.md \
                    or [mirror](http://example.com/02-mirror.md)";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].raw, "references/01-overview.md");
    }

    #[test]
    fn test_link_title_with_fragment_or_query() {
        let body = "[Getting Started](references/01-overview.md#intro) and \
                    [Render Modes Guide](references/02-render-modes.md?plain=1)";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].title.as_deref(), Some("Getting Started"));
        assert_eq!(refs[1].title.as_deref(), Some("Render Modes Guide"));
    }

    #[test]
    fn test_is_bare() {
        let refs = extract_references(
            "01-overview.md and references/02-setup.md",
            VAR,
            Path::new("skills/blazor"),
        );
        assert!(refs[0].is_bare());
        assert!(!refs[1].is_bare());
    }

    #[test]
    fn test_escaping_reference_has_no_resolution() {
        let body = "Bad: ../../../01-escape.md";
        let refs = extract_references(body, VAR, Path::new("skills/blazor"));
        assert_eq!(refs.len(), 1);
        assert!(refs[0].resolved.is_none());
    }
}
