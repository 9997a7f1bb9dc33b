use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

pub const SKILL_INDEX_FILE: &str = "SKILL.md";

fn numbered_doc_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2,})-([^/\\]+)\.md$").expect("valid numbered doc regex"))
}

/// A file following the `NN-title.md` naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedFile {
    pub number: u32,
    pub slug: String,
    pub path: PathBuf,
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

pub fn is_skill_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(SKILL_INDEX_FILE))
}

/// Splits `NN-slug.md` into its sequence number and slug.
pub fn parse_numbered_name(file_name: &str) -> Option<(u32, &str)> {
    let caps = numbered_doc_regex().captures(file_name)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some((number, caps.get(2)?.as_str()))
}

/// `render-modes` -> `Render Modes`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered markdown files directly inside `dir`, in directory order.
pub fn numbered_files(dir: &Path) -> std::io::Result<Vec<NumberedFile>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some((number, slug)) = parse_numbered_name(name) {
            files.push(NumberedFile {
                number,
                slug: slug.to_string(),
                path: path.clone(),
            });
        }
    }

    Ok(files)
}
