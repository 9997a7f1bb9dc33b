use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path that must stay inside its base directory.
///
/// Returns the reason on rejection: absolute paths and `..` segments that
/// climb above the base.
pub(crate) fn normalize_relative(relative: &Path) -> Result<PathBuf, &'static str> {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;

    for component in relative.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return Err("path must be relative"),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err("path escapes the plugin directory");
                }
                normalized.pop();
                depth -= 1;
            }
            Component::Normal(name) => {
                normalized.push(name);
                depth += 1;
            }
        }
    }

    if depth == 0 {
        return Err("path is empty");
    }
    Ok(normalized)
}
