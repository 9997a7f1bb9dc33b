mod directory;
mod frontmatter;
mod path;

pub use directory::{
    NumberedFile, SKILL_INDEX_FILE, is_markdown, is_skill_file, numbered_files,
    parse_numbered_name, title_from_slug,
};
pub use frontmatter::{FrontmatterError, ParsedDocument, parse_frontmatter};
pub(crate) use path::normalize_relative;

pub trait Named {
    fn name(&self) -> &str;
}
