use serde::de::DeserializeOwned;

const DELIMITER: &str = "---";

#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Document must have YAML frontmatter (starting with ---)")]
    Missing,

    #[error("Frontmatter not properly terminated with ---")]
    Unterminated,

    #[error("Failed to parse frontmatter: {0}")]
    Yaml(String),
}

pub struct ParsedDocument<F> {
    pub frontmatter: F,
    pub body: String,
}

pub fn parse_frontmatter<F: DeserializeOwned>(
    content: &str,
) -> Result<ParsedDocument<F>, FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(after_first) = content.strip_prefix(DELIMITER) else {
        return Err(FrontmatterError::Missing);
    };

    // The closing delimiter must start a line, so `---` inside a YAML value is kept.
    let (frontmatter_str, rest) = if let Some(rest) = after_first.trim_start().strip_prefix(DELIMITER)
    {
        ("", rest)
    } else {
        let end_pos = after_first
            .find(&format!("\n{DELIMITER}"))
            .ok_or(FrontmatterError::Unterminated)?;
        (
            &after_first[..end_pos],
            &after_first[end_pos + 1 + DELIMITER.len()..],
        )
    };

    let frontmatter: F = serde_yaml_bw::from_str(frontmatter_str.trim())
        .map_err(|e| FrontmatterError::Yaml(e.to_string()))?;

    Ok(ParsedDocument {
        frontmatter,
        body: rest.trim().to_string(),
    })
}
