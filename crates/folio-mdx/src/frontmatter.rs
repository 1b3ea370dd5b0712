//! Front matter extraction and parsing.

use serde::{Deserialize, Serialize};

/// Metadata declared at the top of a blog post.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BlogMeta {
    /// Publication date, `YYYY-MM-DD` so that string order is date order
    pub date: String,

    /// Drafts are only listed in development mode
    #[serde(default)]
    pub draft: bool,

    /// Post title
    pub title: String,

    /// One-line summary shown under the title
    pub subtitle: String,
}

/// Extract front matter from MDX content.
///
/// Returns the parsed metadata and the remaining content after the front matter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<BlogMeta>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let meta: BlogMeta = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(meta), remaining.trim_start()))
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed front matter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in front matter: {0}")]
    InvalidYaml(String),
}
