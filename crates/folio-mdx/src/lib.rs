//! MDX blog post parser with front matter and heading anchors.
//!
//! This crate parses blog post sources: the YAML front matter that carries a
//! post's metadata, and the Markdown body rendered to HTML with linkable headings and highlighted code.

pub mod frontmatter;
pub mod highlight;
pub mod parser;

pub use frontmatter::{extract_frontmatter, BlogMeta, FrontmatterError};
pub use highlight::{highlight, highlight_code_blocks};
pub use parser::{parse_post, render_html, ParseError, Post, TocEntry};
