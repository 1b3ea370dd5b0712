//! Blog post parser.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, BlogMeta, FrontmatterError};
use crate::highlight::highlight_code_blocks;

/// Heading anchors are cut to this many characters.
const HEADING_ID_LEN: usize = 20;

/// A parsed blog post.
#[derive(Debug, Clone)]
pub struct Post {
    /// Front matter
    pub meta: BlogMeta,

    /// Markdown content (without front matter)
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a post.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Front matter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Post has no front matter block")]
    MissingFrontmatter,
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse a blog post.
///
/// Front matter is mandatory for posts; the table of contents uses the same
/// anchors that [`render_html`] writes into the page.
pub fn parse_post(source: &str) -> Result<Post, ParseError> {
    let (meta, content) = extract_frontmatter(source)?;
    let meta = meta.ok_or(ParseError::MissingFrontmatter)?;

    let (_, toc) = anchor_headings(Parser::new_ext(content, markdown_options()));

    Ok(Post {
        meta,
        content: content.to_string(),
        toc,
    })
}

/// Render markdown to HTML, giving every heading a linkable anchor and
/// highlighting fenced code.
pub fn render_html(content: &str) -> String {
    let (events, _) = anchor_headings(Parser::new_ext(content, markdown_options()));
    let events = highlight_code_blocks(events);

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}

/// Assign an `id` to every heading and wrap its contents in a self link.
fn anchor_headings<'a>(events: impl Iterator<Item = Event<'a>>) -> (Vec<Event<'a>>, Vec<TocEntry>) {
    let mut out = Vec::new();
    let mut toc = Vec::new();

    // (start tag, buffered inner events, plain text)
    let mut heading: Option<(Tag<'a>, Vec<Event<'a>>, String)> = None;

    for event in events {
        match event {
            Event::Start(tag @ Tag::Heading { .. }) => {
                heading = Some((tag, Vec::new(), String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                let Some((tag, inner, text)) = heading.take() else {
                    out.push(event);
                    continue;
                };
                let Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                } = tag
                else {
                    continue;
                };

                let id = match id {
                    Some(explicit) => explicit.to_string(),
                    None => heading_id(&text),
                };

                toc.push(TocEntry {
                    title: text.trim().to_string(),
                    id: id.clone(),
                    level: level as u8,
                });

                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(id.clone())),
                    classes,
                    attrs,
                }));
                out.push(Event::InlineHtml(
                    format!("<a class=\"anchor\" href=\"#{}\">", id).into(),
                ));
                out.extend(inner);
                out.push(Event::InlineHtml("</a>".into()));
                out.push(event);
            }

            _ => {
                if let Some((_, ref mut inner, ref mut text)) = heading {
                    if let Event::Text(ref t) | Event::Code(ref t) = event {
                        text.push_str(t);
                    }
                    inner.push(event);
                } else {
                    out.push(event);
                }
            }
        }
    }

    (out, toc)
}

/// Convert a heading to a short URL-safe anchor.
fn heading_id(text: &str) -> String {
    let slug = slugify(text);
    let short: String = slug.chars().take(HEADING_ID_LEN).collect();
    short.trim_end_matches('-').to_string()
}

/// Convert text to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POST: &str = r#"---
title: Rewriting the Modern Web in Rust
subtitle: Rust, spa, ssr, mdx, yew hooks, bazel
date: 2022-10-01
---

# Intro

Some text.

```rust
fn main() {}
```

## Server Side Rendering with `axum`

More text.
"#;

    #[test]
    fn parses_complete_post() {
        let post = parse_post(POST).unwrap();

        assert_eq!(post.meta.title, "Rewriting the Modern Web in Rust");
        assert_eq!(post.meta.date, "2022-10-01");
        assert!(post.content.starts_with("# Intro"));

        assert_eq!(
            post.toc,
            vec![
                TocEntry {
                    title: "Intro".to_string(),
                    id: "intro".to_string(),
                    level: 1,
                },
                TocEntry {
                    title: "Server Side Rendering with axum".to_string(),
                    id: "server-side-renderin".to_string(),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn requires_frontmatter() {
        let result = parse_post("# Just Markdown\n\nNo front matter.");

        assert!(matches!(result, Err(ParseError::MissingFrontmatter)));
    }

    #[test]
    fn renders_heading_anchors() {
        let html = render_html("# Hello World\n\nBody");

        assert!(html.contains(r#"<h1 id="hello-world">"#));
        assert!(html.contains(r##"<a class="anchor" href="#hello-world">Hello World</a>"##));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn keeps_explicit_heading_ids() {
        let html = render_html("## Rust {#rust}");

        assert!(html.contains(r#"<h2 id="rust">"#));
    }

    #[test]
    fn renders_code_blocks() {
        let html = render_html("```rust\nfn main() {}\n```");

        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains(r#"<pre class="highlight" data-language="rust">"#));
        assert!(html.contains("<span style="));
    }

    #[test]
    fn heading_id_truncates() {
        assert_eq!(heading_id("Hello World"), "hello-world");
        assert_eq!(heading_id("Next.js + React + Typescript"), "nextjs-react-typescr");
        assert_eq!(heading_id("Using the bevy engine"), "using-the-bevy-engin");
        assert_eq!(heading_id("A very long heading - with dash"), "a-very-long-heading");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
