//! Individual post pages.

use std::fs;
use std::path::Path;

use folio_mdx::{parse_post, render_html, BlogMeta, TocEntry};

use crate::index::BlogEntry;
use crate::listing::display_date;
use crate::templates::{PostPage, TocEntry as PageTocEntry};

/// A post ready to be placed in a page template.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    /// Front matter, read again from the source
    pub meta: BlogMeta,
    /// Body rendered to HTML
    pub html: String,
    /// Headings, with the anchors used in `html`
    pub toc: Vec<TocEntry>,
}

impl RenderedPost {
    /// Template context for this post.
    pub fn into_page(self) -> PostPage {
        PostPage {
            display_date: display_date(&self.meta.date),
            toc: self.toc.iter().map(PageTocEntry::from).collect(),
            title: self.meta.title,
            subtitle: self.meta.subtitle,
            draft: self.meta.draft,
            content: self.html,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Read an entry's source from `blog_dir` and render its body.
pub fn render_post(blog_dir: &Path, entry: &BlogEntry) -> Result<RenderedPost, PostError> {
    let path = blog_dir.join(&entry.identifier);

    let source = fs::read_to_string(&path).map_err(|e| PostError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let post = parse_post(&source).map_err(|e| PostError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(RenderedPost {
        html: render_html(&post.content),
        meta: post.meta,
        toc: post.toc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::meta;
    use tempfile::tempdir;

    #[test]
    fn renders_post_body() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("hello-world.mdx"),
            "---\ntitle: Hello\nsubtitle: First post\ndate: 2022-02-15\n---\n# Hello World\n\nHi <Counter />\n",
        )
        .unwrap();
        let entry = BlogEntry::new("hello-world.mdx", meta("2022-02-15", "Hello", false));

        let post = render_post(temp.path(), &entry).unwrap();

        assert_eq!(post.meta.subtitle, "First post");
        assert!(post.html.contains(r#"<h1 id="hello-world">"#));
        assert!(post.html.contains("<Counter />"));
        assert_eq!(post.toc.len(), 1);

        let page = post.into_page();
        assert_eq!(page.display_date, "Feb 15, 2022");
        assert_eq!(page.toc[0].id, "hello-world");
    }

    #[test]
    fn reports_missing_source() {
        let temp = tempdir().unwrap();
        let entry = BlogEntry::new("gone.mdx", meta("2022-02-15", "Gone", false));

        let result = render_post(temp.path(), &entry);

        assert!(matches!(result, Err(PostError::Read { .. })));
    }
}
