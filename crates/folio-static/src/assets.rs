//! Stylesheet generation.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* folio default theme */

:root {
  --background: #fdfcf9;
  --foreground: #1c1917;
  --muted: #78716c;
  --accent: #ea580c;
  --content-max-width: 56rem;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #1c1917;
    --foreground: #f5f5f4;
    --muted: #a8a29e;
  }
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: inherit;
}

.navbar {
  display: flex;
  flex-wrap: wrap;
  justify-content: space-evenly;
  align-items: center;
  padding: 2rem 1rem;
}

.nav-logo {
  font-size: 2.5rem;
  font-weight: 700;
  text-decoration: none;
}

.nav-link {
  font-size: 1.5rem;
  padding: 1rem;
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 0 1rem 4rem;
}

/* Blog index */
.post-link {
  padding: 1rem 0;
}

.post-link a {
  text-decoration: none;
}

.post-link h1 {
  font-size: 2.25rem;
  margin: 0;
}

.post-link time {
  font-size: 1.25rem;
}

.post-link.draft {
  opacity: 0.6;
}

.subtitle {
  color: var(--muted);
}

/* Post */
.post-header h1 {
  font-size: 2.5rem;
  margin-bottom: 0.25rem;
}

.draft-badge {
  color: var(--accent);
  font-weight: 600;
}

.content h1 { font-size: 2.25rem; padding-top: 2.5rem; }
.content h2 { font-size: 1.5rem; padding-top: 2rem; }
.content h3 { font-size: 1.25rem; padding-top: 1.5rem; }

.content .anchor {
  text-decoration: none;
}

.content p {
  font-size: 1.125rem;
}

.content pre {
  overflow: auto;
  margin: 1rem;
  padding: 1.5rem;
  background: rgba(209, 213, 219, 0.05);
  border-radius: 0.25rem;
}

.content code {
  padding: 0 0.25rem;
  border-radius: 0.25rem;
  background: rgba(209, 213, 219, 0.4);
}

.content pre code {
  background: none;
}

/* base16-ocean.dark */
.content pre.highlight {
  background: #2b303b;
  color: #c0c5ce;
}

.content blockquote {
  margin: 0.5rem 0;
  padding: 0 0.5rem;
  border-left: 8px solid var(--muted);
  font-style: italic;
}

.toc ul {
  list-style: none;
  padding-left: 0;
}

.toc-level-2 { padding-left: 1rem; }
.toc-level-3 { padding-left: 2rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minifies_default_css() {
        let css = AssetPipeline::generate_css();
        let minified = AssetPipeline::minify_css(&css).unwrap();

        assert!(minified.len() < css.len());
        assert!(minified.contains(".post-link"));
        assert!(minified.contains("pre.highlight"));
    }
}
