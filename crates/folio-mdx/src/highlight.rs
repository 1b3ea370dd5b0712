//! Syntax highlighting for fenced code blocks.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Theme used for every code block.
pub const THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlight `code` written in `language` to inline-styled HTML spans.
///
/// Unknown languages fall back to plain text. Returns `None` when the theme
/// is missing or syntect fails on the input.
pub fn highlight(language: &str, code: &str) -> Option<String> {
    let ss = &*SYNTAX_SET;
    let theme: &Theme = THEME_SET.themes.get(THEME)?;

    let syntax = ss
        .find_syntax_by_token(language)
        .or_else(|| ss.find_syntax_by_extension(language))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let mut lines = HighlightLines::new(syntax, theme);
    let mut html = String::new();

    for line in LinesWithEndings::from(code) {
        let regions = lines.highlight_line(line, ss).ok()?;
        html.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
    }

    Some(html)
}

/// Replace fenced code blocks that name a language with highlighted HTML.
///
/// Blocks without a language, indented blocks, and blocks syntect cannot
/// handle are passed through untouched.
pub fn highlight_code_blocks<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();

    // (language, buffered events, code text)
    let mut block: Option<(CowStr<'a>, Vec<Event<'a>>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref fence))) => {
                let language = fence.split_whitespace().next().unwrap_or("");
                if !is_language_token(language) {
                    out.push(event);
                } else {
                    let language = CowStr::from(language.to_string());
                    block = Some((language, vec![event], String::new()));
                }
            }

            Event::End(TagEnd::CodeBlock) if block.is_some() => {
                let Some((language, mut buffered, code)) = block.take() else {
                    continue;
                };

                match highlight(&language, &code) {
                    Some(html) => out.push(Event::Html(
                        format!(
                            "<pre class=\"highlight\" data-language=\"{lang}\"><code class=\"language-{lang}\">{html}</code></pre>\n",
                            lang = language,
                        )
                        .into(),
                    )),
                    None => {
                        buffered.push(event);
                        out.extend(buffered);
                    }
                }
            }

            _ => match block {
                Some((_, ref mut buffered, ref mut code)) => {
                    if let Event::Text(ref text) = event {
                        code.push_str(text);
                    }
                    buffered.push(event);
                }
                None => out.push(event),
            },
        }
    }

    out
}

/// Whether a fence label is usable as a language name in HTML attributes.
fn is_language_token(language: &str) -> bool {
    !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '#' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Parser};

    fn render(markdown: &str) -> String {
        let mut output = String::new();
        html::push_html(&mut output, highlight_code_blocks(Parser::new(markdown)).into_iter());
        output
    }

    #[test]
    fn highlights_rust() {
        let html = render("```rust\nfn main() {}\n```");

        assert!(html.contains(r#"<pre class="highlight" data-language="rust">"#));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<span style=\"color:"));
        assert!(html.contains("main"));
    }

    #[test]
    fn escapes_unknown_language() {
        let html = render("```not-a-language\n<b>bold</b>\n```");

        assert!(html.contains(r#"data-language="not-a-language""#));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn leaves_plain_blocks_alone() {
        let html = render("```\nplain\n```\n\n    indented\n");

        assert!(!html.contains("highlight"));
        assert!(html.contains("<pre><code>plain\n</code></pre>"));
        assert!(html.contains("<pre><code>indented\n</code></pre>"));
    }

    #[test]
    fn rejects_odd_language_names() {
        let html = render("```a\"b\ncode\n```");

        assert!(!html.contains("data-language"));
        assert!(html.contains("code\n</code></pre>"));
    }

    #[test]
    fn ignores_fence_attributes() {
        let html = render("```rust ignore\nlet x = 1;\n```");

        assert!(html.contains(r#"<code class="language-rust">"#));
    }
}
