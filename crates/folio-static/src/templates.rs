//! Template engine for rendering blog pages.

use minijinja::{context, Environment};

use crate::listing::ListingItem;

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

impl From<&folio_mdx::TocEntry> for TocEntry {
    fn from(entry: &folio_mdx::TocEntry) -> Self {
        Self {
            title: entry.title.clone(),
            id: entry.id.clone(),
            level: entry.level,
        }
    }
}

/// Values shared by every page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub site_title: String,
    /// One line about the site, shown on the home page
    pub description: String,
    /// Base URL
    pub base_url: String,
}

/// Context for the home page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HomePage {
    /// Newest visible posts
    pub recent: Vec<ListingItem>,
}

/// Context for the blog index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexPage {
    /// Links, already ordered and filtered
    pub posts: Vec<ListingItem>,
}

/// Context for a single post page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostPage {
    pub title: String,
    pub subtitle: String,
    /// Date as shown to readers, `Feb 15, 2022`
    pub display_date: String,
    /// Drafts get a badge next to the date
    pub draft: bool,
    /// Rendered body HTML, inserted without escaping
    pub content: String,
    /// Headings in document order
    pub toc: Vec<TocEntry>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("home.html".to_string(), HOME_TEMPLATE.to_string())
            .expect("Failed to add home template");
        env.add_template_owned("blog.html".to_string(), BLOG_TEMPLATE.to_string())
            .expect("Failed to add blog template");
        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())
            .expect("Failed to add post template");
        env.add_template_owned("not_found.html".to_string(), NOT_FOUND_TEMPLATE.to_string())
            .expect("Failed to add not found template");

        Self { env }
    }

    /// Render the home page.
    pub fn render_home(
        &self,
        site: &SiteContext,
        page: &HomePage,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("home.html")?;

        tmpl.render(context! {
            title => "Home",
            site_title => &site.site_title,
            description => &site.description,
            base_url => &site.base_url,
            recent => &page.recent,
        })
    }

    /// Render the blog index.
    pub fn render_index(
        &self,
        site: &SiteContext,
        page: &IndexPage,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("blog.html")?;

        tmpl.render(context! {
            title => "Blog",
            site_title => &site.site_title,
            description => &site.description,
            base_url => &site.base_url,
            posts => &page.posts,
        })
    }

    /// Render a post page.
    pub fn render_post(
        &self,
        site: &SiteContext,
        page: &PostPage,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("post.html")?;

        tmpl.render(context! {
            title => &page.title,
            subtitle => &page.subtitle,
            display_date => &page.display_date,
            draft => page.draft,
            content => &page.content,
            toc => &page.toc,
            site_title => &site.site_title,
            description => &page.subtitle,
            base_url => &site.base_url,
        })
    }

    /// Render the page shown for an unknown post.
    pub fn render_not_found(&self, site: &SiteContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("not_found.html")?;

        tmpl.render(context! {
            title => "Not found",
            site_title => &site.site_title,
            description => &site.description,
            base_url => &site.base_url,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">{% endif %}
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <header class="navbar">
    <a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
    <a href="{{ base_url }}blog" class="nav-link">Blog</a>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
</body>
</html>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="home">
  <h1>{{ site_title }}</h1>
  {% if description %}<p class="subtitle">{{ description }}</p>{% endif %}
</section>

{% if recent %}
<section class="blog-index">
  <h2>Recent posts</h2>
{% for post in recent %}
  <div class="post-link{% if post.draft %} draft{% endif %}">
    <a href="{{ post.href }}">
      <h1>{{ post.title }}</h1>
      <div class="subtitle">{{ post.subtitle }}</div>
      <time datetime="{{ post.date }}">{{ post.display_date }}</time>
    </a>
  </div>
{% endfor %}
  <p><a href="{{ base_url }}blog" class="all-posts">All posts</a></p>
</section>
{% endif %}
{% endblock %}"##;

const BLOG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="blog-index">
{% for post in posts %}
  <div class="post-link{% if post.draft %} draft{% endif %}">
    <a href="{{ post.href }}">
      <h1>{{ post.title }}</h1>
      <div class="subtitle">{{ post.subtitle }}</div>
      <time datetime="{{ post.date }}">{{ post.display_date }}</time>
    </a>
  </div>
{% endfor %}
</section>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <header class="post-header">
    <h1>{{ title }}</h1>
    <div class="subtitle">{{ subtitle }}</div>
    <div class="date">{{ display_date }}{% if draft %} <span class="draft-badge">draft</span>{% endif %}</div>
  </header>
  <div class="content">
    {{ content | safe }}
  </div>
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <p>Post not found :(</p>
  <p><a href="{{ base_url }}blog">Back to the blog</a></p>
</article>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteContext {
        SiteContext {
            site_title: "impl Future {}".to_string(),
            description: "Rust, bevy and other things".to_string(),
            base_url: "/".to_string(),
        }
    }

    fn item(slug: &str, title: &str, draft: bool) -> ListingItem {
        ListingItem {
            href: format!("/blog/{}", slug),
            title: title.to_string(),
            subtitle: "Subtitle".to_string(),
            date: "2022-02-15".to_string(),
            display_date: "Feb 15, 2022".to_string(),
            draft,
        }
    }

    #[test]
    fn renders_blog_index() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_index(
                &site(),
                &IndexPage {
                    posts: vec![item("second", "Second", false), item("first", "First", true)],
                },
            )
            .unwrap();

        assert!(html.contains("<title>Blog - impl Future {}</title>"));
        // minijinja's HTML escaping encodes '/' as &#x2f;
        assert!(html.contains(r#"<a href="&#x2f;blog&#x2f;second">"#));
        assert!(html.contains("Feb 15, 2022"));
        assert!(html.contains(r#"class="post-link draft""#));
        assert!(html.find("Second").unwrap() < html.find("First").unwrap());
    }

    #[test]
    fn escapes_titles() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_index(
                &site(),
                &IndexPage {
                    posts: vec![item("tags", "<script>", false)],
                },
            )
            .unwrap();

        assert!(!html.contains("<h1><script></h1>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn renders_post_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_post(
                &site(),
                &PostPage {
                    title: "Hello".to_string(),
                    subtitle: "World".to_string(),
                    display_date: "Feb 15, 2022".to_string(),
                    draft: false,
                    content: "<p>Body</p>".to_string(),
                    toc: vec![TocEntry {
                        title: "Intro".to_string(),
                        id: "intro".to_string(),
                        level: 1,
                    }],
                },
            )
            .unwrap();

        assert!(html.contains("<title>Hello - impl Future {}</title>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("href=\"#intro\""));
        assert!(!html.contains("draft-badge"));
    }

    #[test]
    fn renders_home_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_home(
                &site(),
                &HomePage {
                    recent: vec![item("second", "Second", false)],
                },
            )
            .unwrap();

        assert!(html.contains("<title>Home - impl Future {}</title>"));
        assert!(html.contains(r#"<meta name="description" content="Rust, bevy and other things">"#));
        assert!(html.contains("Recent posts"));
        assert!(html.contains(r#"<a href="&#x2f;blog&#x2f;second">"#));
        assert!(html.contains(r#"<a href="&#x2f;blog" class="all-posts">"#));
    }

    #[test]
    fn home_page_without_posts() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_home(&site(), &HomePage { recent: vec![] })
            .unwrap();

        assert!(html.contains(r#"<a href="&#x2f;" class="nav-logo">"#));
        assert!(!html.contains("Recent posts"));
    }

    #[test]
    fn renders_not_found() {
        let engine = TemplateEngine::new();

        let html = engine.render_not_found(&site()).unwrap();

        assert!(html.contains("Post not found :("));
    }
}
