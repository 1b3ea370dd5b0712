//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assets::AssetPipeline;
use crate::index::{load_blog_index, BlogEntry, IndexError, BLOG_ROUTE};
use crate::listing::{arrange, ListingItem, ListingOptions, Mode};
use crate::posts::{render_post, PostError};
use crate::templates::{HomePage, IndexPage, SiteContext, TemplateEngine};

/// Posts listed on the home page.
pub const RECENT_POSTS: usize = 3;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding one source file per post
    pub blog_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Files copied verbatim into the output
    pub public_dir: Option<PathBuf>,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Site description for the home page
    pub description: String,

    /// Development builds list drafts
    pub mode: Mode,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("blog"),
            output_dir: PathBuf::from("dist"),
            public_dir: None,
            minify: true,
            base_url: "/".to_string(),
            title: "Blog".to_string(),
            description: String::new(),
            mode: Mode::Production,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of post pages generated
    pub posts: usize,

    /// Drafts left out of this build
    pub drafts_hidden: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Post(#[from] PostError),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Refusing to build into {output}: it overlaps the blog directory {blog_dir}")]
    OutputOverlapsBlog { output: String, blog_dir: String },
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    fn site(&self) -> SiteContext {
        SiteContext {
            site_title: self.config.title.clone(),
            description: self.config.description.clone(),
            base_url: self.config.base_url.clone(),
        }
    }

    /// Run one generation pass.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let blog_out = self.config.output_dir.join(BLOG_ROUTE);
        self.check_output_location(&blog_out)?;

        let entries = load_blog_index(&self.config.blog_dir).await?;

        let options = ListingOptions::from(self.config.mode);
        let visible = arrange(&entries, options);
        let drafts_hidden = entries.len() - visible.len();
        if drafts_hidden > 0 {
            tracing::info!("Hiding {} drafts ({} build)", drafts_hidden, self.config.mode);
        }

        // Pages from an earlier build may include drafts
        if blog_out.exists() {
            fs::remove_dir_all(&blog_out).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        self.build_home(&visible)?;
        self.build_index(&visible, &blog_out)?;

        let results: Vec<Result<(), BuildError>> = visible
            .par_iter()
            .map(|entry| self.build_post(entry))
            .collect();

        for result in results {
            result?;
        }

        self.generate_assets()?;

        if let Some(public_dir) = &self.config.public_dir {
            self.copy_public(public_dir)?;
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            posts: visible.len(),
            drafts_hidden,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Refuse to run when the generated `blog/` tree and the source posts
    /// share a directory.
    fn check_output_location(&self, blog_out: &Path) -> Result<(), BuildError> {
        // Missing blog directories are reported by the index pass
        let Ok(blog_dir) = self.config.blog_dir.canonicalize() else {
            return Ok(());
        };
        let output_dir = self.config.output_dir.canonicalize().map_err(|e| {
            BuildError::ReadError(format!("{}: {}", self.config.output_dir.display(), e))
        })?;
        let blog_out_canonical = match blog_out.canonicalize() {
            Ok(path) => path,
            Err(_) => output_dir.join(BLOG_ROUTE),
        };

        if blog_out_canonical.starts_with(&blog_dir) || blog_dir.starts_with(&blog_out_canonical) {
            return Err(BuildError::OutputOverlapsBlog {
                output: blog_out.display().to_string(),
                blog_dir: self.config.blog_dir.display().to_string(),
            });
        }

        Ok(())
    }

    /// Write the home page with the newest posts.
    fn build_home(&self, visible: &[&BlogEntry]) -> Result<(), BuildError> {
        let page = HomePage {
            recent: visible
                .iter()
                .take(RECENT_POSTS)
                .map(|entry| ListingItem::from_entry(entry, &self.config.base_url))
                .collect(),
        };

        let html = self
            .templates
            .render_home(&self.site(), &page)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_page(&self.config.output_dir.join("index.html"), html)
    }

    /// Write the blog index page.
    fn build_index(&self, visible: &[&BlogEntry], blog_out: &Path) -> Result<(), BuildError> {
        let page = IndexPage {
            posts: visible
                .iter()
                .map(|entry| ListingItem::from_entry(entry, &self.config.base_url))
                .collect(),
        };

        let html = self
            .templates
            .render_index(&self.site(), &page)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_page(&blog_out.join("index.html"), html)
    }

    /// Write a single post page.
    fn build_post(&self, entry: &BlogEntry) -> Result<(), BuildError> {
        let post = render_post(&self.config.blog_dir, entry)?;

        let html = self
            .templates
            .render_post(&self.site(), &post.into_page())
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", entry.path, e)))?;

        let output_path = self
            .config
            .output_dir
            .join(&entry.path)
            .join("index.html");

        tracing::debug!("Writing {}", output_path.display());

        write_page(&output_path, html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Serving unminified CSS: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Copy the public directory into the output as is.
    fn copy_public(&self, public_dir: &Path) -> Result<(), BuildError> {
        if !public_dir.exists() {
            tracing::warn!("Public directory not found: {}", public_dir.display());
            return Ok(());
        }

        let mut copied = 0;

        for entry in WalkDir::new(public_dir).follow_links(true) {
            let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(public_dir)
                .unwrap_or(entry.path());
            let target = self.config.output_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                BuildError::WriteError(format!("{}: {}", target.display(), e))
            })?;
            copied += 1;
        }

        tracing::info!("Copied {} files from {}", copied, public_dir.display());

        Ok(())
    }
}

fn write_page(path: &Path, html: String) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }

    fs::write(path, html).map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
