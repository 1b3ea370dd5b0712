//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use folio_static::{BuildConfig, Mode, StaticBuilder};

use crate::config::load_config;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
    mode: Option<Mode>,
) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;

    let config = BuildConfig {
        blog_dir: file_config.blog_dir(),
        output_dir: output.unwrap_or_else(|| file_config.output_dir()),
        public_dir: Some(file_config.public_dir()),
        minify: minify.unwrap_or(file_config.build.minify),
        base_url: file_config.site.base_url,
        title: file_config.site.title,
        description: file_config.site.description,
        mode: mode.unwrap_or(file_config.build.mode),
    };

    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} posts ({} drafts hidden) in {}ms",
        result.posts,
        result.drafts_hidden,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
