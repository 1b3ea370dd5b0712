//! Development server command.

use std::path::Path;

use anyhow::Result;
use folio_server::{DevServer, DevServerConfig};
use folio_static::Mode;

use crate::config::load_config;

/// Run the dev server. Drafts are always listed.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let file_config = load_config(config_path)?;

    let config = DevServerConfig {
        blog_dir: file_config.blog_dir(),
        public_dir: file_config.public_dir(),
        port,
        open,
        mode: Mode::Development,
        title: file_config.site.title,
        description: file_config.site.description,
        base_url: file_config.site.base_url,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
