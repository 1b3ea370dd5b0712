//! Preview a built site.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::load_config;

/// Serve the output of `folio build`.
///
/// The directory is `dir` when given, otherwise the configured output.
pub async fn run(
    config_path: &Path,
    port: u16,
    dir: Option<PathBuf>,
    open_browser: bool,
) -> Result<()> {
    let dir = site_dir(config_path, dir)?;

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if open_browser {
        let _ = open::that(format!("http://{}/", addr));
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve the directory to serve and make sure a build is there.
fn site_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => load_config(config_path)?.output_dir(),
    };

    if !dir.join("index.html").exists() {
        anyhow::bail!(
            "No built site in {}. Run 'folio build' first.",
            dir.display()
        );
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn uses_configured_output() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        let public_html = temp.path().join("public_html");
        fs::create_dir_all(&public_html).unwrap();
        fs::write(public_html.join("index.html"), "home").unwrap();
        fs::write(
            &config,
            format!("[site]\noutput = \"{}\"\n", public_html.display()),
        )
        .unwrap();

        assert_eq!(site_dir(&config, None).unwrap(), public_html);
    }

    #[test]
    fn flag_overrides_config() {
        let temp = tempdir().unwrap();
        let other = temp.path().join("other");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("index.html"), "home").unwrap();

        let dir = site_dir(&temp.path().join("site.toml"), Some(other.clone())).unwrap();

        assert_eq!(dir, other);
    }

    #[test]
    fn unbuilt_site_is_an_error() {
        let temp = tempdir().unwrap();

        let err = site_dir(&temp.path().join("site.toml"), Some(temp.path().to_path_buf()))
            .unwrap_err();

        assert!(err.to_string().contains("Run 'folio build' first"));
    }
}
