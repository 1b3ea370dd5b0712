//! Site configuration (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use folio_static::Mode;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_public")]
    pub public: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct BlogConfig {
    #[serde(default = "default_blog_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default)]
    pub mode: Mode,
}

fn default_title() -> String {
    "Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_public() -> String {
    "public".to_string()
}
fn default_blog_dir() -> String {
    "blog".to_string()
}
fn default_minify() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            base_url: default_base_url(),
            output: default_output(),
            public: default_public(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            dir: default_blog_dir(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
            mode: Mode::default(),
        }
    }
}

impl ConfigFile {
    pub fn blog_dir(&self) -> PathBuf {
        PathBuf::from(&self.blog.dir)
    }

    pub fn public_dir(&self) -> PathBuf {
        PathBuf::from(&self.site.public)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.site.output)
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}
