//! Blog index builder.
//!
//! A generation pass enumerates the post files in the blog directory, loads
//! every post's front matter concurrently and pairs it with the route the post
//! is served under.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use folio_mdx::{extract_frontmatter, BlogMeta, FrontmatterError};

/// Route segment every post lives under.
pub const BLOG_ROUTE: &str = "blog";

static SOURCE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.mdx?$").expect("valid extension pattern"));

/// One blog post in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogEntry {
    /// Routable path, `blog/<identifier without extension>`
    pub path: String,

    /// Front matter of the post
    pub meta: BlogMeta,

    /// File name the entry was loaded from
    pub identifier: String,
}

impl BlogEntry {
    /// Create an entry, deriving its path from the identifier.
    pub fn new(identifier: impl Into<String>, meta: BlogMeta) -> Self {
        let identifier = identifier.into();
        Self {
            path: entry_path(&identifier),
            meta,
            identifier,
        }
    }

    /// Last path segment, the part after `blog/`.
    pub fn slug(&self) -> &str {
        self.path
            .strip_prefix(BLOG_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.path)
    }
}

/// Compute the route of a post from its file name.
///
/// `hello-world.mdx` -> `blog/hello-world`
pub fn entry_path(identifier: &str) -> String {
    format!("{}/{}", BLOG_ROUTE, SOURCE_EXTENSION.replace(identifier, ""))
}

/// Errors that can occur when loading a single post's metadata.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("No front matter block")]
    MissingMeta,

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

/// Errors that abort a generation pass.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Failed to read blog directory: {0}")]
    ReadDir(String),

    #[error("Failed to load metadata for {identifier}: {source}")]
    Load {
        identifier: String,
        #[source]
        source: LoadError,
    },

    #[error("Metadata task failed: {0}")]
    Join(String),

    #[error("Posts {} are all served at {path}", .identifiers.join(", "))]
    DuplicatePath {
        path: String,
        identifiers: Vec<String>,
    },
}

/// Loads the metadata of one post given its identifier.
pub trait MetaLoader: Send + Sync + 'static {
    fn load_meta(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<BlogMeta, LoadError>> + Send;
}

/// Reads post front matter from files in a directory.
#[derive(Debug, Clone)]
pub struct FsMetaLoader {
    dir: PathBuf,
}

impl FsMetaLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MetaLoader for FsMetaLoader {
    async fn load_meta(&self, identifier: &str) -> Result<BlogMeta, LoadError> {
        let path = self.dir.join(identifier);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let (meta, _) = extract_frontmatter(&source)?;
        meta.ok_or(LoadError::MissingMeta)
    }
}

/// List the post files directly inside `dir`, in file name order.
pub fn enumerate_entries(dir: &Path) -> Result<Vec<String>, IndexError> {
    if !dir.is_dir() {
        return Err(IndexError::ReadDir(format!(
            "Blog directory not found: {}",
            dir.display()
        )));
    }

    let mut identifiers = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| IndexError::ReadDir(e.to_string()))?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "mdx" && ext != "md" {
            tracing::debug!("Skipping non-post file {}", path.display());
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping post with non UTF-8 name: {}", path.display());
            continue;
        };

        identifiers.push(name.to_string());
    }

    Ok(identifiers)
}

/// Builds the list of blog entries.
pub struct IndexBuilder<L> {
    loader: Arc<L>,
}

impl<L: MetaLoader> IndexBuilder<L> {
    /// Create a builder around a metadata loader.
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    /// Load every identifier's metadata and assemble the entries.
    ///
    /// Loads run concurrently; the result keeps the order of `identifiers`.
    /// Empty identifiers are skipped. The first failure aborts the pass and
    /// cancels the loads still in flight. Identifiers that map to the same
    /// path (`hello.md` and `hello.mdx`) fail the pass too.
    pub async fn build(&self, identifiers: &[String]) -> Result<Vec<BlogEntry>, IndexError> {
        let mut tasks = JoinSet::new();

        for (slot, identifier) in identifiers
            .iter()
            .filter(|identifier| !identifier.is_empty())
            .enumerate()
        {
            let loader = Arc::clone(&self.loader);
            let identifier = identifier.clone();

            tasks.spawn(async move {
                let loaded = loader.load_meta(&identifier).await;
                match loaded {
                    Ok(meta) => Ok((slot, BlogEntry::new(identifier, meta))),
                    Err(source) => Err(IndexError::Load { identifier, source }),
                }
            });
        }

        let mut loaded = Vec::with_capacity(tasks.len());

        while let Some(joined) = tasks.join_next().await {
            let (slot, entry) = joined.map_err(|e| IndexError::Join(e.to_string()))??;
            tracing::debug!("Loaded {} ({})", entry.path, entry.meta.date);
            loaded.push((slot, entry));
        }

        loaded.sort_by_key(|(slot, _)| *slot);

        let entries: Vec<BlogEntry> = loaded.into_iter().map(|(_, entry)| entry).collect();
        check_unique_paths(&entries)?;

        Ok(entries)
    }
}

/// Every path must belong to exactly one post.
fn check_unique_paths(entries: &[BlogEntry]) -> Result<(), IndexError> {
    let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
    for entry in entries {
        owners
            .entry(entry.path.as_str())
            .or_default()
            .push(entry.identifier.as_str());
    }

    // First clash in enumeration order, so the error is stable
    for entry in entries {
        let identifiers = &owners[entry.path.as_str()];
        if identifiers.len() > 1 {
            return Err(IndexError::DuplicatePath {
                path: entry.path.clone(),
                identifiers: identifiers.iter().map(|id| id.to_string()).collect(),
            });
        }
    }

    Ok(())
}

/// Run one generation pass over a blog directory.
pub async fn load_blog_index(dir: &Path) -> Result<Vec<BlogEntry>, IndexError> {
    let identifiers = enumerate_entries(dir)?;
    let entries = IndexBuilder::new(FsMetaLoader::new(dir))
        .build(&identifiers)
        .await?;

    tracing::info!("Indexed {} posts from {}", entries.len(), dir.display());

    Ok(entries)
}
