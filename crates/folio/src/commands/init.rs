//! Scaffold a new blog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in `root`.
pub async fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let blog_dir = root.join("blog");

    // Check if blog already exists
    if blog_dir.exists() {
        if !yes {
            tracing::warn!("blog/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&blog_dir).context("Failed to create blog directory")?;
    }

    let config_path = root.join("site.toml");
    if !config_path.exists() || yes {
        fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write site.toml")?;
        tracing::info!("Created site.toml");
    }

    let post_path = blog_dir.join("hello-world.mdx");
    if !post_path.exists() || yes {
        fs::write(&post_path, DEFAULT_POST).context("Failed to write hello-world.mdx")?;
        tracing::info!("Created blog/hello-world.mdx");
    }

    let draft_path = blog_dir.join("work-in-progress.mdx");
    if !draft_path.exists() || yes {
        fs::write(&draft_path, DEFAULT_DRAFT).context("Failed to write work-in-progress.mdx")?;
        tracing::info!("Created blog/work-in-progress.mdx (draft)");
    }

    let public_dir = root.join("public");
    if !public_dir.exists() {
        fs::create_dir_all(&public_dir).context("Failed to create public directory")?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
# Site title
title = "My Blog"

# Shown on the home page
description = "Notes and projects"

# Base URL (for deployment)
base_url = "/"

# Output directory for built site
output = "dist"

# Copied into the output as is
public = "public"

[blog]
# One .mdx or .md file per post
dir = "blog"

[build]
# Enable CSS minification
minify = true

# "development" lists drafts
mode = "production"
"#;

const DEFAULT_POST: &str = r#"---
title: Hello World
subtitle: The first post on this blog
date: 2024-01-01
---

# Hello World

This post lives in `blog/hello-world.mdx` and is served at `/blog/hello-world`.

## Writing posts

Every post starts with a front matter block:

```yaml
title: Post title
subtitle: One line summary
date: 2024-01-01
draft: true # optional, drafts only show up in development mode
```

Posts are listed newest first.
"#;

const DEFAULT_DRAFT: &str = r#"---
title: Work in Progress
subtitle: Only visible with folio dev
date: 2024-01-02
draft: true
---

# Work in Progress

Remove `draft: true` to publish this post.
"#;
