//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# mdblog configuration

# Site
title: My Blog
description: ''
author: ''

# Directory
content_dir: content/posts
public_dir: out

# URL
blog_dir: blog
# Prefix for every generated link, e.g. /my-repo for project pages.
# MDBLOG_BASE_PATH overrides this value.
base_path: ''
trailing_slash: true

# Writing
# reject | first_wins
duplicate_slugs: reject
markdown:
  gfm: false
  raw_html: false
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let config = SiteConfig::load(&config_path)?;
    let posts_dir = target_dir.join(&config.content_dir);
    fs::create_dir_all(&posts_dir)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let sample_path = posts_dir.join(format!("{}-hello-world.md", today));
    let has_posts = fs::read_dir(&posts_dir)?.next().is_some();
    if !has_posts {
        let sample_post = format!(
            r#"---
title: Hello World
date: {}
tags:
  - meta
summary: The first post on this blog.
slug: hello-world
---

Welcome! This post lives in `{}`.

## Writing posts

Every post is a Markdown file with a front-matter block holding
`title`, `date`, `summary` and `slug` (plus optional `tags`).

```bash
$ mdblog new "My Next Post" --summary "What it is about"
```

## Building

```bash
$ mdblog generate
$ mdblog server
```
"#,
            today,
            config.content_dir
        );
        fs::write(&sample_path, sample_post)?;
    }

    Ok(())
}
