//! mdblog-rs: a small static blog generator
//!
//! Posts are Markdown files with YAML front-matter in one content directory.
//! A build scans that directory once, validates every post, and writes a
//! listing page plus one page per slug. The preview server runs the same
//! pipeline on every request.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod routes;
pub mod server;
pub mod templates;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post files
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already-built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Content loader for this site
    pub fn loader(&self) -> content::ContentLoader {
        content::ContentLoader::from_blog(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Fail if removing `dir` would take the base or content directory with it
    pub fn ensure_disposable(&self, dir: &Path) -> Result<()> {
        if self.base_dir.starts_with(dir) || self.content_dir.starts_with(dir) {
            bail!("Refusing to delete {:?}: it holds the site sources", dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        assert_eq!(blog.content_dir, tmp.path().join("content/posts"));
        assert_eq!(blog.public_dir, tmp.path().join("out"));
    }

    #[test]
    fn test_new_reads_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "content_dir: posts\npublic_dir: dist\n",
        )
        .unwrap();

        let blog = Blog::new(tmp.path()).unwrap();
        assert_eq!(blog.content_dir, tmp.path().join("posts"));
        assert_eq!(blog.public_dir, tmp.path().join("dist"));
    }

    #[test]
    fn test_ensure_disposable() {
        let blog = Blog::with_config("/srv/site", config::SiteConfig::default());
        assert!(blog.ensure_disposable(Path::new("/srv/site/out")).is_ok());
        assert!(blog.ensure_disposable(Path::new("/srv/site/out/blog")).is_ok());
        assert!(blog.ensure_disposable(Path::new("/srv/site")).is_err());
        assert!(blog.ensure_disposable(Path::new("/srv/site/./")).is_err());
        assert!(blog.ensure_disposable(Path::new("/srv/site/content")).is_err());
        assert!(blog.ensure_disposable(Path::new("/srv")).is_err());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "duplicate_slugs: [nope]\n").unwrap();
        assert!(Blog::new(tmp.path()).is_err());
    }
}
