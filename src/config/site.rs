//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `base_path`
pub const BASE_PATH_ENV: &str = "MDBLOG_BASE_PATH";

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // URL
    pub blog_dir: String,
    pub base_path: String,
    pub trailing_slash: bool,

    // Writing
    pub duplicate_slugs: DuplicateSlugs,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),

            content_dir: "content/posts".to_string(),
            public_dir: "out".to_string(),

            blog_dir: "blog".to_string(),
            base_path: String::new(),
            trailing_slash: true,

            duplicate_slugs: DuplicateSlugs::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.base_path = normalize_base_path(&config.base_path);
        let blog_dir = config.blog_dir.trim_matches('/');
        if blog_dir.is_empty() {
            anyhow::bail!("blog_dir must not be empty");
        }
        if blog_dir
            .split(['/', '\\'])
            .any(|segment| matches!(segment, "" | "." | ".."))
        {
            anyhow::bail!("blog_dir {:?} must be a plain relative path", config.blog_dir);
        }
        Ok(config)
    }

    /// Apply `MDBLOG_BASE_PATH` when it is set and not blank
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(BASE_PATH_ENV) {
            self.override_base_path(&value);
        }
    }

    fn override_base_path(&mut self, value: &str) {
        if !value.trim().is_empty() {
            self.base_path = normalize_base_path(value);
            tracing::debug!("Base path overridden to {:?}", self.base_path);
        }
    }
}

/// What a scan does when two files declare the same slug
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSlugs {
    /// Fail the scan
    #[default]
    Reject,
    /// Keep going; lookups resolve to the first file by name
    FirstWins,
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// GitHub-flavoured extensions (tables, strikethrough, task lists, footnotes)
    pub gfm: bool,
    /// Keep raw HTML found in post bodies
    pub raw_html: bool,
}

/// Normalize a link prefix to `""` or `/segment[/segment..]`
pub fn normalize_base_path(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.duplicate_slugs, DuplicateSlugs::Reject);
        assert!(config.trailing_slash);
        assert!(!config.markdown.raw_html);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes
content_dir: posts
base_path: /notes/
duplicate_slugs: first_wins
markdown:
  gfm: true
"#;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, yaml).unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.public_dir, "out");
        assert_eq!(config.base_path, "/notes");
        assert_eq!(config.duplicate_slugs, DuplicateSlugs::FirstWins);
        assert!(config.markdown.gfm);
        assert!(!config.markdown.raw_html);
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let result: std::result::Result<SiteConfig, _> =
            serde_yaml::from_str("duplicate_slugs: last_wins\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_blog_dir_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "blog_dir: /\n").unwrap();
        assert!(SiteConfig::load(&path).is_err());
    }

    #[test]
    fn test_blog_dir_dot_segments_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        for blog_dir in [".", "..", "../escape", "posts/../..", "a//b"] {
            fs::write(&path, format!("blog_dir: '{}'\n", blog_dir)).unwrap();
            assert!(SiteConfig::load(&path).is_err(), "{blog_dir}");
        }

        fs::write(&path, "blog_dir: /writing/posts/\n").unwrap();
        assert_eq!(SiteConfig::load(&path).unwrap().blog_dir, "/writing/posts/");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("  "), "");
        assert_eq!(normalize_base_path("site"), "/site");
        assert_eq!(normalize_base_path("/site/"), "/site");
        assert_eq!(normalize_base_path("/a/b"), "/a/b");
    }

    #[test]
    fn test_base_path_override() {
        let mut config = SiteConfig {
            base_path: "/from-file".to_string(),
            ..Default::default()
        };
        config.override_base_path("   ");
        assert_eq!(config.base_path, "/from-file");
        config.override_base_path("gh-pages/");
        assert_eq!(config.base_path, "/gh-pages");
    }
}
