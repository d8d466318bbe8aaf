//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{FrontMatter, PostMeta};
use crate::Blog;

/// Input of `mdblog new`
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub body: String,
    /// Replace an existing post with the same slug
    pub overwrite: bool,
}

/// Write a new post into the content directory; returns its path
pub fn create_post(blog: &Blog, post: &NewPost) -> Result<PathBuf> {
    let title = post.title.trim();
    let summary = post.summary.trim();
    if title.is_empty() {
        bail!("A title is required");
    }
    if summary.is_empty() {
        bail!("A summary is required");
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Could not generate a slug from title {:?}", title);
    }

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();

    // Broken or duplicated posts elsewhere do not block authoring
    let existing = blog.loader().slug_sources()?.remove(&slug);

    if existing.is_some() && !post.overwrite {
        bail!(
            "Slug already exists: {}. Use --overwrite to replace it.",
            slug
        );
    }

    let target = existing
        .clone()
        .unwrap_or_else(|| blog.content_dir.join(format!("{}-{}.md", date, slug)));
    if existing.is_none() && target.exists() && !post.overwrite {
        bail!("File already exists: {:?}", target);
    }

    let meta = PostMeta {
        title: title.to_string(),
        date,
        tags: post
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        summary: summary.to_string(),
        slug,
    };
    let source = meta.to_source(&post.body)?;

    // Never write something the loader would reject
    let (fm, _) = FrontMatter::parse(&source)?;
    if PostMeta::from_front_matter(&fm)? != meta {
        bail!("Generated front matter does not round-trip for {:?}", meta.slug);
    }

    fs::create_dir_all(&blog.content_dir)?;
    fs::write(&target, source)?;
    tracing::info!("Created post {:?} at {:?}", meta.slug, target);

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            summary: "Short summary".to_string(),
            tags: vec![" rust ".to_string(), "".to_string()],
            body: "Hello **world**.".to_string(),
            overwrite: false,
        }
    }

    #[test]
    fn test_create_post_is_loadable() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());

        let path = create_post(&blog, &new_post("Hello, World!")).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("-hello-world.md"));

        let post = blog.loader().get_post("hello-world").unwrap().unwrap();
        assert_eq!(post.title, "Hello, World!");
        assert_eq!(post.tags, vec!["rust"]);
        assert_eq!(post.summary, "Short summary");
        assert!(post.html.contains("<strong>world</strong>"));
    }

    #[test]
    fn test_existing_slug_needs_overwrite() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());

        let first = create_post(&blog, &new_post("Same Title")).unwrap();
        assert!(create_post(&blog, &new_post("Same Title")).is_err());

        let mut again = new_post("Same Title");
        again.overwrite = true;
        again.body = "Second version.".to_string();
        let second = create_post(&blog, &again).unwrap();

        assert_eq!(first, second);
        let post = blog.loader().get_post("same-title").unwrap().unwrap();
        assert_eq!(post.html, "<p>Second version.</p>\n");
        assert_eq!(blog.loader().list_posts().unwrap().len(), 1);
    }

    #[test]
    fn test_broken_post_does_not_block_authoring() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(blog.content_dir.join("broken.md"), "---\ntitle: x\n---\n").unwrap();

        let path = create_post(&blog, &new_post("Fresh")).unwrap();
        assert!(path.is_file());
        assert!(blog.content_dir.join("broken.md").is_file());
    }

    #[test]
    fn test_title_without_slug_characters() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());
        assert!(create_post(&blog, &new_post("!!!")).is_err());
        assert!(create_post(&blog, &new_post("   ")).is_err());
    }

    #[test]
    fn test_summary_required() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_config(tmp.path(), SiteConfig::default());
        let mut post = new_post("Title");
        post.summary = " ".to_string();
        assert!(create_post(&blog, &post).is_err());
    }
}
