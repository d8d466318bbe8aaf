//! Post models

use serde::Serialize;

use super::frontmatter::{FrontMatter, FrontMatterError};

/// Metadata of a blog post, as shown on the listing page
///
/// Field order is the order written back out by `mdblog new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMeta {
    /// Post title
    pub title: String,

    /// Publication date, compared as a plain string (e.g. `2024-06-01`)
    pub date: String,

    /// Post tags
    pub tags: Vec<String>,

    /// One-line summary for the listing
    pub summary: String,

    /// Route segment of the detail page
    pub slug: String,
}

impl PostMeta {
    /// Validate untyped front-matter into post metadata
    pub fn from_front_matter(fm: &FrontMatter) -> Result<Self, FrontMatterError> {
        Ok(Self {
            title: fm.required_str("title")?,
            date: fm.required_str("date")?,
            tags: fm.string_list("tags")?,
            summary: fm.required_str("summary")?,
            slug: fm.required_str("slug")?,
        })
    }

    /// Render this metadata and a body as a complete post file
    pub fn to_source(&self, body: &str) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n\n{}\n", yaml, body.trim()))
    }
}

/// A fully loaded blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Raw markdown body (front-matter stripped)
    pub markdown: String,

    /// Rendered HTML body
    pub html: String,

    /// Source file path, relative to the project root
    pub source_path: String,
}

impl std::ops::Deref for Post {
    type Target = PostMeta;

    fn deref(&self) -> &PostMeta {
        &self.meta
    }
}
