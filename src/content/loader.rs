//! Content loader - loads posts from the content directory

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, FrontMatterError, MarkdownRenderer, Post, PostMeta};
use crate::config::DuplicateSlugs;
use crate::routes;
use crate::Blog;

/// Errors that abort a content scan
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed front matter in {}", path.display())]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error(
        "duplicate slug `{slug}` in {} (already used by {})",
        duplicate.display(),
        first.display()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        duplicate: PathBuf,
    },
}

impl ContentError {
    /// Name of the offending front-matter field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ContentError::MalformedFrontMatter {
                source: FrontMatterError::Field { field, .. },
                ..
            } => Some(*field),
            _ => None,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        ContentError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn malformed(path: &Path, source: FrontMatterError) -> Self {
        ContentError::MalformedFrontMatter {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads posts from a single content directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
    root: PathBuf,
    duplicates: DuplicateSlugs,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for `content_dir`
    ///
    /// Source paths are reported relative to `content_dir` until a project
    /// root is set with [`ContentLoader::with_root`].
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        let content_dir = content_dir.into();
        Self {
            root: content_dir.clone(),
            content_dir,
            duplicates: DuplicateSlugs::default(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Create a loader configured from a site
    pub fn from_blog(blog: &Blog) -> Self {
        let markdown = &blog.config.markdown;
        Self::new(&blog.content_dir)
            .with_root(&blog.base_dir)
            .with_duplicate_slugs(blog.config.duplicate_slugs)
            .with_renderer(MarkdownRenderer::with_options(markdown.gfm, markdown.raw_html))
    }

    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_duplicate_slugs(mut self, duplicates: DuplicateSlugs) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Read and validate every post in the content directory
    ///
    /// A missing directory is an empty site. Any invalid file fails the
    /// whole scan.
    pub fn scan(&self) -> Result<PostIndex, ContentError> {
        let mut index = PostIndex {
            posts: Vec::new(),
            sources: HashMap::new(),
            root: self.root.clone(),
            renderer: self.renderer,
        };

        for path in self.markdown_files()? {
            let path = path.as_path();
            let meta = read_post(path)?.0;
            tracing::debug!("Loaded post {:?} from {:?}", meta.slug, path);

            match index.sources.entry(meta.slug.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(path.to_path_buf());
                }
                Entry::Occupied(slot) => match self.duplicates {
                    DuplicateSlugs::Reject => {
                        return Err(ContentError::DuplicateSlug {
                            slug: meta.slug,
                            first: slot.get().clone(),
                            duplicate: path.to_path_buf(),
                        });
                    }
                    DuplicateSlugs::FirstWins => {
                        tracing::warn!(
                            "Slug {:?} in {:?} is already used by {:?}; the first file wins",
                            meta.slug,
                            path,
                            slot.get()
                        );
                    }
                },
            }

            index.posts.push(meta);
        }

        // Newest first; plain string order on the date field
        index.posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!(
            "Scanned {} posts in {:?}",
            index.posts.len(),
            self.content_dir
        );
        Ok(index)
    }

    /// Slug of every readable post and the file it comes from
    ///
    /// Unlike [`ContentLoader::scan`], files that fail to load are skipped
    /// and a repeated slug keeps its first file by name.
    pub fn slug_sources(&self) -> Result<BTreeMap<String, PathBuf>, ContentError> {
        let mut sources = BTreeMap::new();
        for path in self.markdown_files()? {
            match read_post(&path) {
                Ok((meta, _)) => {
                    sources.entry(meta.slug).or_insert(path);
                }
                Err(e) => tracing::warn!("Skipping {:?}: {:#}", path, anyhow::Error::from(e)),
            }
        }
        Ok(sources)
    }

    /// Markdown files directly inside the content directory, sorted by name
    fn markdown_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        if !self.content_dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.content_dir.as_path()).to_path_buf();
                ContentError::io(&path, e.into())
            })?;
            if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// All post metadata, newest first
    pub fn list_posts(&self) -> Result<Vec<PostMeta>, ContentError> {
        Ok(self.scan()?.into_posts())
    }

    /// Slugs of every detail page
    pub fn enumerate_slugs(&self) -> Result<BTreeSet<String>, ContentError> {
        Ok(routes::enumerate_slugs(self.scan()?.posts()))
    }

    /// Fully load one post; `None` when no post has this slug
    pub fn get_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        self.scan()?.load_post(slug)
    }
}

/// Result of one scan: validated metadata plus where each slug came from
#[derive(Debug, Clone)]
pub struct PostIndex {
    posts: Vec<PostMeta>,
    sources: HashMap<String, PathBuf>,
    root: PathBuf,
    renderer: MarkdownRenderer,
}

impl PostIndex {
    /// Metadata sorted by date, newest first
    pub fn posts(&self) -> &[PostMeta] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<PostMeta> {
        self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Source file a slug resolves to
    pub fn source_of(&self, slug: &str) -> Option<&Path> {
        self.sources.get(slug).map(PathBuf::as_path)
    }

    /// Re-read the file behind `slug` and render its body
    pub fn load_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let Some(path) = self.sources.get(slug) else {
            return Ok(None);
        };

        let (meta, body) = read_post(path)?;
        if meta.slug != slug {
            // Edited between the scan and this read
            tracing::warn!("{:?} no longer declares slug {:?}", path, slug);
            return Ok(None);
        }

        let source_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let html = self.renderer.render(&body);

        Ok(Some(Post {
            meta,
            markdown: body,
            html,
            source_path,
        }))
    }
}

/// Read one post file into validated metadata and its raw body
fn read_post(path: &Path) -> Result<(PostMeta, String), ContentError> {
    let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::malformed(path, e))?;
    let meta = PostMeta::from_front_matter(&fm).map_err(|e| ContentError::malformed(path, e))?;
    Ok((meta, body.to_string()))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase().ends_with(".md"))
        .unwrap_or(false)
}
