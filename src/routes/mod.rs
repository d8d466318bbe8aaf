//! Route projection - maps scanned posts onto the pages of the site
//!
//! Three views come out of a [`PostIndex`]:
//!
//! - the listing (every post, newest first, unchanged),
//! - the set of detail routes (one per distinct slug),
//! - a single detail page, or `None` when the slug is unknown.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{ContentError, Post, PostIndex, PostMeta};
use crate::helpers::{blog_url, post_url};

/// Number of posts shown on the home page
pub const HOME_RECENT_POSTS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("slug {0:?} cannot be used as a page path")]
    UnsafeSlug(String),

    #[error("slug {slug:?} would overwrite the listing page {}", listing.display())]
    CollidesWithListing { slug: String, listing: PathBuf },
}

/// Deduplicated slugs of a metadata list
pub fn enumerate_slugs(posts: &[PostMeta]) -> BTreeSet<String> {
    posts.iter().map(|p| p.slug.clone()).collect()
}

/// A post as it appears on the listing page
#[derive(Debug, Clone, Serialize)]
pub struct ListedPost {
    #[serde(flatten)]
    pub meta: PostMeta,
    pub url: String,
}

/// The listing page
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub url: String,
    pub posts: Vec<ListedPost>,
}

/// A single post page
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub url: String,
    pub post: Post,
}

/// A static detail page to materialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub slug: String,
    pub url: String,
    /// Output file, relative to the public directory
    pub output: PathBuf,
}

/// Projects posts onto URLs and output files for one site configuration
pub struct RouteProjector<'a> {
    config: &'a SiteConfig,
}

impl<'a> RouteProjector<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Full sorted listing, with each entry's link
    pub fn index_view(&self, posts: &[PostMeta]) -> IndexView {
        IndexView {
            url: blog_url(self.config),
            posts: posts
                .iter()
                .map(|meta| ListedPost {
                    url: post_url(self.config, &meta.slug),
                    meta: meta.clone(),
                })
                .collect(),
        }
    }

    /// Newest posts for the home page
    pub fn home_view(&self, posts: &[PostMeta]) -> Vec<ListedPost> {
        self.index_view(&posts[..posts.len().min(HOME_RECENT_POSTS)])
            .posts
    }

    /// Load one post page; `None` means not found
    pub fn detail_view(
        &self,
        index: &PostIndex,
        slug: &str,
    ) -> Result<Option<DetailView>, ContentError> {
        Ok(index.load_post(slug)?.map(|post| DetailView {
            url: post_url(self.config, &post.slug),
            post,
        }))
    }

    /// Every detail page to build, one per distinct slug
    pub fn detail_routes(&self, posts: &[PostMeta]) -> Result<Vec<Route>, RouteError> {
        enumerate_slugs(posts)
            .into_iter()
            .map(|slug| {
                let output = self.detail_output(&slug)?;
                Ok(Route {
                    url: post_url(self.config, &slug),
                    slug,
                    output,
                })
            })
            .collect()
    }

    /// Directory of the listing and detail pages, relative to the public directory
    pub fn blog_dir(&self) -> &str {
        self.config.blog_dir.trim_matches('/')
    }

    /// Output file of the listing page
    pub fn listing_output(&self) -> PathBuf {
        if self.config.trailing_slash {
            PathBuf::from(self.blog_dir()).join("index.html")
        } else {
            PathBuf::from(format!("{}.html", self.blog_dir()))
        }
    }

    fn detail_output(&self, slug: &str) -> Result<PathBuf, RouteError> {
        if !is_safe_segment(slug) {
            return Err(RouteError::UnsafeSlug(slug.to_string()));
        }

        let dir = PathBuf::from(self.blog_dir());
        let (output, owned) = if self.config.trailing_slash {
            let page_dir = dir.join(slug);
            (page_dir.join("index.html"), page_dir)
        } else {
            let page = dir.join(format!("{}.html", slug));
            (page.clone(), page)
        };

        // The page (or the directory it creates) must not land on the listing file
        let listing = self.listing_output();
        if listing.starts_with(&owned) {
            return Err(RouteError::CollidesWithListing {
                slug: slug.to_string(),
                listing,
            });
        }
        Ok(output)
    }
}

/// Whether a slug maps onto exactly one path segment
fn is_safe_segment(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use std::fs;
    use tempfile::TempDir;

    fn meta(slug: &str, date: &str) -> PostMeta {
        PostMeta {
            title: slug.to_uppercase(),
            date: date.to_string(),
            tags: Vec::new(),
            summary: "s".to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_enumerate_slugs_dedups() {
        let posts = vec![
            meta("a", "2024-03-01"),
            meta("b", "2024-02-01"),
            meta("a", "2024-01-01"),
        ];
        let slugs = enumerate_slugs(&posts);
        assert_eq!(slugs.len(), 2);
        assert!(slugs.contains("a"));
        assert!(slugs.contains("b"));
    }

    #[test]
    fn test_index_view_keeps_order() {
        let config = SiteConfig::default();
        let posts = vec![meta("b", "2024-06-01"), meta("a", "2024-01-01")];
        let view = RouteProjector::new(&config).index_view(&posts);

        assert_eq!(view.url, "/blog/");
        let slugs: Vec<_> = view.posts.iter().map(|p| p.meta.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(view.posts[1].url, "/blog/a/");
        assert_eq!(view.posts[0].meta, posts[0]);
    }

    #[test]
    fn test_detail_routes() {
        let config = SiteConfig {
            base_path: "/site".to_string(),
            ..Default::default()
        };
        let posts = vec![meta("b", "2024-06-01"), meta("a", "2024-01-01")];
        let routes = RouteProjector::new(&config).detail_routes(&posts).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].slug, "a");
        assert_eq!(routes[0].url, "/site/blog/a/");
        assert_eq!(routes[0].output, PathBuf::from("blog/a/index.html"));
    }

    #[test]
    fn test_detail_routes_without_trailing_slash() {
        let config = SiteConfig {
            trailing_slash: false,
            ..Default::default()
        };
        let projector = RouteProjector::new(&config);
        let routes = projector.detail_routes(&[meta("a", "2024-01-01")]).unwrap();
        assert_eq!(routes[0].output, PathBuf::from("blog/a.html"));
        assert_eq!(projector.listing_output(), PathBuf::from("blog.html"));
    }

    #[test]
    fn test_unsafe_slugs_rejected() {
        let config = SiteConfig::default();
        let projector = RouteProjector::new(&config);
        for slug in ["..", ".", "a/b", "a\\b"] {
            assert_eq!(
                projector.detail_routes(&[meta(slug, "2024-01-01")]),
                Err(RouteError::UnsafeSlug(slug.to_string()))
            );
        }
    }

    #[test]
    fn test_slug_colliding_with_listing_rejected() {
        let config = SiteConfig::default();
        let projector = RouteProjector::new(&config);
        assert_eq!(
            projector.detail_routes(&[meta("index.html", "2024-01-01")]),
            Err(RouteError::CollidesWithListing {
                slug: "index.html".to_string(),
                listing: PathBuf::from("blog/index.html"),
            })
        );

        // Without trailing slashes the listing lives outside the blog directory
        let config = SiteConfig {
            trailing_slash: false,
            ..Default::default()
        };
        let routes = RouteProjector::new(&config)
            .detail_routes(&[meta("index.html", "2024-01-01")])
            .unwrap();
        assert_eq!(routes[0].output, PathBuf::from("blog/index.html.html"));
    }

    #[test]
    fn test_home_view_takes_newest() {
        let config = SiteConfig::default();
        let posts: Vec<_> = (1..=7)
            .rev()
            .map(|day| meta(&format!("p{day}"), &format!("2024-01-0{day}")))
            .collect();

        let home = RouteProjector::new(&config).home_view(&posts);
        assert_eq!(home.len(), HOME_RECENT_POSTS);
        assert_eq!(home[0].meta.slug, "p7");
        assert_eq!(home[4].url, "/blog/p3/");

        assert!(RouteProjector::new(&config).home_view(&[]).is_empty());
    }

    #[test]
    fn test_detail_view() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("a.md"),
            "---\ntitle: A\ndate: 2024-01-01\nsummary: s\nslug: a\n---\nBody\n",
        )
        .unwrap();

        let index = ContentLoader::new(tmp.path()).scan().unwrap();
        let config = SiteConfig::default();
        let projector = RouteProjector::new(&config);

        let view = projector.detail_view(&index, "a").unwrap().unwrap();
        assert_eq!(view.url, "/blog/a/");
        assert_eq!(view.post.title, "A");
        assert_eq!(view.post.html, "<p>Body</p>\n");

        assert!(projector.detail_view(&index, "b").unwrap().is_none());
    }
}
