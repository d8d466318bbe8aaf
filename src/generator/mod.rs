//! Generator module - writes the static site using the built-in templates

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::content::PostIndex;
use crate::routes::RouteProjector;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
        })
    }

    /// Generate the entire site from one scan; returns the number of pages written
    pub fn generate(&self, index: &PostIndex) -> Result<usize> {
        let projector = RouteProjector::new(&self.blog.config);

        // Check every route and the stale subtree before touching the output directory
        let routes = projector.detail_routes(index.posts())?;
        let stale = self.blog.public_dir.join(projector.blog_dir());
        self.blog.ensure_disposable(&stale)?;

        fs::create_dir_all(&self.blog.public_dir)?;
        if stale.is_dir() {
            fs::remove_dir_all(&stale)?;
            tracing::debug!("Deleted: {:?}", stale);
        }

        let recent = projector.home_view(index.posts());
        let view = projector.index_view(index.posts());

        self.write_page(Path::new("index.html"), &self.renderer.render_home(&recent)?)?;
        self.write_page(
            &projector.listing_output(),
            &self.renderer.render_listing(&view)?,
        )?;

        for route in &routes {
            let Some(detail) = projector.detail_view(index, &route.slug)? else {
                bail!("Post {:?} disappeared while generating", route.slug);
            };
            self.write_page(&route.output, &self.renderer.render_post(&detail)?)?;
        }

        self.write_page(Path::new("404.html"), &self.renderer.render_not_found()?)?;

        Ok(routes.len() + 3)
    }

    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}
