//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for every
//! `.html` template; rendered post bodies are marked `safe` in `post.html`.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{blog_url, url_for};
use crate::routes::{DetailView, IndexView, ListedPost};

/// Template renderer with the default theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("home.html", include_str!("default/home.html")),
            ("listing.html", include_str!("default/listing.html")),
            ("post.html", include_str!("default/post.html")),
            ("404.html", include_str!("default/404.html")),
        ])?;

        Ok(Self {
            tera,
            site: SiteData::from_config(config),
        })
    }

    /// Home page with the newest posts
    pub fn render_home(&self, recent: &[ListedPost]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("recent", recent);
        self.render("home.html", &context)
    }

    /// Listing page
    pub fn render_listing(&self, index: &IndexView) -> Result<String> {
        let mut context = self.base_context();
        context.insert("index", index);
        self.render("listing.html", &context)
    }

    /// Detail page of one post
    pub fn render_post(&self, detail: &DetailView) -> Result<String> {
        let mut context = self.base_context();
        context.insert("detail", detail);
        self.render("post.html", &context)
    }

    /// Not-found page
    pub fn render_not_found(&self) -> Result<String> {
        self.render("404.html", &self.base_context())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-wide values available to every template as `site`
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub home_url: String,
    pub blog_url: String,
}

impl SiteData {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            home_url: url_for(config, "/"),
            blog_url: blog_url(config),
        }
    }
}
