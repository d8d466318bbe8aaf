//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::routes::RouteProjector;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    let output = render(blog, content_type, json)?;
    print!("{}", output);
    Ok(())
}

/// Build the text printed by `run`
pub fn render(blog: &Blog, content_type: &str, json: bool) -> Result<String> {
    let index = blog.loader().scan()?;
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            if json {
                let view = RouteProjector::new(&blog.config).index_view(index.posts());
                out = serde_json::to_string_pretty(&view.posts)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Posts ({}):\n", index.len()));
                for post in index.posts() {
                    let source = index
                        .source_of(&post.slug)
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    out.push_str(&format!(
                        "  {} - {} [{}] {}\n",
                        post.date, post.title, post.slug, source
                    ));
                }
            }
        }
        "slug" | "slugs" | "route" | "routes" => {
            let routes = RouteProjector::new(&blog.config).detail_routes(index.posts())?;
            if json {
                let urls: BTreeMap<_, _> = routes.iter().map(|r| (&r.slug, &r.url)).collect();
                out = serde_json::to_string_pretty(&urls)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Routes ({}):\n", routes.len()));
                for route in &routes {
                    out.push_str(&format!("  {}\n", route.url));
                }
            }
        }
        "tag" | "tags" => {
            let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
            for post in index.posts() {
                for tag in &post.tags {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            if json {
                out = serde_json::to_string_pretty(&tags)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Tags ({}):\n", tags.len()));
                let mut tags: Vec<_> = tags.into_iter().collect();
                tags.sort_by(|a, b| b.1.cmp(&a.1));
                for (tag, count) in tags {
                    out.push_str(&format!("  {} ({})\n", tag, count));
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, slug, tag",
                content_type
            );
        }
    }

    Ok(out)
}
