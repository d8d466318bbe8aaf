//! Live-preview server
//!
//! Every page request re-scans the content directory and renders the page
//! from scratch, so edits show up on the next reload without a rebuild.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes::RouteProjector;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    renderer: TemplateRenderer,
}

/// Route patterns served by the preview server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    pub home: Vec<String>,
    pub listing: Vec<String>,
    pub detail: Vec<String>,
}

impl RoutePaths {
    /// Patterns for a site, with and without trailing slashes
    pub fn for_blog(blog: &Blog) -> Self {
        let base = blog.config.base_path.trim_end_matches('/');
        let listing = format!("{}/{}", base, blog.config.blog_dir.trim_matches('/'));

        let home = if base.is_empty() {
            vec!["/".to_string()]
        } else {
            vec![base.to_string(), format!("{}/", base)]
        };

        Self {
            home,
            detail: vec![format!("{}/:slug", listing), format!("{}/:slug/", listing)],
            listing: vec![listing.clone(), format!("{}/", listing)],
        }
    }
}

/// Start the preview server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!(
        "http://{}:{}{}",
        ip,
        port,
        crate::helpers::url_for(&blog.config, "/")
    );
    println!("Server running at {}", url);
    println!("Pages are rendered from {:?} on every request.", blog.content_dir);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        renderer: TemplateRenderer::new(&blog.config)?,
    });

    let paths = RoutePaths::for_blog(blog);
    let mut app = Router::new();
    for path in &paths.home {
        app = app.route(path, get(home_handler));
    }
    for path in &paths.listing {
        app = app.route(path, get(listing_handler));
    }
    for path in &paths.detail {
        app = app.route(path, get(detail_handler));
    }

    Ok(app
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    render_page(state, |state| {
        let index = state.blog.loader().scan()?;
        let recent = RouteProjector::new(&state.blog.config).home_view(index.posts());
        Ok(Some(state.renderer.render_home(&recent)?))
    })
    .await
}

async fn listing_handler(State(state): State<Arc<ServerState>>) -> Response {
    render_page(state, |state| {
        let index = state.blog.loader().scan()?;
        let view = RouteProjector::new(&state.blog.config).index_view(index.posts());
        Ok(Some(state.renderer.render_listing(&view)?))
    })
    .await
}

async fn detail_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    render_page(state, move |state| {
        let index = state.blog.loader().scan()?;
        match RouteProjector::new(&state.blog.config).detail_view(&index, &slug)? {
            Some(detail) => Ok(Some(state.renderer.render_post(&detail)?)),
            None => Ok(None),
        }
    })
    .await
}

/// Run a page render on the blocking pool; `None` becomes the 404 page
async fn render_page<F>(state: Arc<ServerState>, render: F) -> Response
where
    F: FnOnce(&ServerState) -> Result<Option<String>> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || -> Result<(StatusCode, String)> {
        match render(&state)? {
            Some(html) => Ok((StatusCode::OK, html)),
            None => Ok((StatusCode::NOT_FOUND, state.renderer.render_not_found()?)),
        }
    })
    .await;

    match result {
        Ok(Ok((status, html))) => (status, Html(html)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render page: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render page: {:#}", e),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Serve files from the public directory, or the 404 page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.blog.public_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => match state.renderer.render_not_found() {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        },
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
