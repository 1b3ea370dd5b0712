//! Request-time server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use folio_static::assets::AssetPipeline;
use folio_static::{
    arrange, listing_items, load_blog_index, render_post, HomePage, IndexError, IndexPage,
    ListingOptions, Mode, PostError, SiteContext, TemplateEngine, RECENT_POSTS,
};

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory holding the posts
    pub blog_dir: PathBuf,

    /// Directory served for every other path
    pub public_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Drafts are listed in development mode
    pub mode: Mode,

    /// Site title
    pub title: String,

    /// Site description for the home page
    pub description: String,

    /// Base URL
    pub base_url: String,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("blog"),
            public_dir: PathBuf::from("public"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            mode: Mode::Development,
            title: "Blog".to_string(),
            description: String::new(),
            base_url: "/".to_string(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Post(#[from] PostError),

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Generation failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    templates: TemplateEngine,
}

impl ServerState {
    fn site(&self) -> SiteContext {
        SiteContext {
            site_title: self.config.title.clone(),
            description: self.config.description.clone(),
            base_url: self.config.base_url.clone(),
        }
    }

    fn options(&self) -> ListingOptions {
        ListingOptions::from(self.config.mode)
    }

    /// Run a generation pass and render the home page.
    async fn render_home(&self) -> Result<String, ServerError> {
        let entries = load_blog_index(&self.config.blog_dir).await?;
        let mut recent = listing_items(&entries, self.options(), &self.config.base_url);
        recent.truncate(RECENT_POSTS);

        Ok(self.templates.render_home(&self.site(), &HomePage { recent })?)
    }

    /// Run a generation pass and render the index.
    async fn render_index(&self) -> Result<String, ServerError> {
        let entries = load_blog_index(&self.config.blog_dir).await?;
        let page = IndexPage {
            posts: listing_items(&entries, self.options(), &self.config.base_url),
        };

        Ok(self.templates.render_index(&self.site(), &page)?)
    }

    /// Render the post with `slug`, or `None` if it is unknown or hidden.
    async fn render_post(&self, slug: &str) -> Result<Option<String>, ServerError> {
        let entries = load_blog_index(&self.config.blog_dir).await?;

        let Some(entry) = arrange(&entries, self.options())
            .into_iter()
            .find(|entry| entry.slug() == slug)
        else {
            return Ok(None);
        };

        let post = render_post(&self.config.blog_dir, entry)?;
        let html = self.templates.render_post(&self.site(), &post.into_page())?;

        Ok(Some(html))
    }
}

/// Blog server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            config: self.config.clone(),
            templates: TemplateEngine::new(),
        });

        Router::new()
            .route("/", get(home_handler))
            .route("/blog", get(index_handler))
            .route("/blog/", get(index_handler))
            .route("/blog/{slug}", get(post_handler))
            .route("/assets/main.css", get(css_handler))
            .fallback_service(ServeDir::new(&self.config.public_dir))
            .with_state(state)
    }

    /// Start the server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{}", e)))?;

        let app = self.router();

        tracing::info!(
            "Serving {} ({} mode) at http://{}/blog",
            self.config.blog_dir.display(),
            self.config.mode,
            addr
        );

        if self.config.open {
            let url = format!("http://{}/blog", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.render_home().await {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for the blog index.
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.render_index().await {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for a single post.
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.render_post(&slug).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => match state.templates.render_not_found(&state.site()) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => ServerError::from(e).into_response(),
        },
        Err(e) => e.into_response(),
    }
}

/// Handler for the stylesheet.
async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::generate_css(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn site(mode: Mode) -> (TempDir, Arc<ServerState>) {
        let temp = tempdir().unwrap();
        let blog = temp.path().join("blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("hello-world.mdx"),
            "---\ntitle: Hello World\nsubtitle: First\ndate: 2022-02-15\n---\n# Hello\n",
        )
        .unwrap();
        fs::write(
            blog.join("upcoming.mdx"),
            "---\ntitle: Upcoming\nsubtitle: Soon\ndate: 2023-01-01\ndraft: true\n---\n# Soon\n",
        )
        .unwrap();

        let state = Arc::new(ServerState {
            config: DevServerConfig {
                blog_dir: blog,
                public_dir: temp.path().join("public"),
                mode,
                open: false,
                ..Default::default()
            },
            templates: TemplateEngine::new(),
        });

        (temp, state)
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.mode, Mode::Development);
    }

    #[tokio::test]
    async fn development_index_lists_drafts() {
        let (_temp, state) = site(Mode::Development);

        let response = index_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.find("Upcoming").unwrap() < html.find("Hello World").unwrap());
    }

    #[tokio::test]
    async fn home_page_is_served() {
        let (_temp, state) = site(Mode::Production);

        let response = home_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains(r#"<a href="&#x2f;" class="nav-logo">"#));
        assert!(html.contains("Hello World"));
        assert!(!html.contains("Upcoming"));
    }

    #[tokio::test]
    async fn routes_root_to_home_page() {
        use tower::ServiceExt;

        let (_temp, state) = site(Mode::Development);
        let server = DevServer::new(state.config.clone());

        let response = server
            .router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("Upcoming"));
    }

    #[tokio::test]
    async fn production_hides_drafts() {
        let (_temp, state) = site(Mode::Production);

        let html = body(index_handler(State(Arc::clone(&state))).await).await;
        assert!(html.contains("Hello World"));
        assert!(!html.contains("Upcoming"));

        let response = post_handler(State(state), Path("upcoming".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("Post not found :("));
    }

    #[tokio::test]
    async fn renders_post() {
        let (_temp, state) = site(Mode::Production);

        let response = post_handler(State(state), Path("hello-world".to_string())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("<title>Hello World - Blog</title>"));
        assert!(html.contains(r#"<h1 id="hello">"#));
    }

    #[tokio::test]
    async fn broken_post_is_server_error() {
        let (temp, state) = site(Mode::Production);
        fs::write(temp.path().join("blog/broken.mdx"), "no metadata").unwrap();

        let response = index_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(response).await.contains("broken.mdx"));
    }
}
