use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json,
};
use log::{debug, info};
use std::{
    net::{Ipv6Addr, SocketAddr},
    path::PathBuf,
    time::Instant,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

mod auth;
mod context;
mod docs;
mod errors;
mod schemas;
mod serialized;
mod songs;

pub use auth::Session;
pub use context::ServerContext;
pub use errors::{ServerError, ServerResult};

use serialized::Confirmation;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 3000;

/// Request bodies are small JSON documents
const BODY_LIMIT_IN_BYTES: usize = 16 * 1024;

pub type Router = axum::Router<ServerContext>;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory the web client is served from
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Builds the full application: the JSON API, the docs and the static web client
pub fn app(context: ServerContext, static_dir: impl Into<PathBuf>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .merge(auth::router())
        .merge(songs::router());

    Router::new()
        .nest("/api", api_router)
        .route("/health", get(health))
        .route("/api.json", get(docs::docs))
        .fallback_service(ServeDir::new(static_dir.into()))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_IN_BYTES))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(context)
}

/// Starts the radio server
pub async fn run_server(context: ServerContext, config: ServerConfig) -> std::io::Result<()> {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, config.port).into();
    let listener = TcpListener::bind(&addr).await?;

    debug!("Serving static files from {}", config.static_dir.display());
    info!("Radio is running at http://localhost:{}", config.port);

    axum::serve(listener, app(context, config.static_dir)).await
}

async fn health() -> Json<Confirmation> {
    Json(Confirmation::ok())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "{} {} {} - {}ms",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
