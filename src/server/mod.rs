//! HTTP surface: `POST /parse`, `GET /health` and static files.

mod handlers;
mod types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::toml_config::TomlConfig;
use crate::core::etl::ParseEngine;
use crate::core::pipeline::CasparserPipeline;
use crate::core::StatementParser;

pub use handlers::{error_response, health_check, parse_statement};
pub use types::{ApiResponse, HealthResponse, UploadForm, MISSING_FILE, MISSING_PASSWORD};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<dyn StatementParser>,
}

impl AppState {
    pub fn new(parser: Arc<dyn StatementParser>) -> Self {
        Self { parser }
    }

    /// State backed by the real casparser pipeline
    pub fn from_config(config: TomlConfig) -> Self {
        let engine = ParseEngine::new(CasparserPipeline::new(config));
        Self::new(Arc::new(engine))
    }
}

/// Build the router with all endpoints
pub fn build_router(state: AppState, config: &TomlConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/parse", post(parse_statement))
        .fallback_service(ServeDir::new(config.static_dir()))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Start the server on the configured bind address
pub async fn start_server(config: TomlConfig) -> Result<(), std::io::Error> {
    let addr = config.bind_address().to_string();
    tracing::info!("Starting server on {}", addr);

    let app = build_router(AppState::from_config(config.clone()), &config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running at http://{}", listener.local_addr()?);

    serve(listener, app).await
}
