//! HTTP front end.
//!
//! Routes:
//! - `GET /` - empty search form
//! - `GET /lookup?q=<name>` - search form plus the lookup result
//! - `GET /static/*` - files from the configured static directory
//!
//! Every handled path answers 200 with HTML. A failed sheet refresh becomes a
//! bare 500; details only go to the log.

mod handlers;
pub mod template;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{Config, PageConfig};
use crate::error::{Error, Result};
use crate::finder::TableFinder;

pub use handlers::LookupParams;

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    /// The lookup service.
    pub finder: TableFinder,
    /// Page content.
    pub page: PageConfig,
}

impl AppState {
    /// Bundle a finder with page settings.
    #[must_use]
    pub fn new(finder: TableFinder, page: PageConfig) -> Self {
        Self { finder, page }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/", get(handlers::show_form))
        .route("/lookup", get(handlers::lookup))
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the address cannot
/// be bound, or the server fails.
pub async fn serve(config: &Config) -> Result<()> {
    let finder = TableFinder::from_config(config)?;
    let state = Arc::new(AppState::new(finder, config.page.clone()));
    let app = build_router(Arc::clone(&state), config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %listener.local_addr()?,
        sheet = %config.sheet.csv_url,
        cache_seconds = config.sheet.cache_seconds,
        threshold = config.matcher.threshold,
        "Starting tablefinder"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match state.finder.cached().await {
        Some(dataset) => tracing::info!(
            records = dataset.len(),
            fetched_at = %dataset.fetched_at(),
            "Server stopped"
        ),
        None => tracing::info!("Server stopped before the sheet was loaded"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
