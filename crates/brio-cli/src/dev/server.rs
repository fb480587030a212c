//! Development server.
//!
//! `GET /__brio/config` returns the resolved configuration; every other
//! request is offered to the proxy and answered `404` when no rule matches.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use brio_config::ResolvedConfig;
use tower_http::cors::{Any, CorsLayer};

use crate::dev::DevConfig;
use crate::error::{CliError, Result};
use crate::proxy::ProxyEngine;

/// Route serving the resolved configuration as JSON.
pub const CONFIG_ROUTE: &str = "/__brio/config";

#[derive(Clone)]
struct AppState {
    resolved: Arc<ResolvedConfig>,
    engine: Arc<ProxyEngine>,
}

/// Development server.
pub struct DevServer {
    config: DevConfig,
    resolved: Arc<ResolvedConfig>,
    engine: Arc<ProxyEngine>,
}

impl DevServer {
    pub fn new(config: DevConfig, resolved: Arc<ResolvedConfig>, engine: Arc<ProxyEngine>) -> Self {
        Self {
            config,
            resolved,
            engine,
        }
    }

    /// Start the development server and run until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns error if server cannot bind to configured address
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr;
        let server_url = self.config.server_url();
        let app = router(self.resolved, self.engine, self.config.cors);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        crate::ui::success(&format!("Development server running at {}", server_url));
        tracing::debug!(%addr, host = %self.config.host, "dev server bound");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}

/// Build the dev server router.
pub fn router(resolved: Arc<ResolvedConfig>, engine: Arc<ProxyEngine>, cors: bool) -> Router {
    let app = Router::new()
        .route(CONFIG_ROUTE, get(handle_config))
        .fallback(handle_request)
        .with_state(AppState { resolved, engine });

    if cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

async fn handle_config(State(state): State<AppState>) -> Response {
    Json(state.resolved.as_ref()).into_response()
}

async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match state.engine.forward(request).await {
        Some(response) => response,
        None => {
            tracing::debug!(%method, %uri, "no proxy rule matched");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
