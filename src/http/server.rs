//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch every request through the live routing table
//! - Apply reloaded configuration by swapping the table

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::SiteConfig;
use crate::http::endpoint::{RequestContext, SiteEndpoint};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{BuildError, Dispatch, SharedRoutes};
use crate::site::build_routes;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<SharedRoutes<SiteEndpoint>>,
}

/// HTTP front end of the site.
pub struct HttpServer {
    router: Router,
    config: SiteConfig,
    routes: Arc<SharedRoutes<SiteEndpoint>>,
}

impl HttpServer {
    /// Build the routing table for `config` and the app around it.
    pub fn new(config: SiteConfig) -> Result<Self, BuildError> {
        let table = build_routes(&config)?;
        tracing::info!(
            rules = table.len(),
            named_routes = table.named_routes().len(),
            "Routing table built"
        );

        let routes = Arc::new(SharedRoutes::new(table));
        let state = AppState {
            routes: routes.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            routes,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Handle to the live table, for reloading from outside the server.
    pub fn routes(&self) -> Arc<SharedRoutes<SiteEndpoint>> {
        self.routes.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires (or its sender is dropped).
    ///
    /// Every config received on `config_updates` is compiled into a new
    /// table and swapped in; one that fails to build is logged and ignored.
    /// Listener and timeout changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let routes = self.routes.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        let reloader = tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            apply_config(&routes, &config);
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the table from `config` and swap it in.
///
/// Returns false, leaving the current table in place, if the new
/// declaration does not build.
pub fn apply_config(routes: &SharedRoutes<SiteEndpoint>, config: &SiteConfig) -> bool {
    match build_routes(config) {
        Ok(table) => {
            routes.replace(table);
            metrics::record_reload(true);
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Reloaded routes rejected, keeping current table");
            metrics::record_reload(false);
            false
        }
    }
}

/// The single entry point: every request path goes through the table.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    // Site convention: routes are declared without the leading slash.
    let full_path = request.uri().path();
    let path = full_path.strip_prefix('/').unwrap_or(full_path);

    let table = state.routes.load();
    match table.dispatch(path) {
        Dispatch::Matched(route) => {
            let name = route.qualified_name();
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = ?name,
                remaining = %route.remaining,
                "Route matched"
            );

            let ctx = RequestContext {
                method: &method,
                path,
                route: &route,
                table: &table,
            };
            let response = route.endpoint.respond(&ctx);
            metrics::record_request(method.as_str(), name.as_deref(), response.status().as_u16(), start);
            response
        }
        Dispatch::NotFound => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_not_found(method.as_str());
            response::not_found()
        }
    }
}
