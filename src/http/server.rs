//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Mount the handler under the configured path prefix
//! - Wire up middleware (request ID, tracing, HEAD rejection, body limit, panic catching)
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ConverterConfig;
use crate::conversion::types::ConversionResult;
use crate::conversion::{ConversionEngine, LookupClient};
use crate::http::handlers;
use crate::http::page::MANIFEST_PATH;
use crate::http::request::{request_id_of, UuidRequestId, X_REQUEST_ID};
use crate::http::response::panic_response;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: ConversionEngine,
    pub mount_path: Arc<str>,
    pub max_body_bytes: usize,
    /// Deadline for one conversion, decoding and lookups included.
    pub request_timeout: Duration,
}

/// HTTP server for the recipe unit converter.
pub struct HttpServer {
    router: Router,
    config: ConverterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ConverterConfig) -> ConversionResult<Self> {
        let client = LookupClient::new(&config.upstream)?;
        let engine = ConversionEngine::new(client, config.upstream.max_concurrency);

        let state = AppState {
            engine,
            mount_path: Arc::from(config.listener.mount_path.as_str()),
            max_body_bytes: config.limits.max_body_bytes,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Deadline and body limit failures come back from the convert handler
    /// as JSON errors.
    fn build_router(config: &ConverterConfig, state: AppState) -> Router {
        let routes = Router::new()
            .route(MANIFEST_PATH, converting(get(handlers::manifest)))
            .route("/", converting(get(handlers::form_page)))
            .route("/{*path}", converting(get(handlers::form_page)))
            .layer(middleware::from_fn(handlers::reject_head))
            .with_state(state);

        let mount = config.listener.mount_path.as_str();
        let router = if mount.is_empty() || mount == "/" {
            routes
        } else {
            Router::new().nest(mount, routes)
        };

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(CatchPanicLayer::custom(panic_response));

        router
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(layers)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown_rx` fires.
    pub async fn run(self, listener: TcpListener, shutdown_rx: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.listener.mount_path,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }
}

/// POST converts, anything that is neither GET nor POST is rejected.
fn converting(get_route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    get_route.post(handlers::convert).fallback(handlers::method_not_allowed)
}
