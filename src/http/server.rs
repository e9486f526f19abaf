//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the protected form endpoints and health check
//! - Wire up middleware (request ID, tracing, timeout, admission)
//! - Body size is enforced by the admission middleware so 413s stay JSON
//! - Bind server to listener and run until shutdown
//! - Own the sweep task for the lifetime of the server

use axum::{
    extract::State,
    middleware,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::forms::{FormProcessor, FormSubmission};
use crate::http::middleware::{admission_middleware, AdmissionState};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response;
use crate::lifecycle::Gate;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<dyn FormProcessor>,
}

/// HTTP server for the admission gate.
pub struct HttpServer {
    router: Router,
    gate: Gate,
}

impl HttpServer {
    /// Create a new HTTP server around `gate`, handing admitted submissions to `processor`.
    pub fn new(gate: Gate, processor: Arc<dyn FormProcessor>) -> Self {
        let state = AppState { processor };
        let router = Self::build_router(&gate, state);
        Self { router, gate }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(gate: &Gate, state: AppState) -> Router {
        let config = gate.config();
        let mut router = Router::new().route("/health", get(health_handler));

        for endpoint in &config.endpoints {
            let admission = AdmissionState {
                pipeline: gate.pipeline().clone(),
                endpoint: Arc::from(endpoint.path.as_str()),
                scope: Arc::from(endpoint.scope.as_str()),
                trusted_proxy_hops: config.listener.trusted_proxy_hops,
                max_body_size: config.security.max_body_size,
            };
            tracing::debug!(path = %endpoint.path, scope = %endpoint.scope, "Protecting endpoint");
            router = router.route(
                &endpoint.path,
                post(submit_handler)
                    .route_layer(middleware::from_fn_with_state(admission, admission_middleware)),
            );
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. The sweep task runs for exactly as long.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self.gate.start_sweeper();

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await;

        sweeper.stop().await;
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Hand an admitted submission to the form processor.
async fn submit_handler(
    State(state): State<AppState>,
    Extension(submission): Extension<FormSubmission>,
) -> Response {
    let endpoint = submission.endpoint.clone();
    let response = response::processed(state.processor.process(submission).await);
    metrics::record_response(&endpoint, response.status().as_u16());
    response
}
