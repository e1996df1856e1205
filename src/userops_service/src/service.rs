use axum::{
    Router,
    http::{HeaderValue, Method, header, request},
    routing::post,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use userops_adapters::{
    config::AllowedOrigins,
    http::{
        CallableState,
        routes::{delete_user_by_uid, update_user_auth},
    },
};
use userops_core::{DocumentStore, IdentityProvider};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// Service exposing the user administration callables.
pub struct UserOpsService {
    router: Router,
}

impl UserOpsService {
    /// Create a new UserOpsService over the given state
    ///
    /// # Arguments
    /// * `state` - Identity provider, document store, token verifier and policies.
    ///   Built once at startup and shared read-only by every request.
    pub fn new<I, D>(state: CallableState<I, D>) -> Self
    where
        I: IdentityProvider + Clone + 'static,
        D: DocumentStore + Clone + 'static,
    {
        let router = Router::new()
            .route("/deleteUserByUid", post(delete_user_by_uid::<I, D>))
            .route("/updateUserAuth", post(update_user_auth::<I, D>))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the UserOpsService into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins.filter(|origins| !origins.is_empty()) {
            let cors = CorsLayer::new()
                .allow_methods([Method::POST])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server until ctrl-c
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("User ops service listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
