use super::handlers::{self, AppState};
use super::metrics_handler::{metrics_handler, track_requests};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the Axum router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/version", get(handlers::version))
        .route("/robots.txt", get(handlers::robots))
        .route("/metrics", get(metrics_handler))
        // Cluster REST API endpoints
        .route("/clusters", post(handlers::create_cluster))
        .route(
            "/clusters/{id}",
            get(handlers::get_cluster)
                .put(handlers::register_node)
                .delete(handlers::delete_cluster),
        )
        .route_layer(middleware::from_fn(track_requests))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
