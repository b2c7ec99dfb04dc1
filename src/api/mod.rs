//! HTTP route definitions
//!
//! The API is GraphQL at /graphql; health probes sit alongside it.

pub mod graphql;
pub mod health;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .route("/graphql", get(graphql::graphiql).post(graphql::graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
