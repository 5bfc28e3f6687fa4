//! Router assembly

use crate::{routes, AppState};
use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(routes::health_check))

        // Tariffs
        .route("/api/tariffs", any(routes::tariffs::lookup))

        // Decision tree
        .route("/api/decision-tree/questions", get(routes::decision_tree::list_questions))
        .route("/api/decision-tree/outcomes", get(routes::decision_tree::list_outcomes))
        .route("/api/decision-tree/start", post(routes::decision_tree::start))
        .route("/api/decision-tree/answer", post(routes::decision_tree::answer))
        .route("/api/decision-tree/back", post(routes::decision_tree::back))
        .route("/api/decision-tree/evaluate", post(routes::decision_tree::evaluate))
        .route("/api/decision-tree/export", post(routes::decision_tree::export))

        // Engagement
        .route("/api/engagement/login", post(routes::engagement::login))
        .route("/api/engagement/logout", post(routes::engagement::logout))
        .route(
            "/api/engagement/tags",
            get(routes::engagement::get_tags).post(routes::engagement::modify_tag),
        )

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state)
}
