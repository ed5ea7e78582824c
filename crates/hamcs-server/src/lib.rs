//! hamcs-server
//!
//! HTTP layer for the HAMCS decision memory. Owns routing, JSON shapes and
//! CORS; all matching and diffing is delegated to `hamcs-core`.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use hamcs_core::ports::{Clock, DecisionStore};

/// State shared across handlers.
///
/// The store is created once in `main` and injected here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DecisionStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn DecisionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

/// The front end is served from another origin; allow everything.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/", get(routes::home))
        .route("/api/health", get(routes::health))
        // Chat
        .route("/chat", post(routes::chat))
        // Decisions
        .route(
            "/api/decisions",
            get(routes::list_decisions).post(routes::create_decision),
        )
        .route("/api/decisions/similar", get(routes::find_similar))
        .route(
            "/api/decisions/{position}",
            get(routes::get_decision).put(routes::update_decision),
        )
        .route("/api/decisions/{position}/pin", patch(routes::toggle_pin))
        .route(
            "/api/decisions/{position}/category",
            patch(routes::update_category),
        )
        // Context
        .route("/api/context/compare", post(routes::compare_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
