//! HTTP API for the gateway.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{rate_limit_middleware, route_of, trace_layer, RateLimitState};
pub use types::*;

use crate::config::RateLimitConfig;
use crate::dispatch::Dispatcher;
use crate::readiness::ReadinessTracker;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Outbound message dispatcher
    pub dispatcher: Arc<Dispatcher>,
    /// Session readiness, shared with the lifecycle listener
    pub readiness: Arc<ReadinessTracker>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let readiness = dispatcher.readiness().clone();
        Self {
            dispatcher,
            readiness,
        }
    }
}

/// Create the API router with the default rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::from_config(&RateLimitConfig::default()))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let limited = Router::new()
        .route("/send-message", post(handlers::send_message))
        .route("/send-otp", post(handlers::send_otp))
        .route("/send-chat", post(handlers::send_chat))
        .route("/client-info", get(handlers::client_info))
        .route(
            "/auto-reply",
            get(handlers::get_auto_reply).post(handlers::set_auto_reply),
        )
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .merge(limited)
        .layer(trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
