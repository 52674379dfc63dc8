//! Send quota and per-request tracing.

use crate::config::RateLimitConfig;
use crate::error::GatewayError;
use axum::{
    extract::{MatchedPath, Request, State},
    http,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tower_http::trace::{
    DefaultOnRequest, HttpMakeClassifier, MakeSpan, OnResponse, TraceLayer,
};
use tracing::{debug, info_span, warn, Span};

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// Quota shared by every outbound endpoint.
pub type SendLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Gateway-wide send quota.
///
/// One bridge session backs every request, so the quota is global rather than
/// per caller.
#[derive(Clone)]
pub struct RateLimitState {
    pub sends: Arc<SendLimiter>,
}

impl RateLimitState {
    /// Allow `requests_per_minute`; zero falls back to 60.
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_PER_MINUTE);

        Self {
            sends: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.global_per_minute)
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(1000)
    }
}

/// Route template when routing matched, otherwise the raw path.
pub fn route_of<B>(request: &http::Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Rejects with 429 once the send quota is spent.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    if rate_limit.sends.check().is_err() {
        warn!(
            method = %request.method(),
            route = %route_of(&request),
            "Send quota exhausted"
        );
        return Err(GatewayError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Opens one span per request, tagged with method and route.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        info_span!(
            "request",
            method = %request.method(),
            route = %route_of(request),
        )
    }
}

/// Records status and latency when the response is produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestOutcome;

impl<B> OnResponse<B> for RequestOutcome {
    fn on_response(self, response: &http::Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let latency_ms = latency.as_millis() as u64;

        if status.is_success() {
            debug!(%status, latency_ms, "Request completed");
        } else {
            warn!(%status, latency_ms, "Request failed");
        }
    }
}

/// HTTP trace layer used by the router.
pub fn trace_layer() -> TraceLayer<HttpMakeClassifier, RequestSpan, DefaultOnRequest, RequestOutcome>
{
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(RequestOutcome)
}
