//! Common test utilities for integration tests.

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use mockall::mock;
use std::sync::Arc;
use whatsapp_client::{ClientInfo, InitializeOptions, MessageId, Transport, TransportError};
use whatsapp_gateway::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    Dispatcher, PhoneNormalizer, ReadinessTracker,
};

mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn initialize(&self, options: &InitializeOptions) -> Result<(), TransportError>;
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<MessageId, TransportError>;
        async fn get_number_id(&self, chat_id: &str) -> Result<Option<String>, TransportError>;
        async fn info(&self) -> Result<ClientInfo, TransportError>;
    }
}

/// Build app state around a mock transport.
pub fn create_test_state(transport: MockTransport, ready: bool) -> AppState {
    let readiness = Arc::new(ReadinessTracker::new(false));
    if ready {
        readiness.on_ready();
    }
    let dispatcher = Dispatcher::new(
        Arc::new(transport),
        readiness,
        PhoneNormalizer::new("62", "c.us"),
        "Your OTP code is: 123456",
    );
    AppState::new(Arc::new(dispatcher))
}

pub fn create_test_app(state: AppState) -> axum::Router {
    create_router_with_rate_limit(state, RateLimitState::permissive())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// A transport that knows every number and accepts one send.
pub fn registered_transport(expected_to: &'static str, expected_text: &'static str) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
        .expect_get_number_id()
        .returning(|chat_id| Ok(Some(chat_id.to_string())));
    transport
        .expect_send_message()
        .withf(move |chat_id: &str, text: &str| chat_id == expected_to && text == expected_text)
        .times(1)
        .returning(|_, _| Ok(MessageId("true_6281234567890@c.us_3EB0".into())));
    transport
}
