//! Bridge HTTP client.

use crate::error::TransportError;
use crate::transport::Transport;
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Client for the WhatsApp Web bridge sidecar.
#[derive(Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
}

impl BridgeClient {
    /// Create a new bridge client.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the bridge.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the bridge process is reachable.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Drain pending lifecycle events.
    #[instrument(skip(self))]
    pub async fn poll_events(&self) -> Result<Vec<TransportEvent>, TransportError> {
        let response = self
            .client
            .get(format!("{}/client/events", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(msg));
        }

        // Decode per item so one unrecognised event cannot drop the batch.
        let raw: Vec<serde_json::Value> = response.json().await?;
        let events: Vec<TransportEvent> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value.clone()) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(event = %value, "Skipping unrecognised bridge event: {}", e);
                    None
                }
            })
            .collect();

        if !events.is_empty() {
            debug!("Received {} events", events.len());
        }
        Ok(events)
    }
}

#[async_trait]
impl Transport for BridgeClient {
    #[instrument(skip(self))]
    async fn initialize(&self, options: &InitializeOptions) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!("{}/client/initialize", self.base_url))
            .json(options)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let msg = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %msg, "Bridge initialization failed");
            return Err(TransportError::Api(format!(
                "Initialization failed: {} - {}",
                status, msg
            )));
        }

        debug!("Bridge session initializing");
        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<MessageId, TransportError> {
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            content: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/client/messages", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Send failed: {}", msg);
            return Err(TransportError::SendFailed(msg));
        }

        let sent: SendMessageResponse = response.json().await?;
        debug!(message_id = %sent.id.serialized, "Sent message to {}", chat_id);
        Ok(MessageId(sent.id.serialized))
    }

    #[instrument(skip(self))]
    async fn get_number_id(&self, chat_id: &str) -> Result<Option<String>, TransportError> {
        let response = self
            .client
            .get(format!(
                "{}/client/number-id/{}",
                self.base_url,
                encode(chat_id)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(msg));
        }

        let lookup: NumberIdResponse = response.json().await?;
        Ok(lookup.number_id.map(|id| id.serialized))
    }

    #[instrument(skip(self))]
    async fn info(&self) -> Result<ClientInfo, TransportError> {
        let response = self
            .client
            .get(format!("{}/client/info", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(msg));
        }

        let raw: RawClientInfo = response.json().await?;
        Ok(raw.into())
    }
}
