//! Outbound message dispatch.

use crate::error::GatewayError;
use crate::phone::{ChatAddress, PhoneNormalizer};
use crate::readiness::ReadinessTracker;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use whatsapp_client::{ClientInfo, MessageId, Transport};

/// Result of a delivered send.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: MessageId,
    pub timestamp: DateTime<Utc>,
    pub address: ChatAddress,
}

/// Validates, normalizes and forwards messages to the transport.
///
/// Nothing reaches the transport while the session is not ready.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    readiness: Arc<ReadinessTracker>,
    normalizer: PhoneNormalizer,
    otp_message: String,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        readiness: Arc<ReadinessTracker>,
        normalizer: PhoneNormalizer,
        otp_message: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            readiness,
            normalizer,
            otp_message: otp_message.into(),
        }
    }

    pub fn readiness(&self) -> &Arc<ReadinessTracker> {
        &self.readiness
    }

    /// Send a text message to a phone number.
    #[instrument(skip_all, fields(phone_number = %phone_number))]
    pub async fn send(&self, phone_number: &str, message: &str) -> Result<SendReceipt, GatewayError> {
        if phone_number.is_empty() || message.is_empty() {
            return Err(GatewayError::Validation(
                "phoneNumber and message are required".into(),
            ));
        }

        self.deliver(phone_number, message).await
    }

    /// Send the configured OTP text to a phone number.
    #[instrument(skip_all, fields(phone_number = %phone_number))]
    pub async fn send_otp(&self, phone_number: &str) -> Result<SendReceipt, GatewayError> {
        if phone_number.is_empty() {
            return Err(GatewayError::Validation("phoneNumber is required".into()));
        }

        self.deliver(phone_number, &self.otp_message).await
    }

    /// Details of the paired account.
    pub async fn client_info(&self) -> Result<ClientInfo, GatewayError> {
        if !self.readiness.is_ready() {
            return Err(GatewayError::NotReady("Client is not ready".into()));
        }

        Ok(self.transport.info().await?)
    }

    async fn deliver(&self, phone_number: &str, message: &str) -> Result<SendReceipt, GatewayError> {
        if !self.readiness.is_ready() {
            return Err(GatewayError::not_ready());
        }

        let address = self
            .normalizer
            .normalize(phone_number)
            .map_err(GatewayError::Validation)?;
        let chat_id = address.to_string();

        if self.transport.get_number_id(&chat_id).await?.is_none() {
            warn!(address = %chat_id, "Recipient is not registered");
            return Err(GatewayError::UnregisteredRecipient(chat_id));
        }

        let timestamp = Utc::now();
        let message_id = self.transport.send_message(&chat_id, message).await?;

        info!(address = %chat_id, message_id = %message_id, "Message sent");

        Ok(SendReceipt {
            message_id,
            timestamp,
            address,
        })
    }
}
