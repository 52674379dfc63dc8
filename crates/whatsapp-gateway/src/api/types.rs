//! API request and response types.

use crate::dispatch::SendReceipt;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// Request to send a text message.
///
/// Missing fields default to empty so validation can report them.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
    #[serde(default)]
    pub message: String,
}

/// Request to send the OTP text.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
}

/// Delivery details returned by the send endpoints.
#[derive(Debug, Serialize)]
pub struct SendData {
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub timestamp: String,
    /// The phone number as the caller supplied it.
    pub to: String,
}

impl SendData {
    pub fn new(receipt: SendReceipt, to: String) -> Self {
        Self {
            message_id: receipt.message_id.0,
            timestamp: iso_timestamp(receipt.timestamp),
            to,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
}

/// Request to toggle auto-reply.
#[derive(Debug, Deserialize)]
pub struct AutoReplyRequest {
    pub enabled: bool,
}

/// Current auto-reply setting.
#[derive(Debug, Serialize)]
pub struct AutoReplyStatus {
    #[serde(rename = "autoReplyEnabled")]
    pub auto_reply_enabled: bool,
    pub timestamp: String,
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
