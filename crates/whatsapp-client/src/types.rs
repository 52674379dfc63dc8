//! Bridge API types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the transport assigns to a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WhatsApp-side serialized id (`{ "_serialized": "..." }`).
#[derive(Debug, Clone, Deserialize)]
pub struct SerializedId {
    #[serde(rename = "_serialized")]
    pub serialized: String,
}

/// Browser options forwarded to the bridge on initialization.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeOptions {
    pub headless: bool,
    pub args: Vec<String>,
}

/// Outgoing message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub content: String,
}

/// Send message response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub id: SerializedId,
}

/// Registration lookup response. `numberId` is null for unknown numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberIdResponse {
    #[serde(rename = "numberId")]
    pub number_id: Option<SerializedId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wid {
    pub user: String,
}

/// Raw session info as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClientInfo {
    pub wid: Wid,
    pub platform: String,
    #[serde(default)]
    pub pushname: Option<String>,
}

/// Information about the paired account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub platform: String,
    pub pushname: Option<String>,
}

impl From<RawClientInfo> for ClientInfo {
    fn from(raw: RawClientInfo) -> Self {
        Self {
            phone_number: raw.wid.user,
            platform: raw.platform,
            pushname: raw.pushname,
        }
    }
}

/// Message delivered to the paired account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub from: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "fromMe", default)]
    pub from_me: bool,
}

impl InboundMessage {
    /// Whether the message was posted in a group chat.
    pub fn is_group(&self) -> bool {
        self.from.contains("g.us")
    }
}

/// Session lifecycle event emitted by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportEvent {
    /// Pairing QR payload; the bridge emits a fresh one until it is scanned.
    Qr { qr: String },
    Authenticated,
    Ready,
    Disconnected {
        #[serde(default)]
        reason: String,
    },
    Message(InboundMessage),
}
