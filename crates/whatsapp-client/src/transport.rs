//! The session abstraction the gateway talks to.

use crate::error::TransportError;
use crate::types::{ClientInfo, InitializeOptions, MessageId};
use async_trait::async_trait;

/// A single WhatsApp Web session.
///
/// The implementation owns pairing, reconnection and delivery. Callers only
/// see send and query primitives; lifecycle changes arrive separately as
/// [`TransportEvent`](crate::TransportEvent)s.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start the session. Pairing progress is reported through events.
    async fn initialize(&self, options: &InitializeOptions) -> Result<(), TransportError>;

    /// Send a text message to a chat address such as `6281234567890@c.us`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<MessageId, TransportError>;

    /// Resolve an address to its WhatsApp id, or `None` if the number has no account.
    async fn get_number_id(&self, chat_id: &str) -> Result<Option<String>, TransportError>;

    /// Details of the paired account.
    async fn info(&self) -> Result<ClientInfo, TransportError>;
}
