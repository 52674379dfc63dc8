//! WhatsApp Web bridge client.
//!
//! The bridge is a sidecar process driving a headless browser session. This
//! crate exposes it as a [`Transport`] plus a stream of lifecycle events.

mod client;
mod error;
mod receiver;
mod transport;
mod types;

pub use client::BridgeClient;
pub use error::TransportError;
pub use receiver::EventReceiver;
pub use transport::Transport;
pub use types::*;
