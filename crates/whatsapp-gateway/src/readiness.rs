//! Session readiness tracking.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Snapshot of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientStatus {
    pub ready: bool,
    #[serde(rename = "autoReplyEnabled")]
    pub auto_reply_enabled: bool,
}

/// Tracks whether the transport session can accept sends.
///
/// Starts not ready. Only lifecycle transitions flip readiness; auto-reply is
/// an independent switch.
#[derive(Debug, Default)]
pub struct ReadinessTracker {
    ready: AtomicBool,
    auto_reply: AtomicBool,
}

impl ReadinessTracker {
    /// Create a tracker in the not-ready state.
    pub fn new(auto_reply: bool) -> Self {
        Self {
            ready: AtomicBool::new(false),
            auto_reply: AtomicBool::new(auto_reply),
        }
    }

    /// Credential handshake succeeded. Readiness waits for `on_ready`.
    pub fn on_authenticated(&self) {
        info!("WhatsApp session authenticated");
    }

    pub fn on_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
        info!("WhatsApp client is ready");
    }

    /// The reason is informational only.
    pub fn on_disconnected(&self, reason: &str) {
        self.ready.store(false, Ordering::SeqCst);
        warn!(reason = %reason, "WhatsApp client was disconnected");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> ClientStatus {
        ClientStatus {
            ready: self.ready.load(Ordering::SeqCst),
            auto_reply_enabled: self.auto_reply.load(Ordering::SeqCst),
        }
    }

    pub fn set_auto_reply(&self, enabled: bool) {
        self.auto_reply.store(enabled, Ordering::SeqCst);
        info!(
            "Auto-reply {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }
}
