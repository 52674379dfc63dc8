//! Lifecycle event receiver with polling.

use crate::client::BridgeClient;
use crate::types::TransportEvent;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Polls the bridge for session events.
pub struct EventReceiver {
    client: BridgeClient,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl EventReceiver {
    /// Create a new event receiver.
    pub fn new(client: BridgeClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            error_backoff: Duration::from_secs(5),
        }
    }

    /// Override the delay applied after a failed poll.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Start receiving events as an async stream.
    pub fn stream(self) -> impl Stream<Item = TransportEvent> {
        async_stream::stream! {
            loop {
                match self.client.poll_events().await {
                    Ok(events) => {
                        for event in events {
                            debug!(?event, "Bridge event");
                            yield event;
                        }
                    }
                    Err(e) => {
                        error!("Event poll error: {}", e);
                        sleep(self.error_backoff).await;
                        continue;
                    }
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
