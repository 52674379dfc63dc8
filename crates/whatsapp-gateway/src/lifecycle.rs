//! Applies transport lifecycle events to gateway state.

use crate::config::AutoReplyConfig;
use crate::qr;
use crate::readiness::ReadinessTracker;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};
use whatsapp_client::{InboundMessage, InitializeOptions, Transport, TransportEvent};

const PING: &str = "!ping";
const PONG: &str = "pong";

/// Turns transport events into readiness transitions and inbound replies.
pub struct LifecycleListener {
    transport: Arc<dyn Transport>,
    readiness: Arc<ReadinessTracker>,
    auto_reply: AutoReplyConfig,
}

impl LifecycleListener {
    pub fn new(
        transport: Arc<dyn Transport>,
        readiness: Arc<ReadinessTracker>,
        auto_reply: AutoReplyConfig,
    ) -> Self {
        Self {
            transport,
            readiness,
            auto_reply,
        }
    }

    /// Ask the bridge to start its browser session.
    ///
    /// A failure leaves the gateway serving with readiness false.
    pub async fn initialize(&self, options: &InitializeOptions) {
        match self.transport.initialize(options).await {
            Ok(()) => info!("Waiting for WhatsApp client to be ready; scan the QR code if prompted"),
            Err(e) => error!("Failed to initialize WhatsApp client: {}", e),
        }
    }

    /// Consume events until the stream ends.
    pub async fn run<S>(&self, events: S)
    where
        S: Stream<Item = TransportEvent>,
    {
        tokio::pin!(events);
        while let Some(event) = events.next().await {
            self.handle(event).await;
        }
        debug!("Event stream ended");
    }

    /// Apply a single event.
    pub async fn handle(&self, event: TransportEvent) {
        match event {
            TransportEvent::Qr { qr } => self.show_qr(&qr),
            TransportEvent::Authenticated => self.readiness.on_authenticated(),
            TransportEvent::Ready => self.readiness.on_ready(),
            TransportEvent::Disconnected { reason } => self.readiness.on_disconnected(&reason),
            TransportEvent::Message(msg) => self.on_message(&msg).await,
        }
    }

    fn show_qr(&self, payload: &str) {
        match qr::render_qr(payload) {
            Ok(rendered) => println!("{}", qr::framed(&rendered)),
            Err(e) => {
                warn!("Failed to render QR code: {}", e);
                info!(qr = %payload, "Pairing QR payload");
            }
        }
    }

    async fn on_message(&self, msg: &InboundMessage) {
        if msg.from_me || msg.is_group() {
            return;
        }

        if self.readiness.status().auto_reply_enabled {
            info!(from = %msg.from, "Received message: {}", msg.body);
            if let Err(e) = self
                .transport
                .send_message(&msg.from, &self.auto_reply.message)
                .await
            {
                error!("Error in auto-reply: {}", e);
                if let Err(e) = self
                    .transport
                    .send_message(&msg.from, &self.auto_reply.fallback_message)
                    .await
                {
                    error!("Fallback reply failed: {}", e);
                }
            }
        }

        if msg.body == PING {
            if let Err(e) = self.transport.send_message(&msg.from, PONG).await {
                error!("Failed to answer ping: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use whatsapp_client::{MessageId, TransportError};

    fn listener(transport: MockTransport, auto_reply: bool) -> (LifecycleListener, Arc<ReadinessTracker>) {
        let readiness = Arc::new(ReadinessTracker::new(auto_reply));
        let listener = LifecycleListener::new(
            Arc::new(transport),
            readiness.clone(),
            AutoReplyConfig::default(),
        );
        (listener, readiness)
    }

    fn direct(body: &str) -> TransportEvent {
        TransportEvent::Message(InboundMessage {
            id: None,
            from: "6281234567890@c.us".into(),
            body: body.into(),
            from_me: false,
        })
    }

    #[tokio::test]
    async fn test_lifecycle_transitions() {
        let (listener, readiness) = listener(MockTransport::new(), false);

        listener.handle(TransportEvent::Authenticated).await;
        assert!(!readiness.is_ready());

        listener.handle(TransportEvent::Ready).await;
        assert!(readiness.is_ready());

        listener
            .handle(TransportEvent::Disconnected {
                reason: "LOGOUT".into(),
            })
            .await;
        assert!(!readiness.is_ready());
    }

    #[tokio::test]
    async fn test_qr_event_does_not_touch_transport() {
        let (listener, readiness) = listener(MockTransport::new(), false);

        listener
            .handle(TransportEvent::Qr {
                qr: "2@abc,def".into(),
            })
            .await;
        assert!(!readiness.is_ready());
    }

    #[tokio::test]
    async fn test_ping_answered_with_pong() {
        let mut transport = MockTransport::new();
        transport
            .expect_send_message()
            .withf(|chat_id: &str, text: &str| chat_id == "6281234567890@c.us" && text == "pong")
            .times(1)
            .returning(|_, _| Ok(MessageId("pong-1".into())));

        let (listener, _) = listener(transport, false);
        listener.handle(direct("!ping")).await;
    }

    #[tokio::test]
    async fn test_own_and_group_messages_ignored() {
        let (listener, _) = listener(MockTransport::new(), true);

        listener
            .handle(TransportEvent::Message(InboundMessage {
                id: None,
                from: "6281234567890@c.us".into(),
                body: "!ping".into(),
                from_me: true,
            }))
            .await;

        listener
            .handle(TransportEvent::Message(InboundMessage {
                id: None,
                from: "120363025555555555@g.us".into(),
                body: "!ping".into(),
                from_me: false,
            }))
            .await;
    }

    #[tokio::test]
    async fn test_plain_message_without_auto_reply_ignored() {
        let (listener, _) = listener(MockTransport::new(), false);
        listener.handle(direct("hello")).await;
    }

    #[tokio::test]
    async fn test_auto_reply_when_enabled() {
        let mut transport = MockTransport::new();
        transport
            .expect_send_message()
            .withf(|_, text: &str| {
                text == "Auto-reply feature is enabled but not fully implemented yet."
            })
            .times(1)
            .returning(|_, _| Ok(MessageId("auto-1".into())));

        let (listener, _) = listener(transport, true);
        listener.handle(direct("hello")).await;
    }

    #[tokio::test]
    async fn test_auto_reply_failure_sends_fallback() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(TransportError::SendFailed("Session closed".into())));
        transport
            .expect_send_message()
            .withf(|_, text: &str| text == "Sorry, something went wrong.")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageId("fallback-1".into())));

        let (listener, _) = listener(transport, true);
        listener.handle(direct("hello")).await;
    }

    #[tokio::test]
    async fn test_fallback_failure_still_answers_ping() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send_message()
            .withf(|_, text: &str| text != "pong")
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(TransportError::SendFailed("Session closed".into())));
        transport
            .expect_send_message()
            .withf(|_, text: &str| text == "pong")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageId("pong-1".into())));

        let (listener, _) = listener(transport, true);
        listener.handle(direct("!ping")).await;
    }

    #[tokio::test]
    async fn test_run_consumes_stream() {
        let (listener, readiness) = listener(MockTransport::new(), false);

        let events = tokio_stream::iter(vec![
            TransportEvent::Qr { qr: "2@x".into() },
            TransportEvent::Authenticated,
            TransportEvent::Ready,
        ]);
        listener.run(events).await;

        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn test_initialize_failure_keeps_not_ready() {
        let mut transport = MockTransport::new();
        transport
            .expect_initialize()
            .times(1)
            .returning(|_| Err(TransportError::Api("bridge down".into())));

        let (listener, readiness) = listener(transport, false);
        listener
            .initialize(&InitializeOptions {
                headless: true,
                args: vec![],
            })
            .await;

        assert!(!readiness.is_ready());
    }
}
