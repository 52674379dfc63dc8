//! Shared test doubles.

use async_trait::async_trait;
use mockall::mock;
use whatsapp_client::{ClientInfo, InitializeOptions, MessageId, Transport, TransportError};

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
