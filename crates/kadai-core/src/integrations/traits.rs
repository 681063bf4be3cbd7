use async_trait::async_trait;

use crate::error::MessengerError;

/// The message-sending collaborator.
///
/// One operation: deliver a text message to an external chat identity. A
/// failed delivery comes back as an error value; implementations never panic
/// into the caller's control flow.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn push_text(&self, to: &str, text: &str) -> Result<(), MessengerError>;
}
