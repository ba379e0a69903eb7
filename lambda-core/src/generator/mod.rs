//! Text-generation boundary.
//!
//! The orchestrator asks a [`TextGenerator`] for one reply per turn. A reply
//! is either a direct answer or a JSON tool intent; see
//! [`crate::router::intent`] for the wire shape.

pub mod keyword;

pub use keyword::KeywordGenerator;

use async_trait::async_trait;
use std::sync::Arc;

use crate::conversation::ConversationMessage;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce the raw reply to `history`, whose last element is the user turn
    /// being answered.
    async fn generate(&self, history: &[ConversationMessage]) -> anyhow::Result<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, history: &[ConversationMessage]) -> anyhow::Result<String> {
        (**self).generate(history).await
    }
}
