//! Chat session state shared with the rendering layer.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::composer::Composer;
use crate::config::ChatConfig;
use crate::conversation::{tool_activity, ActivityWindows, Conversation, ConversationMessage, ToolActivity};
use crate::error::{ChatError, Result};
use crate::orchestrator::Orchestrator;
use crate::security::validate_input;

/// A single conversation, seeded with the welcome message, that accepts one
/// turn at a time.
pub struct ChatSession {
    orchestrator: Arc<Orchestrator>,
    conversation: Mutex<Conversation>,
    loading: AtomicBool,
    max_input_chars: usize,
    windows: ActivityWindows,
}

impl ChatSession {
    /// Fails only when the activity windows in `config` are out of range.
    pub fn new(orchestrator: Arc<Orchestrator>, config: &ChatConfig) -> Result<Self> {
        let windows = config.activity.windows()?;

        let mut conversation = Conversation::new();
        conversation.push(Composer::welcome(Utc::now()))?;

        Ok(Self {
            orchestrator,
            conversation: Mutex::new(conversation),
            loading: AtomicBool::new(false),
            max_input_chars: config.input.max_chars,
            windows,
        })
    }

    /// Session over the keyword collaborator, configured from `config`.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let orchestrator = Orchestrator::from_config(&config.collaborator);
        Self::new(Arc::new(orchestrator), config)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn conversation_id(&self) -> String {
        self.conversation.lock().await.conversation_id().to_string()
    }

    pub async fn messages(&self) -> Vec<ConversationMessage> {
        self.conversation.lock().await.messages().to_vec()
    }

    pub async fn tool_activity(&self, now: DateTime<Utc>) -> Vec<ToolActivity> {
        let conversation = self.conversation.lock().await;
        tool_activity(conversation.messages(), now, &self.windows)
    }

    /// Run one turn and return the messages it appended.
    ///
    /// Invalid input is rejected before the conversation is touched. The user
    /// message is visible in [`ChatSession::messages`] while the collaborator
    /// is still working.
    pub async fn submit(&self, text: &str) -> Result<Vec<ConversationMessage>> {
        validate_input(text, self.max_input_chars)?;

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            crate::log_turn!(debug, "submission rejected while a turn is in flight");
            return Err(ChatError::TurnInFlight);
        }
        let _loading = LoadingGuard(&self.loading);

        let (user, history) = {
            let mut conversation = self.conversation.lock().await;
            let user = Orchestrator::user_message(conversation.messages(), text);
            conversation.push(user.clone())?;
            (user, conversation.messages().to_vec())
        };

        let replies = self.orchestrator.respond(&history).await;

        self.conversation.lock().await.extend(replies.iter().cloned())?;

        let mut appended = Vec::with_capacity(replies.len() + 1);
        appended.push(user);
        appended.extend(replies);
        Ok(appended)
    }
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
