pub mod activity;

pub use activity::{tool_activity, ActivityWindows, ToolActivity, ToolStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::tools::ToolName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation log. Immutable once built.
///
/// `tool_name` is set exactly when the message is a tool-output marker, so
/// the flag and the name cannot disagree. Deserialization enforces the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMessage")]
pub struct ConversationMessage {
    id: String,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    is_tool_output: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_name: Option<ToolName>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    id: String,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_tool_output: bool,
    #[serde(default)]
    tool_name: Option<ToolName>,
}

impl TryFrom<RawMessage> for ConversationMessage {
    type Error = String;

    fn try_from(raw: RawMessage) -> std::result::Result<Self, Self::Error> {
        if raw.is_tool_output != raw.tool_name.is_some() {
            return Err(format!(
                "message {}: isToolOutput is {} but toolName is {}",
                raw.id,
                raw.is_tool_output,
                if raw.tool_name.is_some() { "set" } else { "missing" }
            ));
        }

        Ok(Self {
            id: raw.id,
            role: raw.role,
            content: raw.content,
            created_at: raw.created_at,
            is_tool_output: raw.is_tool_output,
            tool_name: raw.tool_name,
        })
    }
}

impl ConversationMessage {
    fn build(role: Role, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            created_at,
            is_tool_output: false,
            tool_name: None,
        }
    }

    pub fn user(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::build(Role::User, content.into(), created_at)
    }

    pub fn assistant(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::build(Role::Assistant, content.into(), created_at)
    }

    pub fn system(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::build(Role::System, content.into(), created_at)
    }

    /// Assistant-role marker recording that `tool` ran in this turn.
    pub fn tool_marker(tool: ToolName, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            is_tool_output: true,
            tool_name: Some(tool),
            ..Self::build(Role::Assistant, content.into(), created_at)
        }
    }

    /// Replace the generated id, e.g. for the fixed `welcome` message.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_tool_output(&self) -> bool {
        self.is_tool_output
    }

    pub fn tool_name(&self) -> Option<ToolName> {
        self.tool_name
    }
}

/// Append-only, ordered conversation log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawConversation")]
pub struct Conversation {
    conversation_id: String,
    messages: Vec<ConversationMessage>,
}

#[derive(Deserialize)]
struct RawConversation {
    conversation_id: String,
    messages: Vec<ConversationMessage>,
}

impl TryFrom<RawConversation> for Conversation {
    type Error = ChatError;

    fn try_from(raw: RawConversation) -> Result<Self> {
        let mut conversation = Conversation {
            conversation_id: raw.conversation_id,
            messages: Vec::with_capacity(raw.messages.len()),
        };
        conversation.extend(raw.messages)?;
        Ok(conversation)
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            conversation_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Append `message`. Ids are unique within a conversation, so a message
    /// whose id is already present is rejected and the log is left unchanged.
    pub fn push(&mut self, message: ConversationMessage) -> Result<()> {
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(ChatError::DuplicateMessageId(message.id));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Append in order, stopping at the first duplicate id.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ConversationMessage>) -> Result<()> {
        for message in messages {
            self.push(message)?;
        }
        Ok(())
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }
}

/// Timestamp for the next message: the wall clock, but never earlier than the
/// last message already in `history`.
pub fn next_timestamp(history: &[ConversationMessage]) -> DateTime<Utc> {
    let now = Utc::now();
    match history.last() {
        Some(last) if last.created_at > now => last.created_at,
        _ => now,
    }
}
