pub mod composer;
pub mod config;
pub mod conversation;
pub mod direction;
pub mod error;
pub mod generator;
pub mod observability;
pub mod orchestrator;
pub mod router;
pub mod security;
pub mod session;
pub mod tools;

pub use config::ChatConfig;
pub use conversation::{Conversation, ConversationMessage, Role};
pub use direction::{detect, Direction};
pub use error::{ChatError, Result};
pub use generator::{KeywordGenerator, TextGenerator};
pub use orchestrator::Orchestrator;
pub use session::ChatSession;
pub use tools::{ToolName, ToolOutcome, ToolRegistry};
