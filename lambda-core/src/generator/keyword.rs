//! Keyword-driven stand-in for a language model

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::TextGenerator;
use crate::conversation::ConversationMessage;
use crate::direction::{detect, Direction};
use crate::router::{analyze_request, RequestKind};
use crate::tools::{ToolName, TranslateDirection};

pub const INTRO_FA: &str = "من یک دستیار هوشمند هستم که می‌توانم به شما در انجام محاسبات، ترجمه متون و جستجو در اسناد کمک کنم. چطور می‌توانم امروز به شما کمک کنم؟";

pub const INTRO_EN: &str = "I am a smart assistant capable of helping you with calculations, translations, and document search. How can I help you today?";

/// Answers with a tool intent when the last message looks like a tool
/// request, and with a canned self-introduction otherwise.
#[derive(Debug, Clone, Default)]
pub struct KeywordGenerator {
    latency: Duration,
}

impl KeywordGenerator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn respond_to(message: &str) -> String {
        let intent = |tool: ToolName, args: serde_json::Value| {
            json!({ "tool": tool.as_str(), "args": args }).to_string()
        };

        match analyze_request(message) {
            RequestKind::Arithmetic { expression } => {
                intent(ToolName::Calculator, json!({ "expression": expression }))
            }
            RequestKind::Date => intent(ToolName::PersianDate, json!({})),
            RequestKind::Translation { text } => {
                let direction = TranslateDirection::for_source(&text);
                intent(
                    ToolName::Translate,
                    json!({ "text": text, "direction": direction.as_str() }),
                )
            }
            RequestKind::DocsSearch { query } => intent(ToolName::DocsQa, json!({ "query": query })),
            RequestKind::GeneralChat => match detect(message) {
                Direction::Rtl => INTRO_FA.to_string(),
                Direction::Ltr => INTRO_EN.to_string(),
            },
        }
    }
}

#[async_trait]
impl TextGenerator for KeywordGenerator {
    async fn generate(&self, history: &[ConversationMessage]) -> anyhow::Result<String> {
        let last = history
            .last()
            .ok_or_else(|| anyhow::anyhow!("cannot answer an empty conversation"))?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = Self::respond_to(last.content());
        debug!(reply_len = reply.len(), "keyword collaborator replied");
        Ok(reply)
    }
}
