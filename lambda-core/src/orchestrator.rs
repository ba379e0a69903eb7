//! One user turn, end to end: collaborator call, intent extraction, tool
//! dispatch and reply composition.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::composer::Composer;
use crate::config::CollaboratorConfig;
use crate::conversation::{next_timestamp, ConversationMessage};
use crate::error::{ChatError, Result};
use crate::generator::{KeywordGenerator, TextGenerator};
use crate::observability::MetricsCollector;
use crate::router::{extract, Intent};
use crate::tools::ToolRegistry;

pub struct Orchestrator {
    registry: ToolRegistry,
    generator: Arc<dyn TextGenerator>,
    timeout: Option<Duration>,
    metrics: Option<MetricsCollector>,
}

impl Orchestrator {
    /// No timeout; the collaborator call is awaited for as long as it takes.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            generator,
            timeout: None,
            metrics: None,
        }
    }

    /// Orchestrator backed by the keyword collaborator.
    pub fn from_config(config: &CollaboratorConfig) -> Self {
        let generator = KeywordGenerator::new(config.simulated_latency());
        Self::new(Arc::new(generator)).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// The user message for `text`, stamped no earlier than the end of `history`.
    pub fn user_message(history: &[ConversationMessage], text: &str) -> ConversationMessage {
        ConversationMessage::user(text, next_timestamp(history))
    }

    /// Messages to append for one turn. The user message always comes first,
    /// and at least one assistant message always follows it.
    pub async fn handle_turn(&self, history: &[ConversationMessage], user_text: &str) -> Vec<ConversationMessage> {
        let user = Self::user_message(history, user_text);

        let mut transcript = Vec::with_capacity(history.len() + 1);
        transcript.extend_from_slice(history);
        transcript.push(user.clone());

        let mut appended = vec![user];
        appended.extend(self.respond(&transcript).await);
        appended
    }

    /// Assistant messages answering `history`, whose last element is the
    /// user turn already appended by the caller.
    pub async fn respond(&self, history: &[ConversationMessage]) -> Vec<ConversationMessage> {
        let _in_flight = InFlight::enter(self.metrics.as_ref());
        if let Some(metrics) = &self.metrics {
            metrics.record_turn();
        }

        let started = Instant::now();
        let generated = self.generate(history).await;
        if let Some(metrics) = &self.metrics {
            metrics.record_collaborator_call(started.elapsed(), generated.is_ok());
        }

        let raw = match generated {
            Ok(raw) => raw,
            Err(err) => {
                crate::log_turn!(warn, error = %err, "collaborator failed; replying with apology");
                return vec![Composer::apology(next_timestamp(history))];
            }
        };

        let at = next_timestamp(history);
        match extract(&raw) {
            Intent::PlainText(text) => {
                crate::log_turn!(debug, "plain-text reply");
                vec![Composer::text_reply(text, at)]
            }
            Intent::Tool(invocation) => {
                crate::log_turn!(info, tool = %invocation.tool, "dispatching tool");
                let outcome = self.registry.invoke(&invocation);
                if let Some(metrics) = &self.metrics {
                    metrics.record_tool(invocation.tool, outcome.is_success());
                }
                Composer::tool_turn(invocation.tool, &outcome, at)
            }
        }
    }

    async fn generate(&self, history: &[ConversationMessage]) -> Result<String> {
        let call = self.generator.generate(history);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ChatError::Timeout(format!("collaborator gave no reply within {:?}", limit)))?,
            None => call.await,
        };
        result.map_err(|e| ChatError::Collaborator(e.to_string()))
    }
}

/// Keeps the in-flight gauge honest even if the turn future is dropped.
struct InFlight<'a>(Option<&'a MetricsCollector>);

impl<'a> InFlight<'a> {
    fn enter(metrics: Option<&'a MetricsCollector>) -> Self {
        if let Some(metrics) = metrics {
            metrics.increment_in_flight();
        }
        Self(metrics)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(metrics) = self.0 {
            metrics.decrement_in_flight();
        }
    }
}
