//! End-to-end turns through the public API

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use lambda_core::composer::APOLOGY_MESSAGE;
use lambda_core::conversation::{tool_activity, ActivityWindows, ToolStatus};
use lambda_core::tools::docs::NOT_FOUND;
use lambda_core::{
    ChatConfig, ChatSession, ConversationMessage, Orchestrator, Role, TextGenerator, ToolName,
};
use std::sync::Arc;
use std::time::Duration;

/// Replies with a fixed string, whatever the history.
struct Scripted(String);

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, history: &[ConversationMessage]) -> anyhow::Result<String> {
        assert_eq!(history.last().map(|m| m.role()), Some(Role::User));
        Ok(self.0.clone())
    }
}

struct Rejecting;

#[async_trait]
impl TextGenerator for Rejecting {
    async fn generate(&self, _history: &[ConversationMessage]) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("model offline"))
    }
}

fn scripted(reply: &str) -> Orchestrator {
    Orchestrator::new(Arc::new(Scripted(reply.to_string())))
}

fn contents(messages: &[ConversationMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.content()).collect()
}

#[tokio::test]
async fn test_calculator_scenario() {
    let config = ChatConfig::from_toml_str("[collaborator]\nsimulated_latency_ms = 0\n").unwrap();
    let orchestrator = Orchestrator::from_config(&config.collaborator);

    let appended = orchestrator.handle_turn(&[], "25 * 4 + 10").await;

    assert_eq!(appended.len(), 3);
    assert_eq!(appended[0].role(), Role::User);
    assert_eq!(appended[1].role(), Role::Assistant);
    assert!(appended[1].is_tool_output());
    assert_eq!(appended[1].tool_name(), Some(ToolName::Calculator));
    assert_eq!(appended[2].content(), "نتیجه محاسبه: 110");
    assert!(appended[1].created_at() <= appended[2].created_at());
}

#[tokio::test]
async fn test_collaborator_rejection() {
    let orchestrator = Orchestrator::new(Arc::new(Rejecting));
    let appended = orchestrator.handle_turn(&[], "سلام").await;
    assert_eq!(contents(&appended), vec!["سلام", APOLOGY_MESSAGE]);
}

#[tokio::test]
async fn test_fenced_intent_is_dispatched() {
    let orchestrator = scripted("```json\n{\"tool\":\"calculator\",\"args\":{\"expression\":\"2+2\"}}\n```");
    let appended = orchestrator.handle_turn(&[], "two plus two").await;
    assert_eq!(appended.len(), 3);
    assert_eq!(appended[2].content(), "نتیجه محاسبه: 4");
}

#[tokio::test]
async fn test_unknown_tool_is_plain_text() {
    let raw = r#"{"tool":"weather","args":{}}"#;
    let appended = scripted(raw).handle_turn(&[], "weather?").await;
    assert_eq!(contents(&appended), vec!["weather?", raw]);
    assert!(appended.iter().all(|m| !m.is_tool_output()));
}

#[tokio::test]
async fn test_invalid_expression_is_surfaced() {
    let appended = scripted(r#"{"tool":"calculator","args":{"expression":"2 + abc"}}"#)
        .handle_turn(&[], "2 + abc")
        .await;
    assert_eq!(appended.len(), 3);
    assert!(appended[2].content().starts_with("نتیجه محاسبه: خطا"));
}

#[tokio::test]
async fn test_missing_arguments_are_surfaced() {
    let appended = scripted(r#"{"tool":"translate","args":{"text":"hi"}}"#)
        .handle_turn(&[], "translate hi")
        .await;
    assert_eq!(appended.len(), 3);
    assert!(appended[2].content().contains("Invalid arguments"));
}

#[tokio::test]
async fn test_docs_lookup() {
    let found = scripted(r#"{"tool":"docs_qa","args":{"query":"rtl"}}"#)
        .handle_turn(&[], "docs rtl")
        .await;
    assert_eq!(
        found[2].content(),
        "نتیجه: \"یافته شده در اسناد: \\\"RTL support is automatic based on the text content.\\\"\""
    );

    let missing = scripted(r#"{"tool":"docs_qa","args":{"query":"kubernetes"}}"#)
        .handle_turn(&[], "docs kubernetes")
        .await;
    assert!(missing[2].content().contains(NOT_FOUND));
}

#[tokio::test]
async fn test_translate_placeholder() {
    let appended = scripted(r#"{"tool":"translate","args":{"text":"سلام","direction":"fa-en"}}"#)
        .handle_turn(&[], "ترجمه سلام")
        .await;
    assert_eq!(appended[2].content(), "نتیجه: \"[FA->EN Translation]: سلام\"");
}

#[tokio::test]
async fn test_persian_date_reply_has_both_calendars() {
    let appended = scripted(r#"{"tool":"persian_date","args":{}}"#)
        .handle_turn(&[], "تاریخ امروز چیست؟")
        .await;
    let lines: Vec<&str> = appended[2].content().lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "تاریخ امروز:");
    assert!(lines[1].starts_with("میلادی: "));
    assert!(lines[2].starts_with("شمسی: ۱۴"));
}

#[tokio::test]
async fn test_recency_projection_across_turns() {
    let config = ChatConfig::from_toml_str("[collaborator]\nsimulated_latency_ms = 0\n").unwrap();
    let session = ChatSession::from_config(&config).unwrap();

    session.submit("Calculate 25 * 4 + 10").await.unwrap();
    session.submit("search rtl").await.unwrap();

    let messages = session.messages().await;
    assert_eq!(messages.len(), 7);

    let now = Utc::now();
    let windows = ActivityWindows::default();
    let status = |at| {
        tool_activity(&messages, at, &windows)
            .into_iter()
            .map(|entry| (entry.tool, entry.status))
            .collect::<Vec<_>>()
    };

    assert_eq!(
        status(now),
        vec![
            (ToolName::Calculator, ToolStatus::Active),
            (ToolName::PersianDate, ToolStatus::Idle),
            (ToolName::Translate, ToolStatus::Idle),
            (ToolName::DocsQa, ToolStatus::Active),
        ]
    );
    assert_eq!(status(now + ChronoDuration::seconds(120))[0].1, ToolStatus::Recent);
    assert_eq!(status(now + ChronoDuration::seconds(400))[3].1, ToolStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_session_timeout_resets_loading() {
    let config = ChatConfig::from_toml_str(
        "[collaborator]\ntimeout_ms = 500\nsimulated_latency_ms = 5000\n",
    )
    .unwrap();
    let session = ChatSession::from_config(&config).unwrap();

    let appended = session.submit("hello").await.unwrap();
    assert_eq!(contents(&appended), vec!["hello", APOLOGY_MESSAGE]);
    assert!(!session.is_loading());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(session.submit("hello again").await.is_ok());
}

#[test]
fn test_oversized_activity_window_is_rejected_at_load() {
    let result = ChatConfig::from_toml_str(
        "[activity]\nactive_window_secs = 30\nrecent_window_secs = 9223372036854775807\n",
    );
    assert!(matches!(result, Err(lambda_core::ChatError::InvalidConfig(_))));
}
