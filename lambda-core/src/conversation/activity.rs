//! Tool recency projection over the conversation log

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ConversationMessage;
use crate::tools::ToolName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Active,
    Recent,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindows {
    pub active: Duration,
    pub recent: Duration,
}

impl ActivityWindows {
    pub fn new(active: Duration, recent: Duration) -> Self {
        Self { active, recent }
    }

    pub fn classify(&self, last_used: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ToolStatus {
        let Some(last_used) = last_used else {
            return ToolStatus::Idle;
        };

        let age = now - last_used;
        if age < self.active {
            ToolStatus::Active
        } else if age < self.recent {
            ToolStatus::Recent
        } else {
            ToolStatus::Idle
        }
    }
}

impl Default for ActivityWindows {
    fn default() -> Self {
        Self::new(Duration::seconds(30), Duration::seconds(300))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolActivity {
    pub tool: ToolName,
    pub last_used: Option<DateTime<Utc>>,
    pub status: ToolStatus,
}

/// Latest marker timestamp per tool. Later markers win.
pub fn last_used_by_tool(messages: &[ConversationMessage]) -> HashMap<ToolName, DateTime<Utc>> {
    let mut last_used = HashMap::new();
    for message in messages.iter().filter(|m| m.is_tool_output()) {
        if let Some(tool) = message.tool_name() {
            last_used.insert(tool, message.created_at());
        }
    }
    last_used
}

/// Status of every registered tool, in catalogue order. Recomputed from the
/// log on each call; nothing is cached.
pub fn tool_activity(
    messages: &[ConversationMessage],
    now: DateTime<Utc>,
    windows: &ActivityWindows,
) -> Vec<ToolActivity> {
    let last_used = last_used_by_tool(messages);
    ToolName::ALL
        .iter()
        .map(|tool| {
            let last_used = last_used.get(tool).copied();
            ToolActivity {
                tool: *tool,
                last_used,
                status: windows.classify(last_used, now),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(tool: ToolName, at: DateTime<Utc>) -> ConversationMessage {
        ConversationMessage::tool_marker(tool, format!("Tool Used: {}", tool), at)
    }

    #[test]
    fn test_classify_windows() {
        let now = Utc::now();
        let windows = ActivityWindows::default();
        assert_eq!(windows.classify(Some(now - Duration::seconds(10)), now), ToolStatus::Active);
        assert_eq!(windows.classify(Some(now - Duration::seconds(30)), now), ToolStatus::Recent);
        assert_eq!(windows.classify(Some(now - Duration::seconds(120)), now), ToolStatus::Recent);
        assert_eq!(windows.classify(Some(now - Duration::seconds(300)), now), ToolStatus::Idle);
        assert_eq!(windows.classify(Some(now - Duration::seconds(400)), now), ToolStatus::Idle);
        assert_eq!(windows.classify(None, now), ToolStatus::Idle);
    }

    #[test]
    fn test_projection_uses_latest_marker() {
        let now = Utc::now();
        let messages = vec![
            marker(ToolName::Calculator, now - Duration::seconds(400)),
            ConversationMessage::assistant("نتیجه محاسبه: 4", now - Duration::seconds(400)),
            marker(ToolName::Translate, now - Duration::seconds(120)),
            marker(ToolName::Calculator, now - Duration::seconds(10)),
        ];

        let activity = tool_activity(&messages, now, &ActivityWindows::default());
        let status: Vec<(ToolName, ToolStatus)> = activity.iter().map(|a| (a.tool, a.status)).collect();
        assert_eq!(
            status,
            vec![
                (ToolName::Calculator, ToolStatus::Active),
                (ToolName::PersianDate, ToolStatus::Idle),
                (ToolName::Translate, ToolStatus::Recent),
                (ToolName::DocsQa, ToolStatus::Idle),
            ]
        );
        assert_eq!(activity[0].last_used, Some(now - Duration::seconds(10)));
        assert_eq!(activity[1].last_used, None);
    }

    #[test]
    fn test_plain_messages_do_not_count() {
        let now = Utc::now();
        let messages = vec![ConversationMessage::assistant("calculator", now)];
        assert!(last_used_by_tool(&messages).is_empty());
    }
}
