//! Turns tool outcomes and collaborator text into conversation messages.

use chrono::{DateTime, Utc};

use crate::conversation::ConversationMessage;
use crate::tools::{ToolName, ToolOutcome, ToolValue};

pub const WELCOME_ID: &str = "welcome";

pub const WELCOME_MESSAGE: &str =
    "سلام! من دستیار هوشمند شما هستم. چطور می‌توانم کمک کنم؟\nHello! I am your smart assistant. How can I help you?";

pub const APOLOGY_MESSAGE: &str =
    "متاسفانه خطایی رخ داد. لطفا دوباره تلاش کنید.\nSorry, an error occurred. Please try again.";

const CALCULATOR_LABEL: &str = "نتیجه محاسبه:";
const RESULT_LABEL: &str = "نتیجه:";

/// Internal content of the tool marker. Renderers show their own badge.
pub fn marker_label(tool: ToolName) -> String {
    format!("Tool Used: {}", tool)
}

/// Human-readable reply for a tool outcome. Failures are rendered through
/// the error's own bilingual message, never dropped.
pub fn compose_reply(tool: ToolName, outcome: &ToolOutcome) -> String {
    match (tool, outcome) {
        (ToolName::PersianDate, ToolOutcome::Success(ToolValue::Calendar(reading))) => format!(
            "تاریخ امروز:\nمیلادی: {}\nشمسی: {}",
            reading.gregorian, reading.jalali
        ),
        (ToolName::Calculator, ToolOutcome::Success(ToolValue::Number(value))) => {
            format!("{} {}", CALCULATOR_LABEL, format_number(*value))
        }
        (ToolName::Calculator, ToolOutcome::Failure(err)) => format!("{} {}", CALCULATOR_LABEL, err),
        (_, ToolOutcome::Success(value)) => format!("{} {}", RESULT_LABEL, render_value(value)),
        (_, ToolOutcome::Failure(err)) => format!("{} {}", RESULT_LABEL, err),
    }
}

/// Shortest round-trip decimal, switching to exponent form (`1e+21`,
/// `1.5e-7`) for magnitudes of at least 1e21 or below 1e-6.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// JSON rendering of a tool value, as the generic reply shows it.
pub fn render_value(value: &ToolValue) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        // Only non-finite numbers fail to serialize, and the calculator never yields them
        Err(_) => format!("{:?}", value),
    }
}

pub struct Composer;

impl Composer {
    /// Marker followed by the readable reply, in that order.
    pub fn tool_turn(tool: ToolName, outcome: &ToolOutcome, at: DateTime<Utc>) -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::tool_marker(tool, marker_label(tool), at),
            ConversationMessage::assistant(compose_reply(tool, outcome), at),
        ]
    }

    pub fn text_reply(text: impl Into<String>, at: DateTime<Utc>) -> ConversationMessage {
        ConversationMessage::assistant(text, at)
    }

    pub fn apology(at: DateTime<Utc>) -> ConversationMessage {
        ConversationMessage::assistant(APOLOGY_MESSAGE, at)
    }

    pub fn welcome(at: DateTime<Utc>) -> ConversationMessage {
        ConversationMessage::assistant(WELCOME_MESSAGE, at).with_id(WELCOME_ID)
    }
}
