//! Intent extraction from raw collaborator output.
//!
//! The collaborator signals a tool call by answering with nothing but a JSON
//! object `{"tool": <name>, "args": {...}}`, optionally inside a fenced code
//! block. Anything else, including malformed or partial JSON and unknown tool
//! names, is a direct answer and is passed through verbatim.

use serde_json::Value;
use tracing::debug;

use crate::tools::{ToolInvocation, ToolName};

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Tool(ToolInvocation),
    PlainText(String),
}

impl Intent {
    pub fn is_tool(&self) -> bool {
        matches!(self, Intent::Tool(_))
    }
}

/// Classify `raw`. Never fails: every rejection path yields
/// `Intent::PlainText(raw)` with the original, unstripped text.
pub fn extract(raw: &str) -> Intent {
    match parse_invocation(raw) {
        Some(invocation) => {
            debug!(tool = %invocation.tool, "collaborator requested a tool");
            Intent::Tool(invocation)
        }
        None => Intent::PlainText(raw.to_string()),
    }
}

fn parse_invocation(raw: &str) -> Option<ToolInvocation> {
    let body = strip_fences(raw);
    if !(body.starts_with('{') && body.ends_with('}')) {
        return None;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "object-shaped reply is not valid JSON; treating as text");
            return None;
        }
    };

    let tool = value.get("tool")?.as_str()?;
    let args = value.get("args")?.as_object()?;
    match tool.parse::<ToolName>() {
        Ok(tool) => Some(ToolInvocation::new(tool, args.clone())),
        Err(_) => {
            debug!(tool, "collaborator named an unknown tool; treating as text");
            None
        }
    }
}

/// Trim whitespace and one surrounding ```` ``` ```` / ```` ```json ```` fence.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
        if text.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            text = &text[4..];
        }
        text = text.trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}
