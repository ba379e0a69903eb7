//! Fixed registry of deterministic tools.
//!
//! The set of tools is closed: [`ToolName`] enumerates it, and every lookup
//! from name to schema to executor goes through an exhaustive `match`, so
//! adding a tool is a compile error until every table knows about it.

pub mod calculator;
pub mod calendar;
pub mod docs;
pub mod translate;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use calendar::CalendarReading;
pub use translate::TranslateDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    Calculator,
    PersianDate,
    Translate,
    DocsQa,
}

impl ToolName {
    /// Catalogue order, as shown to users.
    pub const ALL: [ToolName; 4] = [
        ToolName::Calculator,
        ToolName::PersianDate,
        ToolName::Translate,
        ToolName::DocsQa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Calculator => "calculator",
            ToolName::PersianDate => "persian_date",
            ToolName::Translate => "translate",
            ToolName::DocsQa => "docs_qa",
        }
    }

    pub fn display_name_fa(&self) -> &'static str {
        match self {
            ToolName::Calculator => "ماشین‌حساب",
            ToolName::PersianDate => "تاریخ شمسی",
            ToolName::Translate => "مترجم",
            ToolName::DocsQa => "جستجوی اسناد",
        }
    }

    pub fn display_name_en(&self) -> &'static str {
        match self {
            ToolName::Calculator => "Calculator",
            ToolName::PersianDate => "Persian Date",
            ToolName::Translate => "Translator",
            ToolName::DocsQa => "Docs Q&A",
        }
    }

    /// Sample prompts `(fa, en)` that make the reference collaborator pick this tool.
    pub fn example_prompts(&self) -> (&'static str, &'static str) {
        match self {
            ToolName::Calculator => ("محاسبه کن: ۲۵ * ۴ + ۱۰", "Calculate 25 * 4 + 10"),
            ToolName::PersianDate => ("تاریخ امروز چیست؟", "What is today's date?"),
            ToolName::Translate => ("ترجمه کن: سلام دنیا", "Translate \"Hello World\" to Farsi"),
            ToolName::DocsQa => ("جستجو در اسناد درباره Lambda Chat", "Search docs about Lambda Chat"),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Domain errors of tool execution. Rendered to users as-is, so the
/// messages are bilingual.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("ابزار ناشناخته (Unknown tool): {0}")]
    UnknownTool(String),

    #[error("آرگومان نامعتبر (Invalid arguments): {0}")]
    InvalidArguments(String),

    #[error("خطا: ورودی نامعتبر (Invalid input): {0}")]
    InvalidExpression(String),

    #[error("خطا در محاسبه (Calculation error): {0}")]
    ArithmeticError(String),
}

/// Successful tool result. Serializes to the bare value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolValue {
    Number(f64),
    Calendar(CalendarReading),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(ToolValue),
    Failure(ToolError),
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }
}

impl From<Result<ToolValue, ToolError>> for ToolOutcome {
    fn from(result: Result<ToolValue, ToolError>) -> Self {
        match result {
            Ok(value) => ToolOutcome::Success(value),
            Err(err) => ToolOutcome::Failure(err),
        }
    }
}

/// A tool call extracted from collaborator output.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool: ToolName,
    pub args: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool: ToolName, args: Map<String, Value>) -> Self {
        Self { tool, args }
    }
}

/// Ambient inputs a tool may read. Only the clock, for now.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext {
    pub now: DateTime<Local>,
}

impl ToolContext {
    pub fn now() -> Self {
        Self { now: Local::now() }
    }

    pub fn at(now: DateTime<Local>) -> Self {
        Self { now }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub allowed: Option<&'static [&'static str]>,
}

type Executor = fn(&Map<String, Value>, &ToolContext) -> Result<ToolValue, ToolError>;

pub struct ToolDescriptor {
    pub name: ToolName,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    executor: Executor,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl ToolDescriptor {
    pub fn for_tool(name: ToolName) -> Self {
        match name {
            ToolName::Calculator => Self {
                name,
                description: "Evaluate an arithmetic expression over + - * / and parentheses",
                params: &[ParamSpec {
                    name: "expression",
                    description: "Infix expression, e.g. '25 * 4 + 10'",
                    allowed: None,
                }],
                executor: run_calculator,
            },
            ToolName::PersianDate => Self {
                name,
                description: "Current date and time in the Gregorian and Persian calendars",
                params: &[],
                executor: run_persian_date,
            },
            ToolName::Translate => Self {
                name,
                description: "Translate text between Farsi and English",
                params: &[
                    ParamSpec {
                        name: "text",
                        description: "Text to translate",
                        allowed: None,
                    },
                    ParamSpec {
                        name: "direction",
                        description: "Translation direction",
                        allowed: Some(&["fa-en", "en-fa"]),
                    },
                ],
                executor: run_translate,
            },
            ToolName::DocsQa => Self {
                name,
                description: "Look a phrase up in the built-in documentation",
                params: &[ParamSpec {
                    name: "query",
                    description: "Phrase to search for",
                    allowed: None,
                }],
                executor: run_docs_qa,
            },
        }
    }

    /// JSON schema of the `args` object. Every listed parameter is a
    /// required string.
    pub fn schema(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            let mut property = json!({
                "type": "string",
                "description": param.description,
            });
            if let Some(allowed) = param.allowed {
                property["enum"] = json!(allowed);
            }
            properties.insert(param.name.to_string(), property);
        }
        let required: Vec<&str> = self.params.iter().map(|p| p.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn decode_args<T: DeserializeOwned>(args: &Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[derive(Deserialize)]
struct CalculatorArgs {
    expression: String,
}

#[derive(Deserialize)]
struct TranslateArgs {
    text: String,
    direction: TranslateDirection,
}

#[derive(Deserialize)]
struct DocsQaArgs {
    query: String,
}

fn run_calculator(args: &Map<String, Value>, _ctx: &ToolContext) -> Result<ToolValue, ToolError> {
    let args: CalculatorArgs = decode_args(args)?;
    calculator::evaluate(&args.expression).map(ToolValue::Number)
}

fn run_persian_date(_args: &Map<String, Value>, ctx: &ToolContext) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Calendar(calendar::reading_at(ctx.now.naive_local())))
}

fn run_translate(args: &Map<String, Value>, _ctx: &ToolContext) -> Result<ToolValue, ToolError> {
    let args: TranslateArgs = decode_args(args)?;
    Ok(ToolValue::Text(translate::translate(&args.text, args.direction)))
}

fn run_docs_qa(args: &Map<String, Value>, _ctx: &ToolContext) -> Result<ToolValue, ToolError> {
    let args: DocsQaArgs = decode_args(args)?;
    Ok(ToolValue::Text(docs::answer(&args.query)))
}

/// Owns the tool descriptors for the life of the process.
#[derive(Debug)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: ToolName::ALL.into_iter().map(ToolDescriptor::for_tool).collect(),
        }
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: ToolName) -> Option<&ToolDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        name.parse::<ToolName>().is_ok()
    }

    /// Execute by name against the wall clock.
    pub fn execute(&self, name: &str, args: &Map<String, Value>) -> ToolOutcome {
        self.execute_with(name, args, &ToolContext::now())
    }

    pub fn execute_with(&self, name: &str, args: &Map<String, Value>, ctx: &ToolContext) -> ToolOutcome {
        let descriptor = match name.parse::<ToolName>().ok().and_then(|tool| self.descriptor(tool)) {
            Some(descriptor) => descriptor,
            None => {
                crate::log_tool!(warn, name, "rejected call to unknown tool");
                return ToolOutcome::Failure(ToolError::UnknownTool(name.to_string()));
            }
        };

        let outcome = ToolOutcome::from((descriptor.executor)(args, ctx));
        match &outcome {
            ToolOutcome::Success(_) => {
                crate::log_tool!(debug, name, "tool succeeded");
            }
            ToolOutcome::Failure(err) => {
                crate::log_tool!(info, name, error = %err, "tool failed");
            }
        }
        outcome
    }

    pub fn invoke(&self, invocation: &ToolInvocation) -> ToolOutcome {
        self.execute(invocation.tool.as_str(), &invocation.args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
