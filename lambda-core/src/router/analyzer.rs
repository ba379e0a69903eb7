use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::security::canonicalize_digits;

static ARITHMETIC_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]\s*[-+*/]\s*[0-9]").expect("static pattern"));
static ARITHMETIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(0-9][-0-9\s+*/().]*").expect("static pattern"));
static TRANSLATE_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)translate|ترجمه").expect("static pattern"));
static DOCS_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)docs|search|جستجو|سند").expect("static pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RequestKind {
    Arithmetic { expression: String },
    Date,
    Translation { text: String },
    DocsSearch { query: String },
    GeneralChat,
}

pub fn analyze_request(message: &str) -> RequestKind {
    let lower = canonicalize_digits(message).to_lowercase();

    // Simple keyword-based classification, first match wins
    if let Some(expression) = arithmetic_expression(&lower) {
        RequestKind::Arithmetic { expression }
    } else if contains_date_keywords(&lower) {
        RequestKind::Date
    } else if TRANSLATE_KEYWORDS.is_match(&lower) {
        RequestKind::Translation {
            text: strip_keywords(&TRANSLATE_KEYWORDS, &lower),
        }
    } else if DOCS_KEYWORDS.is_match(&lower) {
        RequestKind::DocsSearch {
            query: strip_keywords(&DOCS_KEYWORDS, &lower),
        }
    } else {
        RequestKind::GeneralChat
    }
}

/// The arithmetic run holding the first `digit op digit` match. Other
/// numbers in the message, before or after it, are left out.
fn arithmetic_expression(text: &str) -> Option<String> {
    let hint = ARITHMETIC_HINT.find(text)?;
    let run = ARITHMETIC_RUN
        .find_iter(text)
        .find(|run| run.start() <= hint.start() && hint.start() < run.end())?
        .as_str()
        .trim();
    (!run.is_empty()).then(|| run.to_string())
}

fn contains_date_keywords(text: &str) -> bool {
    let keywords = ["date", "time", "تاریخ", "ساعت"];
    keywords.iter().any(|kw| text.contains(kw))
}

fn strip_keywords(pattern: &Regex, text: &str) -> String {
    pattern.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic(expression: &str) -> RequestKind {
        RequestKind::Arithmetic {
            expression: expression.to_string(),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(analyze_request("25 * 4 + 10"), arithmetic("25 * 4 + 10"));
        assert_eq!(analyze_request("Calculate 25 * 4 + 10"), arithmetic("25 * 4 + 10"));
        assert_eq!(analyze_request("what is (2 + 3) * 4?"), arithmetic("(2 + 3) * 4"));
        assert_eq!(analyze_request("محاسبه کن: ۲۵ * ۴ + ۱۰"), arithmetic("25 * 4 + 10"));
    }

    #[test]
    fn test_arithmetic_skips_unrelated_numbers() {
        assert_eq!(analyze_request("I have 3 apples, what is 4 + 5?"), arithmetic("4 + 5"));
        assert_eq!(analyze_request("room 12: 2 * 3"), arithmetic("2 * 3"));
        assert_eq!(analyze_request("in 2024 I paid 10 * 3 for 7 items"), arithmetic("10 * 3"));
    }

    #[test]
    fn test_date() {
        assert_eq!(analyze_request("What is today's date?"), RequestKind::Date);
        assert_eq!(analyze_request("تاریخ امروز چیست؟"), RequestKind::Date);
        assert_eq!(analyze_request("ساعت چنده"), RequestKind::Date);
    }

    #[test]
    fn test_translation_strips_keyword() {
        assert_eq!(
            analyze_request("Translate hello world"),
            RequestKind::Translation {
                text: "hello world".to_string()
            }
        );
        assert_eq!(
            analyze_request("ترجمه سلام دنیا"),
            RequestKind::Translation {
                text: "سلام دنیا".to_string()
            }
        );
    }

    #[test]
    fn test_docs_search_strips_keywords() {
        assert_eq!(
            analyze_request("Search docs about Lambda Chat"),
            RequestKind::DocsSearch {
                query: "about lambda chat".to_string()
            }
        );
    }

    #[test]
    fn test_general_chat() {
        assert_eq!(analyze_request("Hello!"), RequestKind::GeneralChat);
        assert_eq!(analyze_request("سلام"), RequestKind::GeneralChat);
        // A lone number is not a calculation
        assert_eq!(analyze_request("I have 3 cats"), RequestKind::GeneralChat);
    }
}
