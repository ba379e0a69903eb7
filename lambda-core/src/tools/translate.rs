//! Translation placeholder.
//!
//! No translation service is called: the text comes back labelled with the
//! requested direction so a real translator can be slotted in behind the same
//! contract.

use serde::{Deserialize, Serialize};

use crate::direction::{detect, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslateDirection {
    #[serde(rename = "fa-en")]
    FaEn,
    #[serde(rename = "en-fa")]
    EnFa,
}

impl TranslateDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslateDirection::FaEn => "fa-en",
            TranslateDirection::EnFa => "en-fa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TranslateDirection::FaEn => "[FA->EN Translation]:",
            TranslateDirection::EnFa => "[EN->FA Translation]:",
        }
    }

    /// Farsi source text translates to English, anything else to Farsi.
    pub fn for_source(text: &str) -> Self {
        match detect(text) {
            Direction::Rtl => TranslateDirection::FaEn,
            Direction::Ltr => TranslateDirection::EnFa,
        }
    }
}

pub fn translate(text: &str, direction: TranslateDirection) -> String {
    format!("{} {}", direction.label(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(translate("hello", TranslateDirection::EnFa), "[EN->FA Translation]: hello");
        assert_eq!(translate("سلام", TranslateDirection::FaEn), "[FA->EN Translation]: سلام");
    }

    #[test]
    fn test_direction_wire_names() {
        let direction: TranslateDirection = serde_json::from_str("\"fa-en\"").unwrap();
        assert_eq!(direction, TranslateDirection::FaEn);
        assert_eq!(serde_json::to_string(&TranslateDirection::EnFa).unwrap(), "\"en-fa\"");
        assert!(serde_json::from_str::<TranslateDirection>("\"EN-FA\"").is_err());
    }

    #[test]
    fn test_for_source() {
        assert_eq!(TranslateDirection::for_source("سلام دنیا"), TranslateDirection::FaEn);
        assert_eq!(TranslateDirection::for_source("hello world"), TranslateDirection::EnFa);
    }
}
