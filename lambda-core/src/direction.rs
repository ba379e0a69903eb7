//! Script-based text direction detection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }
}

/// Arabic, Arabic Supplement, Arabic Extended-A and the two Arabic
/// Presentation Forms blocks.
const RTL_RANGES: &[(char, char)] = &[
    ('\u{0600}', '\u{06FF}'),
    ('\u{0750}', '\u{077F}'),
    ('\u{08A0}', '\u{08FF}'),
    ('\u{FB50}', '\u{FDFF}'),
    ('\u{FE70}', '\u{FEFF}'),
];

pub fn is_rtl_char(c: char) -> bool {
    RTL_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c))
}

/// `Rtl` as soon as one Arabic-script code point is present, `Ltr` otherwise.
pub fn detect(text: &str) -> Direction {
    if text.chars().any(is_rtl_char) {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}
