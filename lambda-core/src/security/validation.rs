//! Input validation and canonicalization utilities

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Input too long: max {max} characters, got {actual}")]
    InputTooLong { max: usize, actual: usize },

    #[error("Invalid characters detected")]
    InvalidCharacters,

    #[error("Empty input not allowed")]
    EmptyInput,

    #[error("Disallowed character {0:?} in expression")]
    DisallowedCharacter(char),
}

/// Validate a user submission before it becomes a conversation turn.
///
/// Blank input is rejected; length is counted in characters, not bytes, so
/// Farsi text gets the same budget as English.
pub fn validate_input(input: &str, max_chars: usize) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let actual = input.chars().count();
    if actual > max_chars {
        return Err(ValidationError::InputTooLong {
            max: max_chars,
            actual,
        });
    }

    // Control characters other than line breaks and tabs
    if input.chars().any(|c| {
        c.is_control() && c != '\n' && c != '\t' && c != '\r'
    }) {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(())
}

/// Map Persian (U+06F0..=U+06F9) and Arabic-Indic (U+0660..=U+0669) digits
/// to their ASCII equivalents. Every other character is left untouched.
pub fn canonicalize_digits(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| native_digit_value(c).is_some()) {
        return Cow::Borrowed(input);
    }

    Cow::Owned(
        input
            .chars()
            .map(|c| match native_digit_value(c) {
                Some(d) => char::from(b'0' + d),
                None => c,
            })
            .collect(),
    )
}

fn native_digit_value(c: char) -> Option<u8> {
    match c {
        '\u{06F0}'..='\u{06F9}' => Some((c as u32 - 0x06F0) as u8),
        '\u{0660}'..='\u{0669}' => Some((c as u32 - 0x0660) as u8),
        _ => None,
    }
}

/// Accept only ASCII digits, whitespace and `+ - * / ( ) .`.
///
/// Run [`canonicalize_digits`] first if native digits should be allowed.
pub fn validate_expression(expression: &str) -> Result<(), ValidationError> {
    if expression.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    match expression.chars().find(|c| !is_expression_char(*c)) {
        Some(c) => Err(ValidationError::DisallowedCharacter(c)),
        None => Ok(()),
    }
}

fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_whitespace()
        || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}
