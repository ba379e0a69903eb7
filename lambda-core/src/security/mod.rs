//! Security module for input validation and canonicalization

pub mod validation;

pub use validation::{canonicalize_digits, validate_expression, validate_input, ValidationError};
