//! Restricted arithmetic evaluator for the calculator tool.
//!
//! Grammar, over f64:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! ```

use super::ToolError;
use crate::security::{canonicalize_digits, validate_expression};

/// Parenthesis/unary nesting limit; deeper input is rejected, not evaluated.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Validate then evaluate `expression`.
///
/// Persian and Arabic-Indic digits are accepted and read as ASCII digits.
/// Division by zero and non-finite results are `ArithmeticError`.
pub fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let expression = canonicalize_digits(expression);
    validate_expression(&expression).map_err(|e| ToolError::InvalidExpression(e.to_string()))?;

    let tokens = tokenize(&expression)?;
    if tokens.is_empty() {
        return Err(ToolError::InvalidExpression("empty expression".to_string()));
    }

    let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(ToolError::InvalidExpression(format!(
            "unexpected token at position {}",
            parser.pos
        )));
    }

    if !value.is_finite() {
        return Err(ToolError::ArithmeticError("result is not finite".to_string()));
    }

    // -0 renders as "0"
    Ok(if value == 0.0 { 0.0 } else { value })
}

fn tokenize(input: &str) -> Result<Vec<Token>, ToolError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, next)) = chars.peek().copied() {
                    if next.is_ascii_digit() || next == '.' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                let value = literal.parse::<f64>().map_err(|_| {
                    ToolError::InvalidExpression(format!("malformed number '{}'", literal))
                })?;
                Token::Number(value)
            }
            other => {
                return Err(ToolError::InvalidExpression(format!(
                    "unexpected character {:?}",
                    other
                )))
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), ToolError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ToolError::InvalidExpression("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == Token::Star {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(ToolError::ArithmeticError("division by zero".to_string()));
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ToolError> {
        match self.peek() {
            Some(op @ (Token::Plus | Token::Minus)) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(if op == Token::Minus { -value } else { value })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ToolError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ToolError::InvalidExpression("missing closing parenthesis".to_string())),
                }
            }
            Some(token) => Err(ToolError::InvalidExpression(format!(
                "unexpected {:?} at position {}",
                token,
                self.pos - 1
            ))),
            None => Err(ToolError::InvalidExpression("unexpected end of expression".to_string())),
        }
    }
}
