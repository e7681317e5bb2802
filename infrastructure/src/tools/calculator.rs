//! Calculator tool
//!
//! Evaluates arithmetic expressions over numeric literals, unary sign,
//! `+ - * /`, and parentheses with standard precedence. Input passes a
//! character allow-list before anything is parsed, and the evaluator is a
//! hand-written recursive-descent parser; there is no general-purpose
//! expression evaluator behind it.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | NUMBER | '(' expr ')'
//! ```

use confab_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use thiserror::Error;

pub const CALCULATE: &str = "calculate";

/// A tool for evaluating basic arithmetic expressions
pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            CALCULATE,
            "Perform basic mathematical calculations (addition, subtraction, \
             multiplication, division)",
        )
        .with_parameter(ToolParameter::new(
            "expression",
            "Mathematical expression to evaluate (e.g., '2 + 3 * 4')",
            true,
        ))
    }

    fn execute(&self, call: &ToolCall) -> ToolResult {
        let expression = match call.require_string("expression") {
            Ok(e) => e,
            Err(message) => {
                return ToolResult::failure(CALCULATE, ToolError::invalid_argument(message));
            }
        };

        match evaluate(expression) {
            Ok(value) => ToolResult::success(
                CALCULATE,
                format!("{} = {}", expression.trim(), format_number(value)),
            ),
            Err(CalcError::DivisionByZero) => {
                ToolResult::failure(CALCULATE, ToolError::division_by_zero())
            }
            Err(e) => ToolResult::failure(CALCULATE, ToolError::invalid_argument(e.to_string())),
        }
    }
}

/// Errors produced while scanning or evaluating an expression
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error(
        "Invalid characters in expression. Only numbers and +, -, *, /, (, ) are allowed."
    )]
    DisallowedCharacter(char),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unexpected '{0}' in expression")]
    UnexpectedToken(String),

    #[error("Expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("Expression is empty")]
    Empty,
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    // Allow-list check first: a rejected expression is never tokenized,
    // let alone evaluated.
    if let Some(c) = expression
        .chars()
        .find(|c| !c.is_ascii_digit() && !c.is_whitespace() && !"+-*/().".contains(*c))
    {
        return Err(CalcError::DisallowedCharacter(c));
    }

    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(CalcError::UnexpectedToken(token.to_string()));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| CalcError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(CalcError::DisallowedCharacter(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.next();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.next();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.next();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.next();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Plus) => self.factor(),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

/// Render integral results without a decimal point
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("10 - 4 / 2").unwrap(), 8.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("((1 + 1) * (2 + 2))").unwrap(), 8.0);
    }

    #[test]
    fn test_unary_sign() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("2 * -4").unwrap(), -8.0);
        assert_eq!(evaluate("+7").unwrap(), 7.0);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(evaluate("1 / 2").unwrap(), 0.5);
        assert_eq!(evaluate("0.1 + 0.2 * 10").unwrap(), 2.1);
    }

    #[test]
    fn test_division_by_zero_is_distinct() {
        assert_eq!(evaluate("1/0").unwrap_err(), CalcError::DivisionByZero);
        assert_eq!(evaluate("1 / (2 - 2)").unwrap_err(), CalcError::DivisionByZero);
    }

    #[test]
    fn test_disallowed_characters_rejected_before_evaluation() {
        assert!(matches!(
            evaluate("import os").unwrap_err(),
            CalcError::DisallowedCharacter('i')
        ));
        assert!(matches!(
            evaluate("2 + x").unwrap_err(),
            CalcError::DisallowedCharacter('x')
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(evaluate("").is_err());
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("1..2").is_err());
    }

    #[test]
    fn test_tool_reports_integral_result() {
        let call = ToolCall::new(CALCULATE).with_arg("expression", "2 + 3 * 4");
        let result = CalculatorTool.execute(&call);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("2 + 3 * 4 = 14"));
    }

    #[test]
    fn test_tool_division_by_zero_error() {
        let call = ToolCall::new(CALCULATE).with_arg("expression", "1/0");
        let result = CalculatorTool.execute(&call);

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_tool_rejects_disallowed_input() {
        let call = ToolCall::new(CALCULATE).with_arg("expression", "import os");
        let result = CalculatorTool.execute(&call);

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert!(result.error().unwrap().message.contains("Invalid characters"));
    }

    #[test]
    fn test_tool_missing_argument() {
        let result = CalculatorTool.execute(&ToolCall::new(CALCULATE));
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_fractional_result_keeps_decimals() {
        let call = ToolCall::new(CALCULATE).with_arg("expression", "1 / 2");
        let result = CalculatorTool.execute(&call);
        assert_eq!(result.output(), Some("1 / 2 = 0.5"));
    }
}
