//! Error types for expression lexing and evaluation
//!
//! [`LexError`] rejects an input line before any token reaches the evaluator.
//! [`EvalError`] covers everything after that: malformed token sequences,
//! unresolvable registers, bad literals and the two runtime failures
//! (division by zero and dereferencing an address outside the backing window).
//!
//! None of these are ever folded into the numeric result. A caller either gets
//! an `i32` or one of these variants.

use std::fmt;

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No lexical rule matches at this byte offset
    NoMatch { position: usize },

    /// A literal or register name longer than the token text limit
    LiteralTooLong { position: usize, len: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::NoMatch { position } => {
                write!(f, "Syntax error at position {}: no matching token", position)
            }
            LexError::LiteralTooLong { position, len } => {
                write!(
                    f,
                    "Literal at position {} is {} bytes long, limit is {}",
                    position,
                    len,
                    super::constants::TOKEN_TEXT_MAX
                )
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Errors that reject an expression after tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The input could not be tokenized
    Lex(LexError),

    /// Nothing but whitespace
    EmptyExpression,

    /// A token appeared where the grammar does not allow it
    UnexpectedToken { position: usize, found: String },

    /// The input ended while an operand was still expected
    UnexpectedEnd,

    /// An opening parenthesis was never closed
    UnclosedParen { position: usize },

    /// `$name` did not name a register
    UnresolvedRegister(String),

    /// A literal that does not fit in 32 bits
    MalformedLiteral(String),

    /// Right-hand side of `/` evaluated to zero
    DivisionByZero,

    /// Dereference outside the backing memory window
    AddressOutOfRange(u32),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Lex(e) => write!(f, "{}", e),
            EvalError::EmptyExpression => write!(f, "Empty expression"),
            EvalError::UnexpectedToken { position, found } => {
                write!(f, "Unexpected {} at position {}", found, position)
            }
            EvalError::UnexpectedEnd => {
                write!(f, "Expression ended while an operand was expected")
            }
            EvalError::UnclosedParen { position } => {
                write!(f, "Parenthesis opened at position {} is never closed", position)
            }
            EvalError::UnresolvedRegister(name) => {
                write!(f, "Unknown register '${}'", name)
            }
            EvalError::MalformedLiteral(text) => {
                write!(f, "Literal '{}' does not fit in 32 bits", text)
            }
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::AddressOutOfRange(addr) => {
                write!(f, "Address 0x{:08x} is outside physical memory", addr)
            }
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for EvalError {
    fn from(e: LexError) -> Self {
        EvalError::Lex(e)
    }
}
