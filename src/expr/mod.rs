//! Debugger expression pipeline
//!
//! This module turns a line such as `*($sp + 8) == 0x2a` into an `i32`:
//! - [`lexer`]: Tokenization with unary `-` / `*` disambiguation
//! - [`syntax`]: Rejects token sequences that are not one complete expression
//! - [`normalize`]: Registers and hex literals rewritten as decimal literals
//! - [`eval`]: Recursive, precedence-driven evaluation over token ranges
//! - [`errors`]: [`LexError`] and [`EvalError`]
//!
//! # Pipeline
//!
//! ```text
//! text → Lexer → TokenBuffer → check_syntax → normalize → Evaluator → i32
//! ```
//!
//! Every call owns its token buffer, so nothing from one evaluation is
//! visible to the next.

pub mod constants;
pub mod errors;
pub mod eval;
pub mod lexer;
pub mod normalize;
pub mod syntax;

pub use errors::{EvalError, LexError};

use crate::machine::{MemoryReader, RegisterResolver};
use eval::Evaluator;

/// Evaluate `text` against the registers and memory of `target`.
pub fn evaluate_expression<T>(text: &str, target: &T) -> Result<i32, EvalError>
where
    T: RegisterResolver + MemoryReader + ?Sized,
{
    let mut tokens = lexer::tokenize(text)?;
    syntax::check_syntax(tokens.as_slice())?;
    normalize::normalize(&mut tokens, target)?;

    tracing::debug!(expr = text, tokens = tokens.len(), "evaluating");

    let result = Evaluator::new(tokens.as_slice(), target).evaluate_all();
    match &result {
        Ok(value) => tracing::debug!(expr = text, value, "evaluated"),
        Err(e) => tracing::debug!(expr = text, error = %e, "evaluation failed"),
    }
    result
}
