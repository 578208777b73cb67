//! Recursive range evaluator
//!
//! [`Evaluator::evaluate`] reduces an inclusive token range `p..=q` to a
//! single `i32`:
//!
//! 1. A single token is a decimal literal (normalization has already turned
//!    registers and hex literals into decimal text).
//! 2. A range wrapped in one matching pair of parentheses is evaluated
//!    without them.
//! 3. Anything else is split at its *main operator*: the operator outside
//!    all parentheses with the loosest binding tier, the rightmost one on a
//!    tie so that chains associate to the left.
//!
//! Binding tiers, loosest first:
//!
//! ```text
//! 0  ||
//! 1  +  -
//! 2  *  /
//! 3  *addr
//! 4  &&
//! 5  ==  !=  <=
//! 6  -x  !x
//! ```
//!
//! Comparisons binding tighter than arithmetic is deliberate and matches the
//! monitor's documented behaviour (`1 + 2 == 3` is `1 + (2 == 3)`).
//!
//! A prefix operator only splits a range it starts. Anywhere else it belongs
//! to the operand of an operator further left.

use super::constants::DEREF_WIDTH;
use super::errors::EvalError;
use super::lexer::{Token, TokenKind};
use crate::machine::MemoryReader;

/// Binding tier of an operator; lower binds looser.
pub fn precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::OrOr => Some(0),
        TokenKind::Plus | TokenKind::Minus => Some(1),
        TokenKind::Star | TokenKind::Slash => Some(2),
        TokenKind::Deref => Some(3),
        TokenKind::AndAnd => Some(4),
        TokenKind::EqEq | TokenKind::NotEq | TokenKind::Le => Some(5),
        TokenKind::Neg | TokenKind::Bang => Some(6),
        _ => None,
    }
}

/// Evaluator over a normalized, syntax-checked token slice
pub struct Evaluator<'a, M: MemoryReader + ?Sized> {
    tokens: &'a [Token],
    memory: &'a M,
}

impl<'a, M: MemoryReader + ?Sized> Evaluator<'a, M> {
    pub fn new(tokens: &'a [Token], memory: &'a M) -> Self {
        Evaluator { tokens, memory }
    }

    /// Evaluate the whole token slice
    pub fn evaluate_all(&self) -> Result<i32, EvalError> {
        assert!(!self.tokens.is_empty(), "evaluate_all on an empty token slice");
        self.evaluate(0, self.tokens.len() - 1)
    }

    /// Evaluate the inclusive range `p..=q`.
    ///
    /// Panics if `p > q`: the range splitting below never produces one from a
    /// syntax-checked sequence.
    pub fn evaluate(&self, p: usize, q: usize) -> Result<i32, EvalError> {
        assert!(p <= q, "invalid token range {}..={}", p, q);

        if p == q {
            return parse_decimal(&self.tokens[p]);
        }

        if self.is_parenthesized(p, q) {
            return self.evaluate(p + 1, q - 1);
        }

        let op = self.main_operator(p, q);
        let kind = self.tokens[op].kind;

        if kind.is_prefix() {
            let operand = self.evaluate(op + 1, q)?;
            return self.apply_prefix(kind, operand);
        }

        assert!(op > p && op < q, "binary {} at edge of range {}..={}", kind, p, q);
        let lhs = self.evaluate(p, op - 1)?;
        let rhs = self.evaluate(op + 1, q)?;
        apply_binary(kind, lhs, rhs)
    }

    /// True when `p` and `q` are a matching pair enclosing the whole range
    fn is_parenthesized(&self, p: usize, q: usize) -> bool {
        if self.tokens[p].kind != TokenKind::LParen || self.tokens[q].kind != TokenKind::RParen {
            return false;
        }

        let mut depth = 0i32;
        for i in p..=q {
            match self.tokens[i].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            if depth == 0 && i < q {
                return false;
            }
        }
        depth == 0
    }

    /// Index of the operator that splits `p..=q`
    fn main_operator(&self, p: usize, q: usize) -> usize {
        let mut depth = 0i32;
        let mut best: Option<(usize, u8)> = None;

        for i in p..=q {
            let kind = self.tokens[i].kind;
            match kind {
                TokenKind::LParen => {
                    depth += 1;
                    continue;
                }
                TokenKind::RParen => {
                    depth -= 1;
                    continue;
                }
                _ => {}
            }

            if depth != 0 || (kind.is_prefix() && i != p) {
                continue;
            }

            let Some(tier) = precedence(kind) else {
                continue;
            };

            match best {
                Some((_, best_tier)) if tier > best_tier => {}
                _ => best = Some((i, tier)),
            }
        }

        match best {
            Some((i, _)) => i,
            None => panic!("no operator in token range {}..={}", p, q),
        }
    }

    fn apply_prefix(&self, kind: TokenKind, operand: i32) -> Result<i32, EvalError> {
        match kind {
            TokenKind::Neg => Ok(operand.wrapping_neg()),
            TokenKind::Bang => Ok((operand == 0) as i32),
            TokenKind::Deref => self.dereference(operand as u32),
            other => unreachable!("{} is not a prefix operator", other),
        }
    }

    /// Read one word of physical memory
    fn dereference(&self, addr: u32) -> Result<i32, EvalError> {
        if !self.memory.window().contains_range(addr, DEREF_WIDTH) {
            return Err(EvalError::AddressOutOfRange(addr));
        }
        Ok(self.memory.mem_read(addr, DEREF_WIDTH) as i32)
    }
}

fn apply_binary(kind: TokenKind, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
    let value = match kind {
        TokenKind::Plus => lhs.wrapping_add(rhs),
        TokenKind::Minus => lhs.wrapping_sub(rhs),
        TokenKind::Star => lhs.wrapping_mul(rhs),
        TokenKind::Slash => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        TokenKind::EqEq => (lhs == rhs) as i32,
        TokenKind::NotEq => (lhs != rhs) as i32,
        TokenKind::Le => (lhs <= rhs) as i32,
        TokenKind::AndAnd => (lhs != 0 && rhs != 0) as i32,
        TokenKind::OrOr => (lhs != 0 || rhs != 0) as i32,
        other => unreachable!("{} is not a binary operator", other),
    };
    Ok(value)
}

/// Parse a decimal literal.
///
/// Values up to `u32::MAX` are accepted and keep their 32-bit pattern, so an
/// address such as 2147483648 survives as `i32::MIN`.
fn parse_decimal(token: &Token) -> Result<i32, EvalError> {
    let malformed = || EvalError::MalformedLiteral(token.text.clone());

    if token.kind != TokenKind::Decimal {
        return Err(malformed());
    }

    let value: i64 = token.text.parse().map_err(|_| malformed())?;
    if value < i32::MIN as i64 || value > u32::MAX as i64 {
        return Err(malformed());
    }
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;
    use crate::machine::memory::MemoryWindow;

    /// Memory where every word reads back as its own address
    struct EchoMemory;

    impl MemoryReader for EchoMemory {
        fn window(&self) -> MemoryWindow {
            MemoryWindow::new(0x1000, 0x1fff)
        }

        fn mem_read(&self, addr: u32, _width: usize) -> u32 {
            addr
        }
    }

    fn eval(input: &str) -> Result<i32, EvalError> {
        let tokens = tokenize(input).unwrap();
        Evaluator::new(tokens.as_slice(), &EchoMemory).evaluate_all()
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14));
        assert_eq!(eval("(2+3)*4"), Ok(20));
        assert_eq!(eval("-(3+2)"), Ok(-5));
        assert_eq!(eval("10-4-3"), Ok(3));
        assert_eq!(eval("100/10/5"), Ok(2));
        assert_eq!(eval("7/2*2"), Ok(6));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("1-2"), Ok(-1));
        assert_eq!(eval("-1+2"), Ok(1));
        assert_eq!(eval("(-1)"), Ok(-1));
        assert_eq!(eval("1*-2"), Ok(-2));
        assert_eq!(eval("--3"), Ok(3));
        assert_eq!(eval("2 - -3"), Ok(5));
    }

    #[test]
    fn test_parenthesized_pairs_are_not_stripped() {
        // outer tokens are parentheses but not a matching pair
        assert_eq!(eval("(1+2)*(3+4)"), Ok(21));
        assert_eq!(eval("((1))-(2)"), Ok(-1));
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_eq!(eval("1 == 1"), Ok(1));
        assert_eq!(eval("1 != 1"), Ok(0));
        assert_eq!(eval("2 <= 3"), Ok(1));
        assert_eq!(eval("1 && 0"), Ok(0));
        assert_eq!(eval("0 || 5"), Ok(1));
        assert_eq!(eval("!0"), Ok(1));
        assert_eq!(eval("!7"), Ok(0));
    }

    #[test]
    fn test_or_is_loosest() {
        assert_eq!(eval("0 || 0 + 1"), Ok(1));
        assert_eq!(eval("1 || 0 && 0"), Ok(1));
        assert_eq!(eval("0 && 1 || 1"), Ok(1));
    }

    #[test]
    fn test_comparison_binds_tighter_than_arithmetic() {
        assert_eq!(eval("1 + 2 == 2"), Ok(2));
        assert_eq!(eval("(1 + 2) == 3"), Ok(1));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("5 + 4/(2-2)"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("0/5"), Ok(0));
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(eval("2147483647 + 1"), Ok(i32::MIN));
        assert_eq!(eval("2147483648 / -1"), Ok(i32::MIN));
        assert_eq!(eval("4294967295"), Ok(-1));
    }

    #[test]
    fn test_literal_out_of_range() {
        assert_eq!(
            eval("4294967296"),
            Err(EvalError::MalformedLiteral("4294967296".to_string()))
        );
    }

    #[test]
    fn test_dereference() {
        assert_eq!(eval("*4096"), Ok(4096));
        assert_eq!(eval("*(4096 + 4)"), Ok(4100));
        assert_eq!(eval("*4096 + 1"), Ok(4097));
        assert_eq!(eval("2 * *4096"), Ok(8192));
        assert_eq!(eval("*16"), Err(EvalError::AddressOutOfRange(16)));
        // last word must fit entirely
        assert_eq!(eval("*8190"), Err(EvalError::AddressOutOfRange(8190)));
    }

    #[test]
    fn test_dereference_binds_looser_than_comparison() {
        // *(4096 == 4096) reads address 1
        assert_eq!(eval("*4096 == 4096"), Err(EvalError::AddressOutOfRange(1)));
        assert_eq!(eval("4096 == *4096"), Ok(1));
    }

    #[test]
    fn test_main_operator_selection() {
        let tokens = tokenize("1 + 2 * 3 - 4").unwrap();
        let evaluator = Evaluator::new(tokens.as_slice(), &EchoMemory);
        assert_eq!(evaluator.main_operator(0, 6), 5);
        assert_eq!(evaluator.main_operator(0, 4), 1);

        let tokens = tokenize("-(1) * 2").unwrap();
        let evaluator = Evaluator::new(tokens.as_slice(), &EchoMemory);
        assert_eq!(evaluator.main_operator(0, 5), 4);
    }

    #[test]
    fn test_sub_range() {
        let tokens = tokenize("1 + (2 * 3)").unwrap();
        let evaluator = Evaluator::new(tokens.as_slice(), &EchoMemory);
        assert_eq!(evaluator.evaluate(2, 6), Ok(6));
        assert_eq!(evaluator.evaluate(3, 3), Ok(2));
    }

    #[test]
    #[should_panic(expected = "invalid token range")]
    fn test_inverted_range_panics() {
        let tokens = tokenize("1 + 2").unwrap();
        let _ = Evaluator::new(tokens.as_slice(), &EchoMemory).evaluate(2, 1);
    }
}
