//! Shape check for token sequences
//!
//! The evaluator splits ranges on the assumption that they are complete
//! expressions. User input that is not (`1 +`, `(2`, `3 4`) is rejected here
//! with a positioned [`EvalError`], so a bad range inside the evaluator can
//! only mean a bug.

use super::errors::EvalError;
use super::lexer::{Token, TokenKind};

/// Accept `tokens` only if it forms one complete expression.
pub fn check_syntax(tokens: &[Token]) -> Result<(), EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let mut expect_operand = true;
    let mut open_parens: Vec<usize> = Vec::new();

    for token in tokens {
        let kind = token.kind;
        if expect_operand {
            match kind {
                TokenKind::Decimal | TokenKind::Hex | TokenKind::Register => {
                    expect_operand = false;
                }
                TokenKind::LParen => open_parens.push(token.position),
                k if k.is_prefix() => {}
                _ => return Err(unexpected(token)),
            }
        } else {
            match kind {
                k if k.is_binary() => expect_operand = true,
                TokenKind::RParen => {
                    if open_parens.pop().is_none() {
                        return Err(unexpected(token));
                    }
                }
                _ => return Err(unexpected(token)),
            }
        }
    }

    if expect_operand {
        return Err(EvalError::UnexpectedEnd);
    }
    if let Some(&position) = open_parens.last() {
        return Err(EvalError::UnclosedParen { position });
    }
    Ok(())
}

fn unexpected(token: &Token) -> EvalError {
    EvalError::UnexpectedToken {
        position: token.position,
        found: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;

    fn check(input: &str) -> Result<(), EvalError> {
        check_syntax(tokenize(input).unwrap().as_slice())
    }

    #[test]
    fn test_well_formed() {
        assert!(check("1").is_ok());
        assert!(check("-(1 + 2) * 3").is_ok());
        assert!(check("*$sp == 0 || !$a0").is_ok());
        assert!(check("((0x10))").is_ok());
        assert!(check("- - -1").is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(check(""), Err(EvalError::EmptyExpression));
        assert_eq!(check("  "), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn test_dangling_operator() {
        assert_eq!(check("1 +"), Err(EvalError::UnexpectedEnd));
        assert_eq!(check("-"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(
            check("/ 2"),
            Err(EvalError::UnexpectedToken { position: 0, .. })
        ));
    }

    #[test]
    fn test_adjacent_operands() {
        assert!(matches!(
            check("3 4"),
            Err(EvalError::UnexpectedToken { position: 2, .. })
        ));
        assert!(matches!(
            check("2 (3)"),
            Err(EvalError::UnexpectedToken { position: 2, .. })
        ));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(check("(1 + 2"), Err(EvalError::UnclosedParen { position: 0 }));
        assert!(matches!(
            check("1 + 2)"),
            Err(EvalError::UnexpectedToken { position: 5, .. })
        ));
        assert!(matches!(check("()"), Err(EvalError::UnexpectedToken { position: 1, .. })));
    }

    #[test]
    fn test_message_names_token() {
        let err = check("1 + == 2").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected '==' at position 4");
    }
}
