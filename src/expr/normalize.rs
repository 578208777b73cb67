//! Literal normalization
//!
//! Runs once between lexing and evaluation. Register references are resolved
//! and hex literals reparsed, and both are rewritten in place as decimal
//! literal tokens, so the evaluator only ever parses base-10 text.

use super::errors::EvalError;
use super::lexer::{TokenBuffer, TokenKind};
use crate::machine::RegisterResolver;

/// Rewrite every register and hex token as a decimal literal.
pub fn normalize<R>(tokens: &mut TokenBuffer, registers: &R) -> Result<(), EvalError>
where
    R: RegisterResolver + ?Sized,
{
    for token in tokens.iter_mut() {
        match token.kind {
            TokenKind::Register => {
                let name = token.text.trim_start_matches('$');
                let value = registers
                    .reg_str2val(name)
                    .ok_or_else(|| EvalError::UnresolvedRegister(name.to_string()))?;
                token.kind = TokenKind::Decimal;
                token.text = value.to_string();
            }
            TokenKind::Hex => {
                let value = parse_hex(&token.text)
                    .ok_or_else(|| EvalError::MalformedLiteral(token.text.clone()))?;
                token.kind = TokenKind::Decimal;
                token.text = value.to_string();
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parse `0x...` as an unsigned 32-bit value
fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;

    struct FixedRegisters;

    impl RegisterResolver for FixedRegisters {
        fn reg_str2val(&self, name: &str) -> Option<i32> {
            match name {
                "zero" => Some(0),
                "sp" => Some(0x1000),
                "t0" => Some(-5),
                _ => None,
            }
        }
    }

    #[test]
    fn test_registers_become_decimal() {
        let mut tokens = tokenize("$sp + $t0").unwrap();
        normalize(&mut tokens, &FixedRegisters).unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Decimal);
        assert_eq!(tokens[0].text, "4096");
        assert_eq!(tokens[2].text, "-5");
    }

    #[test]
    fn test_hex_becomes_decimal() {
        let mut tokens = tokenize("0x10 + 0XfF + 0x80000000").unwrap();
        normalize(&mut tokens, &FixedRegisters).unwrap();

        assert_eq!(tokens[0].text, "16");
        assert_eq!(tokens[2].text, "255");
        assert_eq!(tokens[4].text, "2147483648");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Hex));
    }

    #[test]
    fn test_unknown_register() {
        let mut tokens = tokenize("1 + $eax").unwrap();
        let err = normalize(&mut tokens, &FixedRegisters).unwrap_err();
        assert_eq!(err, EvalError::UnresolvedRegister("eax".to_string()));
    }

    #[test]
    fn test_hex_overflow() {
        let mut tokens = tokenize("0x100000000").unwrap();
        let err = normalize(&mut tokens, &FixedRegisters).unwrap_err();
        assert_eq!(err, EvalError::MalformedLiteral("0x100000000".to_string()));
    }

    #[test]
    fn test_operators_untouched() {
        let mut tokens = tokenize("-(1)").unwrap();
        let before = tokens.clone();
        normalize(&mut tokens, &FixedRegisters).unwrap();
        assert_eq!(tokens, before);
    }
}
