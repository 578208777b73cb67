//! Lexer (tokenizer) for debugger expressions
//!
//! Converts a raw command argument into a flat [`Token`] stream consumed by
//! the evaluator. Matching is rule driven: at every position the lexer walks
//! [`RULES`] in priority order and takes the first rule whose pattern matches
//! there, so multi-character operators must sit ahead of their one-character
//! prefixes and hex literals ahead of decimal ones.
//!
//! `-` and `*` are ambiguous in C-like syntax. The rule table only knows the
//! binary forms; the lexer remembers the kind of the last token it emitted and
//! retags them as [`TokenKind::Neg`] / [`TokenKind::Deref`] when
//! [`expects_operand`] says an operand has to come next.

use super::constants::{MAX_TOKENS, TOKEN_TEXT_MAX};
use super::errors::LexError;
use std::fmt;
use std::ops::Index;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Decimal,  // 42
    Hex,      // 0x2a
    Register, // $sp

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Le,    // <=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Prefix forms of '-' and '*'
    Neg,   // -x
    Deref, // *addr

    // Punctuation
    LParen, // (
    RParen, // )
}

impl TokenKind {
    /// Literal and register tokens keep their source text.
    pub fn carries_text(self) -> bool {
        matches!(self, TokenKind::Decimal | TokenKind::Hex | TokenKind::Register)
    }

    /// Prefix operators take a single operand on their right.
    pub fn is_prefix(self) -> bool {
        matches!(self, TokenKind::Neg | TokenKind::Deref | TokenKind::Bang)
    }

    /// Binary operators take operands on both sides.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Le
                | TokenKind::AndAnd
                | TokenKind::OrOr
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Decimal => write!(f, "decimal literal"),
            TokenKind::Hex => write!(f, "hex literal"),
            TokenKind::Register => write!(f, "register"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Neg => write!(f, "unary '-'"),
            TokenKind::Deref => write!(f, "unary '*'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
        }
    }
}

/// A single token.
///
/// `text` is empty for operators and punctuation. `position` is the byte
/// offset of the first character in the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.carries_text() {
            write!(f, "{} '{}'", self.kind, self.text)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Ordered token sequence with a fixed upper capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        TokenBuffer { tokens: Vec::new() }
    }

    /// Append a token.
    ///
    /// Panics when the buffer already holds [`MAX_TOKENS`] tokens.
    pub fn push(&mut self, token: Token) {
        assert!(
            self.tokens.len() < MAX_TOKENS,
            "token buffer overflow: more than {} tokens",
            MAX_TOKENS
        );
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Token> {
        self.tokens.iter_mut()
    }

    /// Kinds only, mostly useful for assertions and debug logging
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl Index<usize> for TokenBuffer {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenBuffer {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// What a lexical rule matches at the current position
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Whitespace,
    Hex,
    Register,
    Decimal,
    Exact(&'static str),
}

impl Pattern {
    /// Length of the match at the start of `rest`, if any.
    fn match_len(self, rest: &str) -> Option<usize> {
        let bytes = rest.as_bytes();
        let len = match self {
            Pattern::Whitespace => count_while(bytes, |b| b.is_ascii_whitespace()),
            Pattern::Hex => {
                if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
                    let digits = count_while(&bytes[2..], |b| b.is_ascii_hexdigit());
                    if digits == 0 {
                        0
                    } else {
                        2 + digits
                    }
                } else {
                    0
                }
            }
            Pattern::Register => {
                if bytes.first() == Some(&b'$') {
                    let name = count_while(&bytes[1..], |b| b.is_ascii_alphanumeric() || b == b'_');
                    if name == 0 {
                        0
                    } else {
                        1 + name
                    }
                } else {
                    0
                }
            }
            Pattern::Decimal => count_while(bytes, |b| b.is_ascii_digit()),
            Pattern::Exact(s) => {
                if rest.starts_with(s) {
                    s.len()
                } else {
                    0
                }
            }
        };
        (len > 0).then_some(len)
    }
}

fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}

/// A lexical rule. `kind == None` means the match is discarded.
struct Rule {
    pattern: Pattern,
    kind: Option<TokenKind>,
}

const fn rule(pattern: Pattern, kind: Option<TokenKind>) -> Rule {
    Rule { pattern, kind }
}

/// Lexical rules in priority order.
const RULES: &[Rule] = &[
    rule(Pattern::Whitespace, None),
    rule(Pattern::Hex, Some(TokenKind::Hex)),
    rule(Pattern::Register, Some(TokenKind::Register)),
    rule(Pattern::Decimal, Some(TokenKind::Decimal)),
    rule(Pattern::Exact("=="), Some(TokenKind::EqEq)),
    rule(Pattern::Exact("!="), Some(TokenKind::NotEq)),
    rule(Pattern::Exact("&&"), Some(TokenKind::AndAnd)),
    rule(Pattern::Exact("||"), Some(TokenKind::OrOr)),
    rule(Pattern::Exact("<="), Some(TokenKind::Le)),
    rule(Pattern::Exact("+"), Some(TokenKind::Plus)),
    rule(Pattern::Exact("-"), Some(TokenKind::Minus)),
    rule(Pattern::Exact("*"), Some(TokenKind::Star)),
    rule(Pattern::Exact("/"), Some(TokenKind::Slash)),
    rule(Pattern::Exact("("), Some(TokenKind::LParen)),
    rule(Pattern::Exact(")"), Some(TokenKind::RParen)),
    rule(Pattern::Exact("!"), Some(TokenKind::Bang)),
];

/// Whether the token after `prev` must be an operand.
///
/// True at the start of input, after `(`, after any binary operator and after
/// another prefix operator. A `-` or `*` in such a position is unary.
pub fn expects_operand(prev: Option<TokenKind>) -> bool {
    match prev {
        None => true,
        Some(kind) => kind == TokenKind::LParen || kind.is_binary() || kind.is_prefix(),
    }
}

/// Lexer for debugger expressions
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    prev: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input line.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            prev: None,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<TokenBuffer, LexError> {
        let mut tokens = TokenBuffer::new();
        self.position = 0;
        self.prev = None;

        while !self.is_at_end() {
            if let Some(token) = self.next_token()? {
                self.prev = Some(token.kind);
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    /// Match one rule at the current position. `Ok(None)` for discarded input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.position;
        let rest = &self.input[start..];

        let (rule, len) = RULES
            .iter()
            .find_map(|rule| rule.pattern.match_len(rest).map(|len| (rule, len)))
            .ok_or(LexError::NoMatch { position: start })?;

        self.position += len;

        let Some(kind) = rule.kind else {
            return Ok(None);
        };
        let kind = self.retag(kind);

        let text = if kind.carries_text() {
            if len > TOKEN_TEXT_MAX {
                return Err(LexError::LiteralTooLong {
                    position: start,
                    len,
                });
            }
            &rest[..len]
        } else {
            ""
        };

        Ok(Some(Token::new(kind, text, start)))
    }

    /// Turn binary `-` / `*` into their prefix forms where an operand is expected
    fn retag(&self, kind: TokenKind) -> TokenKind {
        match kind {
            TokenKind::Minus if expects_operand(self.prev) => TokenKind::Neg,
            TokenKind::Star if expects_operand(self.prev) => TokenKind::Deref,
            other => other,
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

/// Tokenize `input` with a fresh lexer.
pub fn tokenize(input: &str) -> Result<TokenBuffer, LexError> {
    Lexer::new(input).tokenize()
}
