//! # Lexer - Tokenizing XBLY Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. We never skip or
//! discard characters, so error offsets can be computed by summing token
//! lengths and the CST can be dumped back to the exact source:
//!
//! ```
//! use xbly_syntax::lexer::lex;
//!
//! let input = "(item \\quantity=\"2\" Banana)";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Context Without State
//!
//! XBLY has one place where context matters: inside a quoted attribute value
//! parentheses and backslashes are literal. Rather than giving the lexer
//! modes, a whole attribute token (`\name="value"`) is matched by a single
//! regex, so the quoted value never reaches the parser as separate tokens.
//! An attribute whose value runs to end of input without a closing quote
//! gets its own kind, [`SyntaxKind::UNTERMINATED_ATTRIBUTE`], which lets the
//! parser report it precisely.
//!
//! Any backslash that is neither a valid escape nor the start of a complete
//! attribute becomes a lone [`SyntaxKind::BACKSLASH`] token.
//!
//! [`SyntaxKind::UNTERMINATED_ATTRIBUTE`]: crate::syntax_kind::SyntaxKind::UNTERMINATED_ATTRIBUTE
//! [`SyntaxKind::BACKSLASH`]: crate::syntax_kind::SyntaxKind::BACKSLASH

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `(` opening an element
    #[token("(")]
    LParen,

    /// `)` closing an element
    #[token(")")]
    RParen,

    /// `\(`, `\)`, `\\`, or backslash + whitespace
    #[regex(r"\\[()\\ \t\r\n]")]
    Escape,

    /// `\name="value"` or `\name='value'`
    #[regex(r#"\\[^\s()\\='"]+=("[^"]*"|'[^']*')"#)]
    Attribute,

    /// `\name="value` with no closing quote
    #[regex(r#"\\[^\s()\\='"]+=("[^"]*|'[^']*)"#)]
    UnterminatedAttribute,

    /// Any other backslash
    #[token("\\")]
    Backslash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\s()\\]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Escape => SyntaxKind::ESCAPE,
            TokenKind::Attribute => SyntaxKind::ATTRIBUTE,
            TokenKind::UnterminatedAttribute => SyntaxKind::UNTERMINATED_ATTRIBUTE,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognised input (stray `\r`, form feeds, ...) is plain text
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    log::trace!("lexed {} bytes into {} tokens", input.len(), tokens.len());
    tokens
}
