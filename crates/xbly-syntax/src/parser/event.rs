//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(ELEMENT)     ← Begin an ELEMENT node
//!   Token(LPAREN)    ← Add a LPAREN token
//!   Token(NAME)
//!   Token(WHITESPACE)
//!   Token(TEXT)
//!   Token(RPAREN)
//! Finish             ← End the ELEMENT node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
///
/// Events form a flat representation of the tree that the [`Sink`](super::sink::Sink)
/// converts into an actual Rowan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add a token to the current node.
    ///
    /// The `kind` is typically the same as the lexer token, but can differ
    /// (a TEXT token directly after `(` is remapped to NAME).
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// A placeholder that will be replaced.
    ///
    /// When `parser.start()` is called, a `Placeholder` is pushed. Later,
    /// `marker.complete()` replaces it with a real `Start`.
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
