//! # Parser - Event-Based Tree Construction
//!
//! This module transforms a token stream into a syntax tree using the
//! **event-based** architecture from rust-analyzer.
//!
//! Instead of building the tree directly, grammar rules emit a flat list of
//! **events** ([`Event`]) that describe the tree structure. The [`Sink`]
//! then builds the actual Rowan tree from events.
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker **must**
//! be completed with `marker.complete(parser, KIND)`; dropping it first
//! panics.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump();
//! m.complete(parser, SyntaxKind::ELEMENT);
//! ```
//!
//! ## Errors
//!
//! The parser never stops early. Problems are recorded as [`ParseError`]s
//! carrying the byte offset of the offending token, and the offending token
//! is wrapped in an `ERROR` node so the tree stays lossless. Callers decide
//! whether a tree with errors is usable; the translator rejects it.
//!
//! ## Public API
//!
//! ```
//! use xbly_syntax::parse;
//!
//! let parse = parse("(hello (world))");
//! assert!(parse.errors().is_empty());
//! println!("{:#?}", parse.syntax());
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// Element nesting allowed before the parser reports an error.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Highest nesting limit accepted. Trees are dropped recursively, so larger
/// requested limits are lowered to this.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// A problem found while parsing, positioned by byte offset into the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at byte {offset})")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

/// The result of parsing: a lossless tree plus any errors found on the way.
#[derive(Debug, Clone)]
pub struct Parse {
    syntax: SyntaxNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Root `ROOT` node of the tree.
    pub fn syntax(&self) -> SyntaxNode {
        self.syntax.clone()
    }

    /// Errors in the order they were reported.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The error with the lowest offset, if any.
    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.iter().min_by_key(|e| e.offset)
    }
}

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_remap()`
/// - Build structure: `start()` → `Marker` → `complete()`
/// - Report problems: `error()`, `err_and_bump()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    offset: usize,
    events: Vec<Event>,
    errors: Vec<ParseError>,
    max_depth: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            offset: 0,
            events: Vec::new(),
            errors: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deeply elements may nest, up to [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        if max_depth > MAX_DEPTH_LIMIT {
            log::warn!("nesting limit {max_depth} lowered to {MAX_DEPTH_LIMIT}");
        }
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> Parse {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        Parse {
            syntax: sink.finish(),
            errors: self.errors,
        }
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        let kind = self.current();
        self.bump_remap(kind);
    }

    /// Consume the current token, recording it under a different kind.
    pub fn bump_remap(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.events.push(Event::token(kind));
            self.offset += token.text.len();
            self.pos += 1;
        }
    }

    /// Record an error at the current token without consuming it.
    pub fn error(&mut self, message: impl Into<String>) {
        self.error_at(self.offset, message);
    }

    /// Record an error at an explicit offset.
    pub fn error_at(&mut self, offset: usize, message: impl Into<String>) {
        let message = message.into();
        log::debug!("parse error at byte {offset}: {message}");
        self.errors.push(ParseError { message, offset });
    }

    /// Record an error and wrap the current token in an ERROR node.
    pub fn err_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        let m = self.start();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it. Completing the marker converts the
/// placeholder to a `Start` event and pushes a `Finish` event. Dropping a
/// marker without completing it panics.
#[must_use = "Markers must be completed, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be completed");
        }
    }
}

/// Parse XBLY body text into a syntax tree.
pub fn parse(source: &str) -> Parse {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse XBLY body text, limiting element nesting to `max_depth`.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Parse {
    let tokens = lex(source);
    let parser = Parser::new(&tokens).with_max_depth(max_depth);
    parser.parse()
}
