//! Sink for converting parser events into a Rowan green tree.

use rowan::GreenNodeBuilder;

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Converts parser events and tokens into a Rowan syntax tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    /// Create a new sink.
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the syntax tree.
    pub fn finish(mut self) -> SyntaxNode {
        for event in std::mem::take(&mut self.events) {
            match event {
                Event::Start { kind } => {
                    self.builder.start_node(kind.into());
                }
                Event::Token { kind, n_raw_tokens } => {
                    self.token(kind, n_raw_tokens as usize);
                }
                Event::Finish => {
                    self.builder.finish_node();
                }
                Event::Placeholder => {}
            }
        }

        SyntaxNode::new_root(self.builder.finish())
    }

    fn token(&mut self, kind: SyntaxKind, n_raw_tokens: usize) {
        let start = self.cursor;
        self.cursor += n_raw_tokens;
        let text: String = self.tokens[start..self.cursor]
            .iter()
            .map(|t| t.text)
            .collect();
        self.builder.token(kind.into(), &text);
    }
}
