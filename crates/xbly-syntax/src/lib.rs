//! # xbly-syntax
//!
//! A lossless syntax tree for the XBLY shorthand using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## XBLY in One Paragraph
//!
//! An element is written `(name body...)`. The body mixes text, nested
//! elements and attribute tokens `\name="value"`, which belong to the
//! enclosing element wherever they appear. `\(`, `\)` and `\\` are literal
//! characters, and a backslash followed by whitespace is a literal
//! whitespace character that counts as content.
//!
//! ```text
//! (item \quantity="2" Banana)   →   <item quantity="2">Banana</item>
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! The tree keeps every byte of the input, including the backslashes and
//! quotes of escapes and attributes. Interpreting those (unescaping text,
//! splitting attribute tokens, dropping insignificant whitespace) happens
//! when the tree is lowered into a document model by `xbly-engine`.
//!
//! Prolog markup (`<?xml ...?>`, `<!DOCTYPE ...>`) is not XBLY; callers
//! strip it before handing the body to [`parse`].
//!
//! ## Module Structure
//!
//! ```text
//! xbly-syntax/
//! ├── lib.rs           # This file - public API and tree dumps
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, parse() functions
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         └── element.rs # Element forms
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use xbly_syntax::{parse, SyntaxKind};
//!
//! let parse = parse("(hello (world))");
//! let tree = parse.syntax();
//!
//! assert_eq!(tree.text().to_string(), "(hello (world))");
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let element = tree.children().next().unwrap();
//! assert_eq!(element.kind(), SyntaxKind::ELEMENT);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, Parse, ParseError, parse, parse_with_max_depth};
pub use syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken, XblyLang};

/// Render a tree as an indented listing of kinds, ranges and token texts.
pub fn format_tree(node: &SyntaxNode) -> String {
    let mut result = String::new();
    write_tree(node, 0, &mut result);
    result
}

fn write_tree(node: &SyntaxNode, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    out.push_str(&format!(
        "{}{:?}@{:?}\n",
        prefix,
        node.kind(),
        node.text_range()
    ));

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => write_tree(&n, indent + 1, out),
            rowan::NodeOrToken::Token(t) => {
                out.push_str(&format!(
                    "{}  {:?}@{:?} {:?}\n",
                    prefix,
                    t.kind(),
                    t.text_range(),
                    t.text()
                ));
            }
        }
    }
}
