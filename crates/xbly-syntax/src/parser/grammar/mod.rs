//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.bump_remap()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`)
//!
//! ## Module Structure
//!
//! - [`element`] - Element forms `(name ...)` and their bodies
//!
//! ## Document Shape
//!
//! ```text
//! ROOT
//!   WHITESPACE / NEWLINE*
//!   ELEMENT                 ← exactly one root element
//!   WHITESPACE / NEWLINE*
//! ```
//!
//! Anything else at the top level is wrapped in an ERROR node and reported,
//! but parsing carries on so that the tree still covers every byte.

mod element;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut seen_root = false;

    while !p.at_end() {
        match p.current() {
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE => p.bump(),
            SyntaxKind::LPAREN => {
                if seen_root {
                    p.error("only one root element is allowed");
                }
                element::element(p);
                seen_root = true;
            }
            SyntaxKind::RPAREN => p.err_and_bump("unbalanced `)`: no element is open"),
            SyntaxKind::ATTRIBUTE | SyntaxKind::UNTERMINATED_ATTRIBUTE => {
                p.err_and_bump("attribute outside of any element")
            }
            _ if seen_root => p.err_and_bump("content after the root element"),
            _ => p.err_and_bump("content before the root element"),
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
