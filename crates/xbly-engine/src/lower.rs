//! Lowering: lossless syntax tree → [`Element`] tree.
//!
//! Whitespace rule: inside an element, whitespace before the first piece of
//! content (text, escape or child element) is dropped, including whitespace
//! around leading attribute tokens. Once content has started every
//! whitespace character is kept, up to and including any directly before
//! the closing `)`. A backslash-whitespace escape is content, which is how a
//! source keeps a leading space: `(u \ World )` → `<u> World </u>`.
//!
//! Only trees without parse errors are lowered.

use rowan::{NodeOrToken, SyntaxElementChildren};
use xbly_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, XblyLang};

use crate::error::TranslateError;
use crate::tree::{Element, Node};

/// Lower the single root ELEMENT of a parsed body.
///
/// `source` and `base` locate the body in the full source for error positions.
pub fn lower_root(root: &SyntaxNode, source: &str, base: usize) -> Result<Element, TranslateError> {
    let element = root
        .children()
        .find(|node| node.kind() == SyntaxKind::ELEMENT)
        .ok_or(TranslateError::EmptyDocument)?;
    Lowering { source, base }.element(&element)
}

struct Lowering<'a> {
    source: &'a str,
    base: usize,
}

/// An element whose children are still being lowered.
struct OpenElement {
    children: SyntaxElementChildren<XblyLang>,
    element: Element,
    content_started: bool,
    offset: usize,
}

impl OpenElement {
    fn new(node: &SyntaxNode) -> Self {
        Self {
            children: node.children_with_tokens(),
            element: Element::default(),
            content_started: false,
            offset: node.text_range().start().into(),
        }
    }
}

impl Lowering<'_> {
    /// Lower an ELEMENT node and its descendants, walking them with an
    /// explicit stack.
    fn element(&self, node: &SyntaxNode) -> Result<Element, TranslateError> {
        let mut parents: Vec<OpenElement> = Vec::new();
        let mut current = OpenElement::new(node);

        loop {
            match current.children.next() {
                Some(NodeOrToken::Node(child)) => {
                    current.content_started = true;
                    let parent = std::mem::replace(&mut current, OpenElement::new(&child));
                    parents.push(parent);
                }
                Some(NodeOrToken::Token(token)) => self.token(&mut current, &token)?,
                None => {
                    let element = self.close(current)?;
                    match parents.pop() {
                        Some(parent) => {
                            current = parent;
                            current.element.children.push(Node::Element(element));
                        }
                        None => return Ok(element),
                    }
                }
            }
        }
    }

    fn token(&self, open: &mut OpenElement, token: &SyntaxToken) -> Result<(), TranslateError> {
        match token.kind() {
            SyntaxKind::NAME => open.element.name = token.text().to_string(),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE => {
                if open.content_started {
                    open.element.push_text(token.text());
                }
            }
            SyntaxKind::TEXT => {
                open.content_started = true;
                open.element.push_text(token.text());
            }
            SyntaxKind::ESCAPE => {
                open.content_started = true;
                open.element.push_text(unescape(token.text()));
            }
            SyntaxKind::ATTRIBUTE => self.attribute(&mut open.element, token)?,
            _ => {}
        }
        Ok(())
    }

    fn close(&self, open: OpenElement) -> Result<Element, TranslateError> {
        if open.element.name.is_empty() {
            return Err(self.error_at(open.offset, "element has no name"));
        }
        Ok(open.element)
    }

    fn attribute(&self, element: &mut Element, token: &SyntaxToken) -> Result<(), TranslateError> {
        let text = token.text();
        let offset: usize = token.text_range().start().into();
        let (name, value) = split_attribute(text)
            .ok_or_else(|| self.error_at(offset, format!("malformed attribute `{text}`")))?;

        if element.attribute(name).is_some() {
            return Err(self.error_at(
                offset,
                format!("duplicate attribute `{name}` on element `{}`", element.name),
            ));
        }

        element
            .attributes
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> TranslateError {
        TranslateError::syntax(self.source, self.base + offset, message)
    }
}

/// `\(` → `(`, `\ ` → ` `, and so on.
fn unescape(escape: &str) -> &str {
    escape.strip_prefix('\\').unwrap_or(escape)
}

/// Split `\name="value"` (or single-quoted) into name and unquoted value.
fn split_attribute(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('\\')?;
    let (name, quoted) = body.split_once('=')?;
    let quote = quoted.chars().next()?;
    let value = quoted.strip_prefix(quote)?.strip_suffix(quote)?;
    Some((name, value))
}
