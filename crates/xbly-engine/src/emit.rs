//! Emitter: [`Document`] → XML text.

use crate::tree::{Document, Element, Node};

/// The declaration every output starts with, whatever the source declared.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" ?>"#;

/// How elements without children are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyElementStyle {
    /// `<br/>`
    #[default]
    Compact,
    /// `<br />`
    Spaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    pub empty_element_style: EmptyElementStyle,
    /// End the output with a newline after the root element.
    pub trailing_newline: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            empty_element_style: EmptyElementStyle::Compact,
            trailing_newline: true,
        }
    }
}

/// Serialize a document: declaration line, prolog items, then the root element.
pub fn emit(document: &Document, options: &EmitOptions) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');

    for item in &document.prolog.items {
        out.push_str(item.as_str());
        out.push('\n');
    }

    write_element(&document.root, options, &mut out);

    if options.trailing_newline {
        out.push('\n');
    }
    out
}

/// Serialize a single element and its descendants.
pub fn emit_element(element: &Element, options: &EmitOptions) -> String {
    let mut out = String::new();
    write_element(element, options, &mut out);
    out
}

enum Step<'a> {
    Open(&'a Element),
    Text(&'a str),
    Close(&'a Element),
}

/// Write an element and its descendants, walking them with an explicit stack.
fn write_element(element: &Element, options: &EmitOptions, out: &mut String) {
    let mut steps = vec![Step::Open(element)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Open(element) => {
                write_start_tag(element, out);
                if element.is_empty() {
                    match options.empty_element_style {
                        EmptyElementStyle::Compact => out.push_str("/>"),
                        EmptyElementStyle::Spaced => out.push_str(" />"),
                    }
                    continue;
                }
                out.push('>');
                steps.push(Step::Close(element));
                for child in element.children.iter().rev() {
                    steps.push(match child {
                        Node::Element(child) => Step::Open(child),
                        Node::Text(text) => Step::Text(text),
                    });
                }
            }
            Step::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Step::Close(element) => {
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}

/// `<name` plus attributes, without the closing `>`.
fn write_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        write_attribute_value(value, out);
        out.push('"');
    }
}

/// Quote-safe attribute value. Newlines and tabs become character references,
/// otherwise a parser would normalise them to spaces.
fn write_attribute_value(value: &str, out: &mut String) {
    for c in html_escape::encode_double_quoted_attribute(value).chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}
