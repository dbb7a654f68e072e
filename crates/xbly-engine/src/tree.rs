//! Document model produced by lowering the syntax tree.
//!
//! Unlike the CST this holds *meaning*: escapes are resolved, attribute
//! tokens are split into name/value pairs on their element, and
//! insignificant whitespace is gone.

/// A node in the translated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with attributes in source order and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Append text, merging with a trailing text child.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => self.children.push(Node::Text(text.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Markup that precedes the root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prolog {
    /// The source's XML declaration, verbatim. Never echoed: output always
    /// carries a regenerated declaration.
    pub declaration: Option<String>,
    /// DOCTYPE and comments, verbatim and in source order.
    pub items: Vec<PrologItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrologItem {
    Doctype(String),
    Comment(String),
}

impl PrologItem {
    pub fn as_str(&self) -> &str {
        match self {
            PrologItem::Doctype(text) | PrologItem::Comment(text) => text,
        }
    }
}

/// A fully translated document: prolog plus the single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub prolog: Prolog,
    pub root: Element,
}

impl Document {
    pub fn doctype(&self) -> Option<&str> {
        self.prolog.items.iter().find_map(|item| match item {
            PrologItem::Doctype(text) => Some(text.as_str()),
            PrologItem::Comment(_) => None,
        })
    }
}
