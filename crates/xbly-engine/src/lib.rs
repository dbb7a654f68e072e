//! # xbly-engine
//!
//! Translates XBLY shorthand into XML text.
//!
//! ```text
//! source ─► prolog::split_prolog ─► xbly_syntax::parse ─► lower ─► emit ─► XML
//!           (declaration, DOCTYPE)   (lossless CST)        (Document)
//! ```
//!
//! ```
//! let xml = xbly_engine::translate(r#"(basket (item Apple)(item \quantity="2" Banana))"#).unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version=\"1.0\" ?>\n<basket><item>Apple</item><item quantity=\"2\">Banana</item></basket>\n"
//! );
//! ```
//!
//! Translation is a pure function of its input: errors carry a position and
//! no partial output is produced.

pub mod emit;
pub mod error;
pub mod lower;
pub mod prolog;
pub mod tree;

pub use emit::{EmitOptions, EmptyElementStyle, XML_DECLARATION, emit, emit_element};
pub use error::TranslateError;
pub use tree::{Document, Element, Node, Prolog, PrologItem};

/// Everything that can change how a source is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub emit: EmitOptions,
    /// Deepest element nesting accepted.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            emit: EmitOptions::default(),
            max_depth: xbly_syntax::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Translate XBLY source into an XML document using default options.
pub fn translate(source: &str) -> Result<String, TranslateError> {
    translate_with(source, &Options::default())
}

pub fn translate_with(source: &str, options: &Options) -> Result<String, TranslateError> {
    let document = parse_document_with(source, options.max_depth)?;
    Ok(emit(&document, &options.emit))
}

/// Parse XBLY source into its document model without serializing it.
pub fn parse_document(source: &str) -> Result<Document, TranslateError> {
    parse_document_with(source, xbly_syntax::DEFAULT_MAX_DEPTH)
}

pub fn parse_document_with(source: &str, max_depth: usize) -> Result<Document, TranslateError> {
    let (prolog, body_start) = prolog::split_prolog(source)?;
    let body = &source[body_start..];

    let parse = xbly_syntax::parse_with_max_depth(body, max_depth);
    if let Some(error) = parse.first_error() {
        return Err(TranslateError::from_parse(source, body_start, error));
    }

    let root = lower::lower_root(&parse.syntax(), source, body_start)?;
    log::debug!(
        "translated root element `{}` with {} top-level children",
        root.name,
        root.children.len()
    );
    Ok(Document { prolog, root })
}

/// Dump the syntax tree of the body, followed by any parse errors.
///
/// Meant for debugging sources; prolog errors are still reported as errors.
pub fn dump_tree(source: &str, max_depth: usize) -> Result<String, TranslateError> {
    let (_, body_start) = prolog::split_prolog(source)?;
    let parse = xbly_syntax::parse_with_max_depth(&source[body_start..], max_depth);

    let mut out = xbly_syntax::format_tree(&parse.syntax());
    for error in parse.errors() {
        let lifted = TranslateError::from_parse(source, body_start, error);
        out.push_str(&format!("error: {lifted}\n"));
    }
    Ok(out)
}
