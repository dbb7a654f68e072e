use xbly_syntax::ParseError;

use crate::prolog::BYTE_ORDER_MARK;

/// Why a source could not be translated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// Structural problem in the source: parentheses, escapes, attributes or prolog markup.
    #[error("{line}:{column}: {message}")]
    Syntax {
        message: String,
        /// Byte offset into the full source
        offset: usize,
        /// 1-based line
        line: usize,
        /// 1-based column, counted in characters
        column: usize,
    },

    #[error("document has no root element")]
    EmptyDocument,
}

impl TranslateError {
    /// Build a syntax error, resolving `offset` to a line and column in `source`.
    pub(crate) fn syntax(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        TranslateError::Syntax {
            message: message.into(),
            offset,
            line,
            column,
        }
    }

    /// Lift a parse error found in the body that starts `base` bytes into `source`.
    pub(crate) fn from_parse(source: &str, base: usize, error: &ParseError) -> Self {
        Self::syntax(source, base + error.offset, error.message.clone())
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    // A byte order mark takes no column
    let before = before.strip_prefix(BYTE_ORDER_MARK).unwrap_or(before);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
