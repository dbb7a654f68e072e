//! Preprocessor: the XML markup allowed before the first element form.
//!
//! Recognised, in order:
//!
//! - an optional `<?xml ... ?>` declaration
//! - any number of `<!-- ... -->` comments and at most one `<!DOCTYPE ...>`
//!
//! with whitespace allowed between them. A leading byte order mark is
//! skipped. Everything else is left for the XBLY parser, which starts at the
//! returned body offset.

use crate::error::TranslateError;
use crate::tree::{Prolog, PrologItem};

const DECLARATION_OPEN: &str = "<?xml";
const DOCTYPE_OPEN: &str = "<!DOCTYPE";
const COMMENT_OPEN: &str = "<!--";

pub(crate) const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Split `source` into its prolog and the byte offset where the body starts.
pub fn split_prolog(source: &str) -> Result<(Prolog, usize), TranslateError> {
    let mut prolog = Prolog::default();
    let start = if source.starts_with(BYTE_ORDER_MARK) {
        BYTE_ORDER_MARK.len_utf8()
    } else {
        0
    };
    let mut pos = skip_whitespace(source, start);

    if is_declaration(&source[pos..]) {
        let end = source[pos..]
            .find("?>")
            .map(|i| pos + i + 2)
            .ok_or_else(|| {
                TranslateError::syntax(source, pos, "unterminated XML declaration: missing `?>`")
            })?;
        log::debug!("prolog: declaration {:?}", &source[pos..end]);
        prolog.declaration = Some(source[pos..end].to_string());
        pos = skip_whitespace(source, end);
    }

    loop {
        let rest = &source[pos..];
        let (item, len) = if rest.starts_with(DOCTYPE_OPEN) {
            if prolog
                .items
                .iter()
                .any(|item| matches!(item, PrologItem::Doctype(_)))
            {
                return Err(TranslateError::syntax(
                    source,
                    pos,
                    "only one DOCTYPE is allowed",
                ));
            }
            let len = doctype_len(rest).ok_or_else(|| {
                TranslateError::syntax(source, pos, "unterminated DOCTYPE: missing `>`")
            })?;
            (PrologItem::Doctype(rest[..len].to_string()), len)
        } else if rest.starts_with(COMMENT_OPEN) {
            let len = rest[COMMENT_OPEN.len()..]
                .find("-->")
                .map(|i| COMMENT_OPEN.len() + i + 3)
                .ok_or_else(|| {
                    TranslateError::syntax(source, pos, "unterminated comment: missing `-->`")
                })?;
            (PrologItem::Comment(rest[..len].to_string()), len)
        } else if is_declaration(rest) {
            return Err(TranslateError::syntax(
                source,
                pos,
                "the XML declaration must come first",
            ));
        } else if rest.starts_with('<') {
            return Err(TranslateError::syntax(
                source,
                pos,
                "unexpected markup before the root element",
            ));
        } else {
            break;
        };

        log::debug!("prolog: {:?}", item);
        prolog.items.push(item);
        pos = skip_whitespace(source, pos + len);
    }

    Ok((prolog, pos))
}

/// `<?xml` followed by whitespace or `?>`; `<?xml-stylesheet` is not a declaration.
fn is_declaration(text: &str) -> bool {
    text.strip_prefix(DECLARATION_OPEN).is_some_and(|after| {
        after.starts_with("?>") || after.starts_with(|c: char| c.is_whitespace())
    })
}

fn skip_whitespace(source: &str, from: usize) -> usize {
    source[from..]
        .find(|c: char| !c.is_whitespace())
        .map(|i| from + i)
        .unwrap_or(source.len())
}

/// Length of a DOCTYPE at the start of `text`, up to and including its `>`.
///
/// `>` inside quoted literals or an internal `[...]` subset does not end it.
fn doctype_len(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut subset_depth = 0usize;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => subset_depth += 1,
                ']' => subset_depth = subset_depth.saturating_sub(1),
                '>' if subset_depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
    }

    None
}
