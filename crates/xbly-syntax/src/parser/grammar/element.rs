//! Element forms: `(name body...)`.
//!
//! Nested elements are tracked with an explicit stack of open markers rather
//! than recursion. Once the stack reaches the depth limit, parsing stops: the
//! rest of the input goes into one flat ERROR node, so the tree is never
//! deeper than the limit.
//!
//! Body tokens are kept flat inside their ELEMENT node. Deciding which
//! whitespace is significant, and turning ATTRIBUTE tokens into attributes,
//! is left to whoever lowers the tree.

use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

struct OpenElement<'input> {
    marker: Marker,
    name: &'input str,
}

/// Parse an element starting at `(`, including all nested elements.
pub(super) fn element<'input>(p: &mut Parser<'_, 'input>) {
    debug_assert!(p.at(SyntaxKind::LPAREN));

    let mut open = vec![open_element(p)];

    while let Some(innermost) = open.last() {
        if p.at_end() {
            let message = format!(
                "unexpected end of input: element `{}` is never closed",
                innermost.name
            );
            p.error(message);
            // Close everything so the tree stays balanced
            while let Some(element) = open.pop() {
                element.marker.complete(p, SyntaxKind::ELEMENT);
            }
            break;
        }

        match p.current() {
            SyntaxKind::LPAREN if open.len() >= p.max_depth() => {
                let message = format!("elements nested deeper than {} levels", p.max_depth());
                p.error(message);
                skip_rest(p);
                while let Some(element) = open.pop() {
                    element.marker.complete(p, SyntaxKind::ELEMENT);
                }
            }
            SyntaxKind::LPAREN => open.push(open_element(p)),
            SyntaxKind::RPAREN => {
                p.bump();
                if let Some(element) = open.pop() {
                    element.marker.complete(p, SyntaxKind::ELEMENT);
                }
            }
            SyntaxKind::BACKSLASH => p.err_and_bump(
                "malformed attribute or escape sequence: expected `\\name=\"value\"`, `\\(`, `\\)`, `\\\\` or `\\` followed by whitespace",
            ),
            SyntaxKind::UNTERMINATED_ATTRIBUTE => {
                p.err_and_bump("unterminated attribute value: missing closing quote")
            }
            _ => p.bump(),
        }
    }
}

/// Wrap everything up to end of input in a single ERROR node.
fn skip_rest(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() {
        p.bump();
    }
    m.complete(p, SyntaxKind::ERROR);
}

fn open_element<'input>(p: &mut Parser<'_, 'input>) -> OpenElement<'input> {
    let marker = p.start();
    p.bump(); // (

    let name = if p.at(SyntaxKind::TEXT) {
        let name = p.current_text();
        p.bump_remap(SyntaxKind::NAME);
        name
    } else {
        p.error("expected an element name after `(`");
        ""
    };

    OpenElement { marker, name }
}

#[cfg(test)]
mod tests {
    use crate::syntax_kind::SyntaxKind;
    use crate::{format_tree, parse, parse_with_max_depth};
    use insta::assert_snapshot;

    #[test]
    fn element_name_is_remapped() {
        let parse = parse("(item Apple)");
        let element = parse.syntax().first_child().unwrap();
        let kinds: Vec<_> = element
            .children_with_tokens()
            .map(|child| child.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::LPAREN,
                SyntaxKind::NAME,
                SyntaxKind::WHITESPACE,
                SyntaxKind::TEXT,
                SyntaxKind::RPAREN,
            ]
        );
    }

    #[test]
    fn snapshot_nested_elements() {
        let parse = parse("(p Hello(u \\ World ))");
        assert_snapshot!(format_tree(&parse.syntax()), @r#"
        ROOT@0..21
          ELEMENT@0..21
            LPAREN@0..1 "("
            NAME@1..2 "p"
            WHITESPACE@2..3 " "
            TEXT@3..8 "Hello"
            ELEMENT@8..20
              LPAREN@8..9 "("
              NAME@9..10 "u"
              WHITESPACE@10..11 " "
              ESCAPE@11..13 "\\ "
              TEXT@13..18 "World"
              WHITESPACE@18..19 " "
              RPAREN@19..20 ")"
            RPAREN@20..21 ")"
        "#);
    }

    #[test]
    fn snapshot_attribute_and_error() {
        let parse = parse("(hr \\id=\"foo\" \\x)");
        assert_snapshot!(format_tree(&parse.syntax()), @r#"
        ROOT@0..17
          ELEMENT@0..17
            LPAREN@0..1 "("
            NAME@1..3 "hr"
            WHITESPACE@3..4 " "
            ATTRIBUTE@4..13 "\\id=\"foo\""
            WHITESPACE@13..14 " "
            ERROR@14..15
              BACKSLASH@14..15 "\\"
            TEXT@15..16 "x"
            RPAREN@16..17 ")"
        "#);
    }

    #[test]
    fn unclosed_elements_are_still_closed_in_tree() {
        let parse = parse("(a (b (c");
        assert_eq!(parse.errors().len(), 1);
        assert!(parse.errors()[0].message.contains("`c`"));
        let depth = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ELEMENT)
            .count();
        assert_eq!(depth, 3);
    }

    #[test]
    fn depth_limit_reports_once() {
        let input = "(a (b (c (d))))";
        let parse = parse_with_max_depth(input, 2);
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].offset, 6);
        assert!(parse.errors()[0].message.contains("deeper than 2"));

        assert!(parse_with_max_depth(input, 4).errors().is_empty());
    }

    #[test]
    fn tree_stops_at_depth_limit() {
        let input = "(a (b (c (d) x) y))";
        let parse = parse_with_max_depth(input, 2);
        assert_eq!(parse.syntax().text().to_string(), input);
        assert_snapshot!(format_tree(&parse.syntax()), @r#"
        ROOT@0..19
          ELEMENT@0..19
            LPAREN@0..1 "("
            NAME@1..2 "a"
            WHITESPACE@2..3 " "
            ELEMENT@3..19
              LPAREN@3..4 "("
              NAME@4..5 "b"
              WHITESPACE@5..6 " "
              ERROR@6..19
                LPAREN@6..7 "("
                TEXT@7..8 "c"
                WHITESPACE@8..9 " "
                LPAREN@9..10 "("
                TEXT@10..11 "d"
                RPAREN@11..12 ")"
                WHITESPACE@12..13 " "
                TEXT@13..14 "x"
                RPAREN@14..15 ")"
                WHITESPACE@15..16 " "
                TEXT@16..17 "y"
                RPAREN@17..18 ")"
                RPAREN@18..19 ")"
        "#);
    }

    #[test]
    fn runaway_nesting_builds_a_shallow_tree() {
        let depth = 200_000;
        let input = format!("{}{}", "(a ".repeat(depth), ")".repeat(depth));
        let parse = crate::parse(&input);
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].offset, 3 * crate::DEFAULT_MAX_DEPTH);
        let elements = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ELEMENT)
            .count();
        assert_eq!(elements, crate::DEFAULT_MAX_DEPTH);
        drop(parse);
    }

    #[test]
    fn default_depth_limit_rejects_runaway_nesting() {
        let depth = 1_000;
        let input = format!("{}{}", "(a ".repeat(depth), ")".repeat(depth));
        let parse = crate::parse(&input);
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].offset, 3 * crate::DEFAULT_MAX_DEPTH);
    }
}
