//! SyntaxKind enum for all tokens and nodes in the XBLY CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the XBLY CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// `(` opening an element form
    LPAREN,
    /// `)` closing an element form
    RPAREN,
    /// `\(`, `\)`, `\\` or a backslash followed by one whitespace character
    ESCAPE,
    /// `\name="value"` or `\name='value'`
    ATTRIBUTE,
    /// `\name="value` running to end of input without its closing quote
    UNTERMINATED_ATTRIBUTE,
    /// A backslash that starts neither an escape nor an attribute
    BACKSLASH,
    /// Element name; a TEXT token remapped by the parser
    NAME,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root node holding the body of the document
    ROOT,
    /// `(name ...)` element form
    ELEMENT,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum XblyLang {}

impl rowan::Language for XblyLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<XblyLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<XblyLang>;
