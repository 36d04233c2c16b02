//! Token definitions for the pseudocode scanner.
//!
//! Kinds form a small hierarchy (`Integer` is a `Number`, `CommentText` is a
//! `Comment`, ...). The hierarchy is declared statically through
//! [`TokenKind::parent`] and is what the style tables fall back along.

use serde::Serialize;
use std::fmt;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Number,
    Integer,
    Float,

    /// Any run of letters
    Identifier,
    /// `true` / `false`
    Boolean,
    /// A whole word made of uppercase letters only
    Constant,

    Keyword,
    Operator,

    Punctuation,
    /// `...`
    Ellipsis,

    Comment,
    /// The `//` introducing a comment
    CommentPrefix,
    CommentText,

    AlgorithmLabel,
    /// The literal `ALGORITHM`
    AlgorithmKeyword,
    AlgorithmName,

    Math,
    /// `$` opening or closing an inline math span
    MathDelimiter,
    MathText,

    Whitespace,

    /// Unclassified input
    Text,
}

impl TokenKind {
    /// The next more general kind, or `None` for a root kind.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            Integer | Float => Some(Number),
            Boolean | Constant => Some(Identifier),
            Identifier => Some(Text),
            Ellipsis => Some(Punctuation),
            CommentPrefix | CommentText => Some(Comment),
            AlgorithmKeyword | AlgorithmName => Some(AlgorithmLabel),
            MathDelimiter | MathText => Some(Math),
            Number | Keyword | Operator | Punctuation | Comment | AlgorithmLabel | Math
            | Whitespace | Text => None,
        }
    }

    /// The kind itself followed by all of its ancestors.
    pub fn lineage(self) -> impl Iterator<Item = TokenKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Returns true if `self` is `other` or descends from it.
    pub fn is_a(self, other: TokenKind) -> bool {
        self.lineage().any(|kind| kind == other)
    }

    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Number => "number",
            Integer => "integer",
            Float => "float",
            Identifier => "identifier",
            Boolean => "boolean",
            Constant => "constant",
            Keyword => "keyword",
            Operator => "operator",
            Punctuation => "punctuation",
            Ellipsis => "ellipsis",
            Comment => "comment",
            CommentPrefix => "comment prefix",
            CommentText => "comment text",
            AlgorithmLabel => "algorithm label",
            AlgorithmKeyword => "algorithm keyword",
            AlgorithmName => "algorithm name",
            Math => "math",
            MathDelimiter => "math delimiter",
            MathText => "math text",
            Whitespace => "whitespace",
            Text => "text",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified slice of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Byte offset of the first character in the scanned text
    pub offset: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(offset: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            offset,
            kind,
            text: text.into(),
        }
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Number of line breaks inside the token.
    pub fn newlines(&self) -> usize {
        self.text.matches('\n').count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {:?}", self.kind, self.offset, self.text)
    }
}
