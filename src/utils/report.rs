//! Token logs for inspecting how a document was scanned.

use serde::Serialize;

use super::error::{ConversionError, ConversionResult, ConversionWarning};
use crate::core::lexer::{line_col, Lexer, Token, TokenKind};

#[derive(Debug, Clone, Serialize)]
pub struct TokenRecord {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub kind: TokenKind,
    /// Parent chain, most specific first
    pub lineage: Vec<TokenKind>,
    pub text: String,
}

impl TokenRecord {
    pub fn new(source: &str, token: &Token) -> Self {
        let (line, column) = line_col(source, token.offset);
        Self {
            offset: token.offset,
            line,
            column,
            kind: token.kind,
            lineage: token.kind.lineage().collect(),
            text: token.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenLog {
    pub name: String,
    pub tokens: Vec<TokenRecord>,
    pub warnings: Vec<String>,
}

impl TokenLog {
    /// Scan `source` leniently and record every token.
    pub fn capture(name: impl Into<String>, source: &str) -> ConversionResult<Self> {
        let lexed = Lexer::new(source).tokenize()?;
        Ok(Self::new(name, source, &lexed.tokens, &lexed.warnings))
    }

    pub fn new(
        name: impl Into<String>,
        source: &str,
        tokens: &[Token],
        warnings: &[ConversionWarning],
    ) -> Self {
        Self {
            name: name.into(),
            tokens: tokens.iter().map(|t| TokenRecord::new(source, t)).collect(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn to_json(&self) -> ConversionResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConversionError::IoError {
            message: format!("failed to serialize token log: {}", e),
        })
    }

    /// One token per line, as `kind@offset "text"`
    pub fn to_lines(&self) -> String {
        let mut out = String::new();
        for record in &self.tokens {
            out.push_str(&format!(
                "{}@{} {:?}\n",
                record.kind, record.offset, record.text
            ));
        }
        out
    }
}
