//! Error handling for pseudotex conversions
//!
//! This module provides a unified error type and result type for all
//! conversion operations, plus the non-fatal warnings collected along the way.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Input text could not be classified by any tokenizer rule
    LexicalError {
        message: String,
        line: usize,
        column: usize,
    },
    /// A token has no configured substitution in the active style table
    StyleMappingError {
        kind: String,
        symbol: String,
        line: Option<usize>,
    },
    /// The annotation block or offset directive is inconsistent or malformed
    AnnotationConfigError {
        message: String,
        line: Option<usize>,
    },
    /// The document name cannot be used as a marker namespace
    NamingError { name: String, message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::LexicalError {
                message,
                line,
                column,
            } => write!(
                f,
                "Lexical error at line {}, column {}: {}",
                line, column, message
            ),
            ConversionError::StyleMappingError { kind, symbol, line } => {
                if let Some(l) = line {
                    write!(
                        f,
                        "Style mapping error at line {}: no substitution for {} '{}'",
                        l, kind, symbol
                    )
                } else {
                    write!(
                        f,
                        "Style mapping error: no substitution for {} '{}'",
                        kind, symbol
                    )
                }
            }
            ConversionError::AnnotationConfigError { message, line } => {
                if let Some(l) = line {
                    write!(f, "Annotation error at line {}: {}", l, message)
                } else {
                    write!(f, "Annotation error: {}", message)
                }
            }
            ConversionError::NamingError { name, message } => {
                write!(f, "Invalid document name '{}': {}", name, message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted content
    pub content: String,
    /// Any warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// Convenience constructors for errors
impl ConversionError {
    pub fn lexical(message: impl Into<String>, line: usize, column: usize) -> Self {
        ConversionError::LexicalError {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn unmapped(kind: impl Into<String>, symbol: impl Into<String>) -> Self {
        ConversionError::StyleMappingError {
            kind: kind.into(),
            symbol: symbol.into(),
            line: None,
        }
    }

    pub fn annotation(message: impl Into<String>) -> Self {
        ConversionError::AnnotationConfigError {
            message: message.into(),
            line: None,
        }
    }

    pub fn annotation_at(message: impl Into<String>, line: usize) -> Self {
        ConversionError::AnnotationConfigError {
            message: message.into(),
            line: Some(line),
        }
    }

    pub fn naming(name: impl Into<String>, message: impl Into<String>) -> Self {
        ConversionError::NamingError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Attach a source line to errors that carry an optional one.
    pub fn at_line(self, at: usize) -> Self {
        match self {
            ConversionError::StyleMappingError { kind, symbol, .. } => {
                ConversionError::StyleMappingError {
                    kind,
                    symbol,
                    line: Some(at),
                }
            }
            ConversionError::AnnotationConfigError { message, .. } => {
                ConversionError::AnnotationConfigError {
                    message,
                    line: Some(at),
                }
            }
            other => other,
        }
    }
}
