//! Pseudocode tokenizer
//!
//! A rule-ordered scanner with three modes (normal text, trailing comment,
//! inline math). Every byte of the input lands in exactly one token.

mod rules;
mod scanner;
pub mod token;


pub use rules::{Mode, KEYWORDS, OPERATORS};
pub use scanner::{line_col, Lexed, Lexer};
pub use token::{Token, TokenKind};

use crate::utils::error::ConversionResult;

/// Tokenize, classifying unknown input as [`TokenKind::Text`].
pub fn tokenize(source: &str) -> ConversionResult<Vec<Token>> {
    Ok(Lexer::new(source).tokenize()?.tokens)
}

/// Tokenize, failing with a lexical error on input no rule classifies.
pub fn tokenize_strict(source: &str) -> ConversionResult<Vec<Token>> {
    Ok(Lexer::new(source).strict(true).tokenize()?.tokens)
}
