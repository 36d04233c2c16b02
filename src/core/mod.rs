//! Core conversion pipeline
//!
//! - `lexer`: pseudocode -> token stream
//! - `style`: token kind -> LaTeX markup tables
//! - `render`: token stream -> rendered lines inside an environment
//! - `annotate`: annotation metadata and brace splicing

pub mod annotate;
pub mod lexer;
pub mod options;
pub mod render;
pub mod style;
