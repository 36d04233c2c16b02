//! pseudotex - pseudocode to LaTeX
//!
//! Converts a small pseudocode notation into either a `minted` block
//! (verbatim output, styled through escape characters) or an `align*`
//! block (math output, every symbol replaced by a math macro). Documents
//! may end with an annotation block describing curly braces next to line
//! ranges; these are drawn inline or as a TikZ overlay.
//!
//! # Example
//!
//! ```
//! use pseudotex::{pseudocode_to_latex, RenderOptions};
//!
//! let latex = pseudocode_to_latex("x <- 1", "demo", &RenderOptions::math()).unwrap();
//! assert!(latex.contains(r"x \leftarrow 1"));
//! ```

pub mod core;
pub mod utils;
pub mod wasm;

pub use crate::core::annotate::{
    extract_metadata, splice_annotations, AnnotationEntry, Metadata, OffsetTable,
};
pub use crate::core::lexer::{tokenize, tokenize_strict, Lexer, Token, TokenKind};
pub use crate::core::options::{BraceStyle, OutputMode, RenderOptions};
pub use crate::core::render::{render_tokens, RenderedDocument, RenderedLine};
pub use crate::core::style::{Markup, StyleTable, SymbolTable};
pub use crate::utils::error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning,
};
pub use crate::utils::naming::{sanitize_name, NameRegistry};

/// Convert a pseudocode document to LaTeX.
///
/// `name` namespaces the TikZ markers of a brace diagram; it is only
/// checked when a diagram is emitted.
pub fn pseudocode_to_latex(
    source: &str,
    name: &str,
    options: &RenderOptions,
) -> ConversionResult<String> {
    pseudocode_to_latex_with_report(source, name, options).map(|out| out.content)
}

/// Convert a pseudocode document, keeping the non-fatal warnings.
pub fn pseudocode_to_latex_with_report(
    source: &str,
    name: &str,
    options: &RenderOptions,
) -> ConversionResult<ConversionOutput> {
    let table = StyleTable::for_options(options);
    pseudocode_to_latex_with_table(source, name, options, &table)
}

/// Convert with a caller-supplied style table. The table decides the
/// output mode.
pub fn pseudocode_to_latex_with_table(
    source: &str,
    name: &str,
    options: &RenderOptions,
    table: &StyleTable,
) -> ConversionResult<ConversionOutput> {
    let metadata = extract_metadata(source)?;
    let lexed = Lexer::new(&metadata.body)
        .strict(options.strict_lexing)
        .tokenize()?;

    let mut warnings = lexed.warnings;
    let mut doc = render_tokens(&lexed.tokens, table, options.tab_size)?;
    warnings.extend(splice_annotations(&mut doc, &metadata, name, options)?);

    Ok(ConversionOutput::with_warnings(doc.to_latex(), warnings))
}
