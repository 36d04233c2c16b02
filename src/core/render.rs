//! Line reassembly
//!
//! Folds the token stream into rendered lines: same-kind tokens are merged
//! into a single styled run, newlines start a new line (an alignment row in
//! math output) and leading whitespace becomes indentation commands.

use super::lexer::{Token, TokenKind};
use super::options::OutputMode;
use super::style::StyleTable;
use crate::utils::error::ConversionResult;

const MATH_ROW_LEAD: &str = "\t\t& ";
const MATH_ROW_BREAK: &str = r" \\";
const INDENT: &str = r"\qquad ";
const FORCED_SPACE: &str = r"\ ";

/// One source line after styling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    /// Alignment marker and source indentation
    pub lead: String,
    pub body: String,
    /// Row separator, empty on the last row
    pub row_break: String,
}

impl RenderedLine {
    pub fn render(&self) -> String {
        format!("{}{}{}", self.lead, self.body, self.row_break)
    }
}

/// A rendered document: environment frame plus one entry per source line
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub mode: OutputMode,
    pub escape_char: char,
    pub opening: String,
    pub lines: Vec<RenderedLine>,
    pub closing: String,
    /// Picture appended after the environment (brace diagram)
    pub trailer: Option<String>,
}

impl RenderedDocument {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-based number
    pub fn line(&self, number: usize) -> Option<&RenderedLine> {
        number.checked_sub(1).and_then(|idx| self.lines.get(idx))
    }

    /// Mutable line by 1-based number
    pub fn line_mut(&mut self, number: usize) -> Option<&mut RenderedLine> {
        number.checked_sub(1).and_then(move |idx| self.lines.get_mut(idx))
    }

    /// Wrap raw LaTeX so it survives the current environment.
    pub fn escaped(&self, latex: &str) -> String {
        match self.mode {
            OutputMode::Verbatim => format!("{e}{latex}{e}", e = self.escape_char),
            OutputMode::Math => latex.to_string(),
        }
    }

    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.opening);
        out.push('\n');
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
        out.push_str(&self.closing);
        if let Some(ref trailer) = self.trailer {
            out.push('\n');
            out.push_str(trailer);
        }
        out
    }
}

/// Render a token stream with the given table.
pub fn render_tokens(
    tokens: &[Token],
    table: &StyleTable,
    tab_size: usize,
) -> ConversionResult<RenderedDocument> {
    let mut reassembler = Reassembler::new(table, tab_size);
    for token in tokens {
        reassembler.feed(token)?;
    }
    reassembler.finish()
}

struct Reassembler<'t> {
    table: &'t StyleTable,
    tab_size: usize,
    lines: Vec<RenderedLine>,
    body: String,
    /// Pending run of same-kind tokens
    run: Option<(TokenKind, String)>,
    /// Nothing but indentation emitted on the current row so far
    at_row_start: bool,
    line: usize,
}

impl<'t> Reassembler<'t> {
    fn new(table: &'t StyleTable, tab_size: usize) -> Self {
        Reassembler {
            table,
            tab_size: tab_size.max(1),
            lines: Vec::new(),
            body: String::new(),
            run: None,
            at_row_start: true,
            line: 1,
        }
    }

    fn math(&self) -> bool {
        self.table.mode == OutputMode::Math
    }

    fn feed(&mut self, token: &Token) -> ConversionResult<()> {
        if token.kind == TokenKind::Whitespace {
            self.flush()?;
            let mut segments = token.text.split('\n');
            if let Some(first) = segments.next() {
                self.blank(first);
            }
            for segment in segments {
                self.end_line();
                self.blank(segment);
            }
            return Ok(());
        }

        if self.table.is_lookup(token.kind) {
            self.flush()?;
            return self.emit(token.kind, &token.text);
        }

        if let Some((kind, text)) = self.run.as_mut() {
            if *kind == token.kind {
                text.push_str(&token.text);
                return Ok(());
            }
        }
        self.flush()?;
        self.run = Some((token.kind, token.text.clone()));
        Ok(())
    }

    fn flush(&mut self) -> ConversionResult<()> {
        match self.run.take() {
            Some((kind, text)) => self.emit(kind, &text),
            None => Ok(()),
        }
    }

    fn emit(&mut self, kind: TokenKind, text: &str) -> ConversionResult<()> {
        let rendered = self
            .table
            .apply(kind, text)
            .map_err(|e| e.at_line(self.line))?;
        if rendered.is_empty() {
            return Ok(());
        }
        if self.math() && kind == TokenKind::Keyword && !self.at_row_start {
            self.body.push_str(FORCED_SPACE);
        }
        self.body.push_str(&rendered);
        self.at_row_start = false;
        Ok(())
    }

    /// Whitespace that contains no line break.
    fn blank(&mut self, segment: &str) {
        if !self.math() {
            self.body.push_str(segment);
            return;
        }
        let segment = segment.trim_end_matches('\r');
        if !self.at_row_start {
            self.body.push_str(segment);
            return;
        }
        let columns: usize = segment
            .chars()
            .map(|c| if c == '\t' { self.tab_size } else { 1 })
            .sum();
        for _ in 0..columns / self.tab_size {
            self.body.push_str(INDENT);
        }
    }

    fn end_line(&mut self) {
        let body = std::mem::take(&mut self.body);
        self.lines.push(RenderedLine {
            lead: String::new(),
            body,
            row_break: String::new(),
        });
        self.at_row_start = true;
        self.line += 1;
    }

    fn finish(mut self) -> ConversionResult<RenderedDocument> {
        self.flush()?;
        self.end_line();

        let table = self.table;
        let (opening, closing) = match table.mode {
            OutputMode::Verbatim => (
                format!(
                    "\\begin{{minted}}[escapeinside={e}{e}, fontfamily=lmr]{{text}}",
                    e = table.escape_char
                ),
                r"\end{minted}".to_string(),
            ),
            OutputMode::Math => (
                "\\begin{fleqn}\n\t\\begin{align*}".to_string(),
                "\t\\end{align*}\n\\end{fleqn}".to_string(),
            ),
        };

        if table.mode == OutputMode::Math {
            let last = self.lines.len() - 1;
            for (idx, line) in self.lines.iter_mut().enumerate() {
                line.lead = MATH_ROW_LEAD.to_string();
                if idx < last {
                    line.row_break = MATH_ROW_BREAK.to_string();
                }
            }
        }

        Ok(RenderedDocument {
            mode: table.mode,
            escape_char: table.escape_char,
            opening,
            lines: self.lines,
            closing,
            trailer: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexer::tokenize;
    use crate::core::style::{SymbolTable, MATH_STYLE, VERBATIM_STYLE};
    use pretty_assertions::assert_eq;

    fn math(source: &str) -> RenderedDocument {
        render_tokens(&tokenize(source).unwrap(), &MATH_STYLE, 4).unwrap()
    }

    fn verbatim(source: &str) -> RenderedDocument {
        render_tokens(&tokenize(source).unwrap(), &VERBATIM_STYLE, 4).unwrap()
    }

    fn bodies(doc: &RenderedDocument) -> Vec<&str> {
        doc.lines.iter().map(|l| l.body.as_str()).collect()
    }

    #[test]
    fn test_math_rows_and_breaks() {
        let doc = math("x <- 1\ny <- 2");
        assert_eq!(
            doc.to_latex(),
            "\\begin{fleqn}\n\t\\begin{align*}\n\
             \t\t& x \\leftarrow 1 \\\\\n\
             \t\t& y \\leftarrow 2\n\
             \t\\end{align*}\n\\end{fleqn}"
        );
    }

    #[test]
    fn test_math_blank_line_is_empty_row() {
        let doc = math("a\n\nb");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(bodies(&doc), vec!["a", "", "b"]);
        assert_eq!(doc.line(2).unwrap().render(), "\t\t&  \\\\");
    }

    #[test]
    fn test_math_indentation() {
        let doc = math("while i < n do\n    i <- i + 1\n\t\tj <- j\n      k");
        assert_eq!(doc.line(2).unwrap().body, r"\qquad i \leftarrow i + 1");
        assert_eq!(doc.line(3).unwrap().body, r"\qquad \qquad j \leftarrow j");
        // six columns is one full tab unit
        assert_eq!(doc.line(4).unwrap().body, r"\qquad k");
    }

    #[test]
    fn test_math_keyword_spacing() {
        let doc = math("while i < n do\n    return x");
        assert_eq!(
            doc.line(1).unwrap().body,
            r"\text{\textbf{while}}\  i < n \ \text{\textbf{do}}\ "
        );
        assert_eq!(
            doc.line(2).unwrap().body,
            r"\qquad \text{\textbf{return}}\  x"
        );
    }

    #[test]
    fn test_math_operators_emitted_per_token() {
        let doc = math("a <--b");
        assert_eq!(doc.line(1).unwrap().body, r"a \leftarrow-b");
    }

    #[test]
    fn test_math_comment_with_math_span() {
        let doc = math("x // see $x < y$");
        assert_eq!(
            doc.line(1).unwrap().body,
            r"x \mathbin{/\mkern-3mu/}\ \text{ see }x < y"
        );
    }

    #[test]
    fn test_math_unmapped_symbol_reports_line() {
        let mut table = StyleTable::math();
        table.remove_symbol(SymbolTable::Punctuation, ";");
        let tokens = tokenize("a\nb;").unwrap();
        let err = render_tokens(&tokens, &table, 4).unwrap_err();
        assert_eq!(
            err,
            crate::ConversionError::StyleMappingError {
                kind: "punctuation".to_string(),
                symbol: ";".to_string(),
                line: Some(2),
            }
        );
    }

    #[test]
    fn test_verbatim_passes_newlines_through() {
        let doc = verbatim("if x then\n    return y\n");
        assert_eq!(
            bodies(&doc),
            vec![r"?\textbf{if}? x ?\textbf{then}?", r"    ?\textbf{return}? y", ""]
        );
        assert!(doc.lines.iter().all(|l| l.lead.is_empty() && l.row_break.is_empty()));
    }

    #[test]
    fn test_verbatim_merges_same_kind_runs() {
        let doc = verbatim("// a $x < y$ b");
        assert_eq!(
            doc.line(1).unwrap().body,
            r"?/\!/?? a ??\(x \)?<?\( y\)?? b?"
        );
    }

    #[test]
    fn test_math_unclassified_text_cannot_add_columns() {
        let doc = math("a & b # c");
        assert_eq!(doc.line(1).unwrap().body, r"a \text{\&} b \text{\#} c");
        assert!(!doc.to_latex().contains(" & b"));
    }

    #[test]
    fn test_verbatim_escape_char_in_code_and_comments() {
        let doc = verbatim("x <- a ? b\nx <- 1 // done?");
        assert_eq!(
            bodies(&doc),
            vec![r"x <- a ?\char63{}? b", r"x <- 1 ?/\!/?? done\char63{}?"]
        );
        for line in &doc.lines {
            assert_eq!(line.body.matches('?').count() % 2, 0);
        }
    }

    #[test]
    fn test_verbatim_frame() {
        let doc = verbatim("ALGORITHM Sum");
        assert_eq!(
            doc.to_latex(),
            "\\begin{minted}[escapeinside=??, fontfamily=lmr]{text}\n\
             ?\\sffamily{\\textbf{ALGORITHM}}? ?\\textit{Sum}?\n\
             \\end{minted}"
        );
    }

    #[test]
    fn test_empty_input_has_one_line() {
        assert_eq!(math("").line_count(), 1);
        assert!(math("").line(0).is_none());
    }
}
