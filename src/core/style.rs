//! Token styling tables
//!
//! A [`StyleTable`] maps token kinds to LaTeX markup for one output mode.
//! Kinds without an entry fall back along [`TokenKind::parent`]; a kind with
//! no entry anywhere in its chain is emitted unchanged.
//!
//! In verbatim output the `minted` escape character must never appear in
//! plain form: it is replaced with `\char<code>{}`, inside its own escape
//! span when the surrounding text is not already escaped.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use phf::phf_map;
use std::borrow::Cow;

use super::lexer::TokenKind;
use super::options::{OutputMode, RenderOptions, DEFAULT_ESCAPE_CHAR};
use crate::utils::error::{ConversionError, ConversionResult};

/// Operator macros for math output
static MATH_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "**" => r"\ast\ast",
    "!=" => r"\neq",
    "==" => "=",
    "<=" => r"\leq",
    ">=" => r"\geq",
    "<-" => r"\leftarrow",
    "!" => r"\neg",
    "*" => r"\ast",
    "/" => r"\div",
    "%" => r"\bmod",
    "+" => "+",
    "-" => "-",
    "<" => "<",
    ">" => ">",
};

/// Punctuation macros for math output
static MATH_PUNCTUATION: phf::Map<&'static str, &'static str> = phf_map! {
    "(" => r"\left( ",
    ")" => r" \right)",
    "[" => r"\left[ \,",
    "]" => r"\, \right]",
    "{" => r"\left\{ ",
    "}" => r" \right\}",
    "," => r",\:",
    ";" => r";\:",
    "." => ".",
    "..." => r"\dots",
};

lazy_static! {
    /// Default table for `minted` output
    pub static ref VERBATIM_STYLE: StyleTable = StyleTable::verbatim(DEFAULT_ESCAPE_CHAR);
    /// Default table for `align*` output
    pub static ref MATH_STYLE: StyleTable = StyleTable::math();
}

/// Per-symbol substitution table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTable {
    Operators,
    Punctuation,
}

/// How a run of tokens is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// `prefix` + text + `suffix`, text optionally escaped for LaTeX text mode
    Wrap {
        prefix: String,
        suffix: String,
        escape: bool,
    },
    /// Emitted as written, without falling back to the parent kind
    Keep,
    /// Fixed replacement text
    Replace(String),
    /// Exact-text lookup; a missing symbol is an error
    Lookup(SymbolTable),
    /// Not emitted at all
    Drop,
}

impl Markup {
    pub fn wrap(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Markup::Wrap {
            prefix: prefix.into(),
            suffix: suffix.into(),
            escape: false,
        }
    }

    pub fn wrap_escaped(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Markup::Wrap {
            prefix: prefix.into(),
            suffix: suffix.into(),
            escape: true,
        }
    }
}

/// Read-only styling configuration for one conversion
#[derive(Debug, Clone)]
pub struct StyleTable {
    pub mode: OutputMode,
    pub escape_char: char,
    kinds: IndexMap<TokenKind, Markup>,
    operators: IndexMap<String, String>,
    punctuation: IndexMap<String, String>,
}

impl StyleTable {
    fn empty(mode: OutputMode, escape_char: char) -> Self {
        StyleTable {
            mode,
            escape_char,
            kinds: IndexMap::new(),
            operators: IndexMap::new(),
            punctuation: IndexMap::new(),
        }
    }

    /// `minted` styling: only math spans, the algorithm header, keywords
    /// and comments receive markup.
    pub fn verbatim(escape_char: char) -> Self {
        let e = escape_char;
        let mut table = StyleTable::empty(OutputMode::Verbatim, e);
        table
            .set(TokenKind::MathDelimiter, Markup::Drop)
            .set(TokenKind::MathText, Markup::wrap(format!("{e}\\("), format!("\\){e}")))
            .set(
                TokenKind::AlgorithmKeyword,
                Markup::wrap(format!("{e}\\sffamily{{\\textbf{{"), format!("}}}}{e}")),
            )
            .set(
                TokenKind::AlgorithmName,
                Markup::wrap(format!("{e}\\textit{{"), format!("}}{e}")),
            )
            .set(
                TokenKind::Keyword,
                Markup::wrap(format!("{e}\\textbf{{"), format!("}}{e}")),
            )
            .set(
                TokenKind::CommentPrefix,
                Markup::Replace(format!("{e}/\\!/{e}")),
            )
            .set(TokenKind::CommentText, Markup::wrap_escaped(e, e));
        table
    }

    /// `align*` styling: every operator and punctuation mark has a macro.
    /// Unclassified text is set upright in `\text{}` with LaTeX specials
    /// escaped, so symbols such as `&` never reach the alignment.
    pub fn math() -> Self {
        let mut table = StyleTable::empty(OutputMode::Math, DEFAULT_ESCAPE_CHAR);
        table
            .set(TokenKind::Operator, Markup::Lookup(SymbolTable::Operators))
            .set(TokenKind::Punctuation, Markup::Lookup(SymbolTable::Punctuation))
            .set(
                TokenKind::Keyword,
                Markup::wrap(r"\text{\textbf{", r"}}\ "),
            )
            .set(
                TokenKind::AlgorithmKeyword,
                Markup::wrap(r"\text{\textbf{\textsf{", r"}}}\ "),
            )
            .set(
                TokenKind::AlgorithmName,
                Markup::wrap(r"\text{\textit{", "}}"),
            )
            .set(TokenKind::Identifier, Markup::Keep)
            .set(TokenKind::Text, Markup::wrap_escaped(r"\text{", "}"))
            .set(TokenKind::Constant, Markup::wrap(r"\mathrm{", "}"))
            .set(TokenKind::Boolean, Markup::wrap(r"\mathsf{", "}"))
            .set(
                TokenKind::CommentPrefix,
                Markup::Replace(r"\mathbin{/\mkern-3mu/}\ ".to_string()),
            )
            .set(TokenKind::CommentText, Markup::wrap_escaped(r"\text{", "}"))
            .set(TokenKind::MathDelimiter, Markup::Drop);

        table.operators = MATH_OPERATORS
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        table.punctuation = MATH_PUNCTUATION
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        table
    }

    /// Table matching the mode and escape character of `options`.
    pub fn for_options(options: &RenderOptions) -> Cow<'static, StyleTable> {
        match options.mode {
            OutputMode::Math => Cow::Borrowed(&*MATH_STYLE),
            OutputMode::Verbatim if options.escape_char == DEFAULT_ESCAPE_CHAR => {
                Cow::Borrowed(&*VERBATIM_STYLE)
            }
            OutputMode::Verbatim => Cow::Owned(StyleTable::verbatim(options.escape_char)),
        }
    }

    pub fn set(&mut self, kind: TokenKind, markup: Markup) -> &mut Self {
        self.kinds.insert(kind, markup);
        self
    }

    pub fn set_symbol(
        &mut self,
        table: SymbolTable,
        symbol: impl Into<String>,
        latex: impl Into<String>,
    ) -> &mut Self {
        self.symbols_mut(table).insert(symbol.into(), latex.into());
        self
    }

    pub fn remove_symbol(&mut self, table: SymbolTable, symbol: &str) -> &mut Self {
        self.symbols_mut(table).shift_remove(symbol);
        self
    }

    fn symbols(&self, table: SymbolTable) -> &IndexMap<String, String> {
        match table {
            SymbolTable::Operators => &self.operators,
            SymbolTable::Punctuation => &self.punctuation,
        }
    }

    fn symbols_mut(&mut self, table: SymbolTable) -> &mut IndexMap<String, String> {
        match table {
            SymbolTable::Operators => &mut self.operators,
            SymbolTable::Punctuation => &mut self.punctuation,
        }
    }

    /// Markup for `kind`, following the parent chain.
    pub fn markup(&self, kind: TokenKind) -> Option<&Markup> {
        kind.lineage().find_map(|k| self.kinds.get(&k))
    }

    /// Returns true if tokens of `kind` are styled one symbol at a time.
    pub fn is_lookup(&self, kind: TokenKind) -> bool {
        matches!(self.markup(kind), Some(Markup::Lookup(_)))
    }

    fn verbatim_escape(&self) -> Option<char> {
        match self.mode {
            OutputMode::Verbatim => Some(self.escape_char),
            OutputMode::Math => None,
        }
    }

    /// Replace the escape character in verbatim text. `inside` tells whether
    /// `text` already sits in an escape span.
    fn guard_escape_char<'t>(&self, text: &'t str, inside: bool) -> Cow<'t, str> {
        let e = match self.verbatim_escape() {
            Some(e) if text.contains(e) => e,
            _ => return Cow::Borrowed(text),
        };
        let code = char_code(e);
        let replacement = if inside {
            code
        } else {
            format!("{e}{code}{e}")
        };
        Cow::Owned(text.replace(e, &replacement))
    }

    /// Render `text` as a run of `kind`. Wrapped text is assumed to sit in
    /// an escape span in verbatim output.
    pub fn apply<'t>(&self, kind: TokenKind, text: &'t str) -> ConversionResult<Cow<'t, str>> {
        let rendered = match self.markup(kind) {
            None | Some(Markup::Keep) => self.guard_escape_char(text, false),
            Some(Markup::Wrap {
                prefix,
                suffix,
                escape,
            }) => {
                let body = if *escape {
                    escape_text(text, self.verbatim_escape())
                } else {
                    self.guard_escape_char(text, true)
                };
                Cow::Owned(format!("{}{}{}", prefix, body, suffix))
            }
            Some(Markup::Replace(replacement)) => Cow::Owned(replacement.clone()),
            Some(Markup::Lookup(table)) => match self.symbols(*table).get(text) {
                Some(latex) => Cow::Owned(latex.clone()),
                None => return Err(ConversionError::unmapped(kind.name(), text)),
            },
            Some(Markup::Drop) => Cow::Borrowed(""),
        };
        Ok(rendered)
    }
}

fn char_code(c: char) -> String {
    format!(r"\char{}{{}}", c as u32)
}

/// Escape LaTeX special characters for text-mode content. `escape_char`, if
/// given, is also replaced so the text cannot close a `minted` escape span.
pub fn escape_text(text: &str, escape_char: Option<char>) -> Cow<'_, str> {
    let special = ['\\', '{', '}', '%', '#', '&', '_', '^', '~', '$'];
    if !text.contains(special) && !escape_char.is_some_and(|e| text.contains(e)) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            c if Some(c) == escape_char => out.push_str(&char_code(c)),
            '\\' => out.push_str(r"\textbackslash{}"),
            '^' => out.push_str(r"\^{}"),
            '~' => out.push_str(r"\~{}"),
            '{' | '}' | '%' | '#' | '&' | '_' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
