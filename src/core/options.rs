//! Conversion options

use std::str::FromStr;

/// Escape character delimiting LaTeX spans inside the `minted` block
pub const DEFAULT_ESCAPE_CHAR: char = '?';

/// Columns per indentation level in math output
pub const TAB_SIZE: usize = 4;

/// Output flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `minted` block, styled spans inside escape characters
    Verbatim,
    /// `align*` block, every symbol replaced by a math macro
    #[default]
    Math,
}

/// How annotation entries are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceStyle {
    /// Braces spliced into the rendered rows (math output only)
    Inline,
    /// Position markers plus a TikZ overlay picture
    Diagram,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "math" | "align" => Ok(OutputMode::Math),
            "verbatim" | "minted" => Ok(OutputMode::Verbatim),
            other => Err(format!("unknown output mode '{}'", other)),
        }
    }
}

impl FromStr for BraceStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(BraceStyle::Inline),
            "diagram" | "tikz" => Ok(BraceStyle::Diagram),
            other => Err(format!("unknown brace style '{}'", other)),
        }
    }
}

/// Options for a single document conversion
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub mode: OutputMode,
    /// `None` picks the mode's default: inline for math, diagram for verbatim
    pub braces: Option<BraceStyle>,
    pub escape_char: char,
    pub tab_size: usize,
    /// Fail on input the tokenizer cannot classify
    pub strict_lexing: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Math,
            braces: None,
            escape_char: DEFAULT_ESCAPE_CHAR,
            tab_size: TAB_SIZE,
            strict_lexing: false,
        }
    }
}

impl RenderOptions {
    pub fn math() -> Self {
        Self::default()
    }

    pub fn verbatim() -> Self {
        Self {
            mode: OutputMode::Verbatim,
            ..Self::default()
        }
    }

    pub fn with_braces(mut self, braces: BraceStyle) -> Self {
        self.braces = Some(braces);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_lexing = true;
        self
    }

    /// The brace style in effect for this mode
    pub fn brace_style(&self) -> BraceStyle {
        self.braces.unwrap_or(match self.mode {
            OutputMode::Math => BraceStyle::Inline,
            OutputMode::Verbatim => BraceStyle::Diagram,
        })
    }
}
