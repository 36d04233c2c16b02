//! Pseudocode scanner
//!
//! Converts source text into a contiguous token stream. The active mode
//! (top of the mode stack) selects the ordered rule list; see [`super::rules`].

use super::rules::{rules_for, Emit, Mode, Rule, Transition};
use super::token::{Token, TokenKind};
use crate::utils::error::{ConversionError, ConversionResult, ConversionWarning};

/// Tokens plus the non-fatal issues found while scanning
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub warnings: Vec<ConversionWarning>,
}

/// The scanner state
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    modes: Vec<Mode>,
    /// Reject unclassified input instead of emitting `Text`
    strict: bool,
    /// Offset of the `$` that opened the current math span
    math_opened_at: Option<usize>,
    out: Lexed,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            pos: 0,
            modes: vec![Mode::Normal],
            strict: false,
            math_opened_at: None,
            out: Lexed::default(),
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Normal)
    }

    /// Returns true if the character before `pos` continues a word.
    fn inside_word(&self) -> bool {
        self.source[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }

    /// First rule of the active mode matching at the current position.
    fn find_rule(&self) -> Option<(&'static Rule, regex::Captures<'a>)> {
        let rest = &self.source[self.pos..];
        let inside_word = self.inside_word();
        rules_for(self.mode())
            .iter()
            .filter(|rule| !(rule.word_start && inside_word))
            .find_map(|rule| {
                let caps = rule.pattern.captures(rest)?;
                let consumed = caps.get(0).map_or(0, |m| m.len());
                if consumed == 0 && !matches!(rule.emit, Emit::Peek) {
                    return None;
                }
                Some((rule, caps))
            })
    }

    /// Run the scanner to the end of the input
    pub fn tokenize(mut self) -> ConversionResult<Lexed> {
        while self.pos < self.source.len() {
            let (rule, caps) = match self.find_rule() {
                Some(found) => found,
                None => return Err(self.unclassified_error(self.pos)),
            };

            if rule.unclassified && self.strict {
                return Err(self.unclassified_error(self.pos));
            }

            let start = self.pos;
            match rule.emit {
                Emit::Whole(kind) => {
                    let text = &caps[0];
                    self.push(start, kind, text);
                    self.pos += text.len();
                }
                Emit::Groups(kinds) => {
                    for (idx, kind) in kinds.iter().enumerate() {
                        if let Some(group) = caps.get(idx + 1) {
                            if !group.as_str().is_empty() {
                                self.push(start + group.start(), *kind, group.as_str());
                            }
                        }
                    }
                    self.pos += caps[0].len();
                }
                Emit::Peek => {}
            }

            self.transition(rule.transition, start);
        }

        if let Some(opened) = self.math_opened_at.take() {
            self.warn_unterminated(opened);
        }

        Ok(self.out)
    }

    fn push(&mut self, offset: usize, kind: TokenKind, text: &str) {
        self.out.tokens.push(Token::new(offset, kind, text));
    }

    fn transition(&mut self, transition: Transition, at: usize) {
        match transition {
            Transition::Stay => {}
            Transition::Push(mode) => {
                if mode == Mode::Math {
                    self.math_opened_at = Some(at);
                }
                self.modes.push(mode);
            }
            Transition::Pop => {
                if self.mode() == Mode::Math {
                    self.math_opened_at = None;
                }
                if self.modes.len() > 1 {
                    self.modes.pop();
                }
            }
            Transition::Reset => {
                if let Some(opened) = self.math_opened_at.take() {
                    self.warn_unterminated(opened);
                }
                self.modes.truncate(1);
            }
        }
    }

    fn warn_unterminated(&mut self, opened: usize) {
        let (line, _) = line_col(self.source, opened);
        self.out.warnings.push(
            ConversionWarning::new("inline math span closed at end of line")
                .at_line(line)
                .with_suggestion("add the closing '$'"),
        );
    }

    fn unclassified_error(&self, offset: usize) -> ConversionError {
        let (line, column) = line_col(self.source, offset);
        let snippet: String = self.source[offset..]
            .chars()
            .take_while(|c| !c.is_whitespace())
            .take(16)
            .collect();
        ConversionError::lexical(format!("unclassified input '{}'", snippet), line, column)
    }
}

/// 1-based line and column for a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}
