//! Ordered rule tables for each scanner mode.
//!
//! At every position the rules of the active mode are tried in order and the
//! first one that matches wins. Precedence is the list order, not match
//! length, so `<-` has to sit before `<` and floats before integers.

use lazy_static::lazy_static;
use regex::Regex;

use super::token::TokenKind;

/// Keywords recognised as whole words.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "repeat", "for", "to", "do", "return", "until", "then",
];

/// Operators, multi-character forms first.
pub const OPERATORS: &[&str] = &[
    "**", "!=", "==", "<=", ">=", "<-", "!", "*", "/", "%", "+", "-", "<", ">",
];

/// Scanner state selecting the active rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// After `//`, until the end of the line
    Comment,
    /// Between a pair of `$`
    Math,
}

/// What happens to the mode stack after a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(Mode),
    Pop,
    /// Drop back to `Normal`, closing an unterminated math span
    Reset,
}

/// Tokens produced by a rule.
#[derive(Debug, Clone, Copy)]
pub enum Emit {
    /// The whole match becomes one token
    Whole(TokenKind),
    /// One token per capture group, empty groups skipped
    Groups(&'static [TokenKind]),
    /// Match is only inspected, nothing is consumed
    Peek,
}

#[derive(Debug)]
pub struct Rule {
    pub pattern: Regex,
    pub emit: Emit,
    pub transition: Transition,
    /// The match must not continue a word (`\b` before the match position)
    pub word_start: bool,
    /// Catch-all for input no other rule classifies
    pub unclassified: bool,
}

impl Rule {
    fn new(pattern: &str, emit: Emit) -> Self {
        Rule {
            pattern: Regex::new(&format!("^(?:{})", pattern)).expect("static rule pattern"),
            emit,
            transition: Transition::Stay,
            word_start: false,
            unclassified: false,
        }
    }

    fn whole(pattern: &str, kind: TokenKind) -> Self {
        Rule::new(pattern, Emit::Whole(kind))
    }

    fn then(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    fn word(mut self) -> Self {
        self.word_start = true;
        self
    }

    fn catch_all(mut self) -> Self {
        self.unclassified = true;
        self
    }
}

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

lazy_static! {
    static ref NORMAL_RULES: Vec<Rule> = vec![
        Rule::new(
            r"(ALGORITHM)\b([ \t]*)(\w*)",
            Emit::Groups(&[
                TokenKind::AlgorithmKeyword,
                TokenKind::Whitespace,
                TokenKind::AlgorithmName,
            ]),
        )
        .word(),
        Rule::whole(&format!(r"(?:{})\b", alternation(KEYWORDS)), TokenKind::Keyword).word(),
        Rule::whole("//", TokenKind::CommentPrefix).then(Transition::Push(Mode::Comment)),
        Rule::whole(r"\$", TokenKind::MathDelimiter).then(Transition::Push(Mode::Math)),
        Rule::whole(r"\d*\.\d+", TokenKind::Float),
        Rule::whole(r"\d+", TokenKind::Integer),
        Rule::whole(r"(?:true|false)\b", TokenKind::Boolean).word(),
        Rule::whole(r"[A-Z]+\b", TokenKind::Constant).word(),
        Rule::whole(r"[A-Za-z]+", TokenKind::Identifier),
        Rule::whole(&alternation(OPERATORS), TokenKind::Operator),
        Rule::whole(r"\.\.\.", TokenKind::Ellipsis),
        Rule::whole(r"[\[\](){},.;]", TokenKind::Punctuation),
        Rule::whole(r"\s+", TokenKind::Whitespace),
        Rule::whole(r"[^\s\w$\[\](){},.;*!=<>/%+\-]+", TokenKind::Text).catch_all(),
        Rule::whole(r"(?s).", TokenKind::Text).catch_all(),
    ];

    static ref COMMENT_RULES: Vec<Rule> = vec![
        Rule::new(r"[\r\n]", Emit::Peek).then(Transition::Pop),
        Rule::whole(r"\$", TokenKind::MathDelimiter).then(Transition::Push(Mode::Math)),
        Rule::whole(r"[^$\r\n]+", TokenKind::CommentText),
    ];

    static ref MATH_RULES: Vec<Rule> = vec![
        Rule::new(r"[\r\n]", Emit::Peek).then(Transition::Reset),
        Rule::whole(&alternation(OPERATORS), TokenKind::Operator),
        Rule::whole(r"[^$\r\n*!=<>/%+\-]+", TokenKind::MathText),
        Rule::whole(r"\$", TokenKind::MathDelimiter).then(Transition::Pop),
        Rule::whole(r".", TokenKind::MathText),
    ];
}

/// The ordered rule list of a mode.
pub fn rules_for(mode: Mode) -> &'static [Rule] {
    match mode {
        Mode::Normal => &NORMAL_RULES,
        Mode::Comment => &COMMENT_RULES,
        Mode::Math => &MATH_RULES,
    }
}
