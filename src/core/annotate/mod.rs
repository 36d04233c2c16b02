//! Annotation braces
//!
//! A document may end with an annotation block and an offset directive:
//!
//! ```text
//! for i <- 1 to n do
//!     swap(A[i], A[n - i])
//! return A
//! :
//! :{1}{1:2}"loop"
//! :{0}{3}result
//! >{0.5}{1.5, 1}
//! ```
//!
//! Each entry asks for a curly brace of the given nesting level next to one
//! line or a range of lines. The directive gives the horizontal position of
//! the first level and the increment per level. Both are stripped from the
//! source before tokenization (see [`metadata`]) and spliced back into the
//! rendered lines afterwards, either inline ([`inline`]) or as a TikZ
//! overlay ([`diagram`]).

pub mod diagram;
pub mod inline;
pub mod metadata;

pub use metadata::{extract_metadata, Metadata};

use super::options::{BraceStyle, OutputMode, RenderOptions};
use super::render::RenderedDocument;
use crate::utils::error::{ConversionError, ConversionResult, ConversionWarning};

/// Horizontal placement of brace levels, in centimetres
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTable {
    pub base_shift: f64,
    /// Distance from level `n` to level `n + 1`
    pub increments: Vec<f64>,
}

impl OffsetTable {
    pub fn new(base_shift: f64, increments: Vec<f64>) -> Self {
        OffsetTable {
            base_shift,
            increments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.increments.is_empty()
    }

    /// Distance of `level` from level 0. Levels past the end of the table
    /// reuse the last increment.
    pub fn level_offset(&self, level: usize) -> f64 {
        let last = match self.increments.last() {
            Some(last) => *last,
            None => return 0.0,
        };
        (0..level)
            .map(|i| self.increments.get(i).copied().unwrap_or(last))
            .sum()
    }

    /// Absolute horizontal position of `level`
    pub fn position(&self, level: usize) -> f64 {
        self.base_shift + self.level_offset(level)
    }

    /// Returns true if `level` needs increments the table does not supply.
    pub fn extrapolates(&self, level: usize) -> bool {
        level > self.increments.len()
    }
}

/// One brace request from the annotation block
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub level: usize,
    /// First covered line, 1-based
    pub start: usize,
    /// Last covered line, inclusive
    pub end: usize,
    pub label: String,
    /// Line of the entry in the original source
    pub source_line: usize,
}

impl AnnotationEntry {
    /// Single-line brace
    pub fn is_inline(&self) -> bool {
        self.start == self.end
    }

    pub fn span(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains(&self, other: &AnnotationEntry) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Ranges share lines without one containing the other.
    pub fn partially_overlaps(&self, other: &AnnotationEntry) -> bool {
        let disjoint = self.end < other.start || other.end < self.start;
        !disjoint && !self.contains(other) && !other.contains(self)
    }
}

/// Check entries against the offset table and the rendered line count.
pub fn validate(
    entries: &[AnnotationEntry],
    offsets: Option<&OffsetTable>,
    line_count: usize,
) -> ConversionResult<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let offsets = match offsets {
        Some(offsets) => offsets,
        None => {
            return Err(ConversionError::annotation(
                "annotation entries present but no offset directive '>{shift}{offsets}' found",
            ))
        }
    };

    for entry in entries {
        if entry.level > 0 && offsets.is_empty() {
            return Err(ConversionError::annotation_at(
                format!("brace level {} used but the offset list is empty", entry.level),
                entry.source_line,
            ));
        }
        if entry.start > entry.end {
            return Err(ConversionError::annotation_at(
                format!("range {}:{} starts after it ends", entry.start, entry.end),
                entry.source_line,
            ));
        }
        if entry.start == 0 || entry.end > line_count {
            return Err(ConversionError::annotation_at(
                format!(
                    "range {}:{} is outside the document (lines 1 to {})",
                    entry.start, entry.end, line_count
                ),
                entry.source_line,
            ));
        }
    }

    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if a.partially_overlaps(b) {
                return Err(ConversionError::annotation_at(
                    format!(
                        "range {}:{} partially overlaps range {}:{} (from line {})",
                        b.start, b.end, a.start, a.end, a.source_line
                    ),
                    b.source_line,
                ));
            }
        }
    }
    Ok(())
}

/// Centimetre value as TikZ and `\hspace` expect it
pub(crate) fn cm(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Validate `metadata` and splice its braces into `doc`.
pub fn splice_annotations(
    doc: &mut RenderedDocument,
    metadata: &Metadata,
    name: &str,
    options: &RenderOptions,
) -> ConversionResult<Vec<ConversionWarning>> {
    if metadata.entries.is_empty() {
        return Ok(Vec::new());
    }
    validate(&metadata.entries, metadata.offsets.as_ref(), doc.line_count())?;
    let offsets = match metadata.offsets {
        Some(ref offsets) => offsets,
        None => return Err(ConversionError::annotation("missing offset directive")),
    };

    let mut warnings = Vec::new();
    for entry in &metadata.entries {
        if entry.level > 0 && offsets.extrapolates(entry.level) {
            warnings.push(
                ConversionWarning::new(format!(
                    "no offset given for brace level {}; reusing the last increment",
                    entry.level
                ))
                .at_line(entry.source_line)
                .with_suggestion("extend the offset list in the '>' directive"),
            );
        }
    }

    match (options.brace_style(), doc.mode) {
        (BraceStyle::Inline, OutputMode::Math) => {
            inline::splice(doc, &metadata.entries, offsets);
        }
        (BraceStyle::Inline, OutputMode::Verbatim) => {
            return Err(ConversionError::annotation(
                "inline braces need math output; use the diagram style for verbatim blocks",
            ));
        }
        (BraceStyle::Diagram, _) => {
            diagram::splice(doc, &metadata.entries, offsets, name)?;
        }
    }
    Ok(warnings)
}
