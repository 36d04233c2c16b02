//! Braces spliced directly into `align*` rows
//!
//! A single-line entry becomes a `\Big\}` at the end of its row. A ranged
//! entry wraps its rows in an `aligned` block closed by a stretching
//! `\right\}`, so the brace is exactly as tall as the rows it covers.
//!
//! Interior rows of a range only gain a tab in the LaTeX source; the typeset
//! rows keep their indentation. A range that encloses other braces ends after
//! them, so its `\hspace` is measured from the furthest enclosed brace.

use super::{cm, AnnotationEntry, OffsetTable};
use crate::core::render::RenderedDocument;

const RANGE_OPEN: &str = r"\left.\begin{aligned}& ";

fn label_suffix(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!(r"\ \text{{{}}}", label)
    }
}

/// Splice `entries` into the rows of a math document. Entries must already
/// be validated against the document's line count.
pub fn splice(doc: &mut RenderedDocument, entries: &[AnnotationEntry], offsets: &OffsetTable) {
    for entry in entries.iter().filter(|e| e.is_inline()) {
        if let Some(line) = doc.line_mut(entry.start) {
            line.body.push_str(&format!(
                r"\hspace{{{}cm}}\Big\}}{}",
                cm(offsets.position(entry.level)),
                label_suffix(&entry.label)
            ));
        }
    }

    // Innermost first: later (outer) ranges prepend before and append after.
    let mut ranged: Vec<&AnnotationEntry> = entries.iter().filter(|e| !e.is_inline()).collect();
    ranged.sort_by_key(|e| (e.span(), e.level));

    for (i, entry) in ranged.iter().enumerate() {
        let enclosed = entries
            .iter()
            .filter(|e| e.is_inline())
            .chain(ranged[..i].iter().copied())
            .filter(|e| entry.contains(e))
            .map(|e| offsets.position(e.level))
            .fold(None, |max: Option<f64>, p| Some(max.map_or(p, |m| m.max(p))));
        let shift = match enclosed {
            Some(inner) => (offsets.position(entry.level) - inner).max(0.0),
            None => offsets.position(entry.level),
        };

        if let Some(line) = doc.line_mut(entry.start) {
            line.body.insert_str(0, RANGE_OPEN);
        }
        for number in entry.start + 1..entry.end {
            if let Some(line) = doc.line_mut(number) {
                line.lead.insert(0, '\t');
            }
        }
        if let Some(line) = doc.line_mut(entry.end) {
            line.body.push_str(&format!(
                r"\end{{aligned}}\hspace{{{}cm}}\right\}}{}",
                cm(shift),
                label_suffix(&entry.label)
            ));
        }
    }
}
