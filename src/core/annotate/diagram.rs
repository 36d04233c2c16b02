//! Braces drawn by a TikZ overlay
//!
//! Rows carry `\tikzmark` position markers; a `tikzpicture` appended after
//! the environment measures the distance between the first two rows and
//! draws one calligraphic brace per entry from there. Every marker and
//! coordinate is prefixed with the sanitized document name so several
//! diagrams can share one page.

use indexmap::IndexSet;

use super::{cm, AnnotationEntry, OffsetTable};
use crate::core::render::RenderedDocument;
use crate::utils::error::{ConversionError, ConversionResult};
use crate::utils::naming::sanitize_name;

const BRACE_THICKNESS: &str = "1.25";

/// Lines that receive a marker: 1 and 2 for the row distance, then every
/// start and end line in entry order. All markers use the plain
/// `\tikzmark{name}` form; the bracketed argument takes drawing code, not a
/// name.
fn marker_lines(entries: &[AnnotationEntry]) -> IndexSet<usize> {
    let mut lines: IndexSet<usize> = [1, 2].into_iter().collect();
    for entry in entries {
        lines.insert(entry.start);
        lines.insert(entry.end);
    }
    lines
}

/// Add markers to `doc` and attach the brace picture as its trailer.
pub fn splice(
    doc: &mut RenderedDocument,
    entries: &[AnnotationEntry],
    offsets: &OffsetTable,
    name: &str,
) -> ConversionResult<()> {
    if doc.line_count() < 2 {
        return Err(ConversionError::annotation(
            "brace diagrams need at least two lines to measure the row distance",
        ));
    }
    let name = sanitize_name(name)?;

    for number in marker_lines(entries) {
        let marker = doc.escaped(&format!(r"\tikzmark{{{}L{}}}", name, number));
        if let Some(line) = doc.line_mut(number) {
            line.body.push_str(&marker);
        }
    }

    doc.trailer = Some(picture(&name, entries, offsets));
    Ok(())
}

fn picture(name: &str, entries: &[AnnotationEntry], offsets: &OffsetTable) -> String {
    let mut out = String::from("\\begin{tikzpicture}[remember picture,overlay]\n");
    out.push_str(&format!(
        "\\coordinate ({n}BASEX) at ({}, 0);\n",
        cm(offsets.base_shift),
        n = name
    ));
    out.push_str(&format!(
        "\\draw ({{pic cs:{n}L1}}-|{n}BASEX) coordinate ({n}A);\n",
        n = name
    ));
    out.push_str(&format!(
        "\\draw ({{pic cs:{n}L2}}-|{n}BASEX) coordinate ({n}B);\n",
        n = name
    ));
    out.push_str(&format!(
        "\\tikzmath{{coordinate \\{n}DVEC;\n\
         \x20   \\{n}DVEC = ({n}A)-({n}B);\n\
         \x20   \\{n}D = (\\{n}DVECy);\n\
         \x20   \\{n}D = \\convertto{{cm}}{{\\{n}D pt}};\n\
         }}\n",
        n = name
    ));

    for entry in entries {
        out.push_str(&format!(
            "\\draw ({n}A) ++ ({}, {{0.75cm*\\{n}D}}) \
             [decorate, decoration = {{calligraphic brace, amplitude=5pt}}, line width={}pt]\n\
             ++ (0, {{-{}*\\{n}D}}) --++ (0, {{-{}*\\{n}D}}) \
             node [black,midway,xshift=0.2cm,anchor=west] {{{}}};\n",
            cm(offsets.level_offset(entry.level)),
            BRACE_THICKNESS,
            entry.start - 1,
            entry.span(),
            entry.label,
            n = name
        ));
    }
    out.push_str("\\end{tikzpicture}");
    out
}
