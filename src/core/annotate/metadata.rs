//! Trailing metadata: offset directive and annotation block

use lazy_static::lazy_static;
use regex::Regex;

use super::{AnnotationEntry, OffsetTable};
use crate::utils::error::{ConversionError, ConversionResult};

lazy_static! {
    /// `>{shift}{o1, o2, ...}` at the end of a line
    static ref OFFSET_RE: Regex =
        Regex::new(r">\s*\{\s*(-?\d+(?:\.\d+)?)\s*\}\s*\{([^{}]*)\}\s*$").unwrap();
    /// `{level}{start:end}label` or `{level}{line}label`, leading `:` removed
    static ref ENTRY_RE: Regex =
        Regex::new(r"^\{\s*(\d+)\s*\}\s*\{\s*(\d+)\s*(?::\s*(\d+)\s*)?\}(.*)$").unwrap();
}

/// Source split into pseudocode and annotation metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    /// Pseudocode with the metadata and trailing blank lines removed
    pub body: String,
    pub offsets: Option<OffsetTable>,
    /// Entries in document order
    pub entries: Vec<AnnotationEntry>,
}

impl Metadata {
    pub fn has_annotations(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Strip the offset directive and the annotation block from `source`.
///
/// The directive is only recognised on the last non-empty line. The block
/// is the trailing run of blank, `:` and `{` lines, starting at the topmost
/// line that begins with `:`.
pub fn extract_metadata(source: &str) -> ConversionResult<Metadata> {
    let mut lines: Vec<&str> = source.split('\n').collect();

    let mut offsets = None;
    if let Some(idx) = lines.iter().rposition(|l| !l.trim().is_empty()) {
        let line = lines[idx].trim_end_matches('\r');
        if let Some(caps) = OFFSET_RE.captures(line) {
            offsets = Some(parse_offsets(&caps[1], &caps[2], idx + 1)?);
            lines.truncate(idx);
        } else if line.trim_start().starts_with('>') {
            return Err(ConversionError::annotation_at(
                format!("malformed offset directive '{}'", line.trim()),
                idx + 1,
            ));
        }
    }

    let mut run_start = lines.len();
    while run_start > 0 {
        let trimmed = lines[run_start - 1].trim();
        if trimmed.is_empty() || trimmed.starts_with(':') || trimmed.starts_with('{') {
            run_start -= 1;
        } else {
            break;
        }
    }
    let block_start = (run_start..lines.len()).find(|&i| lines[i].trim_start().starts_with(':'));

    let mut entries = Vec::new();
    if let Some(top) = block_start {
        for (i, line) in lines[top..].iter().enumerate() {
            if let Some(entry) = parse_entry(line, top + i + 1)? {
                entries.push(entry);
            }
        }
        lines.truncate(top);
    }

    Ok(Metadata {
        body: lines.join("\n").trim_end().to_string(),
        offsets,
        entries,
    })
}

fn parse_offsets(shift: &str, list: &str, line: usize) -> ConversionResult<OffsetTable> {
    let number = |text: &str| {
        text.parse::<f64>().map_err(|_| {
            ConversionError::annotation_at(format!("invalid offset '{}'", text), line)
        })
    };
    let base_shift = number(shift)?;
    let increments = if list.trim().is_empty() {
        Vec::new()
    } else {
        list.split(',')
            .map(|item| number(item.trim()))
            .collect::<ConversionResult<Vec<_>>>()?
    };
    Ok(OffsetTable::new(base_shift, increments))
}

fn parse_entry(line: &str, source_line: usize) -> ConversionResult<Option<AnnotationEntry>> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start();
    if rest.is_empty() {
        return Ok(None);
    }
    let caps = ENTRY_RE.captures(rest).ok_or_else(|| {
        ConversionError::annotation_at(format!("malformed annotation entry '{}'", trimmed), source_line)
    })?;

    let number = |text: &str| {
        text.parse::<usize>().map_err(|_| {
            ConversionError::annotation_at(format!("number '{}' out of range", text), source_line)
        })
    };
    let level = number(&caps[1])?;
    let start = number(&caps[2])?;
    let end = match caps.get(3) {
        Some(end) => number(end.as_str())?,
        None => start,
    };

    Ok(Some(AnnotationEntry {
        level,
        start,
        end,
        label: unquote(caps[4].trim()).to_string(),
        source_line,
    }))
}

fn unquote(label: &str) -> &str {
    label
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_source_is_untouched() {
        let meta = extract_metadata("a <- 1\nb <- a\n\n").unwrap();
        assert_eq!(meta.body, "a <- 1\nb <- a");
        assert_eq!(meta.offsets, None);
        assert!(!meta.has_annotations());
    }

    #[test]
    fn test_block_and_directive() {
        let source = "for i <- 1 to n do\n    x <- x + i\nreturn x\n\
                      :\n:{1}{1:2}\"loop\"\n:{0}{3}result\n>{0.5}{1.5, 1}\n";
        let meta = extract_metadata(source).unwrap();
        assert_eq!(meta.body, "for i <- 1 to n do\n    x <- x + i\nreturn x");
        assert_eq!(meta.offsets, Some(OffsetTable::new(0.5, vec![1.5, 1.0])));
        assert_eq!(
            meta.entries,
            vec![
                AnnotationEntry {
                    level: 1,
                    start: 1,
                    end: 2,
                    label: "loop".to_string(),
                    source_line: 5,
                },
                AnnotationEntry {
                    level: 0,
                    start: 3,
                    end: 3,
                    label: "result".to_string(),
                    source_line: 6,
                },
            ]
        );
    }

    #[test]
    fn test_entries_without_leading_colon() {
        let meta = extract_metadata("a\nb\n:{0}{1:2} both\n{1}{2} second\n>{0}{1}").unwrap();
        assert_eq!(meta.body, "a\nb");
        assert_eq!(meta.entries.len(), 2);
        assert_eq!(meta.entries[1].label, "second");
        assert_eq!(meta.entries[1].source_line, 4);
    }

    #[test]
    fn test_brace_lines_without_header_stay_in_body() {
        let meta = extract_metadata("x <- 1\n{1}{2}").unwrap();
        assert_eq!(meta.body, "x <- 1\n{1}{2}");
        assert!(meta.entries.is_empty());
    }

    #[test]
    fn test_directive_only_on_last_line() {
        let meta = extract_metadata("a\n>{1}{2}\nb").unwrap();
        assert_eq!(meta.offsets, None);
        assert_eq!(meta.body, "a\n>{1}{2}\nb");

        let meta = extract_metadata("a\n>{1}{}\n\n").unwrap();
        assert_eq!(meta.offsets, Some(OffsetTable::new(1.0, Vec::new())));
        assert_eq!(meta.body, "a");
    }

    #[test]
    fn test_malformed_metadata() {
        let err = extract_metadata("a\n>{1}{2, x}").unwrap_err();
        assert_eq!(err, ConversionError::annotation_at("invalid offset 'x'", 2));

        assert!(extract_metadata("a\n>{left}{2}").is_err());

        let err = extract_metadata("a\n:{1}{2:x}\n>{0}{1}").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::AnnotationConfigError { line: Some(2), .. }
        ));
    }

    #[test]
    fn test_crlf_source() {
        let meta = extract_metadata("a\r\nb\r\n:{0}{1:2}x\r\n>{0}{1}\r\n").unwrap();
        assert_eq!(meta.body, "a\r\nb");
        assert_eq!(meta.entries[0].label, "x");
        assert!(meta.offsets.is_some());
    }
}
