//! Integration tests for pseudotex document conversion

use pretty_assertions::assert_eq;
use pseudotex::{
    pseudocode_to_latex, pseudocode_to_latex_with_report, pseudocode_to_latex_with_table,
    BraceStyle, ConversionError, RenderOptions, StyleTable, SymbolTable,
};

const SUM_LOOP: &str = "for i <- 1 to n do\n    s <- s + i\n    t <- t * i\nreturn s";

fn annotated(entries: &str) -> String {
    format!("{}\n{}\n>{{0.5}}{{1}}\n", SUM_LOOP, entries)
}

fn math(source: &str) -> String {
    pseudocode_to_latex(source, "demo", &RenderOptions::math()).unwrap()
}

fn rows(latex: &str) -> Vec<&str> {
    latex.lines().filter(|l| l.starts_with("\t\t")).collect()
}

// ============================================================================
// Rendering
// ============================================================================

mod rendering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_algorithm_header_math() {
        assert_eq!(
            math("ALGORITHM Sum\nreturn x + y"),
            "\\begin{fleqn}\n\
             \t\\begin{align*}\n\
             \t\t& \\text{\\textbf{\\textsf{ALGORITHM}}}\\  \\text{\\textit{Sum}} \\\\\n\
             \t\t& \\text{\\textbf{return}}\\  x + y\n\
             \t\\end{align*}\n\
             \\end{fleqn}"
        );
    }

    #[test]
    fn test_algorithm_header_verbatim() {
        let latex =
            pseudocode_to_latex("ALGORITHM Sum\nreturn x + y", "demo", &RenderOptions::verbatim())
                .unwrap();
        assert_eq!(
            latex,
            "\\begin{minted}[escapeinside=??, fontfamily=lmr]{text}\n\
             ?\\sffamily{\\textbf{ALGORITHM}}? ?\\textit{Sum}?\n\
             ?\\textbf{return}? x + y\n\
             \\end{minted}"
        );
        assert!(!latex.contains("tikz"));
    }

    #[test]
    fn test_trailing_newlines_do_not_add_rows() {
        let latex = math("a <- 1\n\n\n");
        assert_eq!(rows(&latex), vec!["\t\t& a \\leftarrow 1"]);
    }

    #[test]
    fn test_comment_with_math() {
        let latex = math("x <- 0 // reset $x$ & go");
        assert!(latex.contains(r"\mathbin{/\mkern-3mu/}\ \text{ reset }x\text{ \& go}"));
    }

    #[test]
    fn test_indentation_and_operators() {
        let latex = math(SUM_LOOP);
        let rows = rows(&latex);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], "\t\t& \\qquad t \\leftarrow t \\ast i \\\\");
        assert_eq!(rows[3], "\t\t& \\text{\\textbf{return}}\\  s");
    }

    #[test]
    fn test_custom_escape_char() {
        let options = RenderOptions {
            escape_char: '|',
            ..RenderOptions::verbatim()
        };
        let latex = pseudocode_to_latex("while true do", "demo", &options).unwrap();
        assert!(latex.starts_with("\\begin{minted}[escapeinside=||, fontfamily=lmr]{text}"));
        assert!(latex.contains(r"|\textbf{while}|"));
    }
}

// ============================================================================
// Annotation braces
// ============================================================================

mod annotations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_entry_only_touches_its_line() {
        let latex = math(&annotated(":{1}{3:3}\"square\""));
        let rows = rows(&latex);
        assert_eq!(
            rows[2],
            "\t\t& \\qquad t \\leftarrow t \\ast i\\hspace{1.5cm}\\Big\\}\\ \\text{square} \\\\"
        );
        assert_eq!(latex.matches(r"\Big\}").count(), 1);
        assert!(!latex.contains("aligned"));
        assert!(!latex.contains(">{0.5}"));
    }

    #[test]
    fn test_single_line_shorthand() {
        let shorthand = math(&annotated(":{1}{3}\"square\""));
        assert_eq!(shorthand, math(&annotated(":{1}{3:3}\"square\"")));
    }

    #[test]
    fn test_ranged_entry_spans_rows() {
        let latex = math(&annotated(":{1}{2:4}body"));
        let rows = rows(&latex);
        assert_eq!(rows.len(), 4);
        assert!(rows[1].starts_with("\t\t& \\left.\\begin{aligned}& \\qquad s"));
        assert_eq!(rows[2], "\t\t\t& \\qquad t \\leftarrow t \\ast i \\\\");
        assert!(rows[3].ends_with(r"s\end{aligned}\hspace{1.5cm}\right\}\ \text{body}"));
        assert!(!rows[0].contains("aligned"));
        assert_eq!(latex.matches(r"\right\}").count(), 1);
    }

    #[test]
    fn test_diagram_in_verbatim_mode() {
        let source = annotated(":\n:{0}{1:4}\"whole loop\"\n:{1}{2:3}body");
        let latex = pseudocode_to_latex(&source, "prefix-sum", &RenderOptions::verbatim()).unwrap();

        let (block, picture) = latex.split_once("\\end{minted}\n").unwrap();
        assert!(block.contains(r"?\tikzmark{prefixsumL1}?"));
        assert!(block.contains(r"?\tikzmark{prefixsumL4}?"));
        assert_eq!(block.matches("tikzmark").count(), 4);

        assert!(picture.starts_with("\\begin{tikzpicture}[remember picture,overlay]\n"));
        assert!(picture.contains(r"\coordinate (prefixsumBASEX) at (0.5, 0);"));
        assert!(picture.contains(
            r"\draw (prefixsumA) ++ (0, {0.75cm*\prefixsumD})"
        ));
        assert!(picture.contains(r"++ (0, {-0*\prefixsumD}) --++ (0, {-4*\prefixsumD})"));
        assert!(picture.contains(r"\draw (prefixsumA) ++ (1, {0.75cm*\prefixsumD})"));
        assert!(picture.contains(r"++ (0, {-1*\prefixsumD}) --++ (0, {-2*\prefixsumD})"));
        assert!(picture.contains("{whole loop};"));
        assert!(picture.ends_with("\\end{tikzpicture}"));
    }

    #[test]
    fn test_diagram_in_math_mode() {
        let options = RenderOptions::math().with_braces(BraceStyle::Diagram);
        let latex = pseudocode_to_latex(&annotated(":{0}{2:3}"), "loop", &options).unwrap();
        assert!(latex.contains(r"\tikzmark{loopL2}"));
        assert!(!latex.contains(r"?\tikzmark"));
        assert!(latex.contains("\\end{fleqn}\n\\begin{tikzpicture}"));
    }

    #[test]
    fn test_extrapolated_level_warns() {
        let out = pseudocode_to_latex_with_report(
            &annotated(":{3}{2:3}deep"),
            "demo",
            &RenderOptions::math(),
        )
        .unwrap();
        assert!(out.has_warnings());
        assert_eq!(out.warnings[0].line, Some(5));
        // 0.5 + 3 * 1
        assert!(out.content.contains(r"\hspace{3.5cm}\right\}"));
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error(source: &str, name: &str, options: &RenderOptions) -> ConversionError {
        pseudocode_to_latex(source, name, options).unwrap_err()
    }

    #[test]
    fn test_entries_without_offsets() {
        let source = format!("{}\n:{{0}}{{1:2}}", SUM_LOOP);
        assert!(matches!(
            error(&source, "demo", &RenderOptions::math()),
            ConversionError::AnnotationConfigError { .. }
        ));
    }

    #[test]
    fn test_levels_with_empty_offset_list() {
        let source = format!("{}\n:{{1}}{{1:2}}\n>{{0.5}}{{}}", SUM_LOOP);
        assert!(matches!(
            error(&source, "demo", &RenderOptions::math()),
            ConversionError::AnnotationConfigError { line: Some(5), .. }
        ));

        let source = format!("{}\n:{{0}}{{1:2}}\n>{{0.5}}{{}}", SUM_LOOP);
        assert!(pseudocode_to_latex(&source, "demo", &RenderOptions::math()).is_ok());
    }

    #[test]
    fn test_range_outside_document() {
        let err = error(&annotated(":{0}{3:9}"), "demo", &RenderOptions::math());
        assert!(matches!(
            err,
            ConversionError::AnnotationConfigError { line: Some(5), .. }
        ));
    }

    #[test]
    fn test_partial_overlap() {
        let err = error(&annotated(":{0}{1:3}\n:{1}{2:4}"), "demo", &RenderOptions::math());
        assert!(err.to_string().contains("partially overlaps"));
    }

    #[test]
    fn test_inline_braces_in_verbatim_mode() {
        let options = RenderOptions::verbatim().with_braces(BraceStyle::Inline);
        assert!(matches!(
            error(&annotated(":{0}{1:2}"), "demo", &options),
            ConversionError::AnnotationConfigError { .. }
        ));
    }

    #[test]
    fn test_name_checked_only_for_diagrams() {
        let err = error(&annotated(":{0}{1:2}"), "sort2", &RenderOptions::verbatim());
        assert!(matches!(err, ConversionError::NamingError { .. }));

        assert!(pseudocode_to_latex(SUM_LOOP, "sort2", &RenderOptions::verbatim()).is_ok());
        assert!(pseudocode_to_latex(&annotated(":{0}{1:2}"), "sort2", &RenderOptions::math()).is_ok());
    }

    #[test]
    fn test_strict_lexing() {
        let options = RenderOptions::math().strict();
        assert!(matches!(
            error("a <- b # c", "demo", &options),
            ConversionError::LexicalError { line: 1, column: 8, .. }
        ));
        assert!(pseudocode_to_latex("a <- b # c", "demo", &RenderOptions::math()).is_ok());
    }

    #[test]
    fn test_unmapped_symbol_with_custom_table() {
        let mut table = StyleTable::math();
        table.remove_symbol(SymbolTable::Operators, "%");
        let err = pseudocode_to_latex_with_table(
            "a <- 1\nb <- a % 2",
            "demo",
            &RenderOptions::math(),
            &table,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConversionError::StyleMappingError {
                kind: "operator".to_string(),
                symbol: "%".to_string(),
                line: Some(2),
            }
        );
    }

    #[test]
    fn test_unterminated_math_is_a_warning() {
        let out =
            pseudocode_to_latex_with_report("x <- 1 // $x\ny", "demo", &RenderOptions::math())
                .unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].line, Some(1));
        assert_eq!(rows(&out.content).len(), 2);
    }
}
