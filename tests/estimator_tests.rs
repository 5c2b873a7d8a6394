//! Integration tests for the texlen estimation engine

use texlen::core::equations::equation_words;
use texlen::core::figures::figure_formula;
use texlen::core::narrative::narrative_words;
use texlen::core::regions::{back_matter_boundary, locate};
use texlen::core::report::{Tally, Verdict};
use texlen::core::tables::table_words;

fn doc(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

// ============================================================================
// Structural estimators
// ============================================================================

mod estimators {
    use super::*;

    // Body wrapped in the minimal valid manuscript shell.
    fn wrap(body: &[&str]) -> Vec<String> {
        let mut lines = doc(&[
            "\\documentclass{revtex4-2}",
            "\\begin{document}",
            "\\begin{abstract}",
            "Short abstract.",
            "\\end{abstract}",
            "\\maketitle",
        ]);
        lines.extend(body.iter().map(|l| l.to_string()));
        lines.push("\\end{document}".to_string());
        lines
    }

    #[test]
    fn test_equation_words_scale_with_row_breaks() {
        for breaks in 0..4u32 {
            let mut body = vec!["\\begin{equation}"];
            for _ in 0..breaks {
                body.push("a = b \\\\");
            }
            body.push("c = d");
            body.push("\\end{equation}");

            let lines = wrap(&body);
            let map = locate(&lines).unwrap();
            assert_eq!(map.equations.len(), 1);
            assert_eq!(
                equation_words(&lines, &map.equations[0]),
                (breaks + 1) * 16
            );
        }
    }

    #[test]
    fn test_two_column_equation_doubles() {
        let lines = wrap(&[
            "\\begin{widetext}",
            "\\begin{equation}",
            "a = b \\\\",
            "c = d",
            "\\end{equation}",
            "\\end{widetext}",
        ]);
        let map = locate(&lines).unwrap();
        assert_eq!(equation_words(&lines, &map.equations[0]), 2 * 32);
    }

    #[test]
    fn test_table_words_both_widths() {
        let single = wrap(&["\\begin{table}", "a \\\\", "b \\\\", "\\end{table}"]);
        let map = locate(&single).unwrap();
        // floor(6.5 * 3 + 13) = 32
        assert_eq!(table_words(&single, &map.tables[0]), 32);

        let double = wrap(&["\\begin{table*}", "a \\\\", "\\end{table*}"]);
        let map = locate(&double).unwrap();
        // floor(13 * 2 + 26) = 52
        assert_eq!(table_words(&double, &map.tables[0]), 52);
    }

    #[test]
    fn test_square_single_column_figure_is_170() {
        assert_eq!(figure_formula(1.0, false).floor() as u32, 170);
    }
}

// ============================================================================
// Boundary detection
// ============================================================================

mod boundary {
    use super::*;

    #[test]
    fn test_boundary_minimum_over_marker_combinations() {
        let cases: Vec<(Vec<&str>, usize)> = vec![
            (vec!["text", "\\acknowledgments"], 1),
            (vec!["text", "\\bibliography{refs}"], 1),
            (vec!["text", "\\section*{End Matter}"], 1),
            (vec!["\\acknowledgments", "\\bibliography{refs}"], 0),
            (vec!["text", "\\bibliography{refs}", "\\acknowledgments"], 1),
            (vec!["just", "text"], 2),
        ];
        for (lines, expected) in cases {
            assert_eq!(
                back_matter_boundary(&doc(&lines)),
                expected,
                "for {:?}",
                lines
            );
        }
    }
}

// ============================================================================
// Narrative counting
// ============================================================================

mod narrative {
    use super::*;

    #[test]
    fn test_hyphenated_compounds_split() {
        let raw = doc(&["\\maketitle", "steady-state flow"]);
        let plain = doc(&["steady-state flow"]);
        assert_eq!(narrative_words(&plain, &raw).unwrap(), 3);
    }

    #[test]
    fn test_title_lines_excluded_by_alignment() {
        let raw = doc(&[
            "\\title{On Widgets}",
            "\\maketitle",
            "Widgets are studied here.",
        ]);
        let plain = doc(&["On Widgets", "Widgets are studied here."]);
        assert_eq!(narrative_words(&plain, &raw).unwrap(), 4);
    }
}

// ============================================================================
// End-to-end tally and verdict
// ============================================================================

mod tally {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        // One single-column equation with 2 row breaks, one two-column table
        // with 1 row break, no figures, 1000 narrative words.
        let lines = doc(&[
            "\\documentclass{revtex4-2}",
            "\\begin{document}",
            "\\begin{abstract}",
            "Abstract.",
            "\\end{abstract}",
            "\\maketitle",
            "\\begin{equation}",
            "a = b \\\\",
            "c = d \\\\",
            "e = f",
            "\\end{equation}",
            "\\begin{table*}",
            "x & y \\\\",
            "z & w",
            "\\end{table*}",
            "\\acknowledgments",
            "\\end{document}",
        ]);
        let map = locate(&lines).unwrap();
        assert_eq!(map.equations.len(), 1);
        assert_eq!(map.tables.len(), 1);
        assert!(map.figures.is_empty());

        let equations = equation_words(&lines, &map.equations[0]);
        let tables = table_words(&lines, &map.tables[0]);
        assert_eq!(equations, 48);
        assert_eq!(tables, 52);

        let tally = Tally {
            main_text: 1000,
            equations,
            figures: 0,
            tables,
        };
        assert_eq!(tally.total(), 1100);

        let verdict = Verdict::against_limit("PRL", tally.total(), 1000);
        assert!(verdict.over());
        assert_eq!(verdict.excess, 100);
        assert!((verdict.percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_is_idempotent() {
        let lines = doc(&[
            "\\documentclass{revtex4-2}",
            "\\begin{document}",
            "\\begin{abstract}",
            "Abstract.",
            "\\end{abstract}",
            "\\maketitle",
            "Body text here.",
            "\\begin{equation}",
            "a = b",
            "\\end{equation}",
            "\\bibliography{refs}",
            "\\end{document}",
        ]);
        let first = locate(&lines).unwrap();
        let second = locate(&lines).unwrap();
        assert_eq!(first, second);

        let words_first: Vec<u32> = first
            .equations
            .iter()
            .map(|r| equation_words(&lines, r))
            .collect();
        let words_second: Vec<u32> = second
            .equations
            .iter()
            .map(|r| equation_words(&lines, r))
            .collect();
        assert_eq!(words_first, words_second);
    }
}
