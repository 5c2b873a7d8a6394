//! Region location over the raw line sequence.
//!
//! Pure functions: no I/O. The back-matter boundary returned here is the
//! single cut-off every estimator agrees on; equation/table blocks and
//! figure inclusions are only reported when they start before it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::error::{LengthError, LengthResult};

/// Title-insertion command; must occur exactly once.
pub const TITLE_MARKER: &str = "\\maketitle";
pub const ABSTRACT_BEGIN: &str = "\\begin{abstract}";
pub const ABSTRACT_END: &str = "\\end{abstract}";

/// Displayed-math environments treated as equation blocks.
pub const EQUATION_ENVS: &[&str] = &[
    "equation",
    "equation*",
    "eqnarray",
    "eqnarray*",
    "align",
    "align*",
    "displaymath",
];

lazy_static! {
    static ref INCLUDEGRAPHICS: Regex =
        Regex::new(r"\\includegraphics\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}").unwrap();
}

/// A contiguous block of raw lines, `start` inclusive, `end` exclusive.
/// `start` is the begin-marker line; `end - 1` the end-marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub two_column: bool,
}

/// One image-inclusion directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureRef {
    pub line: usize,
    pub target: String,
}

/// Structural map of a manuscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMap {
    /// First line of back matter; `lines.len()` when there is none.
    pub boundary: usize,
    /// Line indices of the abstract begin/end markers.
    pub abstract_span: (usize, usize),
    pub equations: Vec<Region>,
    pub tables: Vec<Region>,
    pub figures: Vec<FigureRef>,
}

/// Locate every region the estimators need.
pub fn locate(lines: &[String]) -> LengthResult<DocumentMap> {
    let boundary = back_matter_boundary(lines);
    let abstract_span = (
        singleton_line(lines, ABSTRACT_BEGIN)?,
        singleton_line(lines, ABSTRACT_END)?,
    );
    let (equations, tables) = scan_blocks(lines, boundary);
    let figures = scan_figures(lines, boundary);
    Ok(DocumentMap {
        boundary,
        abstract_span,
        equations,
        tables,
        figures,
    })
}

pub fn acknowledgment_marker(line: &str) -> bool {
    line.contains("\\acknowledgments") || line.contains("\\acknowledgements")
}

pub fn bibliography_marker(line: &str) -> bool {
    line.contains("\\bibliography{") || line.contains("\\begin{thebibliography}")
}

pub fn end_matter_marker(line: &str) -> bool {
    line.contains("\\section") && line.contains("End Matter")
}

/// First line of back matter: the earliest acknowledgment, bibliography, or
/// "End Matter" marker. Zero or more of each is tolerated; with none
/// present the whole document is counted.
pub fn back_matter_boundary(lines: &[String]) -> usize {
    lines
        .iter()
        .position(|l| acknowledgment_marker(l) || bibliography_marker(l) || end_matter_marker(l))
        .unwrap_or(lines.len())
}

/// Index of the unique line containing `marker`; a [`LengthError::MarkerCount`]
/// when the document does not contain it exactly once.
pub fn singleton_line(lines: &[String], marker: &'static str) -> LengthResult<usize> {
    let mut found = lines.iter().enumerate().filter(|(_, l)| l.contains(marker));
    match (found.next(), found.next()) {
        (Some((idx, _)), None) => Ok(idx),
        (None, _) => Err(LengthError::marker_count(marker, 0)),
        (Some(_), Some(_)) => {
            let count = lines.iter().filter(|l| l.contains(marker)).count();
            Err(LengthError::marker_count(marker, count))
        }
    }
}

/// Count of explicit row-break markers (`\\`) on a line.
pub fn row_breaks(line: &str) -> u32 {
    line.matches("\\\\").count() as u32
}

fn begin_marker(env: &str) -> String {
    format!("\\begin{{{}}}", env)
}

fn end_marker(env: &str) -> String {
    format!("\\end{{{}}}", env)
}

/// Exclusive end of a block opened at `start`: the matching end marker is
/// searched from the following line. A block that never closes is clamped
/// to the end of the document rather than failing the run.
fn find_block_end(lines: &[String], start: usize, env: &str) -> usize {
    let end = end_marker(env);
    for (idx, line) in lines.iter().enumerate().skip(start + 1) {
        if line.contains(&end) {
            return idx + 1;
        }
    }
    log::warn!(
        "unterminated {} block starting at line {}; counting to end of document",
        env,
        start + 1
    );
    lines.len()
}

fn scan_blocks(lines: &[String], boundary: usize) -> (Vec<Region>, Vec<Region>) {
    let mut equations = Vec::new();
    let mut tables = Vec::new();
    let mut in_widetext = false;

    let mut i = 0;
    while i < boundary {
        let line = &lines[i];
        if line.contains("\\begin{widetext}") {
            in_widetext = true;
        }
        if line.contains("\\end{widetext}") {
            in_widetext = false;
        }

        if let Some(env) = EQUATION_ENVS
            .iter()
            .find(|env| line.contains(&begin_marker(env)))
        {
            let end = find_block_end(lines, i, env);
            equations.push(Region {
                start: i,
                end,
                two_column: in_widetext,
            });
            i = end;
            continue;
        }

        if line.contains("\\begin{table*}") {
            let end = find_block_end(lines, i, "table*");
            tables.push(Region {
                start: i,
                end,
                two_column: true,
            });
            i = end;
            continue;
        }
        if line.contains("\\begin{table}") {
            let end = find_block_end(lines, i, "table");
            tables.push(Region {
                start: i,
                end,
                two_column: false,
            });
            i = end;
            continue;
        }

        i += 1;
    }

    (equations, tables)
}

/// Image inclusions on comment-free lines before the boundary.
fn scan_figures(lines: &[String], boundary: usize) -> Vec<FigureRef> {
    let mut figures = Vec::new();
    for (idx, line) in lines.iter().enumerate().take(boundary) {
        if line.contains('%') {
            continue;
        }
        for capture in INCLUDEGRAPHICS.captures_iter(line) {
            figures.push(FigureRef {
                line: idx,
                target: capture[1].trim().to_string(),
            });
        }
    }
    figures
}

/// Whitespace-normalized abstract content for the advisory length check.
pub fn abstract_text(lines: &[String], span: (usize, usize)) -> String {
    let (begin, end) = span;
    if begin + 1 >= end {
        return String::new();
    }
    lines[begin + 1..end]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_boundary_each_marker() {
        let ack = doc(&["text", "\\acknowledgments", "thanks"]);
        assert_eq!(back_matter_boundary(&ack), 1);

        let bib = doc(&["text", "more", "\\bibliography{refs}"]);
        assert_eq!(back_matter_boundary(&bib), 2);

        let env = doc(&["text", "\\begin{thebibliography}{9}"]);
        assert_eq!(back_matter_boundary(&env), 1);

        let end_matter = doc(&["text", "\\section*{End Matter}"]);
        assert_eq!(back_matter_boundary(&end_matter), 1);
    }

    #[test]
    fn test_boundary_is_minimum_of_markers() {
        let lines = doc(&[
            "text",
            "\\acknowledgments",
            "\\bibliography{refs}",
            "\\section*{End Matter}",
        ]);
        assert_eq!(back_matter_boundary(&lines), 1);
    }

    #[test]
    fn test_boundary_defaults_to_document_length() {
        let lines = doc(&["text", "more text"]);
        assert_eq!(back_matter_boundary(&lines), 2);
    }

    #[test]
    fn test_singleton_marker_enforced() {
        let none = doc(&["text"]);
        assert!(singleton_line(&none, TITLE_MARKER).is_err());

        let twice = doc(&["\\maketitle", "\\maketitle"]);
        let err = singleton_line(&twice, TITLE_MARKER).unwrap_err();
        assert!(matches!(
            err,
            LengthError::MarkerCount { found: 2, .. }
        ));

        let once = doc(&["preamble", "\\maketitle", "text"]);
        assert_eq!(singleton_line(&once, TITLE_MARKER).unwrap(), 1);
    }

    #[test]
    fn test_equation_blocks_before_boundary_only() {
        let lines = doc(&[
            "\\begin{equation}",
            "E = mc^2",
            "\\end{equation}",
            "\\acknowledgments",
            "\\begin{equation}",
            "x",
            "\\end{equation}",
        ]);
        let (equations, _) = scan_blocks(&lines, back_matter_boundary(&lines));
        assert_eq!(equations.len(), 1);
        assert_eq!(equations[0].start, 0);
        assert_eq!(equations[0].end, 3);
        assert!(!equations[0].two_column);
    }

    #[test]
    fn test_widetext_equation_is_two_column() {
        let lines = doc(&[
            "\\begin{widetext}",
            "\\begin{align}",
            "a &= b",
            "\\end{align}",
            "\\end{widetext}",
            "\\begin{equation}",
            "c",
            "\\end{equation}",
        ]);
        let (equations, _) = scan_blocks(&lines, lines.len());
        assert_eq!(equations.len(), 2);
        assert!(equations[0].two_column);
        assert!(!equations[1].two_column);
    }

    #[test]
    fn test_starred_table_is_two_column() {
        let lines = doc(&[
            "\\begin{table*}",
            "a & b \\\\",
            "\\end{table*}",
            "\\begin{table}",
            "c \\\\",
            "\\end{table}",
        ]);
        let (_, tables) = scan_blocks(&lines, lines.len());
        assert_eq!(tables.len(), 2);
        assert!(tables[0].two_column);
        assert!(!tables[1].two_column);
    }

    #[test]
    fn test_unterminated_block_clamps_without_panic() {
        let lines = doc(&["\\begin{equation}", "E = mc^2"]);
        let (equations, _) = scan_blocks(&lines, lines.len());
        assert_eq!(equations.len(), 1);
        assert_eq!(equations[0].end, lines.len());
    }

    #[test]
    fn test_figure_scan_skips_commented_lines() {
        let lines = doc(&[
            "\\includegraphics[width=\\columnwidth]{figs/setup}",
            "% \\includegraphics{figs/old}",
            "\\includegraphics{figs/data.png} % final",
        ]);
        let figures = scan_figures(&lines, lines.len());
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].target, "figs/setup");
    }

    #[test]
    fn test_row_breaks() {
        assert_eq!(row_breaks("a & b \\\\"), 1);
        assert_eq!(row_breaks("a \\\\ b \\\\"), 2);
        assert_eq!(row_breaks("no breaks"), 0);
    }

    #[test]
    fn test_locate_full_map() {
        let lines = doc(&[
            "\\documentclass{revtex4-2}",
            "\\begin{document}",
            "\\begin{abstract}",
            "We report things.",
            "\\end{abstract}",
            "\\maketitle",
            "Body text.",
            "\\begin{equation}",
            "E = mc^2",
            "\\end{equation}",
            "\\acknowledgments",
        ]);
        let map = locate(&lines).unwrap();
        assert_eq!(map.boundary, 10);
        assert_eq!(map.abstract_span, (2, 4));
        assert_eq!(map.equations.len(), 1);
        assert!(map.tables.is_empty());
        assert!(map.figures.is_empty());
        assert_eq!(abstract_text(&lines, map.abstract_span), "We report things.");
    }
}
