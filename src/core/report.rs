//! Tally aggregation, venue verdict, and report rendering.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::config::{RunConfig, Strategy};
use crate::core::document::Document;
use crate::core::equations::equation_words;
use crate::core::figures::{figure_words, FigureWords};
use crate::core::narrative::{detex_lines, narrative_words};
use crate::core::regions::{abstract_text, locate};
use crate::core::tables::table_words;
use crate::core::typeset::typeset_words;
use crate::utils::error::LengthResult;
use crate::venues;

/// The four word-equivalent contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub main_text: u32,
    pub equations: u32,
    pub figures: u32,
    pub tables: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.main_text + self.equations + self.figures + self.tables
    }
}

/// Comparison of a total against a venue limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub venue: String,
    pub limit: u32,
    pub total: u32,
    /// Signed difference total - limit; positive means over.
    pub excess: i64,
    /// Magnitude of the excess relative to the limit, in percent.
    pub percent: f64,
}

impl Verdict {
    pub fn against_limit(venue: &str, total: u32, limit: u32) -> Self {
        let excess = i64::from(total) - i64::from(limit);
        let percent = 100.0 * excess.unsigned_abs() as f64 / f64::from(limit);
        Self {
            venue: venue.to_string(),
            limit,
            total,
            excess,
            percent,
        }
    }

    pub fn over(&self) -> bool {
        self.excess > 0
    }
}

/// Sum the contributions and compare against the venue's configured limit.
pub fn assess(tally: &Tally, venue: &str) -> LengthResult<Verdict> {
    let limit = venues::word_limit(venue)?;
    Ok(Verdict::against_limit(venue, tally.total(), limit))
}

/// Everything reported for one manuscript.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: String,
    pub abstract_chars: usize,
    pub equation_words: Vec<u32>,
    pub table_words: Vec<u32>,
    pub figures: Vec<FigureWords>,
    pub tally: Tally,
    pub verdict: Verdict,
}

/// Run the full estimation for one manuscript.
pub fn run_document(path: &Path, config: &RunConfig) -> LengthResult<DocumentReport> {
    let doc = Document::load(path)?;
    let map = locate(&doc.lines)?;

    let abstract_chars = abstract_text(&doc.lines, map.abstract_span).chars().count();

    let main_text = match config.strategy {
        Strategy::Detex => {
            let plain = detex_lines(&doc, config)?;
            narrative_words(&plain, &doc.lines)?
        }
        Strategy::Typeset => typeset_words(&doc, config)?,
    };

    let equation_list: Vec<u32> = map
        .equations
        .iter()
        .map(|r| equation_words(&doc.lines, r))
        .collect();
    let table_list: Vec<u32> = map
        .tables
        .iter()
        .map(|r| table_words(&doc.lines, r))
        .collect();
    let (figures, figure_total) = figure_words(&doc, &map, config)?;

    let tally = Tally {
        main_text,
        equations: equation_list.iter().sum(),
        figures: figure_total,
        tables: table_list.iter().sum(),
    };
    let verdict = assess(&tally, &config.venue)?;

    Ok(DocumentReport {
        path: doc.name(),
        abstract_chars,
        equation_words: equation_list,
        table_words: table_list,
        figures,
        tally,
        verdict,
    })
}

fn join_counts(counts: &[u32]) -> String {
    counts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join(" + ")
}

/// Console rendering of a document report.
pub fn render_report(report: &DocumentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==== {} ====", report.path);

    let advisory = if report.abstract_chars > venues::ABSTRACT_CHAR_LIMIT {
        " -- over the advisory limit"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "Abstract: {} characters (advisory limit {}){}",
        report.abstract_chars,
        venues::ABSTRACT_CHAR_LIMIT,
        advisory
    );

    if !report.equation_words.is_empty() {
        let _ = writeln!(
            out,
            "Equation words: {} = {}",
            join_counts(&report.equation_words),
            report.tally.equations
        );
    }
    if !report.table_words.is_empty() {
        let _ = writeln!(
            out,
            "Table words: {} = {}",
            join_counts(&report.table_words),
            report.tally.tables
        );
    }
    for figure in &report.figures {
        let _ = writeln!(
            out,
            "Figure {}: {:.0} x {:.0}, aspect {:.2}, {}, {:.0} words",
            figure.resolved.display(),
            figure.width,
            figure.height,
            figure.aspect,
            if figure.two_column { "two-column" } else { "single-column" },
            figure.words
        );
    }

    let _ = writeln!(out, "Main text words: {:>8}", report.tally.main_text);
    let _ = writeln!(out, "Equation words:  {:>8}", report.tally.equations);
    let _ = writeln!(out, "Figure words:    {:>8}", report.tally.figures);
    let _ = writeln!(out, "Table words:     {:>8}", report.tally.tables);
    let _ = writeln!(out, "Total:           {:>8}", report.tally.total());

    let verdict = &report.verdict;
    let _ = writeln!(
        out,
        "{} the {} limit of {} by {} words ({:.1}%)",
        if verdict.over() { "OVER" } else { "UNDER" },
        verdict.venue,
        verdict.limit,
        verdict.excess.unsigned_abs(),
        verdict.percent
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tally_total() {
        let tally = Tally {
            main_text: 1000,
            equations: 48,
            figures: 0,
            tables: 52,
        };
        assert_eq!(tally.total(), 1100);
    }

    #[test]
    fn test_verdict_over() {
        let verdict = Verdict::against_limit("PRL", 1100, 1000);
        assert!(verdict.over());
        assert_eq!(verdict.excess, 100);
        assert!((verdict.percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_verdict_under() {
        let verdict = Verdict::against_limit("PRL", 3000, 3750);
        assert!(!verdict.over());
        assert_eq!(verdict.excess, -750);
        assert!((verdict.percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_assess_unknown_venue() {
        let tally = Tally {
            main_text: 1,
            equations: 0,
            figures: 0,
            tables: 0,
        };
        assert!(assess(&tally, "Nowhere").is_err());
    }

    #[test]
    fn test_render_mentions_verdict() {
        let tally = Tally {
            main_text: 1000,
            equations: 48,
            figures: 0,
            tables: 52,
        };
        let report = DocumentReport {
            path: "paper.tex".to_string(),
            abstract_chars: 450,
            equation_words: vec![48],
            table_words: vec![52],
            figures: Vec::new(),
            tally,
            verdict: Verdict::against_limit("PRL", tally.total(), 3750),
        };
        let text = render_report(&report);
        assert!(text.contains("paper.tex"));
        assert!(text.contains("Total:"));
        assert!(text.contains("UNDER the PRL limit"));
        assert!(text.contains("450 characters"));
    }
}
