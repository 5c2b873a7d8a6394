//! Plain-text-derived main-text counting.
//!
//! The detexer strips markup and returns plain prose lines; its line indices
//! bear no relation to the raw sequence, so the narrative start is found by
//! content alignment against the first raw line after the title command.

use crate::config::RunConfig;
use crate::core::document::Document;
use crate::core::regions::{singleton_line, TITLE_MARKER};
use crate::utils::error::{LengthError, LengthResult};
use crate::utils::exec::run_capture;

/// Prefix of the placeholder lines the detexer emits for graphics inclusions.
pub const PICTURE_TOKEN: &str = "<Picture";

const DETEX_CMD: &str = "detex";

/// Run the detexer over the manuscript, excluding the configured
/// environments from its view of the source.
pub fn detex_lines(doc: &Document, config: &RunConfig) -> LengthResult<Vec<String>> {
    let excludes = config.detex_excludes.join(",");
    // The detexer runs in the manuscript's directory so that \input and
    // graphics paths resolve; hand it the bare file name.
    let file = doc
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| doc.path.display().to_string());
    let output = run_capture(DETEX_CMD, &["-e", &excludes, &file], doc.dir())
        .map_err(|e| LengthError::external_tool(DETEX_CMD, e.to_string()))?;
    Ok(output.lines().map(str::to_string).collect())
}

/// Count narrative words from the plain-text view, aligned against the raw
/// line sequence.
///
/// Hyphens separate words: a hyphenated compound is charged once per part.
/// When alignment fails the whole plain text is counted from the top; that
/// inflates the result, so it is logged rather than silent.
pub fn narrative_words(plain: &[String], raw: &[String]) -> LengthResult<u32> {
    let title = singleton_line(raw, TITLE_MARKER)?;

    let kept: Vec<&str> = plain
        .iter()
        .map(|l| l.as_str())
        .filter(|l| !l.trim().is_empty() && !l.contains(PICTURE_TOKEN))
        .collect();

    let first_narrative = raw
        .iter()
        .skip(title + 1)
        .find(|l| !l.trim().is_empty() && !l.contains('%'));

    let offset = first_narrative
        .and_then(|line| {
            let line = line.trim();
            kept.iter().position(|p| line.contains(p.trim()))
        })
        .unwrap_or_else(|| {
            log::warn!(
                "narrative start not found by alignment; counting the whole plain text \
                 (the total may include title or front-matter words)"
            );
            0
        });

    let words = kept[offset..]
        .iter()
        .map(|l| l.replace('-', " ").split_whitespace().count())
        .sum::<usize>();
    Ok(words as u32)
}
