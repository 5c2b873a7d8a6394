//! Equation word-equivalent estimation.

use crate::core::regions::{row_breaks, Region};

/// Words charged per displayed line at single-column width.
pub const SINGLE_COLUMN_LINE_WORDS: u32 = 16;
/// Words charged per displayed line at full (two-column) width.
pub const TWO_COLUMN_LINE_WORDS: u32 = 32;

/// Word-equivalent of one equation block.
///
/// The block itself counts as one line; each row break strictly inside it
/// adds another. Row breaks inside a nested `array` environment accumulate
/// separately, and a non-empty array multiplies the line count instead of
/// adding to it: a matrix is charged rows x lines-per-row.
pub fn equation_words(lines: &[String], region: &Region) -> u32 {
    let mut line_count = 1u32;
    let mut array_rows = 0u32;
    let mut in_array = false;

    let lo = region.start + 1;
    let hi = region.end.saturating_sub(1);
    for line in lines.iter().take(hi).skip(lo) {
        if line.contains("\\begin{array}") {
            in_array = true;
        }
        let breaks = row_breaks(line);
        if in_array {
            array_rows += breaks;
        } else {
            line_count += breaks;
        }
        if line.contains("\\end{array}") {
            in_array = false;
        }
    }

    let total_lines = if array_rows > 0 {
        line_count * array_rows
    } else {
        line_count
    };
    let per_line = if region.two_column {
        TWO_COLUMN_LINE_WORDS
    } else {
        SINGLE_COLUMN_LINE_WORDS
    };
    total_lines * per_line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn region(lines: &[String], two_column: bool) -> Region {
        Region {
            start: 0,
            end: lines.len(),
            two_column,
        }
    }

    #[test]
    fn test_single_line_single_column() {
        let lines = doc(&["\\begin{equation}", "E = mc^2", "\\end{equation}"]);
        assert_eq!(equation_words(&lines, &region(&lines, false)), 16);
    }

    #[test]
    fn test_row_breaks_add_lines() {
        // N breaks -> (N + 1) lines
        let lines = doc(&[
            "\\begin{eqnarray}",
            "a &=& b \\\\",
            "c &=& d \\\\",
            "e &=& f",
            "\\end{eqnarray}",
        ]);
        assert_eq!(equation_words(&lines, &region(&lines, false)), 3 * 16);
        assert_eq!(equation_words(&lines, &region(&lines, true)), 3 * 32);
    }

    #[test]
    fn test_nested_array_multiplies() {
        // One equation line times two array rows.
        let lines = doc(&[
            "\\begin{equation}",
            "M = \\left(\\begin{array}{cc}",
            "a & b \\\\",
            "c & d \\\\",
            "\\end{array}\\right)",
            "\\end{equation}",
        ]);
        assert_eq!(equation_words(&lines, &region(&lines, false)), 2 * 16);
    }

    #[test]
    fn test_breaks_outside_array_still_add() {
        let lines = doc(&[
            "\\begin{align}",
            "x &= y \\\\",
            "M &= \\begin{array}{c}",
            "a \\\\",
            "\\end{array}",
            "\\end{align}",
        ]);
        // Two equation lines, one array row: product rule.
        assert_eq!(equation_words(&lines, &region(&lines, false)), 2 * 1 * 16);
    }

    #[test]
    fn test_empty_block_counts_one_line() {
        let lines = doc(&["\\begin{displaymath}", "\\end{displaymath}"]);
        assert_eq!(equation_words(&lines, &region(&lines, false)), 16);
    }
}
