//! Table word-equivalent estimation.

use crate::core::regions::{row_breaks, Region};

/// Word-equivalent of one table block.
///
/// Row count is 1 plus every row break between the begin and end markers
/// inclusive. The linear coefficients are the venue's published calibration
/// and must not be altered.
pub fn table_words(lines: &[String], region: &Region) -> u32 {
    let breaks: u32 = lines[region.start..region.end.min(lines.len())]
        .iter()
        .map(|l| row_breaks(l))
        .sum();
    let rows = 1 + breaks;
    if region.two_column {
        (13.0 * f64::from(rows) + 26.0).floor() as u32
    } else {
        (6.5 * f64::from(rows) + 13.0).floor() as u32
    }
}
