//! Venue word limits.
//!
//! Length limits for letter-format venues, taken from the published
//! length-guide figures. The table is compiled in; adding a venue is a code
//! change by design.

use phf::phf_map;

use crate::utils::error::{LengthError, LengthResult};

/// Venue identifier -> word limit
static VENUE_LIMITS: phf::Map<&'static str, u32> = phf_map! {
    "PRL" => 3750,
    "PRA-RC" => 4500,
    "PRB-RC" => 4500,
    "PRC-RC" => 4500,
    "PRD-RC" => 4500,
    "PRE-RC" => 4500,
    "PRApplied" => 3500,
    "PRFluids" => 3500,
    "PRMaterials" => 4500,
};

/// Advisory character limit for the abstract.
pub const ABSTRACT_CHAR_LIMIT: usize = 600;

/// Look up the word limit for a venue. Unknown venues are a fatal
/// configuration error.
pub fn word_limit(venue: &str) -> LengthResult<u32> {
    VENUE_LIMITS
        .get(venue)
        .copied()
        .ok_or_else(|| LengthError::unknown_venue(venue, known_venues()))
}

/// All venue identifiers, sorted.
pub fn known_venues() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = VENUE_LIMITS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// All (venue, limit) pairs, sorted by venue.
pub fn venue_table() -> Vec<(&'static str, u32)> {
    let mut entries: Vec<(&'static str, u32)> =
        VENUE_LIMITS.entries().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable_by_key(|(k, _)| *k);
    entries
}
