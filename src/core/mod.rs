//! Estimation engine: region location, the two main-text strategies, and
//! the per-element word-equivalent estimators.

pub mod document;
pub mod equations;
pub mod figures;
pub mod narrative;
pub mod regions;
pub mod report;
pub mod tables;
pub mod typeset;
