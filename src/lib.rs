//! Texlen - journal word-equivalent length estimation for LaTeX manuscripts
//!
//! Estimates the length of a manuscript the way letter-format venues count
//! it: literal main-text words plus word-equivalents for displayed
//! equations, tables, and figures, compared against a per-venue limit.
//! The estimate is best-effort, reverse-engineered from published length
//! guidance; it does not reproduce any publisher's internal counter.

pub mod config;
pub mod core;
pub mod utils;
pub mod venues;

pub use crate::config::{InspectorBackend, RunConfig, Strategy};
pub use crate::core::document::Document;
pub use crate::core::regions::{locate, DocumentMap, FigureRef, Region};
pub use crate::core::report::{assess, render_report, run_document, DocumentReport, Tally, Verdict};
pub use crate::utils::error::{LengthError, LengthResult};
