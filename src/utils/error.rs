//! Error handling for length estimation
//!
//! This module provides a unified error type and result type for all
//! estimation operations.

use std::fmt;
use std::path::PathBuf;

/// Length estimation error type
#[derive(Debug, Clone)]
pub enum LengthError {
    /// Venue identifier not present in the limits table
    UnknownVenue { venue: String, known: Vec<&'static str> },
    /// A singleton structural marker did not occur exactly once
    MarkerCount { marker: &'static str, found: usize },
    /// No figure file found under any candidate extension
    FigureNotFound { target: String, dir: PathBuf },
    /// A figure target resolved under more than one candidate extension
    FigureAmbiguous { target: String, matches: Vec<PathBuf> },
    /// An external tool was unavailable or produced no usable output
    ExternalTool { tool: String, message: String },
    /// Malformed run option (e.g. a bad KEY=VALUE substitution)
    InvalidOption { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthError::UnknownVenue { venue, known } => {
                write!(f, "Unknown venue '{}'. Known venues: {}", venue, known.join(", "))
            }
            LengthError::MarkerCount { marker, found } => {
                write!(
                    f,
                    "Expected exactly one '{}' in the document, found {}",
                    marker, found
                )
            }
            LengthError::FigureNotFound { target, dir } => {
                write!(
                    f,
                    "Figure '{}' not found in {} (tried the literal name and .pdf/.eps/.png)",
                    target,
                    dir.display()
                )
            }
            LengthError::FigureAmbiguous { target, matches } => {
                let names: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Figure '{}' matches more than one file: {}",
                    target,
                    names.join(", ")
                )
            }
            LengthError::ExternalTool { tool, message } => {
                write!(f, "External tool '{}' failed: {}", tool, message)
            }
            LengthError::InvalidOption { message } => {
                write!(f, "Invalid option: {}", message)
            }
            LengthError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for LengthError {}

impl From<std::io::Error> for LengthError {
    fn from(err: std::io::Error) -> Self {
        LengthError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for estimation operations
pub type LengthResult<T> = Result<T, LengthError>;

// Convenience constructors for errors
impl LengthError {
    pub fn unknown_venue(venue: impl Into<String>, known: Vec<&'static str>) -> Self {
        LengthError::UnknownVenue {
            venue: venue.into(),
            known,
        }
    }

    pub fn marker_count(marker: &'static str, found: usize) -> Self {
        LengthError::MarkerCount { marker, found }
    }

    pub fn figure_not_found(target: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        LengthError::FigureNotFound {
            target: target.into(),
            dir: dir.into(),
        }
    }

    pub fn figure_ambiguous(target: impl Into<String>, matches: Vec<PathBuf>) -> Self {
        LengthError::FigureAmbiguous {
            target: target.into(),
            matches,
        }
    }

    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        LengthError::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        LengthError::InvalidOption {
            message: message.into(),
        }
    }
}
