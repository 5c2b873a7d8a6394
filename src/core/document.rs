//! Manuscript container.

use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::LengthResult;

/// A manuscript as an ordered sequence of raw authored lines.
///
/// Loaded once per run and read-only afterwards. The plain-text view
/// produced by the detexer lives in a separate sequence whose indices are
/// not comparable to these; see [`crate::core::narrative`].
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl Document {
    pub fn load(path: &Path) -> LengthResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Directory containing the manuscript; figure targets and temporary
    /// artifacts resolve relative to it.
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// File stem used in diagnostics.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}
