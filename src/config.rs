//! Run configuration.
//!
//! One immutable [`RunConfig`] value is built at startup and passed down to
//! every strategy and estimator; nothing in the engine reads ambient state.

use indexmap::IndexMap;

use crate::utils::error::{LengthError, LengthResult};

/// Main-text counting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Count tokens in the detexer's plain-text output
    #[default]
    Detex,
    /// Derive the count from the typesetting pipeline's log
    Typeset,
}

/// Backend used to read pixel dimensions of non-PDF figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectorBackend {
    /// ImageMagick `identify -format "%w %h"`
    #[default]
    Identify,
    /// POSIX `file`, parsing the `W x H` clause of its description
    File,
}

/// Environments stripped from the detexer's view of the source by default.
pub const DEFAULT_DETEX_EXCLUDES: &[&str] = &[
    "equation",
    "eqnarray",
    "align",
    "displaymath",
    "figure",
    "table",
];

/// Immutable per-run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Venue identifier checked against the limits table at lookup time
    pub venue: String,
    pub strategy: Strategy,
    pub inspector: InspectorBackend,
    /// Scale factor applied to the summed figure word-equivalents
    pub figure_scale: f64,
    /// Environment list handed to `detex -e`
    pub detex_excludes: Vec<String>,
    /// Macro-name substitutions applied to figure targets, in option order
    pub substitutions: IndexMap<String, String>,
    /// Typesetting executable for the typeset-log strategy
    pub latex_cmd: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            venue: "PRL".to_string(),
            strategy: Strategy::default(),
            inspector: InspectorBackend::default(),
            figure_scale: 1.1,
            detex_excludes: DEFAULT_DETEX_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            substitutions: IndexMap::new(),
            latex_cmd: "latex".to_string(),
        }
    }
}

impl RunConfig {
    /// Parse repeatable `KEY=VALUE` substitution options into the typed map.
    /// Malformed pairs are rejected here, at startup, not mid-run.
    pub fn with_substitutions<I, S>(mut self, pairs: I) -> LengthResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            let (key, value) = parse_substitution(pair.as_ref())?;
            self.substitutions.insert(key, value);
        }
        Ok(self)
    }
}

/// Split a `KEY=VALUE` substitution pair, validating both halves.
pub fn parse_substitution(raw: &str) -> LengthResult<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(LengthError::invalid_option(format!(
            "substitution '{}' is not of the form KEY=VALUE",
            raw
        )));
    };
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LengthError::invalid_option(format!(
            "substitution key '{}' must be a non-empty alphanumeric macro name",
            key
        )));
    }
    Ok((key.to_string(), value.to_string()))
}
