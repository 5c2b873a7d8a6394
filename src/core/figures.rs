//! Figure word-equivalent estimation.
//!
//! Each distinct figure target is resolved on disk, measured, and charged by
//! aspect ratio and column span. PDF figures are measured in-process from
//! the first page's media box; everything else goes through the configured
//! image inspector.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::{InspectorBackend, RunConfig};
use crate::core::document::Document;
use crate::core::regions::DocumentMap;
use crate::utils::error::{LengthError, LengthResult};
use crate::utils::exec::run_capture;

/// Naming pattern of the byproducts an EPS-to-PDF conversion step leaves
/// behind; new ones are cleaned up after the figure pass.
const EPS_BYPRODUCT_SUFFIX: &str = "-eps-converted-to.pdf";

const EXTENSION_CANDIDATES: &[&str] = &["", ".pdf", ".eps", ".png"];

lazy_static! {
    static ref FILE_DIMENSIONS: Regex = Regex::new(r"(\d+)\s*x\s*(\d+)").unwrap();
}

/// Per-figure diagnostics reported alongside the tally.
#[derive(Debug, Clone, Serialize)]
pub struct FigureWords {
    pub target: String,
    pub resolved: PathBuf,
    pub width: f64,
    pub height: f64,
    pub aspect: f64,
    pub two_column: bool,
    pub words: f64,
}

/// Word-equivalent of one figure from its aspect ratio and column span.
pub fn figure_formula(aspect: f64, two_column: bool) -> f64 {
    if two_column {
        300.0 / (0.5 * aspect) + 40.0
    } else {
        150.0 / aspect + 20.0
    }
}

/// Estimate all figures before the boundary: per-figure diagnostics plus the
/// scaled, floored total.
pub fn figure_words(
    doc: &Document,
    map: &DocumentMap,
    config: &RunConfig,
) -> LengthResult<(Vec<FigureWords>, u32)> {
    let _byproducts = EpsByproductGuard::new(doc.dir());

    let mut seen: HashSet<&str> = HashSet::new();
    let mut details = Vec::new();
    let mut sum = 0.0;

    for figure in &map.figures {
        if !seen.insert(figure.target.as_str()) {
            continue;
        }
        // An inclusion outside any figure block carries no caption or float
        // cost and is skipped, not failed.
        let Some(two_column) = enclosing_figure_block(&doc.lines, figure.line) else {
            log::debug!("{}: not inside a figure block, skipped", figure.target);
            continue;
        };

        let target = apply_substitutions(&figure.target, config);
        let resolved = resolve_target(doc.dir(), &target)?;
        let (width, height) = dimensions(&resolved, config)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(LengthError::external_tool(
                "image inspector",
                format!(
                    "{} reported non-positive dimensions {}x{}",
                    resolved.display(),
                    width,
                    height
                ),
            ));
        }

        let aspect = width / height;
        let words = figure_formula(aspect, two_column);
        sum += words;
        details.push(FigureWords {
            target: figure.target.clone(),
            resolved,
            width,
            height,
            aspect,
            two_column,
            words,
        });
    }

    let total = (sum * config.figure_scale).floor() as u32;
    Ok((details, total))
}

/// Column span of the figure block enclosing `from`, scanning backward.
/// `None` when the inclusion is not inside a figure block.
fn enclosing_figure_block(lines: &[String], from: usize) -> Option<bool> {
    for idx in (0..=from.min(lines.len().saturating_sub(1))).rev() {
        let line = &lines[idx];
        if line.contains("\\begin{figure*}") {
            return Some(true);
        }
        if line.contains("\\begin{figure}") {
            return Some(false);
        }
        if idx != from && line.contains("\\end{figure") {
            return None;
        }
    }
    None
}

/// Replace configured `\KEY` macros in a figure target.
fn apply_substitutions(target: &str, config: &RunConfig) -> String {
    let mut out = target.to_string();
    for (key, value) in &config.substitutions {
        out = out.replace(&format!("\\{}", key), value);
    }
    out
}

/// Resolve a target against the candidate extensions; exactly one on-disk
/// match is required.
fn resolve_target(dir: &Path, target: &str) -> LengthResult<PathBuf> {
    let matches: Vec<PathBuf> = EXTENSION_CANDIDATES
        .iter()
        .map(|ext| dir.join(format!("{}{}", target, ext)))
        .filter(|p| p.is_file())
        .collect();

    match matches.len() {
        1 => Ok(matches.into_iter().next().unwrap()),
        0 => Err(LengthError::figure_not_found(target, dir)),
        _ => Err(LengthError::figure_ambiguous(target, matches)),
    }
}

fn dimensions(path: &Path, config: &RunConfig) -> LengthResult<(f64, f64)> {
    if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("pdf")) {
        return pdf_page_size(path);
    }
    inspect(path, config.inspector)
}

/// First-page media box of a PDF figure, in points.
fn pdf_page_size(path: &Path) -> LengthResult<(f64, f64)> {
    let pdf = lopdf::Document::load(path).map_err(|e| {
        LengthError::external_tool("pdf reader", format!("{}: {}", path.display(), e))
    })?;
    let pages = pdf.get_pages();
    let first = pages.values().next().copied().ok_or_else(|| {
        LengthError::external_tool("pdf reader", format!("{}: no pages", path.display()))
    })?;

    let mut dict = pdf.get_dictionary(first).map_err(|e| {
        LengthError::external_tool("pdf reader", format!("{}: {}", path.display(), e))
    })?;

    // MediaBox may be inherited from an ancestor page-tree node.
    for _ in 0..8 {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = resolve(&pdf, obj).as_array().map_err(|e| {
                LengthError::external_tool("pdf reader", format!("{}: {}", path.display(), e))
            })?;
            let nums: Vec<f64> = arr.iter().filter_map(as_number).collect();
            if nums.len() == 4 {
                return Ok(((nums[2] - nums[0]).abs(), (nums[3] - nums[1]).abs()));
            }
            break;
        }
        match dict.get(b"Parent").ok().map(|p| resolve(&pdf, p)) {
            Some(parent) => match parent.as_dict() {
                Ok(d) => dict = d,
                Err(_) => break,
            },
            None => break,
        }
    }

    Err(LengthError::external_tool(
        "pdf reader",
        format!("{}: no usable MediaBox", path.display()),
    ))
}

fn resolve<'a>(pdf: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    if let lopdf::Object::Reference(id) = obj {
        pdf.get_object(*id).unwrap_or(obj)
    } else {
        obj
    }
}

fn as_number(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Pixel dimensions via the configured inspector backend.
fn inspect(path: &Path, backend: InspectorBackend) -> LengthResult<(f64, f64)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match backend {
        InspectorBackend::Identify => {
            let out = run_capture("identify", &["-format", "%w %h", &file], dir)
                .map_err(|e| LengthError::external_tool("identify", e.to_string()))?;
            let mut parts = out.split_whitespace();
            let parse = |p: Option<&str>| p.and_then(|v| v.parse::<f64>().ok());
            match (parse(parts.next()), parse(parts.next())) {
                (Some(w), Some(h)) => Ok((w, h)),
                _ => Err(LengthError::external_tool(
                    "identify",
                    format!("unparseable output '{}' for {}", out.trim(), file),
                )),
            }
        }
        InspectorBackend::File => {
            let out = run_capture("file", &[&file], dir)
                .map_err(|e| LengthError::external_tool("file", e.to_string()))?;
            let caps = FILE_DIMENSIONS.captures(&out).ok_or_else(|| {
                LengthError::external_tool(
                    "file",
                    format!("no dimensions in output '{}' for {}", out.trim(), file),
                )
            })?;
            let w: f64 = caps[1].parse().unwrap_or(0.0);
            let h: f64 = caps[2].parse().unwrap_or(0.0);
            Ok((w, h))
        }
    }
}

/// Removes EPS-conversion byproducts created during the figure pass, also
/// when the pass fails.
struct EpsByproductGuard {
    dir: PathBuf,
    preexisting: HashSet<PathBuf>,
}

impl EpsByproductGuard {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            preexisting: list_byproducts(dir),
        }
    }
}

impl Drop for EpsByproductGuard {
    fn drop(&mut self) {
        for path in list_byproducts(&self.dir) {
            if !self.preexisting.contains(&path) {
                let _ = fs::remove_file(&path);
            }
        }
    }
}

fn list_byproducts(dir: &Path) -> HashSet<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return HashSet::new();
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(EPS_BYPRODUCT_SUFFIX))
        })
        .collect()
}
