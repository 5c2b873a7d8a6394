//! Typeset-log-derived main-text counting.
//!
//! A rewritten copy of the manuscript is typeset with a counting macro file
//! that dumps every box to the log; each interword space then appears as one
//! glue line, and the word count is the number of matching lines. Temporary
//! artifacts use deterministic names in the manuscript's directory and are
//! removed unconditionally, also when a pipeline pass fails.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RunConfig;
use crate::core::document::Document;
use crate::core::regions::{
    acknowledgment_marker, bibliography_marker, end_matter_marker,
};
use crate::utils::error::{LengthError, LengthResult};
use crate::utils::exec::run_discard;

/// Counting macro file, compiled into the binary and written next to the
/// rewritten manuscript for the counting pass.
pub const COUNT_MACROS: &str = r"% texlen-wc.tex -- interword-glue counting harness.
% Typesets the file named by \WCinput with every box dumped to the log.
% Interword spaces take the spaceskip set below, so each one shows up in
% the log as a recognizable \glue line the driver can count.
\ifx\WCinput\undefined
  \errmessage{texlen-wc: \noexpand\WCinput must name the input file}
\fi
\showboxbreadth=\maxdimen
\showboxdepth=\maxdimen
\tracingonline=0
\tracingoutput=1
\hbadness=10000
\vbadness=10000
\hfuzz=\maxdimen
\vfuzz=\maxdimen
\spaceskip=3.33333pt plus 2.16667pt minus 1.11111pt
\xspaceskip=0pt
\pretolerance=10000
\tolerance=10000
\expandafter\input\WCinput
\end
";

/// Environments commented out of the rewritten copy, begin/end markers
/// included.
pub const COMMENTED_ENVS: &[&str] = &[
    "equation",
    "equation*",
    "eqnarray",
    "eqnarray*",
    "align",
    "align*",
    "displaymath",
    "acknowledgments",
    "acknowledgements",
    "abstract",
    "thebibliography",
];

const BODY_STEM: &str = "texlen-body";
const MACRO_STEM: &str = "texlen-wc";
const ARTIFACT_EXTS: &[&str] = &["tex", "aux", "log", "bbl", "blg", "dvi", "out", "toc"];
const BIBTEX_CMD: &str = "bibtex";

lazy_static! {
    // Ordinary interword glue, and the same glue with its stretch taken up
    // by a line break. One counted space each.
    static ref GLUE_INTERWORD: Regex =
        Regex::new(r"^\\glue 3\.33333 plus 2\.16667 minus 1\.11111").unwrap();
    static ref GLUE_LINEBREAK: Regex =
        Regex::new(r"^\\glue 3\.33333 minus 1\.11111").unwrap();
}

/// Produce the rewritten line sequence typeset for counting: title command
/// neutralized, footnote-suppressing class option injected, the document
/// truncated before the first back-matter trigger of each kind, and every
/// excluded environment commented out. Single forward pass over an
/// immutable input.
pub fn rewrite_for_count(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + 4);
    let mut commenting: Option<String> = None;
    let mut truncated_ack = false;
    let mut truncated_bib = false;
    let mut truncated_end = false;

    for line in lines {
        if !truncated_ack && acknowledgment_marker(line) {
            out.push("\\end{document}".to_string());
            truncated_ack = true;
        }
        if !truncated_bib && bibliography_marker(line) {
            out.push("\\end{document}".to_string());
            truncated_bib = true;
        }
        if !truncated_end && end_matter_marker(line) {
            out.push("\\end{document}".to_string());
            truncated_end = true;
        }

        if let Some(env) = commenting.clone() {
            out.push(format!("%{}", line));
            if line.contains(&format!("\\end{{{}}}", env)) {
                commenting = None;
            }
            continue;
        }

        if let Some(env) = COMMENTED_ENVS
            .iter()
            .find(|env| line.contains(&format!("\\begin{{{}}}", env)))
        {
            out.push(format!("%{}", line));
            if !line.contains(&format!("\\end{{{}}}", env)) {
                commenting = Some(env.to_string());
            }
            continue;
        }

        if line.contains("\\maketitle") {
            out.push(format!("%{}", line));
            continue;
        }

        if line.contains("\\documentclass") {
            out.push(inject_class_option(line, "nofootinbib"));
            continue;
        }

        out.push(line.clone());
    }

    out
}

fn inject_class_option(line: &str, option: &str) -> String {
    if let Some(replaced) = line
        .find("\\documentclass[")
        .map(|_| line.replacen("\\documentclass[", &format!("\\documentclass[{},", option), 1))
    {
        return replaced;
    }
    line.replacen("\\documentclass", &format!("\\documentclass[{}]", option), 1)
}

/// Count the glue lines of a counting-pass log.
pub fn count_glue_lines(log: &str) -> u32 {
    log.lines()
        .filter(|l| GLUE_INTERWORD.is_match(l) || GLUE_LINEBREAK.is_match(l))
        .count() as u32
}

/// Deterministically named artifacts, removed on drop regardless of how the
/// pipeline run ended.
struct TempArtifacts {
    dir: PathBuf,
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for stem in [BODY_STEM, MACRO_STEM] {
            for ext in ARTIFACT_EXTS {
                let _ = fs::remove_file(self.dir.join(format!("{}.{}", stem, ext)));
            }
        }
    }
}

/// Main-text word count via the typesetting pipeline: one typeset pass, a
/// bibliography pass, two further typeset passes, then the counting pass
/// against the embedded macro file.
pub fn typeset_words(doc: &Document, config: &RunConfig) -> LengthResult<u32> {
    let dir = doc.dir().to_path_buf();
    let _artifacts = TempArtifacts { dir: dir.clone() };

    let rewritten = rewrite_for_count(&doc.lines);
    fs::write(dir.join(format!("{}.tex", BODY_STEM)), rewritten.join("\n") + "\n")?;
    fs::write(dir.join(format!("{}.tex", MACRO_STEM)), COUNT_MACROS)?;

    let latex = config.latex_cmd.as_str();
    run_pass(latex, &["-interaction=batchmode", BODY_STEM], &dir)?;
    run_pass(BIBTEX_CMD, &[BODY_STEM], &dir)?;
    run_pass(latex, &["-interaction=batchmode", BODY_STEM], &dir)?;
    run_pass(latex, &["-interaction=batchmode", BODY_STEM], &dir)?;

    let count_arg = format!(
        "\\def\\WCinput{{{}.tex}}\\input{{{}.tex}}",
        BODY_STEM, MACRO_STEM
    );
    run_pass(latex, &["-interaction=batchmode", &count_arg], &dir)?;

    let log_path = dir.join(format!("{}.log", MACRO_STEM));
    let log = fs::read_to_string(&log_path).map_err(|_| {
        LengthError::external_tool(
            latex,
            format!("counting pass produced no log at {}", log_path.display()),
        )
    })?;

    Ok(count_glue_lines(&log))
}

fn run_pass(program: &str, args: &[&str], dir: &Path) -> LengthResult<()> {
    run_discard(program, args, dir)
        .map_err(|e| LengthError::external_tool(program, e.to_string()))
}
