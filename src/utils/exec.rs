//! External process invocation helpers.
//!
//! The detexer, the typesetting pipeline, and the image inspectors are all
//! driven through these blocking calls. A tool that cannot be spawned is
//! reported as unavailable; exit-status handling is up to the caller.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a command and capture its stdout as UTF-8 text.
///
/// Fails if the command cannot be spawned or exits with a non-zero status.
pub fn run_capture(program: &str, args: &[&str], dir: &Path) -> io::Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exited with {}", program, output.status),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command for its side effects, discarding all output.
///
/// Only spawn failures are errors: the typesetting passes routinely exit
/// non-zero (batch-mode recovery, bibtex without citations) while still
/// producing the artifacts the caller needs.
pub fn run_discard(program: &str, args: &[&str], dir: &Path) -> io::Result<()> {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    log::debug!("{} {:?} exited with {}", program, args, status);
    Ok(())
}
