//! Texlen CLI - length estimation for LaTeX manuscripts

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::Path;
#[cfg(feature = "cli")]
use std::process::ExitCode;
#[cfg(feature = "cli")]
use texlen::{
    render_report, run_document, venues, DocumentReport, InspectorBackend, RunConfig, Strategy,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texlen")]
#[command(author = "SciPenAI")]
#[command(version)]
#[command(about = "Texlen - journal word-equivalent length estimation for LaTeX manuscripts", long_about = None)]
struct Cli {
    /// Manuscript file(s) to check
    #[arg(required_unless_present = "list_venues")]
    files: Vec<String>,

    /// Venue whose word limit the total is checked against
    #[arg(short = 'j', long, default_value = "PRL")]
    venue: String,

    /// Main-text counting strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Detex)]
    strategy: StrategyArg,

    /// Backend used to measure raster/EPS figures
    #[arg(long, value_enum, default_value_t = InspectorArg::Identify)]
    inspector: InspectorArg,

    /// Scale factor applied to the summed figure words
    #[arg(long, default_value_t = 1.1)]
    figure_scale: f64,

    /// Comma-separated environments stripped from the detexer's source view
    #[arg(short, long, value_name = "ENV,ENV,...")]
    exclude: Option<String>,

    /// Figure-path macro substitution, repeatable
    #[arg(short = 'v', long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,

    /// Typesetting executable for the typeset strategy
    #[arg(long, default_value = "latex")]
    latex_cmd: String,

    /// Write all reports as JSON to this path
    #[arg(long)]
    json_log: Option<String>,

    /// List known venues and their limits, then exit
    #[arg(long)]
    list_venues: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Count tokens in the detexer's plain-text output
    Detex,
    /// Derive the count from the typesetting pipeline's log
    Typeset,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum InspectorArg {
    /// ImageMagick identify
    Identify,
    /// POSIX file utility
    File,
}

#[cfg(feature = "cli")]
impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Detex => Strategy::Detex,
            StrategyArg::Typeset => Strategy::Typeset,
        }
    }
}

#[cfg(feature = "cli")]
impl From<InspectorArg> for InspectorBackend {
    fn from(arg: InspectorArg) -> Self {
        match arg {
            InspectorArg::Identify => InspectorBackend::Identify,
            InspectorArg::File => InspectorBackend::File,
        }
    }
}

#[cfg(feature = "cli")]
fn build_config(cli: &Cli) -> Result<RunConfig, texlen::LengthError> {
    let mut config = RunConfig {
        venue: cli.venue.clone(),
        strategy: cli.strategy.into(),
        inspector: cli.inspector.into(),
        figure_scale: cli.figure_scale,
        latex_cmd: cli.latex_cmd.clone(),
        ..RunConfig::default()
    };
    if let Some(excludes) = &cli.exclude {
        config.detex_excludes = excludes
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
    }
    config.with_substitutions(&cli.vars)
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_venues {
        for (venue, limit) in venues::venue_table() {
            println!("{:<14} {}", venue, limit);
        }
        return ExitCode::SUCCESS;
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Each manuscript is processed independently: a fatal error fails that
    // document and the run moves on to the next one.
    let mut reports: Vec<DocumentReport> = Vec::new();
    let mut failed = false;
    for file in &cli.files {
        match run_document(Path::new(file), &config) {
            Ok(report) => {
                print!("{}", render_report(&report));
                reports.push(report);
            }
            Err(err) => {
                eprintln!("error: {}: {}", file, err);
                failed = true;
            }
        }
    }

    if let Some(json_path) = &cli.json_log {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => {
                if let Err(err) = fs::write(json_path, json) {
                    eprintln!("error: cannot write {}: {}", json_path, err);
                    failed = true;
                }
            }
            Err(err) => {
                eprintln!("error: cannot serialize reports: {}", err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("texlen was built without the 'cli' feature");
}
