//! retouch: Command shell for editing raster images.
//!
//! Reads editing commands line by line (from a script file or stdin)
//! and applies them to one image with bounded undo/redo history and
//! previewed blur, brightness, and contrast adjustments.
//!
//! # Usage
//!
//! ```text
//! retouch [OPTIONS] [IMAGE]
//! echo -e "grayscale\nsave out.png" | retouch photo.jpg
//! retouch photo.jpg --script edits.txt --strict
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod command;
mod logging;
mod shell;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use retouch_core::{EditController, EditorConfig};

use crate::shell::Shell;

/// Edit a raster image with undo/redo and live adjustments.
///
/// Type `help` in the shell for the list of commands.
#[derive(Parser)]
#[command(name = "retouch", version)]
struct Cli {
    /// Image to open on start (PNG, JPEG, BMP, WebP).
    image: Option<PathBuf>,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop at the first failing command and exit non-zero.
    #[arg(long)]
    strict: bool,

    /// Number of history snapshots to keep.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_history: Option<usize>,

    /// Editor config as a JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Editor config as a JSON string. Takes precedence over `--config`.
    #[arg(long)]
    config_json: Option<String>,

    /// Log debug events.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

/// Build an [`EditorConfig`] from CLI arguments.
///
/// Sources are applied in order: defaults, `--config`, `--config-json`,
/// then `--max-history`. A JSON source replaces the whole config, with
/// fields it omits taking their defaults.
fn config_from_cli(cli: &Cli) -> Result<EditorConfig, String> {
    let mut config = EditorConfig::default();

    if let Some(ref path) = cli.config {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        config = serde_json::from_str(&text)
            .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    }

    if let Some(ref json) = cli.config_json {
        config = serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?;
    }

    if let Some(max_history) = cli.max_history {
        config.max_history = max_history;
    }

    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(
        if cli.log_json {
            logging::Format::Json
        } else {
            logging::Format::Text
        },
        cli.verbose,
    );

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let controller = match EditController::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut shell = Shell::new(controller);

    if let Some(ref path) = cli.image {
        match shell.open(path) {
            Ok(snapshot) => eprintln!("Opened {} ({})", path.display(), snapshot.dimensions()),
            Err(e) => {
                eprintln!("Error opening {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let mut out = std::io::stdout().lock();
    let result = match cli.script {
        Some(ref path) => match File::open(path) {
            Ok(file) => shell.run(BufReader::new(file), &mut out, cli.strict),
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => shell.run(std::io::stdin().lock(), &mut out, cli.strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
