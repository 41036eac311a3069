use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use zipclean::config::{Config, OutputMode};
use zipclean::pipeline::{process_file, ProcessOutcome};
use zipclean::{logging, prompt};

#[derive(Parser)]
#[command(name = "zipclean")]
#[command(about = "Strip ZIP+4 suffixes from a spreadsheet and pad rows for batch splitting")]
#[command(version)]
struct Cli {
    /// Spreadsheet to clean (.xlsx or .csv). Prompted for when omitted.
    path: Option<PathBuf>,

    /// Pad the row count up to a multiple of this many files
    #[arg(long)]
    file_count: Option<usize>,

    /// Overwrite the input instead of writing a `_cleaned` copy
    #[arg(long)]
    in_place: bool,

    /// Configuration file (defaults to ./zipclean.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never prompt; missing values fall back to their defaults. Prompts are
    /// also skipped when stdin is not a terminal.
    #[arg(long)]
    no_prompt: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.in_place {
        config.output.mode = OutputMode::InPlace;
    }
    let _log_guard = logging::init_logging(&config.logging)?;
    info!("startup");

    let interactive = !cli.no_prompt && io::stdin().is_terminal();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();

    let Some(path) = prompt::resolve_path(cli.path, interactive, &mut stdin, &mut stdout)? else {
        println!("No file selected.");
        return Ok(ExitCode::SUCCESS);
    };
    let file_count =
        prompt::resolve_file_count(cli.file_count, interactive, &mut stdin, &mut stdout)?;

    match process_file(&path, file_count, &config.output) {
        ProcessOutcome::Success(report) => {
            println!("✅ File processed successfully: {}", report.destination.display());
            println!("   ZIP column: {}", report.summary.zip_column);
            println!("   ZIP values changed: {}", report.summary.zips_changed);
            if report.summary.padding_rows > 0 {
                println!("   Padding rows added: {}", report.summary.padding_rows);
            }
            println!("   Total rows: {}", report.summary.total_rows);
            Ok(ExitCode::SUCCESS)
        }
        ProcessOutcome::Failure(failure) => {
            warn!(kind = ?failure.kind, "run failed");
            eprintln!("❌ An error occurred:\n{}", failure.message);
            Ok(ExitCode::FAILURE)
        }
    }
}
