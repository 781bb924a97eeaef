#![deny(warnings)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gridtab::settings::Settings;
use gridtab::source::Workbook;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    name = "gridtab",
    version = env!("CARGO_PKG_VERSION"),
    about = "Render spreadsheet sheets as plain-text grid tables"
)]
struct Cli {
    /// Workbook (.xlsx, .xlsm) or workbook description (.json, .toml)
    file: PathBuf,

    /// Sheet to render (defaults to the configured sheet, then the first one)
    #[clap(short, long)]
    sheet: Option<String>,

    /// Write the table to this file instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print the workbook's sheet names and exit
    #[clap(long)]
    list_sheets: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("gridtab: ignoring settings: {e}");
            Settings::default()
        }
    };

    // Logs go to stderr so the table on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "render failed");
            eprintln!("gridtab: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_sheets {
        let workbook = Workbook::from_path(&cli.file)?;
        for name in workbook.sheet_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let table = gridtab::render_sheet(&cli.file, cli.sheet.as_deref(), settings)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &table)?;
            tracing::info!(path = %path.display(), bytes = table.len(), "wrote table");
        }
        None => print!("{table}"),
    }
    Ok(())
}
