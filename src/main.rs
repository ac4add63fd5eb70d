// Rootline - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (before logging, so its level can apply)
// 3. Logging initialisation (debug mode support)
// 4. Running the import and writing the export

use clap::Parser;
use rootline::app::import_job;
use rootline::core::export::ExportFormat;
use rootline::core::import::ImportOptions;
use rootline::platform::config::{self, PlatformPaths};
use rootline::util::{self, error::RootlineError};
use std::path::PathBuf;

/// Rootline - GEDCOM family tree importer.
///
/// Reads a GEDCOM file, keeps the individuals within a generation window
/// around a home person, and writes the linked profiles as JSON or CSV.
#[derive(Parser, Debug)]
#[command(name = "rootline", version, about)]
struct Cli {
    /// GEDCOM file to import.
    path: PathBuf,

    /// Owning user id stamped on every imported record.
    #[arg(short = 'u', long = "owner", default_value = "local")]
    owner: String,

    /// Generation window around the home individual (overrides config).
    #[arg(short = 'g', long = "generations")]
    generations: Option<u32>,

    /// Cross-reference of the home individual (defaults to the first in the file).
    #[arg(long = "home")]
    home: Option<String>,

    /// Export format: json or csv (overrides config).
    #[arg(short = 'f', long = "format")]
    format: Option<ExportFormat>,

    /// Write the export here instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // An explicitly named config must load; the platform default is optional.
    let (app_config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match config::load_config_strict(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {}", RootlineError::from(e));
                std::process::exit(1);
            }
        },
        None => config::load_config(&PlatformPaths::resolve().config_file()),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Rootline starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "Import failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &config::AppConfig) -> Result<(), RootlineError> {
    let max_generations = match cli.generations {
        Some(g) if g > util::constants::ABSOLUTE_MAX_GENERATIONS => {
            tracing::warn!(
                requested = g,
                max = util::constants::ABSOLUTE_MAX_GENERATIONS,
                "Generation window clamped"
            );
            util::constants::ABSOLUTE_MAX_GENERATIONS
        }
        Some(g) => g,
        None => app_config.max_generations,
    };

    let options = ImportOptions {
        owner_id: cli.owner.clone(),
        max_generations,
        home_xref: cli.home.clone(),
        portrait_base_url: app_config.portrait_base_url.clone(),
    };

    let batch = import_job::run_import(&cli.path, &options, app_config.max_file_size)?;
    let format = cli.format.unwrap_or(app_config.export_format);
    import_job::write_export(&batch, format, cli.output.as_deref())?;

    eprintln!("{} profiles imported", batch.profiles.len());
    Ok(())
}
