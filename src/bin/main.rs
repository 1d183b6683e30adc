use clap::{ArgAction, Parser};
use plate_core::bridge::respond;
use plate_core::logging::{init_logging, LogConfig, LogFormat};
use plate_core::persistence::{open_registry, save_snapshot};
use plate_core::{PlateConfig, PlateController};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Line-protocol bridge between a plate form UI and the plate engine.
///
/// Reads `EDIT <FIELD> <text>`, `SUBMIT`, `RESET`, `TICK` and `EXIT` on stdin
/// and answers with one line per UI effect on stdout.
#[derive(Parser, Debug)]
#[command(name = "plate_bridge", version)]
struct Cli {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Vehicle registry (`.json` records or a snapshot). Overrides the config.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Write a registry snapshot here on EXIT.
    #[arg(long)]
    save_snapshot: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    /// Log to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Include plate values in logs.
    #[arg(long)]
    log_data: bool,
}

fn main() -> plate_core::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    init_logging(&log_config)?;

    let config = match &cli.config {
        Some(path) => PlateConfig::load(path)?,
        None => PlateConfig::default(),
    };
    let registry_path = cli.registry.as_deref().or(config.registry_path.as_deref());
    let registry = open_registry(registry_path)?;
    let mut controller = PlateController::new(&config, registry);
    info!(policy = ?config.policy, table = ?config.letter_table, "plate bridge starting");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let reply = respond(&mut controller, &line?, Instant::now());
        for out in &reply.lines {
            writeln!(stdout, "{out}")?;
        }
        stdout.flush()?;
        if reply.exit {
            info!("received EXIT");
            if let Some(path) = &cli.save_snapshot {
                if let Err(e) = save_snapshot(controller.directory(), path) {
                    error!(error = %e, "failed to save registry snapshot");
                }
            }
            break;
        }
    }

    info!("plate bridge shutting down");
    Ok(())
}
