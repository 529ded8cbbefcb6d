use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use rasterlab_cli::config::{load_config, CliConfig};
use rasterlab_cli::Interpreter;

#[derive(Parser, Debug)]
#[command(name = "rasterlab")]
#[command(version, about = "Region-of-interest editor for netpbm images", long_about = None)]
struct Cli {
    /// Command file to run; commands are read from stdin when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// YAML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    init_logging(cli.verbose, &config);

    let mut interpreter = Interpreter::new(config);
    let mut stdout = io::stdout().lock();
    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            log::info!("Running script {}", path.display());
            interpreter.run(BufReader::new(file), &mut stdout)?;
        }
        None => interpreter.run(io::stdin().lock(), &mut stdout)?,
    }
    Ok(())
}

/// `-v` flags win over the config file; `RUST_LOG` wins over both.
fn init_logging(verbose: u8, config: &CliConfig) {
    let level = match verbose {
        0 => config.level_filter().unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let (Some(name), None) = (&config.log_level, config.level_filter()) {
        log::warn!("Ignoring unknown log level {name:?} in config");
    }
}
