use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use simontui::{
    app::App,
    config::{DEFAULT_FLASH, DEFAULT_STEP_DELAY, Variant},
    matcher::MatchPolicy,
};
use tracing::info;

/// Watch the buttons flash, then repeat the sequence.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Rule set: a (one fixed round), b (growing, unscored), c (growing, scored), d (fixed, scored).
    #[arg(long, default_value = "c")]
    variant: Variant,

    /// Seed for a reproducible sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between two flashes.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Milliseconds a button stays lit.
    #[arg(long)]
    flash_ms: Option<u64>,

    /// Report a wrong press immediately instead of after the full sequence.
    #[arg(long)]
    early_abort: bool,

    /// Where to write logs. Defaults to simontui.log next to the executable.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.clone())?;

    let mut config = cli.variant.config();
    config.step_delay = cli
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_STEP_DELAY);
    config.flash = cli
        .flash_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_FLASH.min(config.step_delay / 2));
    if cli.early_abort {
        config.matching = MatchPolicy::FirstError;
    }

    info!(variant = ?cli.variant, seed = ?cli.seed, "starting");
    let app = App::new(config, cli.seed)?;

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// The terminal belongs to the game, so logs go to a file.
fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => {
            let exe_path = std::env::current_exe()?;
            let exe_dir = match exe_path.parent() {
                Some(dir) => dir.to_path_buf(),
                None => bail!("Cannot determine executable directory"),
            };
            exe_dir.join("simontui.log")
        }
    };

    match File::create(&path) {
        Ok(file) => {
            if let Err(err) = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
            {
                eprintln!("logging disabled, cannot install subscriber: {err}");
            }
        }
        // run without a subscriber
        Err(err) => eprintln!("logging disabled, cannot create {}: {err}", path.display()),
    }

    Ok(())
}
