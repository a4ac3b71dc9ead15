use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use parceltrack::cli::{self, output, Cli};
use parceltrack::config::Config;
use parceltrack::db;
use parceltrack::error::Result;

/// Config file consulted when `--config` is not given.
const DEFAULT_CONFIG: &str = "parceltrack.toml";

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG),
        None => Ok(Config::default()),
    }
}

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("parceltrack starting");

    let pool = match db::create_pool(&config.database.path.to_string_lossy()) {
        Ok(pool) => pool,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(command) => cli::commands::dispatch(command, &pool),
        None => cli::menu::run(&pool),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }

    info!("parceltrack stopped");
}
