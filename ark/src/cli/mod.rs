// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use ark::config::{self, Manager};
use clap::{Args, Parser};
use log::{debug, LevelFilter};
use thiserror::Error;
use url::Url;

mod version;

#[derive(Debug, Parser)]
#[command(name = "ark", about = "Backup and restore client")]
pub struct Command {
    #[command(flatten)]
    pub global: Global,
    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Args)]
pub struct Global {
    #[arg(
        short,
        long = "verbose",
        help = "Prints additional information about what ark is doing",
        default_value = "false",
        global = true
    )]
    pub verbose: bool,
    #[arg(long, global = true, help = "Directory to load client.yaml from")]
    pub config_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Base url of the backup server")]
    pub server: Option<Url>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Version(version::Command),
}

/// Process all CLI arguments
pub fn process() -> Result<(), Error> {
    let Command { global, subcommand } = Command::parse();

    init_logging(global.verbose);

    let manager = match &global.config_dir {
        Some(dir) => Manager::custom(dir),
        None => Manager::user()?,
    };
    debug!("loading config from {}", manager.dir().display());

    let mut config = manager.load();
    if let Some(server) = global.server {
        config.server = Some(server);
    }

    match subcommand {
        Subcommand::Version(command) => version::handle(command, config)?,
    }

    Ok(())
}

/// `RUST_LOG` takes precedence over `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("config")]
    Config(#[from] config::Error),
    #[error("version")]
    Version(#[from] version::Error),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Command::command().debug_assert();
    }

    #[test]
    fn parse_version_flags() {
        let command = Command::parse_from([
            "ark",
            "--server",
            "https://backup.example.com",
            "version",
            "--client-only",
        ]);

        assert_eq!(command.global.server.as_ref().map(Url::as_str), Some("https://backup.example.com/"));
        assert!(matches!(command.subcommand, Subcommand::Version(_)));
    }
}
