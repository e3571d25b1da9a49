// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::io;
use std::time::Duration;

use ark::{client, print_version, BuildInfo, Client, Config, RemoteStatusGetter};
use clap::Parser;
use log::debug;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(about = "Print the ark version")]
pub struct Command {
    #[arg(
        long = "client-only",
        help = "Only print the client version, without contacting the server",
        default_value = "false"
    )]
    client_only: bool,
    #[arg(long, value_name = "SECONDS", help = "How long to wait for the server [default: 5]")]
    timeout: Option<u64>,
}

pub fn handle(command: Command, config: Config) -> Result<(), Error> {
    let build = BuildInfo::current();
    if let Some(time) = build.build_time() {
        debug!("built at {}", time.to_rfc3339());
    }

    let timeout = command
        .timeout
        .map(Duration::from_secs)
        .or(config.timeout())
        .unwrap_or(client::DEFAULT_TIMEOUT);

    // Client-only reports never touch the server
    let server = if command.client_only { None } else { config.server };
    let client = Client::new(server, timeout)?;

    print_version(
        &mut io::stdout().lock(),
        &build,
        command.client_only,
        &client,
        &RemoteStatusGetter,
    );

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("client")]
    Client(#[from] client::Error),
}
