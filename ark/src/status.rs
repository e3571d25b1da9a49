// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Queries a backup server for its status over HTTP.

use log::debug;
use reqwest::blocking::Response;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::client::Client;
use crate::version::{ServerStatus, ServerStatusGetter};

const STATUS_PATH: &str = "status";

/// Fetches `<server>/status` once per query, without retrying
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteStatusGetter;

/// Wire form of the status endpoint's response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    #[serde(default)]
    server_version: Option<String>,
}

impl From<StatusBody> for Option<ServerStatus> {
    fn from(response: StatusBody) -> Self {
        response
            .server_version
            .filter(|version| !version.is_empty())
            .map(ServerStatus::new)
    }
}

/// Resolve the status endpoint relative to the server's base url
fn status_url(server: &Url) -> Result<Url, Error> {
    let mut base = server.clone();

    // Keep any path prefix the server is mounted under
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(STATUS_PATH).map_err(|_| Error::Url(server.clone()))
}

/// Timeouts can hit while connecting or while reading the body
fn request_error(client: &Client, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout(client.timeout().as_secs_f64())
    } else {
        Error::Request(error)
    }
}

fn decode(body: &str) -> Result<Option<ServerStatus>, Error> {
    let response: StatusBody = serde_json::from_str(body)?;
    Ok(response.into())
}

impl ServerStatusGetter for RemoteStatusGetter {
    type Client = Client;
    type Error = Error;

    fn server_status(&self, client: &Client) -> Result<Option<ServerStatus>, Error> {
        let server = client.server().ok_or(Error::Unconfigured)?;
        let url = status_url(server)?;

        debug!("requesting server status from {url}");

        let response = client
            .http()
            .get(url)
            .send()
            .map_err(|error| request_error(client, error))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("server has no status to report");
            return Ok(None);
        }

        let body = response
            .error_for_status()
            .and_then(Response::text)
            .map_err(|error| request_error(client, error))?;

        decode(&body)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no server configured")]
    Unconfigured,
    #[error("invalid server url {0}")]
    Url(Url),
    #[error("timed out after {0}s waiting for server")]
    Timeout(f64),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed status: {0}")]
    Decode(#[from] serde_json::Error),
}
