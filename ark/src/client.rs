// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default time to wait for a server to answer
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a backup server
#[derive(Debug, Clone)]
pub struct Client {
    server: Option<Url>,
    timeout: Duration,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Create a client for `server`. Without a server, every query fails
    /// with [`Error::Unconfigured`](crate::status::Error::Unconfigured).
    pub fn new(server: Option<Url>, timeout: Duration) -> Result<Self, Error> {
        if let Some(url) = &server {
            if url.cannot_be_a_base() {
                return Err(Error::InvalidServer(url.clone()));
            }
        }

        let http = reqwest::blocking::ClientBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { server, timeout, http })
    }

    pub fn server(&self) -> Option<&Url> {
        self.server.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("server url {0} cannot be used as a base")]
    InvalidServer(Url),
    #[error("build http client")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_base_server() {
        let url = Url::parse("mailto:backup@example.com").unwrap();
        assert!(matches!(
            Client::new(Some(url), DEFAULT_TIMEOUT),
            Err(Error::InvalidServer(_))
        ));
    }

    #[test]
    fn keeps_settings() {
        let url = Url::parse("https://backup.example.com:8085/").unwrap();
        let client = Client::new(Some(url.clone()), Duration::from_secs(2)).unwrap();

        assert_eq!(client.server(), Some(&url));
        assert_eq!(client.timeout(), Duration::from_secs(2));

        let client = Client::new(None, DEFAULT_TIMEOUT).unwrap();
        assert!(client.server().is_none());
    }
}
