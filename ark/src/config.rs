// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};
use std::time::Duration;

use fs_err as fs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const PROGRAM: &str = "ark";
const DOMAIN: &str = "client";
const EXTENSION: &str = "yaml";

/// Client settings, loaded from `{dir}/client.yaml` followed by
/// `{dir}/client.d/*.yaml` in lexical order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base url of the backup server
    pub server: Option<Url>,
    /// Seconds to wait for the server
    pub timeout: Option<u64>,
}

impl Config {
    /// Fields set in `other` take precedence
    pub fn merge(self, other: Self) -> Self {
        Self {
            server: other.server.or(self.server),
            timeout: other.timeout.or(self.timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Locates and loads [`Config`] files
#[derive(Debug, Clone)]
pub struct Manager {
    dir: PathBuf,
}

impl Manager {
    /// Config is loaded from $XDG_CONFIG_HOME/ark
    pub fn user() -> Result<Self, Error> {
        Ok(Self {
            dir: dirs::config_dir().ok_or(Error::NoConfigDir)?.join(PROGRAM),
        })
    }

    /// Config is loaded from `dir`
    pub fn custom(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and merge all config files. Missing files yield the default.
    pub fn load(&self) -> Config {
        self.paths()
            .into_iter()
            .filter_map(|path| read_config(&path))
            .fold(Config::default(), Config::merge)
    }

    fn paths(&self) -> Vec<PathBuf> {
        let file = self.dir.join(format!("{DOMAIN}.{EXTENSION}"));
        let mut paths = if file.exists() { vec![file] } else { vec![] };

        if let Ok(read_dir) = fs::read_dir(self.dir.join(format!("{DOMAIN}.d"))) {
            let mut drop_ins = read_dir
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION))
                .collect::<Vec<_>>();
            drop_ins.sort();
            paths.extend(drop_ins);
        }

        paths
    }
}

fn read_config(path: &Path) -> Option<Config> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            debug!("skipping config: {error}");
            return None;
        }
    };

    match serde_yaml::from_slice(&bytes) {
        Ok(config) => {
            debug!("loaded config {}", path.display());
            Some(config)
        }
        Err(error) => {
            warn!("ignoring malformed config {}: {error}", path.display());
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("$HOME or $XDG_CONFIG_HOME env not set")]
    NoConfigDir,
}
