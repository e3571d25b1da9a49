// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Build metadata identifying the exact source revision and release
//! version of the running binary.
//!
//! Values are stamped at compile time by `build.rs` and never change for
//! the lifetime of the process.

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, Utc};

mod commit;
mod values;

/// Number of leading characters of the commit hash shown to users
const SHORT_SHA_LEN: usize = 8;

/// State of the git working tree at build time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr)]
pub enum TreeState {
    #[strum(serialize = "clean")]
    Clean,
    #[strum(serialize = "dirty")]
    Dirty,
    /// Not built from git, or the state couldn't be determined
    #[default]
    #[strum(serialize = "")]
    Unknown,
}

impl TreeState {
    /// Parses a tree state, treating anything unrecognised as [`TreeState::Unknown`]
    pub fn parse(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// Version and commit metadata of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    version: Cow<'static, str>,
    git_sha: Cow<'static, str>,
    git_tree_state: TreeState,
    build_time: Option<DateTime<Utc>>,
}

impl BuildInfo {
    /// Returns the metadata compiled into this binary
    ///
    /// A stamped commit hash that isn't a plain hex hash is dropped along
    /// with the tree state.
    pub fn current() -> Self {
        let (git_sha, git_tree_state) = if commit::is_commit_hash(values::GIT_SHA) {
            (values::GIT_SHA, TreeState::parse(values::GIT_TREE_STATE))
        } else {
            ("", TreeState::Unknown)
        };

        Self {
            version: Cow::Borrowed(values::VERSION),
            git_sha: Cow::Borrowed(git_sha),
            git_tree_state,
            build_time: values::BUILD_TIME
                .parse::<i64>()
                .ok()
                .and_then(|time| DateTime::from_timestamp(time, 0)),
        }
    }

    /// Build metadata from explicit values, without a build time
    pub fn new(
        version: impl Into<Cow<'static, str>>,
        git_sha: impl Into<Cow<'static, str>>,
        git_tree_state: TreeState,
    ) -> Self {
        Self {
            version: version.into(),
            git_sha: git_sha.into(),
            git_tree_state,
            build_time: None,
        }
    }

    /// Release version, such as "v0.3.1"
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Full commit hash, empty for builds from a non-git source
    pub fn git_sha(&self) -> &str {
        &self.git_sha
    }

    pub fn git_tree_state(&self) -> TreeState {
        self.git_tree_state
    }

    /// Build time, honouring SOURCE_DATE_EPOCH when it was set during the build
    pub fn build_time(&self) -> Option<DateTime<Utc>> {
        self.build_time
    }

    /// Returns the first 8 characters of the commit hash, suffixed with
    /// `-dirty` if the tree was modified at build time
    ///
    /// This will look like "4ecad5d7-dirty". Empty when there is no hash.
    pub fn formatted_git_sha(&self) -> String {
        if self.git_sha.is_empty() {
            return String::new();
        }

        let short = match self.git_sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((end, _)) => &self.git_sha[..end],
            None => &self.git_sha,
        };

        match self.git_tree_state {
            TreeState::Dirty => format!("{short}-dirty"),
            TreeState::Clean | TreeState::Unknown => short.to_owned(),
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}
