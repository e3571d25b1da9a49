// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

pub use ark_buildinfo::{BuildInfo, TreeState};

pub use self::client::Client;
pub use self::config::Config;
pub use self::status::RemoteStatusGetter;
pub use self::version::{print_version, ServerStatus, ServerStatusGetter};

pub mod client;
pub mod config;
pub mod status;
pub mod version;
