// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

pub(crate) const VERSION: &str = env!("BUILDINFO_VERSION");

pub(crate) const BUILD_TIME: &str = env!("BUILDINFO_BUILD_TIME");

pub(crate) const GIT_SHA: &str = env!("BUILDINFO_GIT_SHA");

pub(crate) const GIT_TREE_STATE: &str = env!("BUILDINFO_GIT_TREE_STATE");
