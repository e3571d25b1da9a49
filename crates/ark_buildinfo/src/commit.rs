// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Shared with `build.rs`, so this must stay dependency free.

/// Returns `true` if `s` is a single SHA-1 or SHA-256 commit hash in hex
pub(crate) fn is_commit_hash(s: &str) -> bool {
    matches!(s.len(), 40 | 64) && s.bytes().all(|b| b.is_ascii_hexdigit())
}
