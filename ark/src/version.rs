// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Client and server version report.
//!
//! The client section always comes from the local [`BuildInfo`]. The server
//! section is obtained through a [`ServerStatusGetter`], queried once per
//! report and never cached.

use std::fmt::{self, Write};
use std::io;

use ark_buildinfo::BuildInfo;
use log::{debug, warn};

/// Shown when a getter error can't be displayed
const UNKNOWN_ERROR: &str = "unknown error";

/// Status reported by a backup server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStatus {
    pub server_version: String,
}

impl ServerStatus {
    pub fn new(server_version: impl ToString) -> Self {
        Self {
            server_version: server_version.to_string(),
        }
    }
}

/// Obtains the [`ServerStatus`] of the server behind `client`
///
/// How the status is produced (timeouts, retries, transport) is entirely
/// up to the implementer.
pub trait ServerStatusGetter {
    /// Backend handle, passed through untouched
    type Client: ?Sized;
    type Error: fmt::Display;

    /// Returns `Ok(None)` when the server doesn't know its version
    fn server_status(&self, client: &Self::Client) -> Result<Option<ServerStatus>, Self::Error>;
}

impl<T: ServerStatusGetter + ?Sized> ServerStatusGetter for &T {
    type Client = T::Client;
    type Error = T::Error;

    fn server_status(&self, client: &Self::Client) -> Result<Option<ServerStatus>, Self::Error> {
        (**self).server_status(client)
    }
}

/// Compose the version report
///
/// The getter is only consulted when `client_only` is false, and then
/// exactly once. Its errors are rendered into the report.
pub fn render<G>(build: &BuildInfo, client_only: bool, client: &G::Client, getter: &G) -> String
where
    G: ServerStatusGetter + ?Sized,
{
    let mut report = String::new();

    // Writing to a String can't fail
    let _ = write_report(&mut report, build, client_only, client, getter);

    report
}

fn write_report<G>(
    w: &mut impl Write,
    build: &BuildInfo,
    client_only: bool,
    client: &G::Client,
    getter: &G,
) -> fmt::Result
where
    G: ServerStatusGetter + ?Sized,
{
    writeln!(w, "Client:")?;
    writeln!(w, "\tVersion: {}", build.version())?;
    writeln!(w, "\tGit commit: {}", build.formatted_git_sha())?;

    if client_only {
        return Ok(());
    }

    match getter.server_status(client) {
        Ok(Some(status)) if !status.server_version.is_empty() => {
            writeln!(w, "Server:")?;
            writeln!(w, "\tVersion: {}", status.server_version)?;
        }
        Ok(_) => debug!("server returned no version, omitting server section"),
        Err(error) => {
            // Rendered up front so a failing Display can't cut the line short
            let mut message = String::new();
            if write!(message, "{error}").is_err() {
                message = UNKNOWN_ERROR.to_owned();
            }
            debug!("server status query failed: {message}");
            writeln!(w, "<error getting server version: {message}>")?;
        }
    }

    Ok(())
}

/// Print the version report to `out`
///
/// Never fails: server errors are part of the report, and a broken `out`
/// is only logged.
pub fn print_version<G>(out: &mut impl io::Write, build: &BuildInfo, client_only: bool, client: &G::Client, getter: &G)
where
    G: ServerStatusGetter + ?Sized,
{
    let report = render(build, client_only, client, getter);

    if let Err(error) = out.write_all(report.as_bytes()).and_then(|()| out.flush()) {
        warn!("failed to write version report: {error}");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use ark_buildinfo::TreeState;

    use super::*;

    /// Opaque backend handle, identified by name
    #[derive(Debug, PartialEq, Eq)]
    struct Backend(&'static str);

    /// Replays a canned response and records every client it was called with
    struct Recorder {
        response: Result<Option<ServerStatus>, String>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl Recorder {
        fn new(response: Result<Option<ServerStatus>, String>) -> Self {
            Self {
                response,
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl ServerStatusGetter for Recorder {
        type Client = Backend;
        type Error = String;

        fn server_status(&self, client: &Backend) -> Result<Option<ServerStatus>, String> {
            self.calls.borrow_mut().push(client.0);
            self.response.clone()
        }
    }

    fn build() -> BuildInfo {
        BuildInfo::new("v1.0.0", "somegitsha", TreeState::Dirty)
    }

    const CLIENT_SECTION: &str = "Client:\n\tVersion: v1.0.0\n\tGit commit: somegits-dirty\n";

    fn print(client_only: bool, getter: &Recorder) -> String {
        let mut out = vec![];
        print_version(&mut out, &build(), client_only, &Backend("primary"), getter);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn client_only_skips_server() {
        let getter = Recorder::new(Ok(Some(ServerStatus::new("v1.0.1"))));

        assert_eq!(print(true, &getter), CLIENT_SECTION);
        assert!(getter.calls().is_empty());
    }

    #[test]
    fn getter_error() {
        let getter = Recorder::new(Err("an error".to_owned()));

        assert_eq!(
            print(false, &getter),
            format!("{CLIENT_SECTION}<error getting server version: an error>\n")
        );
        assert_eq!(getter.calls(), vec!["primary"]);
    }

    #[test]
    fn getter_returns_normally() {
        let getter = Recorder::new(Ok(Some(ServerStatus::new("v1.0.1"))));

        assert_eq!(
            print(false, &getter),
            format!("{CLIENT_SECTION}Server:\n\tVersion: v1.0.1\n")
        );
        assert_eq!(getter.calls(), vec!["primary"]);
    }

    #[test]
    fn missing_status_omits_server() {
        let getter = Recorder::new(Ok(None));
        assert_eq!(print(false, &getter), CLIENT_SECTION);
        assert_eq!(getter.calls().len(), 1);

        let getter = Recorder::new(Ok(Some(ServerStatus::default())));
        assert_eq!(print(false, &getter), CLIENT_SECTION);
        assert_eq!(getter.calls().len(), 1);
    }

    #[test]
    fn repeated_reports_are_identical() {
        let getter = Recorder::new(Ok(Some(ServerStatus::new("v1.0.1"))));

        let first = print(false, &getter);
        let second = print(false, &getter);

        assert_eq!(first, second);
        assert_eq!(getter.calls(), vec!["primary", "primary"]);
    }

    #[test]
    fn render_through_reference() {
        let getter = Recorder::new(Ok(Some(ServerStatus::new("v2.0.0"))));
        let by_ref = &getter;

        let report = render(&build(), false, &Backend("secondary"), &by_ref);

        assert!(report.ends_with("Server:\n\tVersion: v2.0.0\n"));
        assert_eq!(getter.calls(), vec!["secondary"]);
    }

    #[test]
    fn failing_error_display_keeps_line_whole() {
        struct Faulty;

        impl fmt::Display for Faulty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("partial")?;
                Err(fmt::Error)
            }
        }

        struct FaultyGetter;

        impl ServerStatusGetter for FaultyGetter {
            type Client = Backend;
            type Error = Faulty;

            fn server_status(&self, _: &Backend) -> Result<Option<ServerStatus>, Faulty> {
                Err(Faulty)
            }
        }

        assert_eq!(
            render(&build(), false, &Backend("primary"), &FaultyGetter),
            format!("{CLIENT_SECTION}<error getting server version: unknown error>\n")
        );
    }

    #[test]
    fn broken_output_is_absorbed() {
        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let getter = Recorder::new(Ok(None));
        print_version(&mut Broken, &build(), false, &Backend("primary"), &getter);
        assert_eq!(getter.calls().len(), 1);
    }
}
