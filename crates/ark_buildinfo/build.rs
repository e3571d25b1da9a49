// build.rs
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};

#[path = "src/commit.rs"]
mod commit;

type Error = Box<dyn std::error::Error>;

/// Returns value of given environment variable, if set.
///
/// This also outputs the `cargo:rerun-if-env-changed` tag so the build
/// script reruns when the variable changes.
fn env(key: &str) -> Option<String> {
    println!("cargo:rerun-if-env-changed={key}");
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// Runs `git` with the given arguments in `cwd` and returns its trimmed
/// standard output. Non-zero exit status is an error.
fn git(args: &[&str], cwd: &Path) -> Result<String, Error> {
    println!("cargo:rerun-if-env-changed=PATH");
    let out = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stderr(Stdio::inherit())
        .output()?;

    if out.status.success() {
        Ok(String::from_utf8(out.stdout)?.trim().to_owned())
    } else if let Some(code) = out.status.code() {
        Err(Box::from(format!("git: terminated with {code}")))
    } else {
        Err(Box::from("git: killed by signal"))
    }
}

/// Returns the commit hash and tree state of the checkout at `pkg_dir`
fn git_info(pkg_dir: &Path) -> Result<(String, &'static str), Error> {
    let git_dir = pkg_dir.join(git(&["rev-parse", "--git-dir"], pkg_dir)?);

    // Rerun when the checked out commit or the working tree changes
    for subpath in ["HEAD", "logs/HEAD", "index"] {
        if let Ok(path) = git_dir.join(subpath).canonicalize() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }

    let sha = git(&["rev-parse", "HEAD"], pkg_dir)?;
    if !commit::is_commit_hash(&sha) {
        return Err(Box::from(format!("git: Invalid output: {sha}")));
    }

    let state = if git(&["status", "--porcelain"], pkg_dir)?.is_empty() {
        "clean"
    } else {
        "dirty"
    };

    Ok((sha, state))
}

fn build_time() {
    // Propagate SOURCE_DATE_EPOCH if set
    let epoch = env("SOURCE_DATE_EPOCH")
        .and_then(|epoch| epoch.parse::<i64>().ok())
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0));

    let time = epoch.unwrap_or_else(Utc::now);
    println!("cargo:rustc-env=BUILDINFO_BUILD_TIME={}", time.timestamp());
}

fn main() -> Result<(), Error> {
    let pkg_dir =
        PathBuf::from(env("CARGO_MANIFEST_DIR").ok_or("Missing `CARGO_MANIFEST_DIR` environmental variable")?);

    // Packagers may stamp an explicit release version
    let version = match env("ARK_VERSION") {
        Some(version) if !version.is_empty() => version,
        _ => format!("v{}", env("CARGO_PKG_VERSION").unwrap_or_default()),
    };
    println!("cargo:rustc-env=BUILDINFO_VERSION={version}");

    build_time();

    // Both stay empty when we aren't building from a git checkout, e.g. a
    // release tarball
    let (sha, state) = match git_info(&pkg_dir) {
        Ok((sha, state)) => (sha, state),
        Err(msg) => {
            println!("cargo:warning=unable to determine git version (not in git repository?)");
            println!("cargo:warning={msg}");
            println!("cargo:rerun-if-changed={}/.git", pkg_dir.display());
            (String::new(), "")
        }
    };
    println!("cargo:rustc-env=BUILDINFO_GIT_SHA={sha}");
    println!("cargo:rustc-env=BUILDINFO_GIT_TREE_STATE={state}");

    Ok(())
}
