//! Embeds a human-readable build description for `--version`.
//!
//! The string is `{CARGO_PKG_VERSION} ({git}) {rustc --version}` where `{git}`
//! is `git describe --tags --always --dirty`, or a
//! `v{version}-{commit timestamp}-{short sha}` pseudo-version when the
//! repository has no tags. Components that cannot be determined are left out.

use std::{env, process::Command};

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    for path in ["src", "build.rs", "Cargo.toml", "Cargo.lock"] {
        println!("cargo:rerun-if-changed={path}");
    }

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_version() -> Option<String> {
    let described = run("git", &["describe", "--tags", "--always", "--dirty"])?;
    if described.contains('v') || described.contains("-g") {
        return Some(described);
    }

    // Untagged repository: describe only gave us a hash.
    let sha = run("git", &["rev-parse", "--short=12", "HEAD"])?;
    let committed = run("git", &["log", "-1", "--format=%ct"])
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);
    let dirty = if described.ends_with("-dirty") { "+dirty" } else { "" };

    Some(format!(
        "v{}-{}-{sha}{dirty}",
        env!("CARGO_PKG_VERSION"),
        committed.format(TIMESTAMP_FORMAT)
    ))
}

fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_version().map(|v| format!("({v})")),
        run(&env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string()), &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
