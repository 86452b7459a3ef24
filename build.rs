//! Build script for bypass-alerter - embeds version information.
//!
//! `BUILD_INFO_HUMAN` is `{CARGO_PKG_VERSION} ({git}) {rustc}` where `{git}`
//! is `git describe --tags --always --dirty` when a tag is reachable, or a
//! pseudo-version `v{CARGO_PKG_VERSION}-{timestamp}-{commit}[+dirty]`
//! otherwise. Clean builds stamp the commit time so the same commit always
//! produces the same string; dirty builds stamp the build time.

use std::{env, process::Command};

use chrono::{DateTime, Utc};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let components = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_version().map(|v| format!("({v})")),
        command_stdout("rustc", &["--version"]),
    ];
    let build_info = components.into_iter().flatten().collect::<Vec<_>>().join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={build_info}");
}

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git(args: &[&str]) -> Option<String> {
    command_stdout("git", args)
}

/// None when git is unavailable or this is not a checkout.
fn is_dirty() -> Option<bool> {
    // `cargo install --git` drops .cargo-ok into the checkout.
    git(&["status", "--porcelain"])
        .map(|output| output.lines().any(|line| line.get(3..) != Some(".cargo-ok")))
        .or_else(|| git(&["rev-parse", "HEAD"]).map(|_| false))
}

fn git_version() -> Option<String> {
    match git(&["describe", "--tags", "--always", "--dirty"]) {
        Some(desc) if desc.contains('v') || desc.contains("-g") => Some(desc),
        _ => Some(pseudo_version()),
    }
}

fn pseudo_version() -> String {
    let commit = git(&["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let dirty = is_dirty();

    let stamp = match dirty {
        Some(false) => git(&["log", "-1", "--format=%ct"])
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(Utc::now),
        _ => Utc::now(),
    }
    .format(STAMP_FORMAT);

    let suffix = if dirty == Some(true) { "+dirty" } else { "" };
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    format!("v{version}-{stamp}-{commit}{suffix}")
}
