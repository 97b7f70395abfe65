//! Embeds build identification for the startup log line
//!
//! `GIT_HASH` is `git describe --always --dirty`. `BUILD_TIMESTAMP` honours
//! `SOURCE_DATE_EPOCH` so packaged builds are reproducible.

use chrono::{DateTime, SecondsFormat, Utc};
use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    set_env("GIT_HASH", &git_describe().unwrap_or_else(|| UNKNOWN.to_string()));
    set_env(
        "BUILD_TIMESTAMP",
        &build_time().to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    set_env(
        "BUILD_PROFILE",
        &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );
}

fn set_env(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// None outside a git checkout or without git installed
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    (!described.is_empty()).then(|| described.to_string())
}

fn build_time() -> DateTime<Utc> {
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|seconds| seconds.parse::<i64>().ok())
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(Utc::now)
}
