// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=DEPTH_TRACKER_VERSION");

    // Packaging scripts can pin the version explicitly
    let version = std::env::var("DEPTH_TRACKER_VERSION").unwrap_or_else(|_| git_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `git describe` output without the leading `v`, or the package version
/// when building outside a checkout.
fn git_version() -> String {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty", "--match", "v*"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string());

    match described {
        Some(version) if !version.is_empty() => {
            version.strip_prefix('v').unwrap_or(&version).to_string()
        }
        _ => env!("CARGO_PKG_VERSION").to_string(),
    }
}
