use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> Option<String> {
    let output = cmd.output().ok()?;
    if output.status.success() {
        String::from_utf8(output.stdout).ok()
    } else {
        None
    }
}

fn main() {
    let git_commit_hash = exe_cmd(Command::new("git").args(["log", "-n", "1", "--pretty=format:%H"]))
        .map(|s| s[..8.min(s.len())].trim().to_string())
        .unwrap_or_default();

    println!(
        "cargo:rustc-env=BLOCKMODE_VERSION_INFO={}-{}",
        env!("CARGO_PKG_VERSION"),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );

    println!("cargo:rustc-env=BLOCKMODE_GIT_INFO={git_commit_hash}");
    println!("cargo:rerun-if-changed=build.rs");
}
