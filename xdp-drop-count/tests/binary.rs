//! The binary's own exit paths, none of which reach the kernel.

use std::process::{Command, Output};

use tempfile::TempDir;
use xdp_drop_count::{BANNER, OBJECT_FILE};

const BIN: &str = env!("CARGO_BIN_EXE_xdp-drop-count");

/// Run the binary with `args` from an empty directory.
fn run_in_empty_dir(args: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    Command::new(BIN)
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn assert_usage(args: &[&str]) {
    let output = run_in_empty_dir(args);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "args {args:?}");
    assert!(stdout.starts_with("Usage: "), "args {args:?}: {stdout}");
    assert!(stdout.contains(" <ifdev>\ne.g.: "), "args {args:?}: {stdout}");
    assert!(stdout.ends_with(" eth0\n"), "args {args:?}: {stdout}");
    assert!(!stdout.contains(BANNER));
}

#[test]
fn no_arguments_prints_usage() {
    assert_usage(&[]);
}

#[test]
fn two_arguments_print_usage() {
    assert_usage(&["eth0", "eth1"]);
    assert_usage(&["--", "eth0"]);
}

#[test]
fn three_arguments_print_usage() {
    assert_usage(&["eth0", "eth1", "lo"]);
}

#[test]
fn missing_object_exits_before_the_banner() {
    let output = run_in_empty_dir(&["eth0"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout.contains(BANNER), "stdout: {stdout}");
    assert!(
        stderr.starts_with(&format!("open {OBJECT_FILE}: ")),
        "stderr: {stderr}"
    );
}

#[test]
fn dash_interface_name_is_not_a_usage_error() {
    // One argument, whatever it looks like, goes on to the object read.
    let output = run_in_empty_dir(&["-x"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout.contains("Usage: "), "stdout: {stdout}");
    assert!(stderr.starts_with(&format!("open {OBJECT_FILE}: ")));
}
