//! xtask - build helper
//!
//! - `cargo xtask build-ebpf` - compile the kernel program into `xdp_drop_count.o`
//! - `cargo xtask build` - kernel program plus the user-space binary
//! - `cargo xtask run <ifdev>` - build both and run (needs root)

use std::{fs, process::Command};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

const EBPF_CRATE: &str = "xdp-drop-count-ebpf";
const EBPF_BIN: &str = "xdp-drop-count";
const OBJECT_FILE: &str = "xdp_drop_count.o";

#[derive(Parser)]
#[command(author, version, about = "xdp-drop-count build helper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the kernel program and copy it next to the workspace root
    BuildEbpf {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Compile everything (kernel program + user space)
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Compile and run under sudo
    Run {
        /// Build in release mode
        #[arg(long)]
        release: bool,
        /// Network interface to drop packets on
        ifdev: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildEbpf { release } => build_ebpf(release),
        Commands::Build { release } => {
            build_ebpf(release)?;
            build_userspace(release)
        }
        Commands::Run { release, ifdev } => {
            build_ebpf(release)?;
            build_userspace(release)?;
            run(release, &ifdev)
        }
    }
}

fn profile(release: bool) -> &'static str {
    if release {
        "release"
    } else {
        "debug"
    }
}

fn build_ebpf(release: bool) -> Result<()> {
    println!("🔨 building kernel program...");

    let mut cmd = Command::new("cargo");
    cmd.current_dir(EBPF_CRATE)
        .env("CARGO_CFG_BPF_TARGET_ARCH", std::env::consts::ARCH)
        .args([
            "+nightly",
            "build",
            "--target=bpfel-unknown-none",
            "-Z",
            "build-std=core",
        ]);

    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().context("failed to run cargo build")?;
    if !status.success() {
        bail!("kernel program build failed");
    }

    let artifact = format!(
        "{EBPF_CRATE}/target/bpfel-unknown-none/{}/{EBPF_BIN}",
        profile(release)
    );
    fs::copy(&artifact, OBJECT_FILE)
        .with_context(|| format!("failed to copy {artifact} to {OBJECT_FILE}"))?;

    println!("✅ kernel program written to {OBJECT_FILE}");
    Ok(())
}

fn build_userspace(release: bool) -> Result<()> {
    println!("🔨 building user space...");

    let mut cmd = Command::new("cargo");
    cmd.args(["build", "-p", "xdp-drop-count"]);

    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().context("failed to run cargo build")?;
    if !status.success() {
        bail!("user-space build failed");
    }

    println!("✅ user space built");
    Ok(())
}

fn run(release: bool, ifdev: &str) -> Result<()> {
    let binary = format!("target/{}/xdp-drop-count", profile(release));

    // The binary reads the object from its working directory, the workspace root.
    let status = Command::new("sudo")
        .env("RUST_LOG", "info")
        .args(["--preserve-env=RUST_LOG", binary.as_str(), ifdev])
        .status()
        .context("failed to start xdp-drop-count")?;

    if !status.success() {
        bail!("xdp-drop-count exited with {status}");
    }

    Ok(())
}
