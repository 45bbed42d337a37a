//! Drop every packet on one interface with XDP and count the drops by IP
//! protocol number.
//!
//! - [`datapath`] loads the kernel program and talks to its counter map
//! - [`runner`] attaches, waits for SIGINT/SIGTERM, reports and detaches
//! - [`tally`] formats the per-protocol report

pub mod cli;
pub mod config;
pub mod datapath;
pub mod error;
pub mod runner;
pub mod signal;
pub mod tally;

pub use config::{DropConfig, XdpAction};
pub use datapath::{AyaDatapath, Datapath};
pub use error::Error;
pub use runner::{Runner, Stage, BANNER};
pub use signal::{Shutdown, Termination};
pub use tally::DropTally;

/// Kernel program object, read from the working directory.
pub const OBJECT_FILE: &str = "xdp_drop_count.o";
