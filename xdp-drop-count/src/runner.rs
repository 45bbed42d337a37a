//! Lifecycle of one run: attach, announce, wait for the termination signal,
//! report the drop counters, detach.

use std::{fmt, future::Future, io, io::Write};

use log::{debug, info};

use crate::{datapath::Datapath, error::Error, signal::Termination, tally::DropTally};

/// Printed once the program is attached, right before the wait.
pub const BANNER: &str = "Dropping packets, hit CTRL+C to stop";

/// Each stage is entered at most once, in declaration order. A failed attach
/// goes straight to `Exited`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unloaded,
    Loaded,
    Attached,
    Running,
    Detaching,
    Exited,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn enter(stage: &mut Stage, next: Stage) {
    debug_assert!(next > *stage, "stage {} after {}", next, stage);
    debug!("{} -> {}", stage, next);
    *stage = next;
}

/// Drives a loaded [`Datapath`] through one attach/wait/report/detach cycle.
pub struct Runner<D> {
    datapath: D,
    iface: String,
    stage: Stage,
}

impl<D: Datapath> Runner<D> {
    /// `datapath` is already loaded, so the runner starts in `Loaded`.
    pub fn new(datapath: D, iface: impl Into<String>) -> Self {
        let mut stage = Stage::Unloaded;
        enter(&mut stage, Stage::Loaded);
        Self {
            datapath,
            iface: iface.into(),
            stage,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn into_inner(self) -> D {
        self.datapath
    }

    /// Attach, print the banner, wait for `shutdown`, then write the tally to
    /// `out`. The program is detached on every way out once attached, even if
    /// this future is dropped mid-wait; a detach failure is reported on
    /// stderr and does not fail the run.
    pub async fn run<S, W>(&mut self, shutdown: S, out: &mut W) -> Result<DropTally, Error>
    where
        S: Future<Output = io::Result<Termination>>,
        W: Write,
    {
        if let Err(e) = self.datapath.attach(&self.iface) {
            enter(&mut self.stage, Stage::Exited);
            return Err(e);
        }

        let attachment = Attachment {
            datapath: &mut self.datapath,
            iface: &self.iface,
        };
        enter(&mut self.stage, Stage::Attached);

        let outcome = serve(&attachment, &mut self.stage, shutdown, out).await;

        enter(&mut self.stage, Stage::Detaching);
        drop(attachment);
        enter(&mut self.stage, Stage::Exited);

        outcome
    }
}

async fn serve<D, S, W>(
    attachment: &Attachment<'_, D>,
    stage: &mut Stage,
    shutdown: S,
    out: &mut W,
) -> Result<DropTally, Error>
where
    D: Datapath,
    S: Future<Output = io::Result<Termination>>,
    W: Write,
{
    writeln!(out, "{BANNER}")?;
    out.flush()?;
    enter(stage, Stage::Running);

    let termination = shutdown.await?;
    info!("received {}, collecting drop counters", termination);

    let tally = attachment.datapath.drop_counts()?;
    tally.write_report(out)?;
    Ok(tally)
}

/// Scoped release of a successful attach.
struct Attachment<'a, D: Datapath> {
    datapath: &'a mut D,
    iface: &'a str,
}

impl<D: Datapath> Drop for Attachment<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.datapath.detach(self.iface) {
            eprintln!("{e}");
        }
    }
}
