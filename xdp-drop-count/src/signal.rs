use std::{fmt, io};

use tokio::signal::unix::{signal, Signal, SignalKind};

/// Which signal ended the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    Interrupt,
    Terminate,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Interrupt => f.write_str("SIGINT"),
            Termination::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// SIGINT and SIGTERM handlers, registered up front so a signal that lands
/// during setup is still seen by [`Shutdown::recv`].
pub struct Shutdown {
    interrupt: Signal,
    terminate: Signal,
}

impl Shutdown {
    /// Must be called from inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    pub async fn recv(mut self) -> io::Result<Termination> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Ok(Termination::Interrupt),
            Some(()) = self.terminate.recv() => Ok(Termination::Terminate),
            else => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "signal streams closed",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sigterm_ends_the_wait() {
        let shutdown = Shutdown::install().unwrap();
        assert_eq!(unsafe { libc::raise(libc::SIGTERM) }, 0);
        assert_eq!(shutdown.recv().await.unwrap(), Termination::Terminate);
    }

    #[test]
    fn names() {
        assert_eq!(Termination::Interrupt.to_string(), "SIGINT");
        assert_eq!(Termination::Terminate.to_string(), "SIGTERM");
    }
}
