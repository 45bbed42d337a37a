use std::{io, path::PathBuf};

use aya::{maps::MapError, programs::ProgramError, EbpfError};

/// Everything that can end a run early. The `Display` strings are the
/// diagnostics the binary prints on stderr.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("open {}: {source}", .path.display())]
    ReadObject {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load xdp prog: {0}")]
    Load(#[from] EbpfError),

    #[error("Failed to load xdp prog: program `{0}` not found in object")]
    ProgramNotFound(&'static str),

    #[error("Failed to load xdp prog: {0}")]
    ProgramType(#[source] ProgramError),

    #[error("Failed to load xdp prog: {0}")]
    ProgramLoad(#[source] ProgramError),

    #[error("Failed to load xdp prog: map `{0}` not found in object")]
    MapNotFound(&'static str),

    #[error("Failed to load xdp prog: {0}")]
    CounterMap(#[source] MapError),

    #[error("Failed to attach xdp prog: {source}")]
    Attach {
        iface: String,
        #[source]
        source: ProgramError,
    },

    #[error("Failed to remove XDP from {iface}: {source}")]
    Detach {
        iface: String,
        #[source]
        source: ProgramError,
    },

    #[error("Failed to read drop counters: {0}")]
    ReadCounters(#[source] MapError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_object_names_the_file() {
        let err = Error::ReadObject {
            path: PathBuf::from("xdp_drop_count.o"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "open xdp_drop_count.o: no such file or directory"
        );
    }

    #[test]
    fn attach_and_detach_messages() {
        let attach = Error::Attach {
            iface: "eth9".into(),
            source: ProgramError::NotLoaded,
        };
        assert!(attach.to_string().starts_with("Failed to attach xdp prog: "));

        let detach = Error::Detach {
            iface: "eth9".into(),
            source: ProgramError::NotAttached,
        };
        assert!(detach
            .to_string()
            .starts_with("Failed to remove XDP from eth9: "));
    }

    #[test]
    fn missing_program_is_a_load_failure() {
        let err = Error::ProgramNotFound("bouncer");
        assert_eq!(
            err.to_string(),
            "Failed to load xdp prog: program `bouncer` not found in object"
        );
    }
}
