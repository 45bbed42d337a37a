use std::ffi::OsString;

/// Name used in the usage text when argv[0] is unavailable.
const FALLBACK_NAME: &str = "xdp-drop-count";

/// Wrong argument count. Displays as the usage text.
#[derive(Debug, thiserror::Error)]
#[error("Usage: {program} <ifdev>\ne.g.: {program} eth0")]
pub struct UsageError {
    pub program: String,
}

/// The single positional argument: the network interface to attach to.
///
/// The argument is taken verbatim, so `--` or `-x` is an interface name and
/// `-- eth0` is two arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub iface: String,
}

impl Args {
    /// Parse the process arguments.
    pub fn from_env() -> Result<Self, UsageError> {
        Self::parse_from(std::env::args_os())
    }

    /// Parse `argv`, program name first.
    pub fn parse_from<I, T>(argv: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        match argv.as_slice() {
            [_, iface] => Ok(Self {
                iface: iface.to_string_lossy().into_owned(),
            }),
            _ => Err(UsageError {
                program: argv
                    .first()
                    .map_or_else(|| FALLBACK_NAME.to_owned(), |p| p.to_string_lossy().into_owned()),
            }),
        }
    }
}
