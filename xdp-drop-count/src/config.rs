//! Build-time configuration handed to the load step.

use aya::programs::XdpFlags;

/// Verdict an XDP program returns for a frame, with the kernel ABI codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum XdpAction {
    Aborted = 0,
    Drop = 1,
    Pass = 2,
    Tx = 3,
    Redirect = 4,
}

impl XdpAction {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// How the kernel program is specialised before it is verified.
///
/// The context type is not a field: the program is looked up as an XDP
/// program, so anything built for another hook fails to load.
#[derive(Copy, Clone, Debug)]
pub struct DropConfig {
    /// Returned for every frame after it has been counted
    pub action: XdpAction,
    /// Attach mode; empty lets the kernel pick driver or generic mode
    pub flags: XdpFlags,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            action: XdpAction::Drop,
            flags: XdpFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_codes_match_kernel_abi() {
        assert_eq!(XdpAction::Aborted.code(), 0);
        assert_eq!(XdpAction::Drop.code(), 1);
        assert_eq!(XdpAction::Pass.code(), 2);
        assert_eq!(XdpAction::Tx.code(), 3);
        assert_eq!(XdpAction::Redirect.code(), 4);
    }

    #[test]
    fn default_drops_everything() {
        let config = DropConfig::default();
        assert_eq!(config.action, XdpAction::Drop);
        assert!(config.flags.is_empty());
    }
}
