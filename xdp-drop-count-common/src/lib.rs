#![no_std]

//! Names and header layouts shared by the kernel program and the loader.

/// XDP entry point inside the object file.
pub const PROGRAM_NAME: &str = "bouncer";

/// Per-CPU array of drop counters, indexed by IP protocol number.
pub const DROP_COUNT_MAP: &str = "DROPCNT";

/// Read-only global holding the verdict the program returns for every frame.
pub const RETURN_CODE_SYMBOL: &str = "RETURN_CODE";

/// One counter slot per possible IP protocol number.
pub const MAX_PROTOCOLS: u32 = 256;

/// Stacked VLAN tags walked before giving up on the frame.
pub const MAX_VLAN_DEPTH: usize = 2;

pub const ETH_P_IP: u16 = 0x0800;
pub const ETH_P_IPV6: u16 = 0x86DD;
pub const ETH_P_8021Q: u16 = 0x8100;
pub const ETH_P_8021AD: u16 = 0x88A8;

/// 802.1Q / 802.1ad tag following the Ethernet addresses.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct VlanHdr {
    /// Priority, drop eligibility and VLAN id (network byte order)
    pub tci: u16,
    /// Ethertype of the payload behind this tag (network byte order)
    pub encapsulated_proto: u16,
}

impl VlanHdr {
    pub const LEN: usize = core::mem::size_of::<VlanHdr>();
}

/// Whether a host-order ethertype announces a VLAN tag.
#[inline(always)]
pub fn is_vlan(ether_type: u16) -> bool {
    ether_type == ETH_P_8021Q || ether_type == ETH_P_8021AD
}
