#![no_std]
#![no_main]

use aya_ebpf::{
    bindings::xdp_action,
    macros::{map, xdp},
    maps::PerCpuArray,
    programs::XdpContext,
};
use aya_log_ebpf::debug;
use core::ptr::{addr_of, read_unaligned, read_volatile};
use network_types::{
    eth::EthHdr,
    ip::{Ipv4Hdr, Ipv6Hdr},
};
use xdp_drop_count_common::{is_vlan, VlanHdr, ETH_P_IP, ETH_P_IPV6, MAX_PROTOCOLS, MAX_VLAN_DEPTH};

/// Drop counters indexed by IP protocol number, one slot set per CPU
#[map]
static DROPCNT: PerCpuArray<u64> = PerCpuArray::with_max_entries(MAX_PROTOCOLS, 0);

/// Verdict for every frame; the loader overwrites it before verification
#[no_mangle]
static RETURN_CODE: u32 = xdp_action::XDP_DROP;

/// Bounds-checked pointer into the frame at `offset`
#[inline(always)]
fn ptr_at<T>(ctx: &XdpContext, offset: usize) -> Result<*const T, ()> {
    let start = ctx.data();
    let end = ctx.data_end();
    let len = core::mem::size_of::<T>();

    if start + offset + len > end {
        return Err(());
    }
    Ok((start + offset) as *const T)
}

#[xdp]
pub fn bouncer(ctx: XdpContext) -> u32 {
    let verdict = unsafe { read_volatile(&RETURN_CODE) };

    match protocol_of(&ctx) {
        Ok(protocol) => {
            if let Some(count) = DROPCNT.get_ptr_mut(protocol) {
                unsafe { *count = (*count).wrapping_add(1) };
            }
        }
        Err(_) => debug!(&ctx, "truncated link-layer header, not counted"),
    }

    verdict
}

/// IP protocol number of the frame, 0 when it is not IP or the IP header is cut.
/// Fails only when the Ethernet header or a VLAN tag does not fit.
#[inline(always)]
fn protocol_of(ctx: &XdpContext) -> Result<u32, ()> {
    let eth: *const EthHdr = ptr_at(ctx, 0)?;
    let mut offset = EthHdr::LEN;
    let mut ether_type =
        u16::from_be(unsafe { read_unaligned(addr_of!((*eth).ether_type) as *const u16) });

    for _ in 0..MAX_VLAN_DEPTH {
        if !is_vlan(ether_type) {
            break;
        }
        let vlan: *const VlanHdr = ptr_at(ctx, offset)?;
        offset += VlanHdr::LEN;
        ether_type = u16::from_be(unsafe { read_unaligned(addr_of!((*vlan).encapsulated_proto)) });
    }

    // The protocol fields are read as raw bytes; IpProto does not cover every value.
    let protocol = match ether_type {
        ETH_P_IP => match ptr_at::<Ipv4Hdr>(ctx, offset) {
            Ok(ip) => unsafe { read_unaligned(addr_of!((*ip).proto) as *const u8) },
            Err(_) => 0,
        },
        ETH_P_IPV6 => match ptr_at::<Ipv6Hdr>(ctx, offset) {
            Ok(ip) => unsafe { read_unaligned(addr_of!((*ip).next_hdr) as *const u8) },
            Err(_) => 0,
        },
        _ => 0,
    };

    Ok(protocol as u32)
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
