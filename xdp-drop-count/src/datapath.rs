//! Kernel side of the tool:
//! - loading the object with its drop configuration
//! - attaching/detaching the XDP program
//! - reading the per-protocol drop counters

use aya::{
    maps::{MapData, PerCpuArray},
    programs::{xdp::XdpLinkId, Xdp, XdpFlags},
    Ebpf, EbpfLoader,
};
use aya_log::EbpfLogger;
use log::{debug, info};
use xdp_drop_count_common::{DROP_COUNT_MAP, PROGRAM_NAME, RETURN_CODE_SYMBOL};

use crate::{
    config::DropConfig,
    error::Error,
    tally::{sum_per_cpu, DropTally},
};

/// What the runner needs from a loaded program.
pub trait Datapath {
    fn attach(&mut self, iface: &str) -> Result<(), Error>;

    /// Undo a successful [`Datapath::attach`]. A no-op when nothing is attached.
    fn detach(&mut self, iface: &str) -> Result<(), Error>;

    fn drop_counts(&self) -> Result<DropTally, Error>;
}

/// The `bouncer` program loaded through aya. Dropping it unloads the program
/// and releases its maps.
pub struct AyaDatapath {
    ebpf: Ebpf,
    counters: PerCpuArray<MapData, u64>,
    flags: XdpFlags,
    link: Option<XdpLinkId>,
}

impl AyaDatapath {
    /// Specialise `object` with `config`, load it and verify the XDP program.
    pub fn load(object: &[u8], config: &DropConfig) -> Result<Self, Error> {
        let return_code = config.action.code();
        let mut ebpf = EbpfLoader::new()
            .set_global(RETURN_CODE_SYMBOL, &return_code, true)
            .load(object)?;

        if let Err(e) = EbpfLogger::init(&mut ebpf) {
            debug!("eBPF logger not initialised: {}", e);
        }

        let counters = ebpf
            .take_map(DROP_COUNT_MAP)
            .ok_or(Error::MapNotFound(DROP_COUNT_MAP))?;
        let counters = PerCpuArray::try_from(counters).map_err(Error::CounterMap)?;

        let program: &mut Xdp = ebpf
            .program_mut(PROGRAM_NAME)
            .ok_or(Error::ProgramNotFound(PROGRAM_NAME))?
            .try_into()
            .map_err(Error::ProgramType)?;
        program.load().map_err(Error::ProgramLoad)?;

        debug!("loaded {} with verdict {:?}", PROGRAM_NAME, config.action);

        Ok(Self {
            ebpf,
            counters,
            flags: config.flags,
            link: None,
        })
    }

    fn program(&mut self) -> Result<&mut Xdp, Error> {
        let program: &mut Xdp = self
            .ebpf
            .program_mut(PROGRAM_NAME)
            .ok_or(Error::ProgramNotFound(PROGRAM_NAME))?
            .try_into()
            .map_err(Error::ProgramType)?;
        Ok(program)
    }
}

impl Datapath for AyaDatapath {
    fn attach(&mut self, iface: &str) -> Result<(), Error> {
        let flags = self.flags;
        let link = self
            .program()?
            .attach(iface, flags)
            .map_err(|source| Error::Attach {
                iface: iface.to_owned(),
                source,
            })?;
        self.link = Some(link);
        info!("attached {} to {}", PROGRAM_NAME, iface);
        Ok(())
    }

    fn detach(&mut self, iface: &str) -> Result<(), Error> {
        let Some(link) = self.link.take() else {
            return Ok(());
        };
        self.program()?
            .detach(link)
            .map_err(|source| Error::Detach {
                iface: iface.to_owned(),
                source,
            })?;
        info!("detached {} from {}", PROGRAM_NAME, iface);
        Ok(())
    }

    fn drop_counts(&self) -> Result<DropTally, Error> {
        let slots = self.counters.len();
        let mut entries = Vec::with_capacity(slots as usize);
        for protocol in 0..slots {
            let per_cpu = self
                .counters
                .get(&protocol, 0)
                .map_err(Error::ReadCounters)?;
            entries.push((protocol, sum_per_cpu(&per_cpu)));
        }
        Ok(DropTally::new(entries))
    }
}

/// Lift the locked-memory limit; kernels before 5.11 charge maps against it.
pub fn raise_memlock_rlimit() {
    let rlim = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
    if ret != 0 {
        debug!("remove limit on locked memory failed, ret is: {}", ret);
    }
}
