use crate::error::CliError;
use crate::util::{generic_intra_pred, generic_mc, PlaceholderKernels};
use argh::FromArgs;
use std::fmt::Display;
use std::io::{self, BufWriter, Write};
use tracing::info;
use vp9dsp_dispatch::{
    init_dsp, Capabilities, CellChange, CpuFlags, DspTable, IntraIndex, KernelTier, McIndex,
};

#[derive(FromArgs, Debug)]
/// Show which kernels a capability set selects
#[argh(subcommand, name = "dump")]
pub struct DumpCmd {
    /// extension flags (comma-separated, e.g. rvv-i32,zba) [default: none]
    #[argh(option, from_str_fn(crate::util::parse_cli_flags))]
    pub flags: Option<CpuFlags>,

    /// vector register width in bits [default: 0]
    #[argh(option, from_str_fn(crate::util::parse_cli_vlen))]
    pub vlen: Option<u32>,

    /// native register width in bits [default: target width]
    #[argh(option, from_str_fn(crate::util::parse_cli_xlen))]
    pub xlen: Option<u32>,

    /// bits per sample of the stream
    #[argh(option, default = "8")]
    pub bpp: u32,

    /// request bit-exact output
    #[argh(switch)]
    pub bitexact: bool,

    /// start from the detected capabilities instead of none
    #[argh(switch)]
    pub detect: bool,

    /// only keep these flags after applying the others
    #[argh(option, from_str_fn(crate::util::parse_cli_flags))]
    pub mask: Option<CpuFlags>,

    /// list every cell, including generic defaults
    #[argh(switch)]
    pub all: bool,
}

impl DumpCmd {
    fn capabilities(&self) -> Capabilities {
        let mut caps = if self.detect {
            Capabilities::detect()
        } else {
            Capabilities::none()
        };
        if let Some(flags) = self.flags {
            caps = caps.with_flags(flags);
        }
        if let Some(vlen) = self.vlen {
            caps = caps.with_vlen(vlen);
        }
        if let Some(xlen) = self.xlen {
            caps = caps.with_xlen(xlen);
        }
        if let Some(mask) = self.mask {
            caps = caps.masked(mask);
        }
        caps
    }
}

pub fn handle_dump_command(cmd: DumpCmd) -> Result<(), CliError> {
    let caps = cmd.capabilities();
    info!(%caps, bpp = cmd.bpp, "dumping kernel selection");

    let baseline = DspTable::new(|_| generic_mc(), |_| generic_intra_pred());
    let mut table = baseline.clone();
    init_dsp(&mut table, cmd.bpp, cmd.bitexact, &caps, &PlaceholderKernels);

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "# {caps} bpp={} bitexact={}", cmd.bpp, cmd.bitexact)?;
    if cmd.all {
        write_all_cells(&mut out, &table)?;
    } else {
        write_changes(&mut out, &table, &baseline)?;
    }
    write_summary(&mut out, &table)?;
    out.flush()?;
    Ok(())
}

fn kernel_name<K: Display>(kernel: Option<K>) -> String {
    kernel.map_or_else(|| "generic".to_owned(), |k| k.to_string())
}

fn write_all_cells(out: &mut impl Write, table: &DspTable) -> io::Result<()> {
    for idx in McIndex::all() {
        writeln!(out, "{idx} = {}", kernel_name(table.mc(idx).kernel))?;
    }
    for idx in IntraIndex::all() {
        writeln!(out, "{idx} = {}", kernel_name(table.intra_pred(idx).kernel))?;
    }
    Ok(())
}

fn write_changes(out: &mut impl Write, table: &DspTable, baseline: &DspTable) -> io::Result<()> {
    for change in table.changes_from(baseline) {
        match change {
            CellChange::Mc { index, after, .. } => {
                writeln!(out, "{index} = {}", kernel_name(after))?
            }
            CellChange::IntraPred { index, after, .. } => {
                writeln!(out, "{index} = {}", kernel_name(after))?
            }
        }
    }
    Ok(())
}

const TIERS: [KernelTier; 4] = [
    KernelTier::Generic,
    KernelTier::Scalar,
    KernelTier::Vector128,
    KernelTier::Vector256,
];

fn write_summary(out: &mut impl Write, table: &DspTable) -> io::Result<()> {
    let mc: Vec<_> = McIndex::all().map(|idx| table.mc(idx).tier()).collect();
    let intra: Vec<_> = IntraIndex::all()
        .map(|idx| table.intra_pred(idx).tier())
        .collect();

    for (name, tiers) in [("mc", &mc), ("intra_pred", &intra)] {
        write!(out, "# {name}:")?;
        for tier in TIERS {
            let count = tiers.iter().filter(|t| **t == tier).count();
            write!(out, " {tier}={count}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
