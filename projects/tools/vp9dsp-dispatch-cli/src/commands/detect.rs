use crate::error::CliError;
use argh::FromArgs;
use std::io::{self, Write};
use vp9dsp_dispatch::{Capabilities, CpuFlags};

#[derive(FromArgs, Debug)]
/// Print the capabilities detected on this processor
#[argh(subcommand, name = "detect")]
pub struct DetectCmd {
    /// only keep these flags (comma-separated, e.g. misaligned,zba)
    #[argh(option, from_str_fn(crate::util::parse_cli_flags))]
    pub mask: Option<CpuFlags>,
}

pub fn handle_detect_command(cmd: DetectCmd) -> Result<(), CliError> {
    let mut caps = Capabilities::detect();
    if let Some(mask) = cmd.mask {
        caps = caps.masked(mask);
    }

    let source = if cfg!(all(
        feature = "nightly",
        any(target_arch = "riscv32", target_arch = "riscv64")
    )) {
        "runtime"
    } else {
        "compile-time"
    };

    let mut out = io::stdout().lock();
    write_capabilities(&mut out, &caps, source)?;
    Ok(())
}

fn write_capabilities(out: &mut impl Write, caps: &Capabilities, source: &str) -> io::Result<()> {
    writeln!(out, "flags:  {}", caps.flags().names())?;
    writeln!(out, "vlen:   {}", caps.vlen())?;
    writeln!(out, "xlen:   {}", caps.xlen())?;
    writeln!(out, "source: {source}")
}
