//! Processor capabilities consumed by the kernel selectors.
//!
//! [`Capabilities`] is an immutable value describing what the running processor supports: the
//! RISC-V extension flags, the vector register width and the native register width. Probe it
//! once at startup with [`Capabilities::detect`] (or build it explicitly) and pass it into
//! [`init_dsp`](crate::init_dsp) for every decoding context.

use crate::error::CapabilityParseError;
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

bitflags! {
    /// RISC-V extension flags reported by the capability probe.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CpuFlags: u32 {
        /// Base integer ISA.
        const RVI = 1 << 0;
        /// Single-precision floating point.
        const RVF = 1 << 1;
        /// Double-precision floating point.
        const RVD = 1 << 2;
        /// Vector extension with 32-bit integer lanes (Zve32x).
        const RVV_I32 = 1 << 3;
        /// Vector extension with 32-bit float lanes (Zve32f).
        const RVV_F32 = 1 << 4;
        /// Vector extension with 64-bit integer lanes (Zve64x).
        const RVV_I64 = 1 << 5;
        /// Vector extension with 64-bit float lanes (Zve64d).
        const RVV_F64 = 1 << 6;
        /// Basic bit manipulation (Zbb).
        const RVB_BASIC = 1 << 7;
        /// Address generation (Zba).
        const RVB_ADDR = 1 << 8;
        /// Vector basic bit manipulation (Zvbb).
        const RV_ZVBB = 1 << 9;
        /// Misaligned scalar loads and stores are fast.
        const RV_MISALIGNED = 1 << 10;
        /// Full bit manipulation (Zba, Zbb and Zbs).
        const RVB = 1 << 11;
    }
}

/// Accepted flag names, including aliases, in display order.
const FLAG_NAMES: [(&str, CpuFlags); 16] = [
    ("rvi", CpuFlags::RVI),
    ("rvf", CpuFlags::RVF),
    ("rvd", CpuFlags::RVD),
    ("rvv-i32", CpuFlags::RVV_I32),
    ("rvv-f32", CpuFlags::RVV_F32),
    ("rvv-i64", CpuFlags::RVV_I64),
    ("rvv-f64", CpuFlags::RVV_F64),
    ("zbb", CpuFlags::RVB_BASIC),
    ("zba", CpuFlags::RVB_ADDR),
    ("zvbb", CpuFlags::RV_ZVBB),
    ("misaligned", CpuFlags::RV_MISALIGNED),
    ("rvb", CpuFlags::RVB),
    // Aliases
    ("zve32x", CpuFlags::RVV_I32),
    ("zve32f", CpuFlags::RVV_F32),
    ("zve64x", CpuFlags::RVV_I64),
    ("zve64d", CpuFlags::RVV_F64),
];

/// Number of canonical (non-alias) entries at the start of [`FLAG_NAMES`].
const CANONICAL_FLAG_NAMES: usize = 12;

impl CpuFlags {
    /// Parses a comma-separated list of flag names.
    ///
    /// Names are case-insensitive and surrounding whitespace is ignored. An empty string and
    /// the name `none` both yield no flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use vp9dsp_dispatch::CpuFlags;
    ///
    /// let flags = CpuFlags::parse_list("rvi, zba, rvv-i32").unwrap();
    /// assert_eq!(flags, CpuFlags::RVI | CpuFlags::RVB_ADDR | CpuFlags::RVV_I32);
    /// ```
    pub fn parse_list(list: &str) -> Result<Self, CapabilityParseError> {
        let mut flags = Self::empty();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("none") {
                continue;
            }

            let (_, flag) = FLAG_NAMES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(name))
                .ok_or_else(|| CapabilityParseError::UnknownFlag(name.into()))?;
            flags |= *flag;
        }
        Ok(flags)
    }

    /// Returns a value that displays the set flags as a comma-separated list of names.
    #[inline]
    pub fn names(self) -> FlagNames {
        FlagNames(self)
    }
}

impl FromStr for CpuFlags {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_list(s)
    }
}

/// Displays [`CpuFlags`] as `name,name,...`, or `none` when empty.
#[derive(Debug, Clone, Copy)]
pub struct FlagNames(CpuFlags);

impl fmt::Display for FlagNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, flag) in &FLAG_NAMES[..CANONICAL_FLAG_NAMES] {
            if !self.0.contains(*flag) {
                continue;
            }
            if !first {
                f.write_str(",")?;
            }
            f.write_str(name)?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Capability set of the running processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    flags: CpuFlags,
    vlen: u32,
    xlen: u32,
}

impl Capabilities {
    /// Register width of the target this crate was compiled for.
    pub const NATIVE_XLEN: u32 = usize::BITS;

    /// Creates a capability set.
    ///
    /// # Parameters
    ///
    /// - `flags`: detected extension flags
    /// - `vlen`: vector register width in bits, 0 when there is no vector unit
    /// - `xlen`: native integer register width in bits
    #[inline]
    pub const fn new(flags: CpuFlags, vlen: u32, xlen: u32) -> Self {
        Self { flags, vlen, xlen }
    }

    /// A capability set with no extensions and no vector unit.
    #[inline]
    pub const fn none() -> Self {
        Self::new(CpuFlags::empty(), 0, Self::NATIVE_XLEN)
    }

    /// Returns a copy with `flags` replacing the flag set.
    #[inline]
    pub const fn with_flags(self, flags: CpuFlags) -> Self {
        Self { flags, ..self }
    }

    /// Returns a copy with `vlen` replacing the vector width.
    #[inline]
    pub const fn with_vlen(self, vlen: u32) -> Self {
        Self { vlen, ..self }
    }

    /// Returns a copy with `xlen` replacing the register width.
    #[inline]
    pub const fn with_xlen(self, xlen: u32) -> Self {
        Self { xlen, ..self }
    }

    /// Returns a copy with every flag outside `mask` cleared.
    ///
    /// Used to force lower selection tiers, e.g. when comparing kernels against each other.
    #[inline]
    pub const fn masked(self, mask: CpuFlags) -> Self {
        Self {
            flags: self.flags.intersection(mask),
            ..self
        }
    }

    /// The extension flags.
    #[inline]
    pub const fn flags(&self) -> CpuFlags {
        self.flags
    }

    /// Vector register width in bits.
    #[inline]
    pub const fn vlen(&self) -> u32 {
        self.vlen
    }

    /// Native integer register width in bits.
    #[inline]
    pub const fn xlen(&self) -> u32 {
        self.xlen
    }

    /// Whether every flag in `flags` is present.
    #[inline]
    pub const fn has(&self, flags: CpuFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Whether the vector registers are at least `bits` wide.
    #[inline]
    pub const fn vlen_least(&self, bits: u32) -> bool {
        self.vlen >= bits
    }

    /// Capabilities guaranteed by the target features this crate was compiled with.
    pub fn compile_time_detect() -> Self {
        let mut flags = CpuFlags::empty();

        if cfg!(any(target_arch = "riscv32", target_arch = "riscv64")) {
            flags |= CpuFlags::RVI;
        }
        if cfg!(target_feature = "f") {
            flags |= CpuFlags::RVF;
        }
        if cfg!(target_feature = "d") {
            flags |= CpuFlags::RVD;
        }
        if cfg!(any(target_feature = "zve32x", target_feature = "v")) {
            flags |= CpuFlags::RVV_I32;
        }
        if cfg!(any(target_feature = "zve32f", target_feature = "v")) {
            flags |= CpuFlags::RVV_F32;
        }
        if cfg!(any(target_feature = "zve64x", target_feature = "v")) {
            flags |= CpuFlags::RVV_I64;
        }
        if cfg!(any(target_feature = "zve64d", target_feature = "v")) {
            flags |= CpuFlags::RVV_F64;
        }
        if cfg!(target_feature = "zbb") {
            flags |= CpuFlags::RVB_BASIC;
        }
        if cfg!(target_feature = "zba") {
            flags |= CpuFlags::RVB_ADDR;
        }
        if cfg!(all(
            target_feature = "zba",
            target_feature = "zbb",
            target_feature = "zbs"
        )) {
            flags |= CpuFlags::RVB;
        }
        if cfg!(target_feature = "zvbb") {
            flags |= CpuFlags::RV_ZVBB;
        }
        if cfg!(target_feature = "unaligned-scalar-mem") {
            flags |= CpuFlags::RV_MISALIGNED;
        }

        Self::new(flags, compile_time_vlen(), Self::NATIVE_XLEN)
    }

    /// Capabilities of the running processor.
    ///
    /// Uses runtime detection where the build supports it (RISC-V targets with the `nightly`
    /// and `std` features, without `no-runtime-cpu-detection`) and the compile-time target
    /// features otherwise.
    pub fn detect() -> Self {
        #[cfg(all(
            feature = "nightly",
            feature = "std",
            not(feature = "no-runtime-cpu-detection"),
            any(target_arch = "riscv32", target_arch = "riscv64")
        ))]
        {
            Self::run_time_detect()
        }

        #[cfg(not(all(
            feature = "nightly",
            feature = "std",
            not(feature = "no-runtime-cpu-detection"),
            any(target_arch = "riscv32", target_arch = "riscv64")
        )))]
        {
            Self::compile_time_detect()
        }
    }

    /// Runtime-detected capabilities, merged with the compile-time guarantees.
    ///
    /// The vector width cannot be queried without reading the `vlenb` CSR, so it is taken from
    /// the compile-time minimum, raised to 128 bits when the full V extension is present.
    #[cfg(all(
        feature = "nightly",
        feature = "std",
        not(feature = "no-runtime-cpu-detection"),
        any(target_arch = "riscv32", target_arch = "riscv64")
    ))]
    pub fn run_time_detect() -> Self {
        use std::arch::is_riscv_feature_detected;

        let base = Self::compile_time_detect();
        let mut flags = base.flags | CpuFlags::RVI;

        if is_riscv_feature_detected!("f") {
            flags |= CpuFlags::RVF;
        }
        if is_riscv_feature_detected!("d") {
            flags |= CpuFlags::RVD;
        }
        if is_riscv_feature_detected!("zba") {
            flags |= CpuFlags::RVB_ADDR;
        }
        if is_riscv_feature_detected!("zbb") {
            flags |= CpuFlags::RVB_BASIC;
        }
        if is_riscv_feature_detected!("zba")
            && is_riscv_feature_detected!("zbb")
            && is_riscv_feature_detected!("zbs")
        {
            flags |= CpuFlags::RVB;
        }

        let mut vlen = base.vlen;
        if is_riscv_feature_detected!("v") {
            flags |= CpuFlags::RVV_I32 | CpuFlags::RVV_F32 | CpuFlags::RVV_I64 | CpuFlags::RVV_F64;
            vlen = vlen.max(128);
        }

        Self::new(flags, vlen, base.xlen)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flags={} vlen={} xlen={}",
            self.flags.names(),
            self.vlen,
            self.xlen
        )
    }
}

/// Minimum vector width promised by the compile-time target features.
fn compile_time_vlen() -> u32 {
    if cfg!(target_feature = "zvl256b") {
        256
    } else if cfg!(any(target_feature = "zvl128b", target_feature = "v")) {
        128
    } else if cfg!(target_feature = "zvl64b") {
        64
    } else if cfg!(target_feature = "zvl32b") {
        32
    } else {
        0
    }
}

/// Parses a vector register width in bits.
///
/// Accepts 0 (no vector unit) or a power of two of at least 32.
pub fn parse_vlen(text: &str) -> Result<u32, CapabilityParseError> {
    let vlen = parse_u32("vlen", text)?;
    if vlen != 0 && (vlen < 32 || !vlen.is_power_of_two()) {
        return Err(CapabilityParseError::InvalidVectorLength(vlen));
    }
    Ok(vlen)
}

/// Parses a native register width in bits (32, 64 or 128).
pub fn parse_xlen(text: &str) -> Result<u32, CapabilityParseError> {
    let xlen = parse_u32("xlen", text)?;
    match xlen {
        32 | 64 | 128 => Ok(xlen),
        _ => Err(CapabilityParseError::InvalidRegisterWidth(xlen)),
    }
}

fn parse_u32(field: &'static str, text: &str) -> Result<u32, CapabilityParseError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| CapabilityParseError::InvalidNumber {
            field,
            value: text.into(),
        })
}
