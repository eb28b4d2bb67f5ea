#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(
    all(feature = "nightly", any(target_arch = "riscv32", target_arch = "riscv64")),
    feature(stdarch_riscv_feature_detection)
)]
#![warn(missing_docs)]

extern crate alloc;

pub mod cpu_detect;
pub mod error;
pub mod intra_pred;
pub mod mc;
pub mod table;

pub use cpu_detect::{parse_vlen, parse_xlen, Capabilities, CpuFlags, FlagNames};
pub use error::CapabilityParseError;
pub use intra_pred::init_intra_pred;
pub use mc::init_mc;
pub use table::index::{
    Accumulation, BlockSize, FilterKind, IntraIndex, IntraMode, McIndex, SubpelDir, TxSize,
};
pub use table::kernel::{
    IntraEntry, IntraKernelId, IntraPredFn, KernelIsa, KernelProvider, KernelTier, McEntry,
    McFn, McKernelId, VectorWidth,
};
pub use table::{CellChange, DspTable};

use tracing::debug;

/// Installs every kernel the processor can safely run into `dsp`.
///
/// Call once per decoding context, after the host has filled `dsp` with its generic routines.
/// Intra prediction is selected first, then motion compensation. The result depends only on the
/// arguments, so repeated calls with the same inputs produce identical tables.
///
/// # Parameters
///
/// - `dsp`: table to update in place
/// - `bpp`: bits per sample of the stream; only 8 selects any kernel
/// - `bitexact`: whether the decoder requested bit-exact output; every kernel installed here is
///   bit-exact, so this does not change the selection
/// - `caps`: capabilities of the running processor, usually from [`Capabilities::detect`]
/// - `kernels`: source of the optimized routines
///
/// # Examples
///
/// ```
/// use vp9dsp_dispatch::{init_dsp, Capabilities, DspTable};
/// # use vp9dsp_dispatch::{IntraKernelId, IntraPredFn, KernelProvider, McFn, McKernelId};
/// # unsafe extern "C" fn mc(_: *mut u8, _: isize, _: *const u8, _: isize, _: i32, _: i32, _: i32) {}
/// # unsafe extern "C" fn ipred(_: *mut u8, _: isize, _: *const u8, _: *const u8) {}
/// # struct Kernels;
/// # impl KernelProvider for Kernels {
/// #     fn mc(&self, _: McKernelId) -> McFn { mc }
/// #     fn intra_pred(&self, _: IntraKernelId) -> IntraPredFn { ipred }
/// # }
///
/// let mut dsp = DspTable::new(|_| mc as McFn, |_| ipred as IntraPredFn);
/// let generic = dsp.clone();
///
/// // 10-bit streams have no optimized kernels.
/// init_dsp(&mut dsp, 10, false, &Capabilities::detect(), &Kernels);
/// assert!(dsp.same_as(&generic));
/// ```
pub fn init_dsp<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    bpp: u32,
    bitexact: bool,
    caps: &Capabilities,
    kernels: &K,
) {
    debug!(bpp, bitexact, %caps, "selecting VP9 DSP kernels");
    init_intra_pred(dsp, bpp, caps, kernels);
    init_mc(dsp, bpp, caps, kernels);
}

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
