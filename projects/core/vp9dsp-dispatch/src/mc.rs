//! # Motion-Compensation Selection
//!
//! Installs the fastest safe kernels into the motion-compensation matrix of a [`DspTable`].
//!
//! ## Tiers
//!
//! Every tier requires 8-bit samples. Tiers run in this order, and a later tier may overwrite a
//! cell an earlier one set, always with a faster kernel.
//!
//! ```text
//! Tier             Requirement                       Cells
//! ───────────────  ────────────────────────────────  ─────────────────────────────────────
//! Full-pel copy    misaligned, xlen >= 64            put,  (0,0), all sizes and filters
//! Full-pel avg     rvv-i32, vlen >= 128              avg,  (0,0), all sizes and filters
//! 8-tap h, 128     rvv-i32, vlen >= 128              put+avg, (1,0), 8-tap filters
//! Bilinear h/v     rvv-i32, vlen >= 128              put+avg, (1,0) and (0,1), bilinear
//! 8-tap v, 128     rvv-i32, vlen >= 128, zba         put+avg, (0,1), 8-tap filters
//! 8-tap h, 256     rvv-i32, vlen >= 256              put+avg, (1,0), 8-tap filters
//! 8-tap v, 256     rvv-i32, vlen >= 256, zba         put+avg, (0,1), 8-tap filters
//! ```
//!
//! With no sub-pixel offset and no averaging every filter degenerates to a plain copy, so one
//! copy kernel per size serves all four filter slots of the full-pel cell. The vertical 8-tap
//! kernels use address-generation instructions, hence the extra Zba requirement.
//!
//! Cells with both a horizontal and a vertical phase are never touched here.

use crate::cpu_detect::{Capabilities, CpuFlags};
use crate::table::index::{Accumulation, BlockSize, FilterKind, McIndex};
use crate::table::kernel::{KernelProvider, McKernelId};
use crate::table::DspTable;
use tracing::{debug, trace};

#[cfg(feature = "rvv")]
use crate::table::{index::SubpelDir, kernel::VectorWidth};

/// Overwrites motion-compensation cells for which `caps` allows a faster kernel.
///
/// # Parameters
///
/// - `dsp`: the table to update; cells without an applicable kernel keep their current entry
/// - `bpp`: bits per sample; only 8 selects any kernel
/// - `caps`: capabilities of the running processor
/// - `kernels`: source of the optimized routines
pub fn init_mc<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    bpp: u32,
    caps: &Capabilities,
    kernels: &K,
) {
    if bpp != 8 {
        trace!(bpp, "no motion-compensation kernels for this bit depth");
        return;
    }

    if caps.xlen() >= 64 && caps.has(CpuFlags::RV_MISALIGNED) {
        debug!("installing scalar full-pel copy kernels");
        install_full_pel(dsp, kernels, Accumulation::Put);
    }

    #[cfg(feature = "rvv")]
    init_mc_rvv(dsp, caps, kernels);
}

#[cfg(feature = "rvv")]
fn init_mc_rvv<K: KernelProvider + ?Sized>(dsp: &mut DspTable, caps: &Capabilities, kernels: &K) {
    if !caps.has(CpuFlags::RVV_I32) {
        return;
    }

    if caps.vlen_least(128) {
        debug!("installing 128-bit vector full-pel, bilinear and horizontal 8-tap kernels");
        install_full_pel(dsp, kernels, Accumulation::Avg);
        install_eight_tap(dsp, kernels, SubpelDir::Horizontal, VectorWidth::Vlen128);
        install_bilinear(dsp, kernels);

        if caps.has(CpuFlags::RVB_ADDR) {
            debug!("installing 128-bit vector vertical 8-tap kernels");
            install_eight_tap(dsp, kernels, SubpelDir::Vertical, VectorWidth::Vlen128);
        }
    }

    if caps.vlen_least(256) {
        debug!("installing 256-bit vector horizontal 8-tap kernels");
        install_eight_tap(dsp, kernels, SubpelDir::Horizontal, VectorWidth::Vlen256);

        if caps.has(CpuFlags::RVB_ADDR) {
            debug!("installing 256-bit vector vertical 8-tap kernels");
            install_eight_tap(dsp, kernels, SubpelDir::Vertical, VectorWidth::Vlen256);
        }
    }
}

/// Installs one full-pel kernel per block size into the zero-phase cell of every filter kind.
fn install_full_pel<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    kernels: &K,
    op: Accumulation,
) {
    for &size in BlockSize::all_values() {
        let kernel = match op {
            Accumulation::Put => McKernelId::Copy { size },
            Accumulation::Avg => McKernelId::Avg { size },
        };
        let func = kernels.mc(kernel);
        for &filter in FilterKind::all_values() {
            dsp.install_mc(McIndex::full_pel(size, filter, op), kernel, func);
        }
    }
}

/// Installs the single-axis 8-tap kernels for both accumulation modes and every size.
#[cfg(feature = "rvv")]
fn install_eight_tap<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    kernels: &K,
    dir: SubpelDir,
    width: VectorWidth,
) {
    for &op in Accumulation::all_values() {
        for &size in BlockSize::all_values() {
            for filter in FilterKind::EIGHT_TAP {
                let kernel = McKernelId::EightTap {
                    op,
                    filter,
                    size,
                    dir,
                    width,
                };
                let func = kernels.mc(kernel);
                dsp.install_mc(McIndex::subpel(size, filter, op, dir), kernel, func);
            }
        }
    }
}

/// Installs the single-axis bilinear kernels for both axes, both accumulation modes and
/// every size.
#[cfg(feature = "rvv")]
fn install_bilinear<K: KernelProvider + ?Sized>(dsp: &mut DspTable, kernels: &K) {
    for &size in BlockSize::all_values() {
        for &op in Accumulation::all_values() {
            for &dir in SubpelDir::all_values() {
                let kernel = McKernelId::Bilinear { op, size, dir };
                let func = kernels.mc(kernel);
                dsp.install_mc(
                    McIndex::subpel(size, FilterKind::Bilinear, op, dir),
                    kernel,
                    func,
                );
            }
        }
    }
}
