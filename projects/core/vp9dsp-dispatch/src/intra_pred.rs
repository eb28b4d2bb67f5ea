//! # Intra-Prediction Selection
//!
//! Installs optimized kernels into the intra-prediction matrix of a [`DspTable`].
//!
//! ```text
//! Tier            Requirement                           Cells
//! ──────────────  ────────────────────────────────────  ──────────────────────────────
//! Scalar vertical misaligned, zba, xlen >= 64           v        32x32 16x16 8x8
//! DC (64-bit)     rvv-i64, vlen >= 128                  DC family            8x8
//! Vector          rvv-i32, vlen >= 128                  DC family 32x32 16x16
//!                                                       h         32x32 16x16 8x8
//!                                                       tm        32x32 16x16 8x8 4x4
//! ```
//!
//! The two vector tiers write disjoint cells, so their relative order does not matter.
//! 4x4 vertical prediction has no scalar kernel.

use crate::cpu_detect::{Capabilities, CpuFlags};
use crate::table::index::{IntraIndex, IntraMode, TxSize};
use crate::table::kernel::{IntraKernelId, KernelIsa, KernelProvider};
use crate::table::DspTable;
use tracing::{debug, trace};

/// Transform sizes served by the scalar vertical kernels.
const SCALAR_VERT_SIZES: [TxSize; 3] = [TxSize::Tx32x32, TxSize::Tx16x16, TxSize::Tx8x8];

/// Cells written by the tier gated on 64-bit vector lanes.
#[cfg(feature = "rvv")]
const VECTOR_I64_CELLS: &[(&[TxSize], &[IntraMode])] = &[(&[TxSize::Tx8x8], &IntraMode::DC_FAMILY)];

/// Cells written by the tier gated on 32-bit vector lanes.
#[cfg(feature = "rvv")]
const VECTOR_I32_CELLS: &[(&[TxSize], &[IntraMode])] = &[
    (&[TxSize::Tx32x32, TxSize::Tx16x16], &IntraMode::DC_FAMILY),
    (
        &[TxSize::Tx32x32, TxSize::Tx16x16, TxSize::Tx8x8],
        &[IntraMode::Hor],
    ),
    (
        &[TxSize::Tx32x32, TxSize::Tx16x16, TxSize::Tx8x8, TxSize::Tx4x4],
        &[IntraMode::TmVp8],
    ),
];

/// Overwrites intra-prediction cells for which `caps` allows a faster kernel.
///
/// Only 8-bit samples select any kernel; for other depths the table is left untouched.
pub fn init_intra_pred<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    bpp: u32,
    caps: &Capabilities,
    kernels: &K,
) {
    if bpp != 8 {
        trace!(bpp, "no intra-prediction kernels for this bit depth");
        return;
    }

    if caps.xlen() >= 64 && caps.has(CpuFlags::RV_MISALIGNED | CpuFlags::RVB_ADDR) {
        debug!("installing scalar vertical intra-prediction kernels");
        for tx in SCALAR_VERT_SIZES {
            install(dsp, kernels, tx, IntraMode::Vert, KernelIsa::Scalar);
        }
    }

    #[cfg(feature = "rvv")]
    {
        if caps.has(CpuFlags::RVV_I64) && caps.vlen_least(128) {
            debug!("installing 64-bit lane vector DC kernels");
            install_cells(dsp, kernels, VECTOR_I64_CELLS);
        }

        if caps.has(CpuFlags::RVV_I32) && caps.vlen_least(128) {
            debug!("installing 32-bit lane vector intra-prediction kernels");
            install_cells(dsp, kernels, VECTOR_I32_CELLS);
        }
    }
}

#[cfg(feature = "rvv")]
fn install_cells<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    kernels: &K,
    cells: &[(&[TxSize], &[IntraMode])],
) {
    for &(sizes, modes) in cells {
        for &tx in sizes {
            for &mode in modes {
                install(dsp, kernels, tx, mode, KernelIsa::Vector);
            }
        }
    }
}

#[inline]
fn install<K: KernelProvider + ?Sized>(
    dsp: &mut DspTable,
    kernels: &K,
    tx: TxSize,
    mode: IntraMode,
    isa: KernelIsa,
) {
    let kernel = IntraKernelId::new(tx, mode, isa);
    dsp.install_intra_pred(IntraIndex::new(tx, mode), kernel, kernels.intra_pred(kernel));
}
