//! # Dispatch Table
//!
//! The per-context table of pixel routines the block-reconstruction loop calls through.
//!
//! ## Layout
//!
//! ```text
//! mc         [BlockSize; 5][FilterKind; 4][Accumulation; 2][h; 2][v; 2]
//! intra_pred [TxSize; 4][IntraMode; 15]
//! ```
//!
//! The host builds the table once per decoding context with [`DspTable::new`], filling every
//! cell with a generic routine. [`init_dsp`](crate::init_dsp) then overwrites the cells for
//! which a faster kernel is safe on the running processor. Cells are never cleared, so every
//! index always resolves to a callable routine.
//!
//! After initialization the table is only read. It is `Send + Sync` and can be shared by
//! reference between decode threads.

pub mod index;
pub mod kernel;

use index::{Accumulation, BlockSize, FilterKind, IntraIndex, IntraMode, McIndex, TxSize};
use kernel::{IntraEntry, IntraKernelId, IntraPredFn, McEntry, McFn, McKernelId};

type McMatrix = [[[[[McEntry; 2]; 2]; Accumulation::COUNT]; FilterKind::COUNT]; BlockSize::COUNT];
type IntraMatrix = [[IntraEntry; IntraMode::COUNT]; TxSize::COUNT];

/// Function table for motion compensation and intra prediction.
#[derive(Debug, Clone)]
pub struct DspTable {
    mc: McMatrix,
    intra_pred: IntraMatrix,
}

impl DspTable {
    /// Builds a fully populated table.
    ///
    /// # Parameters
    ///
    /// - `mc_default`: returns the generic routine for a motion-compensation cell
    /// - `intra_default`: returns the generic routine for an intra-prediction cell
    ///
    /// Both closures are called exactly once per cell, in [`McIndex::all`] and
    /// [`IntraIndex::all`] order respectively.
    pub fn new(
        mut mc_default: impl FnMut(McIndex) -> McFn,
        mut intra_default: impl FnMut(IntraIndex) -> IntraPredFn,
    ) -> Self {
        let mc: McMatrix = core::array::from_fn(|s| {
            core::array::from_fn(|f| {
                core::array::from_fn(|o| {
                    core::array::from_fn(|h| {
                        core::array::from_fn(|v| {
                            let idx = McIndex::new(
                                BlockSize::all_values()[s],
                                FilterKind::all_values()[f],
                                Accumulation::all_values()[o],
                                h == 1,
                                v == 1,
                            );
                            McEntry::generic(mc_default(idx))
                        })
                    })
                })
            })
        });
        let intra_pred: IntraMatrix = core::array::from_fn(|t| {
            core::array::from_fn(|m| {
                let idx = IntraIndex::new(TxSize::all_values()[t], IntraMode::all_values()[m]);
                IntraEntry::generic(intra_default(idx))
            })
        });

        Self { mc, intra_pred }
    }

    /// Returns the motion-compensation cell at `idx`.
    #[inline]
    pub fn mc(&self, idx: McIndex) -> &McEntry {
        &self.mc[idx.size.index()][idx.filter.index()][idx.op.index()][idx.h as usize]
            [idx.v as usize]
    }

    /// Returns the routine for a motion-compensation call.
    #[inline(always)]
    pub fn mc_fn(
        &self,
        size: BlockSize,
        filter: FilterKind,
        op: Accumulation,
        h: bool,
        v: bool,
    ) -> McFn {
        self.mc(McIndex::new(size, filter, op, h, v)).func
    }

    /// Returns the intra-prediction cell at `idx`.
    #[inline]
    pub fn intra_pred(&self, idx: IntraIndex) -> &IntraEntry {
        &self.intra_pred[idx.tx.index()][idx.mode.index()]
    }

    /// Returns the routine for an intra-prediction call.
    #[inline(always)]
    pub fn intra_pred_fn(&self, tx: TxSize, mode: IntraMode) -> IntraPredFn {
        self.intra_pred(IntraIndex::new(tx, mode)).func
    }

    /// Overwrites one motion-compensation cell with an optimized kernel.
    #[inline]
    pub(crate) fn install_mc(&mut self, idx: McIndex, kernel: McKernelId, func: McFn) {
        self.mc[idx.size.index()][idx.filter.index()][idx.op.index()][idx.h as usize]
            [idx.v as usize] = McEntry {
            func,
            kernel: Some(kernel),
        };
    }

    /// Overwrites one intra-prediction cell with an optimized kernel.
    #[inline]
    pub(crate) fn install_intra_pred(
        &mut self,
        idx: IntraIndex,
        kernel: IntraKernelId,
        func: IntraPredFn,
    ) {
        self.intra_pred[idx.tx.index()][idx.mode.index()] = IntraEntry {
            func,
            kernel: Some(kernel),
        };
    }

    /// Yields every cell whose routine or kernel identity differs from `baseline`.
    ///
    /// Motion-compensation cells come first, then intra-prediction cells, each in index order.
    /// Comparing against a copy taken before [`init_dsp`](crate::init_dsp) gives the
    /// initialization trace for that context.
    pub fn changes_from<'a>(
        &'a self,
        baseline: &'a DspTable,
    ) -> impl Iterator<Item = CellChange> + 'a {
        let mc = McIndex::all().filter_map(move |idx| {
            let (before, after) = (baseline.mc(idx), self.mc(idx));
            (!after.same_as(before)).then_some(CellChange::Mc {
                index: idx,
                before: before.kernel,
                after: after.kernel,
            })
        });
        let intra = IntraIndex::all().filter_map(move |idx| {
            let (before, after) = (baseline.intra_pred(idx), self.intra_pred(idx));
            (!after.same_as(before)).then_some(CellChange::IntraPred {
                index: idx,
                before: before.kernel,
                after: after.kernel,
            })
        });
        mc.chain(intra)
    }

    /// Whether every cell of both tables holds the same routine and kernel identity.
    pub fn same_as(&self, other: &DspTable) -> bool {
        self.changes_from(other).next().is_none()
    }
}

/// One cell that differs between two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellChange {
    /// A motion-compensation cell changed.
    Mc {
        /// Cell index.
        index: McIndex,
        /// Kernel before, `None` for a generic default.
        before: Option<McKernelId>,
        /// Kernel after, `None` for a generic default.
        after: Option<McKernelId>,
    },
    /// An intra-prediction cell changed.
    IntraPred {
        /// Cell index.
        index: IntraIndex,
        /// Kernel before, `None` for a generic default.
        before: Option<IntraKernelId>,
        /// Kernel after, `None` for a generic default.
        after: Option<IntraKernelId>,
    },
}
