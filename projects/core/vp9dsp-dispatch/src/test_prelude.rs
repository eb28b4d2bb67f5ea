//! Common test imports and utilities for unit tests
//!
//! This module provides a common prelude for test modules to avoid duplicate imports
//! across the codebase.

// Re-export commonly used items from the crate
pub use crate::cpu_detect::{Capabilities, CpuFlags};
pub use crate::table::kernel::{IntraKernelId, IntraPredFn, KernelProvider, McFn, McKernelId};
pub use crate::table::DspTable;

// Re-export common external dependencies
pub use rstest::rstest;

use core::cell::RefCell;

// Each placeholder writes a different marker so no two share an address after function merging.

/// Placeholder generic motion-compensation routine.
pub unsafe extern "C" fn generic_mc(
    dst: *mut u8,
    _dst_stride: isize,
    _src: *const u8,
    _src_stride: isize,
    _h: i32,
    _mx: i32,
    _my: i32,
) {
    if !dst.is_null() {
        *dst = 0x01;
    }
}

/// Placeholder generic intra-prediction routine.
pub unsafe extern "C" fn generic_intra_pred(
    dst: *mut u8,
    _stride: isize,
    _left: *const u8,
    _top: *const u8,
) {
    if !dst.is_null() {
        *dst = 0x02;
    }
}

/// Stand-in for an optimized motion-compensation kernel.
pub unsafe extern "C" fn null_mc(
    dst: *mut u8,
    _dst_stride: isize,
    _src: *const u8,
    _src_stride: isize,
    _h: i32,
    _mx: i32,
    _my: i32,
) {
    if !dst.is_null() {
        *dst = 0x03;
    }
}

/// Stand-in for an optimized intra-prediction kernel.
pub unsafe extern "C" fn null_intra_pred(
    dst: *mut u8,
    _stride: isize,
    _left: *const u8,
    _top: *const u8,
) {
    if !dst.is_null() {
        *dst = 0x04;
    }
}

/// A table with the placeholder generic routine in every cell.
pub fn generic_table() -> DspTable {
    DspTable::new(|_| generic_mc as McFn, |_| generic_intra_pred as IntraPredFn)
}

/// Hands out [`null_mc`] and [`null_intra_pred`] for every kernel.
pub struct NullKernels;

impl KernelProvider for NullKernels {
    fn mc(&self, _kernel: McKernelId) -> McFn {
        null_mc
    }

    fn intra_pred(&self, _kernel: IntraKernelId) -> IntraPredFn {
        null_intra_pred
    }
}

/// One kernel request seen by [`RecordingKernels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Mc(McKernelId),
    IntraPred(IntraKernelId),
}

/// Behaves like [`NullKernels`] and records every request in order.
#[derive(Default)]
pub struct RecordingKernels {
    requests: RefCell<Vec<Request>>,
}

impl RecordingKernels {
    /// All requests, in the order they were made.
    pub fn order(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// Only the motion-compensation requests.
    pub fn mc_requests(&self) -> Vec<McKernelId> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|req| match req {
                Request::Mc(kernel) => Some(*kernel),
                Request::IntraPred(_) => None,
            })
            .collect()
    }
}

impl KernelProvider for RecordingKernels {
    fn mc(&self, kernel: McKernelId) -> McFn {
        self.requests.borrow_mut().push(Request::Mc(kernel));
        null_mc
    }

    fn intra_pred(&self, kernel: IntraKernelId) -> IntraPredFn {
        self.requests.borrow_mut().push(Request::IntraPred(kernel));
        null_intra_pred
    }
}
