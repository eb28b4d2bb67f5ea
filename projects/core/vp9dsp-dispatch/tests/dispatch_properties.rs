//! Whole-table properties of [`init_dsp`] across capability sets.

use rstest::rstest;
use vp9dsp_dispatch::{
    init_dsp, Accumulation, BlockSize, Capabilities, CellChange, CpuFlags, DspTable, FilterKind,
    IntraIndex, IntraKernelId, IntraMode, IntraPredFn, KernelIsa, KernelProvider, McFn, McIndex,
    McKernelId, SubpelDir, TxSize, VectorWidth,
};

unsafe extern "C" fn generic_mc(
    dst: *mut u8,
    _: isize,
    _: *const u8,
    _: isize,
    _: i32,
    _: i32,
    _: i32,
) {
    if !dst.is_null() {
        *dst = 0x11;
    }
}

unsafe extern "C" fn generic_intra_pred(dst: *mut u8, _: isize, _: *const u8, _: *const u8) {
    if !dst.is_null() {
        *dst = 0x12;
    }
}

unsafe extern "C" fn optimized_mc(
    dst: *mut u8,
    _: isize,
    _: *const u8,
    _: isize,
    _: i32,
    _: i32,
    _: i32,
) {
    if !dst.is_null() {
        *dst = 0x13;
    }
}

unsafe extern "C" fn optimized_intra_pred(dst: *mut u8, _: isize, _: *const u8, _: *const u8) {
    if !dst.is_null() {
        *dst = 0x14;
    }
}

struct Kernels;

impl KernelProvider for Kernels {
    fn mc(&self, _: McKernelId) -> McFn {
        optimized_mc
    }

    fn intra_pred(&self, _: IntraKernelId) -> IntraPredFn {
        optimized_intra_pred
    }
}

/// Flags any selection tier looks at.
const GATING_FLAGS: [CpuFlags; 4] = [
    CpuFlags::RV_MISALIGNED,
    CpuFlags::RVB_ADDR,
    CpuFlags::RVV_I32,
    CpuFlags::RVV_I64,
];

fn generic_table() -> DspTable {
    DspTable::new(|_| generic_mc as McFn, |_| generic_intra_pred as IntraPredFn)
}

fn initialized(bpp: u32, caps: Capabilities) -> DspTable {
    let mut table = generic_table();
    init_dsp(&mut table, bpp, false, &caps, &Kernels);
    table
}

/// Every combination of the gating flags.
fn flag_subsets() -> impl Iterator<Item = CpuFlags> {
    (0..1u32 << GATING_FLAGS.len()).map(|bits| {
        GATING_FLAGS
            .iter()
            .enumerate()
            .filter(|(x, _)| bits & (1 << *x) != 0)
            .fold(CpuFlags::empty(), |acc, (_, flag)| acc | *flag)
    })
}

/// Whether an optimized MC kernel computes exactly what the cell it sits in asks for.
fn mc_kernel_serves(idx: McIndex, kernel: McKernelId) -> bool {
    match kernel {
        McKernelId::Copy { size } => {
            idx == McIndex::full_pel(size, idx.filter, Accumulation::Put)
        }
        McKernelId::Avg { size } => idx == McIndex::full_pel(size, idx.filter, Accumulation::Avg),
        McKernelId::EightTap {
            op,
            filter,
            size,
            dir,
            ..
        } => filter.is_eight_tap() && idx == McIndex::subpel(size, filter, op, dir),
        McKernelId::Bilinear { op, size, dir } => {
            idx == McIndex::subpel(size, FilterKind::Bilinear, op, dir)
        }
    }
}

/// Whether `caps` allows running `kernel`.
fn mc_kernel_allowed(caps: &Capabilities, kernel: McKernelId) -> bool {
    let vector = caps.has(CpuFlags::RVV_I32);
    match kernel {
        McKernelId::Copy { .. } => caps.has(CpuFlags::RV_MISALIGNED) && caps.xlen() >= 64,
        McKernelId::Avg { .. } | McKernelId::Bilinear { .. } => vector && caps.vlen() >= 128,
        McKernelId::EightTap { dir, width, .. } => {
            vector
                && caps.vlen() >= width.bits()
                && (dir == SubpelDir::Horizontal || caps.has(CpuFlags::RVB_ADDR))
        }
    }
}

fn intra_kernel_allowed(caps: &Capabilities, kernel: IntraKernelId) -> bool {
    match kernel.isa {
        KernelIsa::Scalar => {
            caps.has(CpuFlags::RV_MISALIGNED | CpuFlags::RVB_ADDR) && caps.xlen() >= 64
        }
        KernelIsa::Vector => {
            let lanes = if kernel.tx == TxSize::Tx8x8 && IntraMode::DC_FAMILY.contains(&kernel.mode)
            {
                CpuFlags::RVV_I64
            } else {
                CpuFlags::RVV_I32
            };
            caps.has(lanes) && caps.vlen() >= 128
        }
    }
}

#[test]
fn every_cell_holds_a_matching_and_allowed_routine() {
    for flags in flag_subsets() {
        for vlen in [0, 64, 128, 256, 512] {
            for xlen in [32, 64] {
                let caps = Capabilities::new(flags, vlen, xlen);
                let table = initialized(8, caps);

                for idx in McIndex::all() {
                    let entry = table.mc(idx);
                    match entry.kernel {
                        None => assert_eq!(entry.func as usize, generic_mc as usize, "{idx}"),
                        Some(kernel) => {
                            assert_eq!(entry.func as usize, optimized_mc as usize, "{idx}");
                            assert!(mc_kernel_serves(idx, kernel), "{kernel} in {idx}");
                            assert!(mc_kernel_allowed(&caps, kernel), "{kernel} under {caps}");
                        }
                    }
                }
                for idx in IntraIndex::all() {
                    let entry = table.intra_pred(idx);
                    match entry.kernel {
                        None => {
                            assert_eq!(entry.func as usize, generic_intra_pred as usize, "{idx}")
                        }
                        Some(kernel) => {
                            assert_eq!((kernel.tx, kernel.mode), (idx.tx, idx.mode));
                            assert!(intra_kernel_allowed(&caps, kernel), "{kernel} under {caps}");
                        }
                    }
                }
            }
        }
    }
}

#[rstest]
#[case(10)]
#[case(12)]
#[case(0)]
#[case(16)]
fn non_8_bit_depths_change_nothing(#[case] bpp: u32) {
    let caps = Capabilities::new(CpuFlags::all(), 1024, 64);
    assert!(initialized(bpp, caps).same_as(&generic_table()));
}

#[test]
fn more_capabilities_never_slow_a_cell_down() {
    for weaker in flag_subsets() {
        for stronger in flag_subsets().filter(|s| s.contains(weaker)) {
            for (weak_vlen, strong_vlen) in [(0, 128), (128, 128), (128, 256), (256, 512)] {
                for (weak_xlen, strong_xlen) in [(32, 64), (64, 64)] {
                    let weak = initialized(8, Capabilities::new(weaker, weak_vlen, weak_xlen));
                    let strong =
                        initialized(8, Capabilities::new(stronger, strong_vlen, strong_xlen));

                    for idx in McIndex::all() {
                        assert!(strong.mc(idx).tier() >= weak.mc(idx).tier(), "{idx}");
                    }
                    for idx in IntraIndex::all() {
                        assert!(
                            strong.intra_pred(idx).tier() >= weak.intra_pred(idx).tier(),
                            "{idx}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn selection_is_deterministic() {
    let caps = Capabilities::new(CpuFlags::all(), 256, 64);
    let first = initialized(8, caps);
    let second = initialized(8, caps);
    let baseline = generic_table();

    assert!(first.same_as(&second));
    assert!(first
        .changes_from(&baseline)
        .eq(second.changes_from(&baseline)));
}

#[test]
fn trace_lists_intra_changes_after_mc_changes_in_index_order() {
    let caps = Capabilities::new(CpuFlags::RV_MISALIGNED | CpuFlags::RVB_ADDR, 0, 64);
    let table = initialized(8, caps);
    let changes: Vec<_> = table.changes_from(&generic_table()).collect();

    // 5 sizes x 4 filters of copy kernels, then 3 scalar vertical kernels.
    assert_eq!(changes.len(), 20 + 3);
    assert!(changes[..20]
        .iter()
        .all(|c| matches!(c, CellChange::Mc { after: Some(McKernelId::Copy { .. }), .. })));
    let intra: Vec<_> = changes[20..]
        .iter()
        .map(|c| match c {
            CellChange::IntraPred { index, before, .. } => {
                assert_eq!(*before, None);
                index.tx
            }
            CellChange::Mc { .. } => panic!("mc change after intra changes"),
        })
        .collect();
    assert_eq!(intra, [TxSize::Tx8x8, TxSize::Tx16x16, TxSize::Tx32x32]);
}

#[test]
fn no_capabilities_keep_generic_defaults() {
    assert!(initialized(8, Capabilities::none().with_xlen(64)).same_as(&generic_table()));
}

#[test]
fn misaligned_access_installs_copy_for_put_only() {
    let table = initialized(8, Capabilities::new(CpuFlags::RV_MISALIGNED, 0, 64));

    for &size in BlockSize::all_values() {
        for &filter in FilterKind::all_values() {
            let put = table.mc(McIndex::full_pel(size, filter, Accumulation::Put));
            assert_eq!(put.kernel, Some(McKernelId::Copy { size }));
            assert_eq!(put.func as usize, optimized_mc as usize);

            let avg = table.mc(McIndex::full_pel(size, filter, Accumulation::Avg));
            assert_eq!(avg.kernel, None);
        }
    }
    let touched = table.changes_from(&generic_table()).count();
    assert_eq!(touched, BlockSize::COUNT * FilterKind::COUNT);
}

#[cfg(feature = "rvv")]
mod vector {
    use super::*;

    fn subpel_cell(
        table: &DspTable,
        size: BlockSize,
        filter: FilterKind,
        op: Accumulation,
        dir: SubpelDir,
    ) -> Option<McKernelId> {
        table.mc(McIndex::subpel(size, filter, op, dir)).kernel
    }

    #[test]
    fn base_vector_installs_average_horizontal_and_bilinear() {
        let table = initialized(8, Capabilities::new(CpuFlags::RVV_I32, 128, 64));

        for &size in BlockSize::all_values() {
            for &filter in FilterKind::all_values() {
                let avg = table.mc(McIndex::full_pel(size, filter, Accumulation::Avg));
                assert_eq!(avg.kernel, Some(McKernelId::Avg { size }));
                let put = table.mc(McIndex::full_pel(size, filter, Accumulation::Put));
                assert_eq!(put.kernel, None);
            }

            for &op in Accumulation::all_values() {
                for filter in FilterKind::EIGHT_TAP {
                    assert_eq!(
                        subpel_cell(&table, size, filter, op, SubpelDir::Horizontal),
                        Some(McKernelId::EightTap {
                            op,
                            filter,
                            size,
                            dir: SubpelDir::Horizontal,
                            width: VectorWidth::Vlen128,
                        })
                    );
                    assert_eq!(
                        subpel_cell(&table, size, filter, op, SubpelDir::Vertical),
                        None
                    );
                }
                for &dir in SubpelDir::all_values() {
                    assert_eq!(
                        subpel_cell(&table, size, FilterKind::Bilinear, op, dir),
                        Some(McKernelId::Bilinear { op, size, dir })
                    );
                }
            }
        }
    }

    #[test]
    fn address_generation_adds_vertical_eight_tap() {
        let caps = Capabilities::new(CpuFlags::RVV_I32 | CpuFlags::RVB_ADDR, 128, 64);
        let table = initialized(8, caps);

        for &size in BlockSize::all_values() {
            for &op in Accumulation::all_values() {
                for filter in FilterKind::EIGHT_TAP {
                    assert_eq!(
                        subpel_cell(&table, size, filter, op, SubpelDir::Vertical),
                        Some(McKernelId::EightTap {
                            op,
                            filter,
                            size,
                            dir: SubpelDir::Vertical,
                            width: VectorWidth::Vlen128,
                        })
                    );
                }
            }
        }
    }

    #[test]
    fn wider_vectors_win_every_shared_cell() {
        let caps = Capabilities::new(CpuFlags::RVV_I32 | CpuFlags::RVB_ADDR, 256, 64);
        let narrow = initialized(8, caps.with_vlen(128));
        let wide = initialized(8, caps);

        let mut shared = 0;
        for idx in McIndex::all() {
            if let Some(McKernelId::EightTap { .. }) = narrow.mc(idx).kernel {
                shared += 1;
                assert!(matches!(
                    wide.mc(idx).kernel,
                    Some(McKernelId::EightTap {
                        width: VectorWidth::Vlen256,
                        ..
                    })
                ));
            }
        }
        assert_eq!(shared, 2 * BlockSize::COUNT * 3 * 2);
    }

    #[test]
    fn narrow_vector_units_get_no_vector_kernels() {
        let caps = Capabilities::new(CpuFlags::RVV_I32 | CpuFlags::RVV_I64, 64, 64);
        assert!(initialized(8, caps).same_as(&generic_table()));
    }

    #[test]
    fn masking_vector_flags_falls_back_to_scalar_tiers() {
        let full = Capabilities::new(CpuFlags::all(), 256, 64);
        let scalar_only = full.masked(CpuFlags::RV_MISALIGNED | CpuFlags::RVB_ADDR);
        let table = initialized(8, scalar_only);

        for change in table.changes_from(&generic_table()) {
            match change {
                CellChange::Mc { after, .. } => {
                    assert!(matches!(after, Some(McKernelId::Copy { .. })))
                }
                CellChange::IntraPred { after, .. } => {
                    assert_eq!(after.map(|k| k.isa), Some(KernelIsa::Scalar))
                }
            }
        }
    }
}
