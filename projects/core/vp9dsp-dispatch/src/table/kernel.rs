//! Kernel identities, table entries and the provider seam through which the host hands over
//! its optimized kernels.

use super::index::{Accumulation, BlockSize, FilterKind, IntraMode, SubpelDir, TxSize};
use core::fmt;

/// Motion-compensated prediction of one block.
///
/// `h` is the block height in rows, `mx`/`my` the sub-pixel offsets in 1/16 pel.
pub type McFn = unsafe extern "C" fn(
    dst: *mut u8,
    dst_stride: isize,
    src: *const u8,
    src_stride: isize,
    h: i32,
    mx: i32,
    my: i32,
);

/// Intra prediction of one block from its left and top edges.
pub type IntraPredFn =
    unsafe extern "C" fn(dst: *mut u8, stride: isize, left: *const u8, top: *const u8);

/// Relative speed class of the kernel stored in a cell.
///
/// Ordering is meaningful: a later selection tier only ever replaces a cell with a kernel of
/// an equal or higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KernelTier {
    /// Portable default installed by the host.
    Generic,
    /// Scalar kernel relying on fast misaligned access or bit-manipulation extensions.
    Scalar,
    /// Vector kernel requiring at least 128-bit vector registers.
    Vector128,
    /// Vector kernel requiring at least 256-bit vector registers.
    Vector256,
}

impl fmt::Display for KernelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generic => "generic",
            Self::Scalar => "scalar",
            Self::Vector128 => "vector128",
            Self::Vector256 => "vector256",
        })
    }
}

/// Minimum vector register width a vector-length-specialized kernel was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VectorWidth {
    /// 128-bit vector registers.
    Vlen128,
    /// 256-bit vector registers.
    Vlen256,
}

impl VectorWidth {
    /// Width in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Vlen128 => 128,
            Self::Vlen256 => 256,
        }
    }

    /// The tier of kernels specialized for this width.
    #[inline]
    pub const fn tier(self) -> KernelTier {
        match self {
            Self::Vlen128 => KernelTier::Vector128,
            Self::Vlen256 => KernelTier::Vector256,
        }
    }
}

/// Instruction set family an intra-prediction kernel is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelIsa {
    /// Scalar integer code (`rvi` suffix).
    Scalar,
    /// Vector extension code (`rvv` suffix).
    Vector,
}

impl KernelIsa {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Scalar => "rvi",
            Self::Vector => "rvv",
        }
    }
}

/// Identity of an optimized motion-compensation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McKernelId {
    /// Full-pel block copy using misaligned scalar loads and stores.
    Copy {
        /// Block size the kernel handles.
        size: BlockSize,
    },
    /// Full-pel average with the destination, vectorized.
    Avg {
        /// Block size the kernel handles.
        size: BlockSize,
    },
    /// One-dimensional 8-tap interpolation, specialized for a vector width.
    EightTap {
        /// Accumulation mode.
        op: Accumulation,
        /// One of [`FilterKind::EIGHT_TAP`].
        filter: FilterKind,
        /// Block size the kernel handles.
        size: BlockSize,
        /// Interpolation axis.
        dir: SubpelDir,
        /// Vector width the kernel was built for.
        width: VectorWidth,
    },
    /// One-dimensional bilinear interpolation, vectorized.
    Bilinear {
        /// Accumulation mode.
        op: Accumulation,
        /// Block size the kernel handles.
        size: BlockSize,
        /// Interpolation axis.
        dir: SubpelDir,
    },
}

impl McKernelId {
    /// Speed class of this kernel.
    pub const fn tier(&self) -> KernelTier {
        match self {
            Self::Copy { .. } => KernelTier::Scalar,
            Self::Avg { .. } | Self::Bilinear { .. } => KernelTier::Vector128,
            Self::EightTap { width, .. } => width.tier(),
        }
    }
}

impl fmt::Display for McKernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Copy { size } => write!(f, "copy{size}_rvi"),
            Self::Avg { size } => write!(f, "avg{size}_rvv"),
            Self::EightTap {
                op,
                filter,
                size,
                dir,
                width,
            } => write!(
                f,
                "{op}_8tap_{filter}_{size}{}_rvv{}",
                dir.suffix(),
                width.bits()
            ),
            Self::Bilinear { op, size, dir } => {
                write!(f, "{op}_bilin_{size}{}_rvv", dir.suffix())
            }
        }
    }
}

/// Identity of an optimized intra-prediction kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntraKernelId {
    /// Transform size the kernel handles.
    pub tx: TxSize,
    /// Prediction mode the kernel implements.
    pub mode: IntraMode,
    /// Instruction set family.
    pub isa: KernelIsa,
}

impl IntraKernelId {
    /// Creates an identity from its components.
    #[inline]
    pub const fn new(tx: TxSize, mode: IntraMode, isa: KernelIsa) -> Self {
        Self { tx, mode, isa }
    }

    /// Speed class of this kernel.
    pub const fn tier(&self) -> KernelTier {
        match self.isa {
            KernelIsa::Scalar => KernelTier::Scalar,
            KernelIsa::Vector => KernelTier::Vector128,
        }
    }
}

impl fmt::Display for IntraKernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.mode, self.tx, self.isa.suffix())
    }
}

/// A motion-compensation table cell.
#[derive(Debug, Clone, Copy)]
pub struct McEntry {
    /// The routine invoked for this cell.
    pub func: McFn,
    /// Optimized kernel occupying the cell, `None` for the generic default.
    pub kernel: Option<McKernelId>,
}

impl McEntry {
    /// An entry holding a generic default routine.
    #[inline]
    pub const fn generic(func: McFn) -> Self {
        Self { func, kernel: None }
    }

    /// Speed class of the routine in this cell.
    #[inline]
    pub fn tier(&self) -> KernelTier {
        self.kernel.map_or(KernelTier::Generic, |k| k.tier())
    }

    /// Whether both entries hold the same routine and the same identity.
    #[inline]
    pub fn same_as(&self, other: &Self) -> bool {
        self.kernel == other.kernel && self.func as usize == other.func as usize
    }
}

/// An intra-prediction table cell.
#[derive(Debug, Clone, Copy)]
pub struct IntraEntry {
    /// The routine invoked for this cell.
    pub func: IntraPredFn,
    /// Optimized kernel occupying the cell, `None` for the generic default.
    pub kernel: Option<IntraKernelId>,
}

impl IntraEntry {
    /// An entry holding a generic default routine.
    #[inline]
    pub const fn generic(func: IntraPredFn) -> Self {
        Self { func, kernel: None }
    }

    /// Speed class of the routine in this cell.
    #[inline]
    pub fn tier(&self) -> KernelTier {
        self.kernel.map_or(KernelTier::Generic, |k| k.tier())
    }

    /// Whether both entries hold the same routine and the same identity.
    #[inline]
    pub fn same_as(&self, other: &Self) -> bool {
        self.kernel == other.kernel && self.func as usize == other.func as usize
    }
}

/// Source of the optimized kernels the selectors may install.
///
/// Implemented by the host that links the hand-written kernels. The selectors only request a
/// kernel after its capability gate has passed, so an implementation may assume every request
/// is for a kernel that is safe to run on the current processor.
pub trait KernelProvider {
    /// Returns the routine implementing `kernel`.
    fn mc(&self, kernel: McKernelId) -> McFn;

    /// Returns the routine implementing `kernel`.
    fn intra_pred(&self, kernel: IntraKernelId) -> IntraPredFn;
}

impl<K: KernelProvider + ?Sized> KernelProvider for &K {
    #[inline]
    fn mc(&self, kernel: McKernelId) -> McFn {
        (**self).mc(kernel)
    }

    #[inline]
    fn intra_pred(&self, kernel: IntraKernelId) -> IntraPredFn {
        (**self).intra_pred(kernel)
    }
}
