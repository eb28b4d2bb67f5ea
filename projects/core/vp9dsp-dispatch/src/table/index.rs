//! Strongly typed indices into the [`DspTable`](super::DspTable).
//!
//! Every enum here is `#[repr(u8)]` with the discriminant equal to its position in the table,
//! so converting to an array index is a plain cast on the decode hot path.

use core::fmt;
use derive_enum_all_values::AllValues;

/// Prediction block size of a motion-compensated block.
///
/// Ordered largest first, matching the layout of the motion-compensation matrix.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AllValues)]
pub enum BlockSize {
    /// 64x64
    Bs64x64 = 0,
    /// 32x32
    Bs32x32 = 1,
    /// 16x16
    Bs16x16 = 2,
    /// 8x8
    Bs8x8 = 3,
    /// 4x4
    Bs4x4 = 4,
}

impl BlockSize {
    /// Number of block size classes.
    pub const COUNT: usize = Self::all_values().len();

    /// Width (and height) of the block in pixels.
    #[inline]
    pub const fn pixels(self) -> u32 {
        64 >> self as u32
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

/// Sub-pixel interpolation filter family.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum FilterKind {
    /// 8-tap smooth filter
    Smooth = 0,
    /// 8-tap regular filter
    Regular = 1,
    /// 8-tap sharp filter
    Sharp = 2,
    /// 2-tap bilinear filter
    Bilinear = 3,
}

impl FilterKind {
    /// Number of filter kinds.
    pub const COUNT: usize = Self::all_values().len();

    /// The filter kinds served by the 8-tap kernel family.
    pub const EIGHT_TAP: [FilterKind; 3] = [Self::Smooth, Self::Regular, Self::Sharp];

    /// Whether this kind belongs to the 8-tap family.
    #[inline]
    pub const fn is_eight_tap(self) -> bool {
        !matches!(self, Self::Bilinear)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Regular => "regular",
            Self::Sharp => "sharp",
            Self::Bilinear => "bilin",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the predicted block is combined with the destination.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum Accumulation {
    /// Write the prediction directly.
    Put = 0,
    /// Average the prediction with the existing destination pixels (bi-prediction).
    Avg = 1,
}

impl Accumulation {
    /// Number of accumulation modes.
    pub const COUNT: usize = Self::all_values().len();

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Avg => "avg",
        }
    }
}

impl fmt::Display for Accumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-axis sub-pixel direction handled by a one-dimensional interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum SubpelDir {
    /// Fractional horizontal offset, integer vertical offset.
    Horizontal,
    /// Integer horizontal offset, fractional vertical offset.
    Vertical,
}

impl SubpelDir {
    /// The `(h, v)` phase flags of the cells served by this direction.
    #[inline]
    pub const fn phase(self) -> (bool, bool) {
        match self {
            Self::Horizontal => (true, false),
            Self::Vertical => (false, true),
        }
    }

    pub(crate) const fn suffix(self) -> &'static str {
        match self {
            Self::Horizontal => "h",
            Self::Vertical => "v",
        }
    }
}

/// Transform (intra-prediction block) size.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AllValues)]
pub enum TxSize {
    /// 4x4
    Tx4x4 = 0,
    /// 8x8
    Tx8x8 = 1,
    /// 16x16
    Tx16x16 = 2,
    /// 32x32
    Tx32x32 = 3,
}

impl TxSize {
    /// Number of transform sizes.
    pub const COUNT: usize = Self::all_values().len();

    /// Width (and height) of the block in pixels.
    #[inline]
    pub const fn pixels(self) -> u32 {
        4 << self as u32
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let px = self.pixels();
        write!(f, "{px}x{px}")
    }
}

/// Intra-prediction mode, in the order the decoder indexes them.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum IntraMode {
    /// Vertical (copy the top edge down).
    Vert = 0,
    /// Horizontal (copy the left edge across).
    Hor = 1,
    /// DC from both edges.
    Dc = 2,
    /// Diagonal down-left.
    DiagDownLeft = 3,
    /// Diagonal down-right.
    DiagDownRight = 4,
    /// Vertical-right.
    VertRight = 5,
    /// Horizontal-down.
    HorDown = 6,
    /// Vertical-left.
    VertLeft = 7,
    /// Horizontal-up.
    HorUp = 8,
    /// True-motion (VP8 style).
    TmVp8 = 9,
    /// DC from the left edge only.
    LeftDc = 10,
    /// DC from the top edge only.
    TopDc = 11,
    /// Constant 128.
    Dc128 = 12,
    /// Constant 127.
    Dc127 = 13,
    /// Constant 129.
    Dc129 = 14,
}

impl IntraMode {
    /// Number of intra-prediction modes.
    pub const COUNT: usize = Self::all_values().len();

    /// The DC family: plain, edge-only and the three bias constants.
    pub const DC_FAMILY: [IntraMode; 6] = [
        Self::Dc,
        Self::LeftDc,
        Self::TopDc,
        Self::Dc127,
        Self::Dc128,
        Self::Dc129,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Vert => "v",
            Self::Hor => "h",
            Self::Dc => "dc",
            Self::DiagDownLeft => "diag_downleft",
            Self::DiagDownRight => "diag_downright",
            Self::VertRight => "vert_right",
            Self::HorDown => "hor_down",
            Self::VertLeft => "vert_left",
            Self::HorUp => "hor_up",
            Self::TmVp8 => "tm",
            Self::LeftDc => "dc_left",
            Self::TopDc => "dc_top",
            Self::Dc128 => "dc_128",
            Self::Dc127 => "dc_127",
            Self::Dc129 => "dc_129",
        }
    }
}

impl fmt::Display for IntraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full index of one motion-compensation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct McIndex {
    /// Block size class.
    pub size: BlockSize,
    /// Interpolation filter.
    pub filter: FilterKind,
    /// Accumulation mode.
    pub op: Accumulation,
    /// Horizontal sub-pixel phase present.
    pub h: bool,
    /// Vertical sub-pixel phase present.
    pub v: bool,
}

impl McIndex {
    /// Creates an index from its components.
    #[inline]
    pub const fn new(
        size: BlockSize,
        filter: FilterKind,
        op: Accumulation,
        h: bool,
        v: bool,
    ) -> Self {
        Self {
            size,
            filter,
            op,
            h,
            v,
        }
    }

    /// The full-pel cell (no sub-pixel offset on either axis).
    #[inline]
    pub const fn full_pel(size: BlockSize, filter: FilterKind, op: Accumulation) -> Self {
        Self::new(size, filter, op, false, false)
    }

    /// The cell served by a one-dimensional interpolation kernel.
    #[inline]
    pub const fn subpel(
        size: BlockSize,
        filter: FilterKind,
        op: Accumulation,
        dir: SubpelDir,
    ) -> Self {
        let (h, v) = dir.phase();
        Self::new(size, filter, op, h, v)
    }

    /// Iterates every valid motion-compensation index in table order.
    pub fn all() -> impl Iterator<Item = McIndex> {
        BlockSize::all_values().iter().flat_map(|&size| {
            FilterKind::all_values().iter().flat_map(move |&filter| {
                Accumulation::all_values().iter().flat_map(move |&op| {
                    [false, true].into_iter().flat_map(move |h| {
                        [false, true]
                            .into_iter()
                            .map(move |v| McIndex::new(size, filter, op, h, v))
                    })
                })
            })
        })
    }
}

impl fmt::Display for McIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mc[{}][{}][{}][{}][{}]",
            self.size, self.filter, self.op, self.h as u8, self.v as u8
        )
    }
}

/// Full index of one intra-prediction cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntraIndex {
    /// Transform size.
    pub tx: TxSize,
    /// Prediction mode.
    pub mode: IntraMode,
}

impl IntraIndex {
    /// Creates an index from its components.
    #[inline]
    pub const fn new(tx: TxSize, mode: IntraMode) -> Self {
        Self { tx, mode }
    }

    /// Iterates every valid intra-prediction index in table order.
    pub fn all() -> impl Iterator<Item = IntraIndex> {
        TxSize::all_values().iter().flat_map(|&tx| {
            IntraMode::all_values()
                .iter()
                .map(move |&mode| IntraIndex::new(tx, mode))
        })
    }
}

impl fmt::Display for IntraIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intra_pred[{}][{}]", self.tx, self.mode)
    }
}
