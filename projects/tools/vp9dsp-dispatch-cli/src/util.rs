use vp9dsp_dispatch::{
    CpuFlags, IntraKernelId, IntraPredFn, KernelProvider, McFn, McKernelId,
};

/// Parses a comma-separated flag list for argh.
pub fn parse_cli_flags(value: &str) -> Result<CpuFlags, String> {
    CpuFlags::parse_list(value).map_err(|e| e.to_string())
}

/// Parses a vector register width for argh.
pub fn parse_cli_vlen(value: &str) -> Result<u32, String> {
    vp9dsp_dispatch::parse_vlen(value).map_err(|e| e.to_string())
}

/// Parses a native register width for argh.
pub fn parse_cli_xlen(value: &str) -> Result<u32, String> {
    vp9dsp_dispatch::parse_xlen(value).map_err(|e| e.to_string())
}

// Cells are filled with these but never called; the tool only reports kernel identities.
unsafe extern "C" fn placeholder_mc(
    _: *mut u8,
    _: isize,
    _: *const u8,
    _: isize,
    _: i32,
    _: i32,
    _: i32,
) {
}

unsafe extern "C" fn placeholder_intra_pred(_: *mut u8, _: isize, _: *const u8, _: *const u8) {}

/// Generic routine for every motion-compensation cell.
pub fn generic_mc() -> McFn {
    placeholder_mc
}

/// Generic routine for every intra-prediction cell.
pub fn generic_intra_pred() -> IntraPredFn {
    placeholder_intra_pred
}

/// Provider that hands out placeholders; selection only needs the identities.
pub struct PlaceholderKernels;

impl KernelProvider for PlaceholderKernels {
    fn mc(&self, _kernel: McKernelId) -> McFn {
        placeholder_mc
    }

    fn intra_pred(&self, _kernel: IntraKernelId) -> IntraPredFn {
        placeholder_intra_pred
    }
}
