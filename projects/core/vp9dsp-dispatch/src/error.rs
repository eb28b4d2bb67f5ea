//! Error types for capability parsing.

use alloc::string::String;
use thiserror::Error;

/// Errors that can occur while parsing a capability description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityParseError {
    /// A flag name that does not correspond to any known extension.
    #[error(
        "Unknown CPU flag: '{0}'. Valid flags are: rvi, rvf, rvd, rvv-i32, rvv-f32, rvv-i64, \
         rvv-f64, zbb, zba, zvbb, misaligned, rvb, none"
    )]
    UnknownFlag(String),

    /// A numeric field that could not be parsed.
    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber {
        /// The field being parsed
        field: &'static str,
        /// The text that failed to parse
        value: String,
    },

    /// A vector length that no implementation can report.
    #[error("Invalid vector length: {0} bits. Must be 0 or a power of two of at least 32.")]
    InvalidVectorLength(u32),

    /// A native register width other than 32, 64 or 128 bits.
    #[error("Invalid register width: {0} bits. Must be 32, 64 or 128.")]
    InvalidRegisterWidth(u32),
}
