//! Malformed profile data
//!
//! Kept apart from "no transform": every variant here means the bytes are
//! wrong, not that two color spaces cannot be bridged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IccError {
    #[error("profile too small: expected {expected} bytes, got {actual}")]
    TooSmall { expected: usize, actual: usize },

    #[error("invalid profile signature 0x{0:08X}, expected 'acsp'")]
    InvalidSignature(u32),

    #[error("header declares {header_size} bytes but the data has {actual_size}")]
    SizeMismatch { header_size: u32, actual_size: usize },

    #[error("tag 0x{tag:08X} at {offset}+{size} runs past the {profile_size} byte profile")]
    TagOutOfBounds {
        tag: u32,
        offset: u32,
        size: u32,
        profile_size: usize,
    },

    /// Reserved bytes that must be zero were not
    #[error("nonzero padding at byte {offset}")]
    NonZeroPadding { offset: usize },

    /// Tag type cannot be turned into a transform
    #[error("type 0x{type_sig:08X} is not valid for tag 0x{tag:08X}")]
    InvalidTagType { tag: u32, type_sig: u32 },

    /// Channel count outside 1..=15, or a PCS side without 3 channels
    #[error("unsupported channel layout: {inputs} inputs, {outputs} outputs")]
    UnsupportedChannels { inputs: usize, outputs: usize },

    /// CLUT element size other than 1 or 2 bytes
    #[error("invalid clut element size {0}")]
    InvalidClutPrecision(u8),

    /// Curve inside a curve set is neither curv nor para
    #[error("unknown curve type 0x{0:08X}")]
    UnknownCurveType(u32),

    #[error("invalid color space 0x{0:08X}")]
    InvalidColorSpace(u32),

    #[error("invalid profile class 0x{0:08X}")]
    InvalidProfileClass(u32),

    #[error("invalid rendering intent {0}")]
    InvalidRenderingIntent(u32),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}
