//! ICC Profile Parsing
//!
//! Native decoding of the parts of ICC.1:2022 a transform is built from.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table listing all tags
//! 3. Tag data (may overlap)
//!
//! # Supported Tags
//!
//! - XYZType colorants and white point
//! - curv and para tone curves
//! - mft1, mft2, mAB and mBA lookup tables
//!
//! Reserved bytes are checked: a nonzero byte where the format requires
//! zero fails with [`IccError::NonZeroPadding`].
//!
//! # Example
//!
//! ```ignore
//! use iccflow_core::icc::IccProfile;
//!
//! let profile = IccProfile::parse(&bytes)?;
//! if profile.is_matrix_shaper() {
//!     let colorants = profile.colorant_matrix()?;
//! }
//! ```

pub mod header;
pub mod tags;

mod error;
mod parser;
mod types;

pub use error::IccError;
pub use header::{ColorSpace, IccHeader, ProfileClass};
pub use parser::IccProfile;
pub use tags::{ClutGrid, Curve, LegacyLut, LutAb, LutDirection, LutMatrix, TagData};
pub use types::{Reader, TagSignature, TypeSignature};
