//! # cms-tests
//!
//! Integration and parity testing for iccflow.
//!
//! This crate provides:
//! - Synthetic ICC profile builders for loader tests
//! - Seeded input generators
//! - Accuracy measurements using deltaE2000
//!
//! ## Reference Implementation
//!
//! - **lcms2**: Industry standard, full ICC support. Its virtual XYZ and
//!   Lab v4 profiles and its serialized sRGB profile are the parity
//!   baselines.
//!
//! ## Test Categories
//!
//! 1. **Nodes**: composition, duplication and adapter resolution
//! 2. **CLUT**: interpolation accuracy, edges and permutation tables
//! 3. **Profiles**: ICC parsing, malformed input and tag caching
//! 4. **Concurrency**: one transform shared across threads
//! 5. **Parity**: conversions checked against lcms2

pub mod accuracy;
pub mod fixtures;
pub mod patterns;

pub use accuracy::{DeltaEStats, compare_lab, delta_e_2000};
pub use fixtures::{IccBuilder, init_tracing};
