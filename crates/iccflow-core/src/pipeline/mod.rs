//! Color Transform Pipeline
//!
//! Builds transform nodes out of decoded ICC tags:
//! - Matrix-shaper profiles: TRC curves and a colorant matrix
//! - LUT-based profiles: mft1, mft2, mAB and mBA element chains
//!
//! # Pipeline Architecture
//!
//! A profile contributes two halves:
//! 1. device → PCS (A2B tags or matrix-shaper forward)
//! 2. PCS → device (B2A tags or matrix-shaper inverse)
//!
//! A transform between two profiles is the first half of the source
//! joined with the second half of the destination, with registry
//! conversions bridging the two PCS types when they differ.

mod context;
mod lut;
mod matrix_shaper;
mod stages;

pub use context::{RenderingIntent, TransformOptions};
pub use lut::{Endpoints, device_to_pcs, legacy, lut_ab, pcs_to_device};
pub use matrix_shaper::MatrixShaper;
pub use stages::{Curves, LUT_XYZ_SCALE, MatrixStage};
