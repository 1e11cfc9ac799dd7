//! Mathematical operations for color management
//!
//! - 3x3 matrix operations for RGB↔XYZ transforms and LUT matrix elements
//! - Gamma and ICC parametric transfer functions

pub mod gamma;
pub mod matrix;

pub use gamma::{ParametricCurve, srgb_gamma_decode, srgb_gamma_encode};
pub use matrix::Matrix3x3;
