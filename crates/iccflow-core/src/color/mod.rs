//! Color coordinates and scalar kinds
//!
//! This module provides:
//! - scalar kinds (`u8`, `u16`, `f64`) with cube size and weight unit
//! - the [`Coordinate`] channel view and the generic [`Vector`]
//! - CIE XYZ and CIELAB
//! - RGB with a scalar kind per channel, and its blue-first BGR layout
//! - White point definitions

pub mod bgr;
pub mod lab;
pub mod rgb;
pub mod scalar;
pub mod vector;
pub mod white_point;
pub mod xyz;

pub use bgr::Bgr;
pub use lab::Lab;
pub use rgb::Rgb;
pub use scalar::Scalar;
pub use vector::{Coordinate, Vector};
pub use white_point::{D50, D65, WhitePoint};
pub use xyz::Xyz;
