//! Reference white points
//!
//! Lab conversions are relative to a white point. The two in common use by
//! ICC workflows are available; D50 is the profile connection space white.

use crate::color::Xyz;

/// A white point definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    /// Name of the illuminant
    pub name: &'static str,
    /// CIE XYZ coordinates (Y normalized to 1.0)
    pub xyz: Xyz,
}

impl WhitePoint {
    /// Create a new white point
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x, y, z),
        }
    }
}

impl Default for WhitePoint {
    fn default() -> Self {
        D50
    }
}

/// CIE Standard Illuminant D50, the ICC PCS white
pub const D50: WhitePoint = WhitePoint::new("D50", 0.9642, 1.0, 0.8249);

/// CIE Standard Illuminant D65 (noon daylight, sRGB white)
pub const D65: WhitePoint = WhitePoint::new("D65", 0.9504, 1.0, 1.0891);
