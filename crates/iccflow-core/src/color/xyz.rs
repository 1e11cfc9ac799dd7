//! CIE XYZ Color Space
//!
//! XYZ is one of the two ICC profile connection spaces and the hub most
//! registry conversions pass through.

use super::vector::Coordinate;

/// CIE 1931 XYZ color coordinates (Y normalized to 1.0 for white)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Xyz {
    /// X tristimulus value
    pub x: f64,
    /// Y tristimulus value (luminance)
    pub y: f64,
    /// Z tristimulus value
    pub z: f64,
}

impl Xyz {
    /// Create a new XYZ color
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create XYZ from an array
    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Check if approximately equal to another XYZ color
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Coordinate for Xyz {
    type Scalar = f64;
    const CHANNELS: usize = 3;

    #[inline]
    fn get(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    fn set(&mut self, i: usize, value: f64) {
        match i {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
    }
}

unsafe impl bytemuck::Zeroable for Xyz {}
unsafe impl bytemuck::Pod for Xyz {}
