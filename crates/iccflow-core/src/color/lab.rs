//! CIELAB (L*a*b*) Color Space
//!
//! - L*: Lightness (0 = black, 100 = white)
//! - a*: Green-red axis (negative = green, positive = red)
//! - b*: Blue-yellow axis (negative = blue, positive = yellow)
//!
//! The conversions use the classic CIE piecewise constants (0.008856,
//! 903.3, 7.787, 16/116) against a selectable white point.

use super::vector::Coordinate;
use super::white_point::WhitePoint;
use super::xyz::Xyz;

/// Linear segment threshold on the relative tristimulus value
const EPSILON: f64 = 0.008856;
/// Lightness slope of the linear segment
const KAPPA: f64 = 903.3;
/// Slope of f(t) on the linear segment
const SLOPE: f64 = 7.787;
/// Offset of f(t) on the linear segment
const OFFSET: f64 = 16.0 / 116.0;

/// CIELAB color coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Lab {
    /// Lightness (0 to 100)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    /// Create a new Lab color
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Convert from XYZ relative to `white`
    pub fn from_xyz_with_white(xyz: Xyz, white: &WhitePoint) -> Self {
        let yr = xyz.y / white.xyz.y;
        let l = if yr > EPSILON {
            116.0 * yr.cbrt() - 16.0
        } else {
            KAPPA * yr
        };

        let fy = lab_f(yr);
        Self {
            l,
            a: 500.0 * (lab_f(xyz.x / white.xyz.x) - fy),
            b: 200.0 * (fy - lab_f(xyz.z / white.xyz.z)),
        }
    }

    /// Convert to XYZ relative to `white`
    pub fn to_xyz_with_white(&self, white: &WhitePoint) -> Xyz {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        let yr = if self.l > KAPPA * EPSILON {
            fy * fy * fy
        } else {
            self.l / KAPPA
        };

        Xyz::new(
            white.xyz.x * lab_f_inv(fx),
            white.xyz.y * yr,
            white.xyz.z * lab_f_inv(fz),
        )
    }

    /// Check if approximately equal to another Lab color
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.l - other.l).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
    }
}

impl Coordinate for Lab {
    type Scalar = f64;
    const CHANNELS: usize = 3;

    #[inline]
    fn get(&self, i: usize) -> f64 {
        match i {
            0 => self.l,
            1 => self.a,
            _ => self.b,
        }
    }

    #[inline]
    fn set(&mut self, i: usize, value: f64) {
        match i {
            0 => self.l = value,
            1 => self.a = value,
            _ => self.b = value,
        }
    }
}

unsafe impl bytemuck::Zeroable for Lab {}
unsafe impl bytemuck::Pod for Lab {}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        SLOPE * t + OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - OFFSET) / SLOPE
    }
}
