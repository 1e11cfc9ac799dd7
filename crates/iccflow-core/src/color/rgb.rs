//! RGB Color Primitives
//!
//! `Rgb<S>` is device RGB with a scalar kind per channel. `Rgb<f64>` is the
//! registry's canonical RGB; 8 and 16 bit variants convert through it by
//! rescaling with the cube size ratio.

use super::scalar::Scalar;
use super::vector::Coordinate;

/// RGB color with channels of scalar kind `S`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Rgb<S> {
    /// Red component
    pub r: S,
    /// Green component
    pub g: S,
    /// Blue component
    pub b: S,
}

impl<S: Scalar> Rgb<S> {
    /// Create a new RGB color
    #[inline]
    pub const fn new(r: S, g: S, b: S) -> Self {
        Self { r, g, b }
    }

    /// Create RGB from an array
    #[inline]
    pub const fn from_array(arr: [S; 3]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
        }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [S; 3] {
        [self.r, self.g, self.b]
    }

    /// Rescale into another scalar kind
    ///
    /// `u8 -> u16` maps 255 to 65535; integer targets round and saturate.
    pub fn rescale<T: Scalar>(&self) -> Rgb<T> {
        let ratio = T::CUBE_SIZE.to_f64() / S::CUBE_SIZE.to_f64();
        Rgb {
            r: T::from_f64(self.r.to_f64() * ratio),
            g: T::from_f64(self.g.to_f64() * ratio),
            b: T::from_f64(self.b.to_f64() * ratio),
        }
    }
}

impl<S: Scalar> Coordinate for Rgb<S> {
    type Scalar = S;
    const CHANNELS: usize = 3;

    #[inline]
    fn get(&self, i: usize) -> S {
        match i {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    #[inline]
    fn set(&mut self, i: usize, value: S) {
        match i {
            0 => self.r = value,
            1 => self.g = value,
            _ => self.b = value,
        }
    }
}

// SAFETY: repr(C) with three fields of the same Pod type, so there is no
// padding.
unsafe impl bytemuck::Zeroable for Rgb<u8> {}
unsafe impl bytemuck::Pod for Rgb<u8> {}
unsafe impl bytemuck::Zeroable for Rgb<u16> {}
unsafe impl bytemuck::Pod for Rgb<u16> {}
unsafe impl bytemuck::Zeroable for Rgb<f64> {}
unsafe impl bytemuck::Pod for Rgb<f64> {}
