//! BGR pixel layout
//!
//! Same device RGB as [`Rgb`], stored blue first. Channel indices follow
//! memory order, so channel 0 is blue.

use super::rgb::Rgb;
use super::scalar::Scalar;
use super::vector::Coordinate;

/// RGB color stored as blue, green, red
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Bgr<S> {
    pub b: S,
    pub g: S,
    pub r: S,
}

impl<S: Scalar> Bgr<S> {
    #[inline]
    pub const fn new(b: S, g: S, r: S) -> Self {
        Self { b, g, r }
    }

    /// Rescale into another scalar kind, see [`Rgb::rescale`]
    pub fn rescale<T: Scalar>(&self) -> Bgr<T> {
        Rgb::from(*self).rescale::<T>().into()
    }
}

impl<S: Scalar> From<Rgb<S>> for Bgr<S> {
    #[inline]
    fn from(c: Rgb<S>) -> Self {
        Self::new(c.b, c.g, c.r)
    }
}

impl<S: Scalar> From<Bgr<S>> for Rgb<S> {
    #[inline]
    fn from(c: Bgr<S>) -> Self {
        Rgb::new(c.r, c.g, c.b)
    }
}

impl<S: Scalar> Coordinate for Bgr<S> {
    type Scalar = S;
    const CHANNELS: usize = 3;

    #[inline]
    fn get(&self, i: usize) -> S {
        match i {
            0 => self.b,
            1 => self.g,
            _ => self.r,
        }
    }

    #[inline]
    fn set(&mut self, i: usize, value: S) {
        match i {
            0 => self.b = value,
            1 => self.g = value,
            _ => self.r = value,
        }
    }
}

// SAFETY: same layout argument as Rgb: repr(C), three fields of one Pod type.
unsafe impl bytemuck::Zeroable for Bgr<u8> {}
unsafe impl bytemuck::Pod for Bgr<u8> {}
unsafe impl bytemuck::Zeroable for Bgr<u16> {}
unsafe impl bytemuck::Pod for Bgr<u16> {}
unsafe impl bytemuck::Zeroable for Bgr<f64> {}
unsafe impl bytemuck::Pod for Bgr<f64> {}
