//! Fixed-size coordinate tuples
//!
//! [`Coordinate`] is the channel-level view every color type exposes to
//! the lookup table and the per-channel pipeline stages. [`Vector`] is the
//! generic N-channel coordinate used for device spaces and for the raw
//! values flowing between ICC pipeline elements.

use std::fmt::Debug;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use super::scalar::Scalar;

/// Channel access shared by all color coordinates
///
/// The channel count is part of the type and never varies at runtime.
pub trait Coordinate: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Channel type
    type Scalar: Scalar;
    /// Number of channels
    const CHANNELS: usize;

    /// Read channel `i`
    fn get(&self, i: usize) -> Self::Scalar;

    /// Write channel `i`
    fn set(&mut self, i: usize, value: Self::Scalar);

    /// Coordinate with every channel set to `value`
    fn splat(value: Self::Scalar) -> Self {
        let mut out = Self::default();
        for i in 0..Self::CHANNELS {
            out.set(i, value);
        }
        out
    }
}

/// N-channel coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vector<S, const N: usize>(pub [S; N]);

impl<S: Scalar, const N: usize> Vector<S, N> {
    /// Create from an array
    #[inline]
    pub const fn new(values: [S; N]) -> Self {
        Self(values)
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(self) -> [S; N] {
        self.0
    }

    /// Squared euclidean norm, computed in f64
    pub fn module2(&self) -> f64 {
        self.0.iter().map(|v| v.to_f64() * v.to_f64()).sum()
    }
}

impl<S: Scalar, const N: usize> Default for Vector<S, N> {
    fn default() -> Self {
        Self([S::default(); N])
    }
}

// SAFETY: repr(transparent) over [S; N] with S: Pod, so no padding and every
// bit pattern is valid.
unsafe impl<S: Scalar + bytemuck::Zeroable, const N: usize> bytemuck::Zeroable for Vector<S, N> {}
unsafe impl<S: Scalar + bytemuck::Pod, const N: usize> bytemuck::Pod for Vector<S, N> {}

impl<S: Scalar, const N: usize> From<[S; N]> for Vector<S, N> {
    fn from(values: [S; N]) -> Self {
        Self(values)
    }
}

impl<S, const N: usize> Index<usize> for Vector<S, N> {
    type Output = S;

    #[inline]
    fn index(&self, i: usize) -> &S {
        &self.0[i]
    }
}

impl<S, const N: usize> IndexMut<usize> for Vector<S, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut S {
        &mut self.0[i]
    }
}

impl<S: Scalar, const N: usize> Coordinate for Vector<S, N> {
    type Scalar = S;
    const CHANNELS: usize = N;

    #[inline]
    fn get(&self, i: usize) -> S {
        self.0[i]
    }

    #[inline]
    fn set(&mut self, i: usize, value: S) {
        self.0[i] = value;
    }
}

// Elementwise arithmetic goes through f64 so integer kinds saturate
// instead of wrapping.
impl<S: Scalar, const N: usize> Add for Vector<S, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.0[i] = S::from_f64(self.0[i].to_f64() + rhs.0[i].to_f64());
        }
        out
    }
}

impl<S: Scalar, const N: usize> Sub for Vector<S, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.0[i] = S::from_f64(self.0[i].to_f64() - rhs.0[i].to_f64());
        }
        out
    }
}

impl<S: Scalar, const N: usize> Mul<f64> for Vector<S, N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        let mut out = self;
        for i in 0..N {
            out.0[i] = S::from_f64(self.0[i].to_f64() * rhs);
        }
        out
    }
}
