//! Scalar channel kinds
//!
//! Every color coordinate stores its channels as one of a few scalar
//! kinds. The kind decides the normalization range ("cube size") and the
//! unit used for lookup table weights:
//!
//! | kind  | cube size | weight unit |
//! |-------|-----------|-------------|
//! | `u8`  | 255       | 256         |
//! | `u16` | 65535     | 65536       |
//! | `f64` | 1.0       | 1.0         |
//!
//! Integer kinds split grid coordinates with integer arithmetic, so the
//! weight of a sample sitting exactly on the far edge of a cell comes out
//! as the full weight unit rather than a rounded fraction of it.

use std::fmt::Debug;

/// A numeric channel type usable inside coordinates and lookup tables
pub trait Scalar: Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Largest value of the normalized range
    const CUBE_SIZE: Self;
    /// Weight unit for lookup table interpolation
    const ONE: f64;
    /// Short name used in diagnostics
    const NAME: &'static str;

    /// Widen to f64 without normalization
    fn to_f64(self) -> f64;

    /// Narrow from f64; integer kinds round and saturate
    fn from_f64(v: f64) -> Self;

    /// Grid spacing giving `steps` evenly spaced points over the cube
    ///
    /// Integer kinds truncate, like the division they stand for.
    fn grid_step(steps: usize) -> Self;

    /// Split a coordinate into a cell index and a weight in `ONE` units
    ///
    /// The cell index is not clamped here.
    fn split(self, step: Self) -> (usize, f64);

    /// Normalized value in [0, 1] for in-range inputs
    #[inline]
    fn normalized(self) -> f64 {
        self.to_f64() / Self::CUBE_SIZE.to_f64()
    }

    /// Inverse of [`Scalar::normalized`]
    #[inline]
    fn from_normalized(v: f64) -> Self {
        Self::from_f64(v * Self::CUBE_SIZE.to_f64())
    }
}

macro_rules! integer_scalar {
    ($t:ty, $one:expr) => {
        impl Scalar for $t {
            const CUBE_SIZE: Self = <$t>::MAX;
            const ONE: f64 = $one;
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v.round().clamp(0.0, <$t>::MAX as f64) as $t
            }

            #[inline]
            fn grid_step(steps: usize) -> Self {
                if steps < 2 {
                    return 0;
                }
                (<$t>::MAX as usize / (steps - 1)) as $t
            }

            #[inline]
            fn split(self, step: Self) -> (usize, f64) {
                let x = self as u64;
                let step = step.max(1) as u64;
                let one = $one as u64;
                let cell = x / step;
                let weight = x * one / step - cell * one;
                (cell as usize, weight as f64)
            }
        }
    };
}

integer_scalar!(u8, 256.0);
integer_scalar!(u16, 65536.0);

impl Scalar for f64 {
    const CUBE_SIZE: Self = 1.0;
    const ONE: f64 = 1.0;
    const NAME: &'static str = "f64";

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn grid_step(steps: usize) -> Self {
        if steps < 2 {
            return 0.0;
        }
        1.0 / (steps - 1) as f64
    }

    #[inline]
    fn split(self, step: Self) -> (usize, f64) {
        let div = self / step;
        // Negative inputs saturate to cell 0 and extrapolate through the weight
        let cell = div.floor().max(0.0) as usize;
        (cell, div - cell as f64)
    }
}
