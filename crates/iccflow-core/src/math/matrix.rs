//! 3x3 matrices for the RGB/XYZ conversions, the matrix-shaper pipeline
//! and the matrix element of ICC LUT tags.

/// Row-major 3x3 matrix, `m[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[f64; 3]; 3],
}

impl Matrix3x3 {
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self {
            m: [[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]],
        }
    }

    /// M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        self.m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
    }

    /// Cofactor of element (r, c), sign included
    fn cofactor(&self, r: usize, c: usize) -> f64 {
        let (r0, r1) = ((r + 1) % 3, (r + 2) % 3);
        let (c0, c1) = ((c + 1) % 3, (c + 2) % 3);
        // Cyclic index order folds the (-1)^(r+c) sign in
        self.m[r0][c0] * self.m[r1][c1] - self.m[r0][c1] * self.m[r1][c0]
    }

    /// Inverse, or None for a singular matrix
    pub fn inverse(&self) -> Option<Self> {
        let det: f64 = (0..3).map(|c| self.m[0][c] * self.cofactor(0, c)).sum();
        if det.abs() < 1e-14 {
            return None;
        }
        let mut m = [[0.0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                // Adjugate is the transposed cofactor matrix
                *v = self.cofactor(c, r) / det;
            }
        }
        Some(Self { m })
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        let id = Self::identity();
        self.m
            .iter()
            .flatten()
            .zip(id.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Linear sRGB to XYZ, D65 primaries without adaptation
pub const SRGB_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
]);

/// XYZ to linear sRGB, inverse of [`SRGB_TO_XYZ`] to six places
pub const XYZ_TO_SRGB: Matrix3x3 = Matrix3x3::new([
    [3.240479, -1.537150, -0.498535],
    [-0.969256, 1.875992, 0.041556],
    [0.055648, -0.204043, 1.057311],
]);
