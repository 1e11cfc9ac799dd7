//! Pipeline Stages
//!
//! Nodes for the elements of an ICC lookup table tag. They operate on raw
//! `Vector<f64, N>` values in [0, 1]; the loader types the two ends of the
//! chain once it is assembled.

use crate::color::Vector;
use crate::icc::{Curve, LutMatrix};
use crate::math::Matrix3x3;
use crate::node::{BoxNode, Node};

/// One curve per channel
#[derive(Debug, Clone)]
pub struct Curves<const N: usize> {
    curves: Vec<Curve>,
    inverse: bool,
}

impl<const N: usize> Curves<N> {
    /// Forward curves; missing trailing curves act as identity
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves, inverse: false }
    }

    /// Inverse curves, as used on the way out of a matrix-shaper profile
    pub fn inverse(curves: Vec<Curve>) -> Self {
        Self { curves, inverse: true }
    }

    /// True when every curve passes values through unchanged
    pub fn is_identity(&self) -> bool {
        self.curves.iter().all(Curve::is_identity)
    }
}

impl<const N: usize> Node<Vector<f64, N>, Vector<f64, N>> for Curves<N> {
    fn eval(&self, x: &Vector<f64, N>) -> Vector<f64, N> {
        let mut out = *x;
        for (v, curve) in out.0.iter_mut().zip(&self.curves) {
            *v = if self.inverse {
                curve.eval_inverse(*v)
            } else {
                curve.eval(*v)
            };
        }
        out
    }

    fn duplicate(&self) -> BoxNode<Vector<f64, N>, Vector<f64, N>> {
        Box::new(self.clone())
    }
}

/// 3x3 matrix followed by an offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixStage {
    pub matrix: Matrix3x3,
    pub offset: [f64; 3],
}

impl MatrixStage {
    pub fn new(matrix: Matrix3x3) -> Self {
        Self {
            matrix,
            offset: [0.0; 3],
        }
    }

    /// Uniform scale of all three channels
    pub fn scale(factor: f64) -> Self {
        Self::new(Matrix3x3::diagonal(factor, factor, factor))
    }

    pub fn is_identity(&self) -> bool {
        self.matrix.is_identity(1e-6) && self.offset.iter().all(|o| o.abs() < 1e-6)
    }
}

impl From<LutMatrix> for MatrixStage {
    fn from(m: LutMatrix) -> Self {
        Self {
            matrix: m.matrix,
            offset: m.offset,
        }
    }
}

impl Node<Vector<f64, 3>, Vector<f64, 3>> for MatrixStage {
    fn eval(&self, x: &Vector<f64, 3>) -> Vector<f64, 3> {
        let v = self.matrix.multiply_vec(x.0);
        Vector::new([
            v[0] + self.offset[0],
            v[1] + self.offset[1],
            v[2] + self.offset[2],
        ])
    }

    fn duplicate(&self) -> BoxNode<Vector<f64, 3>, Vector<f64, 3>> {
        Box::new(*self)
    }
}

/// XYZ stored in a LUT tag is u1Fixed15: 1.0 is encoded as 32768 / 65535
pub const LUT_XYZ_SCALE: f64 = 65535.0 / 32768.0;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_curves_forward_and_inverse() {
        let curves = vec![Curve::Gamma(2.0), Curve::Identity];
        let forward = Curves::<3>::new(curves.clone());
        let inverse = Curves::<3>::inverse(curves);

        let x = Vector::new([0.5, 0.25, 0.75]);
        let y = forward.eval(&x);
        assert!((y[0] - 0.25).abs() < EPSILON);
        assert_eq!(y[1], 0.25);
        // No curve for the third channel
        assert_eq!(y[2], 0.75);

        let back = inverse.eval(&y);
        assert!((back[0] - 0.5).abs() < EPSILON, "{:?}", back);
        assert!(!forward.is_identity());
    }

    #[test]
    fn test_matrix_offset() {
        let stage = MatrixStage {
            matrix: Matrix3x3::diagonal(2.0, 1.0, 0.5),
            offset: [0.1, 0.0, -0.1],
        };
        let y = stage.eval(&Vector::new([0.5, 0.5, 0.5]));
        assert!((y[0] - 1.1).abs() < EPSILON);
        assert!((y[1] - 0.5).abs() < EPSILON);
        assert!((y[2] - 0.15).abs() < EPSILON);
        assert!(!stage.is_identity());
        assert!(MatrixStage::scale(1.0).is_identity());
    }

    #[test]
    fn test_lut_xyz_scale() {
        let y = MatrixStage::scale(LUT_XYZ_SCALE).eval(&Vector::new([32768.0 / 65535.0; 3]));
        assert!((y[0] - 1.0).abs() < EPSILON);
    }
}
