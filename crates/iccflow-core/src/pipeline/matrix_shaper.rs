//! Matrix-Shaper Pipeline
//!
//! Matrix-shaper profiles (sRGB, Display P3 and most other RGB profiles)
//! consist of:
//! 1. One TRC per channel - decode to linear
//! 2. A 3x3 colorant matrix - linear RGB to XYZ
//!
//! Device to PCS is `matrix ∘ curves`, PCS to device is
//! `inverse curves ∘ inverse matrix`.

use crate::color::{Rgb, Xyz};
use crate::icc::{Curve, IccError, IccProfile, TagSignature};
use crate::math::Matrix3x3;
use crate::node::{BoxNode, Node};

/// Shaper curves and colorant matrix of an RGB profile
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixShaper {
    /// Red, green, blue
    pub curves: [Curve; 3],
    /// Colorants as columns
    pub matrix: Matrix3x3,
}

impl MatrixShaper {
    /// Read the six shaper tags, None when the profile lacks any of them
    pub fn from_profile(profile: &IccProfile) -> Result<Option<Self>, IccError> {
        if !profile.is_matrix_shaper() {
            return Ok(None);
        }
        let Some(matrix) = profile.colorant_matrix()? else {
            return Ok(None);
        };
        let mut curves = [Curve::Identity, Curve::Identity, Curve::Identity];
        let sigs = [TagSignature::RED_TRC, TagSignature::GREEN_TRC, TagSignature::BLUE_TRC];
        for (curve, sig) in curves.iter_mut().zip(sigs) {
            let Some(c) = profile.curve(sig)? else {
                return Ok(None);
            };
            *curve = c;
        }
        Ok(Some(Self { curves, matrix }))
    }

    /// Device RGB to XYZ
    pub fn to_pcs(&self) -> BoxNode<Rgb<f64>, Xyz> {
        Box::new(ShaperToXyz {
            curves: self.curves.clone(),
            matrix: self.matrix,
        })
    }

    /// XYZ to device RGB; fails when the colorant matrix is singular
    pub fn from_pcs(&self) -> Result<BoxNode<Xyz, Rgb<f64>>, IccError> {
        let inverse = self
            .matrix
            .inverse()
            .ok_or_else(|| IccError::CorruptedData("colorant matrix is singular".to_string()))?;
        Ok(Box::new(XyzToShaper {
            inverse,
            curves: self.curves.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
struct ShaperToXyz {
    curves: [Curve; 3],
    matrix: Matrix3x3,
}

impl Node<Rgb<f64>, Xyz> for ShaperToXyz {
    fn eval(&self, x: &Rgb<f64>) -> Xyz {
        let [r, g, b] = x.to_array();
        let linear = [
            self.curves[0].eval(r),
            self.curves[1].eval(g),
            self.curves[2].eval(b),
        ];
        let [x, y, z] = self.matrix.multiply_vec(linear);
        Xyz::new(x, y, z)
    }

    fn duplicate(&self) -> BoxNode<Rgb<f64>, Xyz> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
struct XyzToShaper {
    inverse: Matrix3x3,
    curves: [Curve; 3],
}

impl Node<Xyz, Rgb<f64>> for XyzToShaper {
    fn eval(&self, x: &Xyz) -> Rgb<f64> {
        let [r, g, b] = self.inverse.multiply_vec([x.x, x.y, x.z]);
        Rgb::new(
            self.curves[0].eval_inverse(r),
            self.curves[1].eval_inverse(g),
            self.curves[2].eval_inverse(b),
        )
    }

    fn duplicate(&self) -> BoxNode<Xyz, Rgb<f64>> {
        Box::new(self.clone())
    }
}
