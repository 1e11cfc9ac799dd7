//! LUT Pipeline
//!
//! Turns decoded lookup table tags into nodes. The element chain is built
//! on raw vectors with the channel counts fixed at compile time, then the
//! two ends are typed:
//!
//! - PCS Lab: the vector encoding is decoded to [`Lab`]
//! - PCS XYZ: the u1Fixed15 scale is undone and the vector becomes [`Xyz`]
//! - RGB device data with 3 channels becomes [`Rgb<f64>`]
//! - every other device keeps its `Vector<f64, N>`
//!
//! Tables on Lab interpolate multilinearly, everything else tetrahedrally,
//! unless the caller forces a mode. Curve sets made only of identity curves
//! are left out of the chain.

use crate::clut::{Clut, Interpolation};
use crate::color::{Lab, Rgb, Vector, Xyz};
use crate::convert::{LabDecode, LabEncode, Reinterpret};
use crate::error::Result;
use crate::icc::{ClutGrid, ColorSpace, Curve, IccError, LegacyLut, LutAb, LutDirection, TagData, TagSignature};
use crate::node::{AnyNode, BoxNode, Identity, Space, compose, recast};

use super::stages::{Curves, LUT_XYZ_SCALE, MatrixStage};

/// Run `$body` with `$c` bound as a const to the runtime channel count
macro_rules! by_channels {
    ($n:expr, $c:ident => $body:expr, else $fallback:expr) => {
        by_channels!(@arms $n, $c, $body, $fallback, 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15)
    };
    (@arms $n:expr, $c:ident, $body:expr, $fallback:expr, $($k:literal)*) => {
        match $n {
            $($k => {
                const $c: usize = $k;
                $body
            })*
            _ => $fallback,
        }
    };
}

/// Color spaces on each side of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoints {
    pub device: ColorSpace,
    pub pcs: ColorSpace,
    /// Overrides the per-PCS default
    pub interpolation: Option<Interpolation>,
}

impl Endpoints {
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation.unwrap_or(match self.pcs {
            ColorSpace::Lab => Interpolation::Multilinear,
            _ => Interpolation::Tetrahedral,
        })
    }
}

/// Node for an A2B tag: device values in, PCS values out
pub fn device_to_pcs(tag: &TagData, sig: TagSignature, ends: &Endpoints) -> Result<AnyNode> {
    let (inputs, outputs) = channels(tag, sig)?;
    if outputs != 3 {
        return Err(IccError::UnsupportedChannels { inputs, outputs }.into());
    }
    let interpolation = ends.interpolation();
    by_channels!(inputs, I => {
        let raw = build::<I, 3>(tag, sig, interpolation)?;
        Ok(type_device_to_pcs::<I>(raw, ends))
    }, else Err(IccError::UnsupportedChannels { inputs, outputs }.into()))
}

/// Node for a B2A tag: PCS values in, device values out
pub fn pcs_to_device(tag: &TagData, sig: TagSignature, ends: &Endpoints) -> Result<AnyNode> {
    let (inputs, outputs) = channels(tag, sig)?;
    if inputs != 3 {
        return Err(IccError::UnsupportedChannels { inputs, outputs }.into());
    }
    let interpolation = ends.interpolation();
    by_channels!(outputs, O => {
        let raw = build::<3, O>(tag, sig, interpolation)?;
        Ok(type_pcs_to_device::<O>(raw, ends))
    }, else Err(IccError::UnsupportedChannels { inputs, outputs }.into()))
}

fn channels(tag: &TagData, sig: TagSignature) -> Result<(usize, usize)> {
    match tag {
        TagData::Lut(lut) => Ok((lut.inputs, lut.outputs)),
        TagData::LutAb(lut) => Ok((lut.inputs, lut.outputs)),
        _ => Err(IccError::CorruptedData(format!("tag {} is not a lookup table", sig)).into()),
    }
}

fn build<const I: usize, const O: usize>(
    tag: &TagData,
    sig: TagSignature,
    interpolation: Interpolation,
) -> Result<BoxNode<Vector<f64, I>, Vector<f64, O>>> {
    match tag {
        TagData::Lut(lut) => legacy::<I, O>(lut, interpolation),
        TagData::LutAb(lut) => lut_ab::<I, O>(lut, interpolation),
        _ => Err(IccError::CorruptedData(format!("tag {} is not a lookup table", sig)).into()),
    }
}

/// mft1 / mft2: output curves ∘ CLUT ∘ input curves ∘ matrix
pub fn legacy<const I: usize, const O: usize>(
    lut: &LegacyLut,
    interpolation: Interpolation,
) -> Result<BoxNode<Vector<f64, I>, Vector<f64, O>>> {
    let mut node = preceded_by(curves::<I>(&lut.input_curves), clut::<I, O>(&lut.clut, interpolation)?);
    let stage = MatrixStage::new(lut.matrix);
    if I == 3 && !stage.is_identity() {
        node = compose(node, matrix::<I>(stage)?);
    }
    Ok(followed_by(node, curves::<O>(&lut.output_curves)))
}

/// mAB: B ∘ Matrix ∘ M ∘ CLUT ∘ A, mBA: A ∘ CLUT ∘ M ∘ Matrix ∘ B
pub fn lut_ab<const I: usize, const O: usize>(
    lut: &LutAb,
    interpolation: Interpolation,
) -> Result<BoxNode<Vector<f64, I>, Vector<f64, O>>> {
    let grid = match &lut.clut {
        Some(grid) => clut::<I, O>(grid, interpolation)?,
        None => {
            let identity: BoxNode<Vector<f64, I>, Vector<f64, I>> = Box::new(Identity::new());
            recast(identity).ok_or(IccError::UnsupportedChannels {
                inputs: I,
                outputs: O,
            })?
        }
    };
    let a_curves = lut.a_curves.as_deref().unwrap_or(&[]);
    let m_curves = lut.m_curves.as_deref().unwrap_or(&[]);

    match lut.direction {
        LutDirection::AToB => {
            let node = preceded_by(curves::<I>(a_curves), grid);
            let mut node = followed_by(node, curves::<O>(m_curves));
            if let Some(m) = lut.matrix {
                node = compose(matrix::<O>(m.into())?, node);
            }
            Ok(followed_by(node, curves::<O>(&lut.b_curves)))
        }
        LutDirection::BToA => {
            let mut node = preceded_by(curves::<I>(m_curves), grid);
            if let Some(m) = lut.matrix {
                node = compose(node, matrix::<I>(m.into())?);
            }
            let node = preceded_by(curves::<I>(&lut.b_curves), node);
            Ok(followed_by(node, curves::<O>(a_curves)))
        }
    }
}

type Stage<const N: usize> = BoxNode<Vector<f64, N>, Vector<f64, N>>;

/// Curve stage, None when every curve passes values through untouched
fn curves<const N: usize>(set: &[Curve]) -> Option<Stage<N>> {
    let stage = Curves::<N>::new(set.to_vec());
    if stage.is_identity() {
        None
    } else {
        Some(Box::new(stage))
    }
}

fn followed_by<X: Space, const N: usize>(node: BoxNode<X, Vector<f64, N>>, stage: Option<Stage<N>>) -> BoxNode<X, Vector<f64, N>> {
    match stage {
        Some(stage) => compose(stage, node),
        None => node,
    }
}

fn preceded_by<const N: usize, Y: Space>(stage: Option<Stage<N>>, node: BoxNode<Vector<f64, N>, Y>) -> BoxNode<Vector<f64, N>, Y> {
    match stage {
        Some(stage) => compose(node, stage),
        None => node,
    }
}

fn matrix<const N: usize>(stage: MatrixStage) -> Result<Stage<N>> {
    let node: BoxNode<Vector<f64, 3>, Vector<f64, 3>> = Box::new(stage);
    recast(node).ok_or_else(|| {
        IccError::CorruptedData(format!("matrix element on {} channels", N)).into()
    })
}

fn clut<const I: usize, const O: usize>(
    grid: &ClutGrid,
    interpolation: Interpolation,
) -> Result<BoxNode<Vector<f64, I>, Vector<f64, O>>> {
    if grid.outputs != O || grid.sizes.len() != I {
        return Err(IccError::UnsupportedChannels {
            inputs: grid.sizes.len(),
            outputs: grid.outputs,
        }
        .into());
    }
    let samples = (0..grid.values.len() / O)
        .map(|p| Vector::new(grid.point::<O>(p)))
        .collect();
    let table = Clut::<Vector<f64, I>, Vector<f64, O>>::from_icc_order(&grid.sizes, samples, interpolation)?;
    Ok(Box::new(table))
}

fn type_device_to_pcs<const I: usize>(raw: BoxNode<Vector<f64, I>, Vector<f64, 3>>, ends: &Endpoints) -> AnyNode {
    match ends.pcs {
        ColorSpace::Lab => {
            let decode: BoxNode<Vector<f64, 3>, Lab> = Box::new(LabDecode);
            device_in::<I, Lab>(compose(decode, raw), ends.device)
        }
        ColorSpace::Xyz => {
            let scale: BoxNode<Vector<f64, 3>, Vector<f64, 3>> = Box::new(MatrixStage::scale(LUT_XYZ_SCALE));
            let to_xyz: BoxNode<Vector<f64, 3>, Xyz> = Box::new(Reinterpret::new());
            device_in::<I, Xyz>(compose(to_xyz, compose(scale, raw)), ends.device)
        }
        _ => device_in::<I, Vector<f64, 3>>(raw, ends.device),
    }
}

fn device_in<const I: usize, P: Space>(node: BoxNode<Vector<f64, I>, P>, device: ColorSpace) -> AnyNode {
    if device == ColorSpace::Rgb && I == 3 {
        let from_rgb: BoxNode<Rgb<f64>, Vector<f64, I>> = Box::new(Reinterpret::new());
        AnyNode::new(compose(node, from_rgb))
    } else {
        AnyNode::new(node)
    }
}

fn type_pcs_to_device<const O: usize>(raw: BoxNode<Vector<f64, 3>, Vector<f64, O>>, ends: &Endpoints) -> AnyNode {
    match ends.pcs {
        ColorSpace::Lab => {
            let encode: BoxNode<Lab, Vector<f64, 3>> = Box::new(LabEncode);
            device_out::<Lab, O>(compose(raw, encode), ends.device)
        }
        ColorSpace::Xyz => {
            let from_xyz: BoxNode<Xyz, Vector<f64, 3>> = Box::new(Reinterpret::new());
            let scale: BoxNode<Vector<f64, 3>, Vector<f64, 3>> = Box::new(MatrixStage::scale(1.0 / LUT_XYZ_SCALE));
            device_out::<Xyz, O>(compose(raw, compose(scale, from_xyz)), ends.device)
        }
        _ => device_out::<Vector<f64, 3>, O>(raw, ends.device),
    }
}

fn device_out<P: Space, const O: usize>(node: BoxNode<P, Vector<f64, O>>, device: ColorSpace) -> AnyNode {
    if device == ColorSpace::Rgb && O == 3 {
        let to_rgb: BoxNode<Vector<f64, O>, Rgb<f64>> = Box::new(Reinterpret::new());
        AnyNode::new(compose(to_rgb, node))
    } else {
        AnyNode::new(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Matrix3x3;

    const EPSILON: f64 = 1e-6;

    fn identity_grid(inputs: usize) -> ClutGrid {
        // Outputs equal to the inputs, last axis fastest
        let points = 1usize << inputs;
        let mut values = Vec::new();
        for p in 0..points {
            for axis in 0..inputs {
                values.push(((p >> (inputs - 1 - axis)) & 1) as f64);
            }
        }
        ClutGrid {
            sizes: vec![2; inputs],
            outputs: inputs,
            values,
        }
    }

    fn identity_lut16() -> LegacyLut {
        LegacyLut {
            inputs: 3,
            outputs: 3,
            matrix: Matrix3x3::identity(),
            input_curves: vec![Curve::Table(vec![0.0, 1.0]); 3],
            clut: identity_grid(3),
            output_curves: vec![Curve::Table(vec![0.0, 1.0]); 3],
        }
    }

    #[test]
    fn test_identity_lut16_reproduces_input() {
        let node = legacy::<3, 3>(&identity_lut16(), Interpolation::Tetrahedral).unwrap();
        for x in [[0.0, 0.0, 0.0], [0.2, 0.5, 0.9], [1.0, 1.0, 1.0]] {
            let y = node.eval(&Vector::new(x));
            for c in 0..3 {
                assert!((y[c] - x[c]).abs() < EPSILON, "{:?} -> {:?}", x, y);
            }
        }
    }

    #[test]
    fn test_typed_endpoints() {
        let tag = TagData::Lut(identity_lut16());
        let rgb_lab = Endpoints {
            device: ColorSpace::Rgb,
            pcs: ColorSpace::Lab,
            interpolation: None,
        };
        let node = device_to_pcs(&tag, TagSignature::A2B0, &rgb_lab).unwrap();
        assert!(node.domain_is::<Rgb<f64>>());
        assert!(node.range_is::<Lab>());
        let lab = node.downcast_ref::<Rgb<f64>, Lab>().unwrap().eval(&Rgb::new(1.0, 128.0 / 255.0, 128.0 / 255.0));
        assert!(lab.approx_eq(&Lab::new(100.0, 0.0, 0.0), 1e-6), "{:?}", lab);

        let node = pcs_to_device(&tag, TagSignature::B2A0, &rgb_lab).unwrap();
        assert!(node.domain_is::<Lab>());
        assert!(node.range_is::<Rgb<f64>>());

        let cmy_xyz = Endpoints {
            device: ColorSpace::Cmy,
            pcs: ColorSpace::Xyz,
            interpolation: None,
        };
        let node = device_to_pcs(&tag, TagSignature::A2B0, &cmy_xyz).unwrap();
        assert!(node.domain_is::<Vector<f64, 3>>());
        let xyz = node
            .downcast_ref::<Vector<f64, 3>, Xyz>()
            .unwrap()
            .eval(&Vector::new([32768.0 / 65535.0; 3]));
        assert!(xyz.approx_eq(&Xyz::new(1.0, 1.0, 1.0), 1e-9), "{:?}", xyz);
    }

    #[test]
    fn test_interpolation_rule() {
        let mut ends = Endpoints {
            device: ColorSpace::Cmyk,
            pcs: ColorSpace::Lab,
            interpolation: None,
        };
        assert_eq!(ends.interpolation(), Interpolation::Multilinear);
        ends.pcs = ColorSpace::Xyz;
        assert_eq!(ends.interpolation(), Interpolation::Tetrahedral);
        ends.interpolation = Some(Interpolation::Multilinear);
        assert_eq!(ends.interpolation(), Interpolation::Multilinear);
    }

    #[test]
    fn test_four_channel_device() {
        let lut = LegacyLut {
            inputs: 4,
            outputs: 3,
            matrix: Matrix3x3::identity(),
            input_curves: vec![],
            clut: ClutGrid {
                sizes: vec![2; 4],
                outputs: 3,
                values: identity_grid(4).values.chunks(4).flat_map(|c| c[..3].to_vec()).collect(),
            },
            output_curves: vec![],
        };
        let ends = Endpoints {
            device: ColorSpace::Cmyk,
            pcs: ColorSpace::Lab,
            interpolation: None,
        };
        let node = device_to_pcs(&TagData::Lut(lut), TagSignature::A2B0, &ends).unwrap();
        assert!(node.domain_is::<Vector<f64, 4>>());
        assert!(node.range_is::<Lab>());
    }

    #[test]
    fn test_pcs_side_must_be_three() {
        let mut lut = identity_lut16();
        lut.outputs = 1;
        let ends = Endpoints {
            device: ColorSpace::Rgb,
            pcs: ColorSpace::Lab,
            interpolation: None,
        };
        let err = device_to_pcs(&TagData::Lut(lut), TagSignature::A2B0, &ends).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Icc(IccError::UnsupportedChannels { inputs: 3, outputs: 1 })
        ));
        let err = device_to_pcs(&TagData::Curve(Curve::Identity), TagSignature::A2B0, &ends).unwrap_err();
        assert!(matches!(err, crate::Error::Icc(IccError::CorruptedData(_))));
    }

    #[test]
    fn test_lut_ab_chain_order() {
        // mAB with only B curves (squaring) and a matrix that doubles
        let lut = LutAb {
            direction: LutDirection::AToB,
            inputs: 3,
            outputs: 3,
            a_curves: None,
            clut: None,
            m_curves: None,
            matrix: Some(crate::icc::LutMatrix {
                matrix: Matrix3x3::diagonal(0.5, 0.5, 0.5),
                offset: [0.0; 3],
            }),
            b_curves: vec![Curve::Gamma(2.0); 3],
        };
        let node = lut_ab::<3, 3>(&lut, Interpolation::Tetrahedral).unwrap();
        let y = node.eval(&Vector::new([0.8, 0.8, 0.8]));
        // Matrix first, then B: (0.8 * 0.5)^2
        assert!((y[0] - 0.16).abs() < EPSILON, "{:?}", y);

        let lut = LutAb {
            direction: LutDirection::BToA,
            ..lut
        };
        let y = lut_ab::<3, 3>(&lut, Interpolation::Tetrahedral)
            .unwrap()
            .eval(&Vector::new([0.8, 0.8, 0.8]));
        // B first, then the matrix: 0.8^2 * 0.5
        assert!((y[0] - 0.32).abs() < EPSILON, "{:?}", y);
    }

    #[test]
    fn test_identity_curves_are_skipped() {
        assert!(curves::<3>(&[]).is_none());
        assert!(curves::<3>(&[Curve::Identity, Curve::Gamma(1.0), Curve::Identity]).is_none());
        assert!(curves::<3>(&[Curve::Identity, Curve::Gamma(2.2)]).is_some());
        assert!(curves::<3>(&[Curve::Table(vec![0.0, 1.0])]).is_some());

        // Curve stages clamp; with only identity curves around the matrix
        // its output passes through unclamped
        let lut = LutAb {
            direction: LutDirection::BToA,
            inputs: 3,
            outputs: 3,
            a_curves: Some(vec![Curve::Identity; 3]),
            clut: None,
            m_curves: Some(vec![Curve::Gamma(1.0); 3]),
            matrix: Some(crate::icc::LutMatrix {
                matrix: Matrix3x3::diagonal(2.0, 1.0, 1.0),
                offset: [0.0; 3],
            }),
            b_curves: vec![Curve::Identity; 3],
        };
        let y = lut_ab::<3, 3>(&lut, Interpolation::Tetrahedral)
            .unwrap()
            .eval(&Vector::new([0.75, 0.5, 0.25]));
        assert!((y[0] - 1.5).abs() < EPSILON, "{:?}", y);
        assert!((y[1] - 0.5).abs() < EPSILON && (y[2] - 0.25).abs() < EPSILON, "{:?}", y);
    }
}
