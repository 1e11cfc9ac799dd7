//! Curve Tag Types
//!
//! Two encodings share one in-memory form:
//! - curv: identity, u8Fixed8 gamma, or a u16 lookup table
//! - para: parametric function types 0-4
//!
//! See ICC.1:2022 Sections 10.6 (curv) and 10.18 (para)

use crate::icc::error::IccError;
use crate::icc::types::{Reader, TypeSignature};
use crate::math::gamma::ParametricCurve;

/// One-dimensional tone curve over [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// curv with no entries
    Identity,
    /// curv with a single u8Fixed8 exponent
    Gamma(f64),
    /// curv table, normalized to [0, 1]
    Table(Vec<f64>),
    /// para
    Parametric(ParametricCurve),
}

impl Curve {
    /// Read a complete curve element: type signature, reserved bytes, body
    ///
    /// Used for the curve sets inside lutAtoB and lutBtoA.
    pub fn read(r: &mut Reader<'_>) -> Result<Self, IccError> {
        let sig = TypeSignature(r.u32()?);
        r.reserved(4)?;
        Self::read_body(sig, r)
    }

    /// Read the body of a curve whose signature was already consumed
    pub fn read_body(sig: TypeSignature, r: &mut Reader<'_>) -> Result<Self, IccError> {
        match sig {
            TypeSignature::CURVE => {
                let count = r.u32()? as usize;
                match count {
                    0 => Ok(Self::Identity),
                    1 => Ok(Self::Gamma(r.u8f8()?)),
                    _ => {
                        if r.remaining() < count * 2 {
                            return Err(IccError::CorruptedData(format!(
                                "curve table of {} entries needs {} bytes, have {}",
                                count,
                                count * 2,
                                r.remaining()
                            )));
                        }
                        let table = (0..count)
                            .map(|_| r.u16().map(|v| v as f64 / 65535.0))
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Self::Table(table))
                    }
                }
            }
            TypeSignature::PARA => {
                let function_type = r.u16()?;
                r.reserved(2)?;
                let count = ParametricCurve::param_count(function_type).ok_or_else(|| {
                    IccError::CorruptedData(format!("unknown parametric function type {}", function_type))
                })?;
                let params = (0..count).map(|_| r.s15f16()).collect::<Result<Vec<_>, _>>()?;
                ParametricCurve::from_params(function_type, &params)
                    .map(Self::Parametric)
                    .ok_or_else(|| IccError::CorruptedData("bad parametric curve".to_string()))
            }
            other => Err(IccError::UnknownCurveType(other.0)),
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Self::Identity => true,
            Self::Gamma(g) => (*g - 1.0).abs() < 1e-6,
            _ => false,
        }
    }

    /// Evaluate at `x`, clamped to [0, 1]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Identity => x,
            Self::Gamma(g) => x.powf(*g),
            Self::Table(table) => interpolate(table, x),
            Self::Parametric(p) => p.eval(x),
        }
    }

    /// Evaluate the inverse at `y`, clamped to [0, 1]
    ///
    /// Tables are inverted by bisection and must be monotonic; flat runs
    /// resolve to their lowest input.
    pub fn eval_inverse(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);
        match self {
            Self::Identity => y,
            Self::Gamma(g) if g.abs() > 1e-10 => y.powf(1.0 / g),
            Self::Gamma(_) => y,
            Self::Table(table) => invert(table, y),
            Self::Parametric(p) => p.eval_inverse(y),
        }
    }
}

fn interpolate(table: &[f64], x: f64) -> f64 {
    match table.len() {
        0 => x,
        1 => table[0],
        n => {
            let pos = x * (n - 1) as f64;
            let i = (pos.floor() as usize).min(n - 2);
            let t = pos - i as f64;
            table[i] + (table[i + 1] - table[i]) * t
        }
    }
}

fn invert(table: &[f64], y: f64) -> f64 {
    let n = table.len();
    if n < 2 {
        return y;
    }
    let descending = table[n - 1] < table[0];
    // First segment whose upper end reaches y
    let reaches = |v: f64| if descending { v <= y } else { v >= y };
    let Some(hi) = table.iter().position(|&v| reaches(v)) else {
        return if descending { 0.0 } else { 1.0 };
    };
    if hi == 0 {
        return 0.0;
    }
    let (a, b) = (table[hi - 1], table[hi]);
    let t = if (b - a).abs() > 1e-12 { (y - a) / (b - a) } else { 0.0 };
    ((hi - 1) as f64 + t) / (n - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(sig: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = sig.to_vec();
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn test_curv_identity_and_gamma() {
        let data = element(b"curv", &[0, 0, 0, 0]);
        assert_eq!(Curve::read(&mut Reader::new(&data, 0)).unwrap(), Curve::Identity);

        let data = element(b"curv", &[0, 0, 0, 1, 0x02, 0x33]);
        let curve = Curve::read(&mut Reader::new(&data, 0)).unwrap();
        let Curve::Gamma(g) = curve else {
            panic!("expected gamma, got {:?}", curve);
        };
        assert!((g - 2.2).abs() < 0.01);
        assert!((curve.eval(0.5) - 0.5f64.powf(g)).abs() < 1e-12);
    }

    #[test]
    fn test_curv_table() {
        let data = element(b"curv", &[0, 0, 0, 3, 0, 0, 0x40, 0x00, 0xFF, 0xFF]);
        let curve = Curve::read(&mut Reader::new(&data, 0)).unwrap();
        assert!((curve.eval(0.0)).abs() < 1e-9);
        assert!((curve.eval(1.0) - 1.0).abs() < 1e-9);
        // Halfway sits on the middle entry
        assert!((curve.eval(0.5) - 0x4000 as f64 / 65535.0).abs() < 1e-9);
        let back = curve.eval_inverse(curve.eval(0.3));
        assert!((back - 0.3).abs() < 1e-9, "{}", back);
    }

    #[test]
    fn test_para_srgb() {
        let mut body = vec![0, 3, 0, 0];
        for v in [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045] {
            body.extend_from_slice(&((v * 65536.0f64).round() as i32).to_be_bytes());
        }
        let data = element(b"para", &body);
        let curve = Curve::read(&mut Reader::new(&data, 0)).unwrap();
        let expected = crate::math::gamma::srgb_gamma_decode(0.5);
        assert!((curve.eval(0.5) - expected).abs() < 1e-4);
        assert!((curve.eval_inverse(expected) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_curve_type() {
        let data = element(b"sf32", &[0, 0, 0, 0]);
        let err = Curve::read(&mut Reader::new(&data, 0)).unwrap_err();
        assert_eq!(err, IccError::UnknownCurveType(u32::from_be_bytes(*b"sf32")));
    }

    #[test]
    fn test_curve_reserved_bytes() {
        let mut data = element(b"curv", &[0, 0, 0, 0]);
        data[6] = 1;
        let err = Curve::read(&mut Reader::new(&data, 40)).unwrap_err();
        assert_eq!(err, IccError::NonZeroPadding { offset: 46 });
    }

    #[test]
    fn test_descending_table_inverse() {
        let curve = Curve::Table(vec![1.0, 0.5, 0.0]);
        assert!((curve.eval_inverse(0.75) - 0.25).abs() < 1e-12);
        assert!((curve.eval_inverse(0.0) - 1.0).abs() < 1e-12);
    }
}
