//! Transfer functions: the sRGB pair used by the registry and the ICC
//! parametric curve family decoded from `para` tags.

/// sRGB encoded to linear
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear to sRGB encoded
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// ICC parametric curve (para type, function types 0-4)
///
/// Parameters that a function type does not use keep the neutral values
/// a = 1 and b..f = 0, which makes every type a special case of type 4:
///
/// ```text
/// Y = (aX + b)^g + e   if X >= d
/// Y = cX + f           otherwise
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCurve {
    /// Function type as stored in the tag (0-4)
    pub function_type: u16,
    pub g: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ParametricCurve {
    /// Number of s15Fixed16 parameters stored for a function type
    pub fn param_count(function_type: u16) -> Option<usize> {
        [1, 3, 4, 5, 7].get(function_type as usize).copied()
    }

    /// Type 0 power curve
    pub fn gamma(g: f64) -> Self {
        Self {
            function_type: 0,
            g,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// IEC 61966-2-1 decode written as a type 3 curve
    pub fn srgb() -> Self {
        Self {
            function_type: 3,
            g: 2.4,
            a: 1.0 / 1.055,
            b: 0.055 / 1.055,
            c: 1.0 / 12.92,
            d: 0.04045,
            ..Self::gamma(2.4)
        }
    }

    /// Build from a function type and its stored parameters
    ///
    /// Types 1 and 2 are rewritten into the type 4 form: the break point is
    /// `-b/a` and the constant `c` moves to both offsets.
    pub fn from_params(function_type: u16, params: &[f64]) -> Option<Self> {
        let count = Self::param_count(function_type)?;
        let p = params.get(..count)?;
        let mut curve = Self::gamma(p[0]);
        curve.function_type = function_type;
        match *p {
            [_] => {}
            [_, a, b] | [_, a, b, _] => {
                curve.a = a;
                curve.b = b;
                curve.d = if a.abs() > 1e-10 { -b / a } else { 0.0 };
                let c = p.get(3).copied().unwrap_or(0.0);
                curve.e = c;
                curve.f = c;
            }
            [_, a, b, c, d] => {
                (curve.a, curve.b, curve.c, curve.d) = (a, b, c, d);
            }
            [_, a, b, c, d, e, f] => {
                (curve.a, curve.b, curve.c, curve.d, curve.e, curve.f) = (a, b, c, d, e, f);
            }
            _ => return None,
        }
        Some(curve)
    }

    /// Evaluate the curve (encoded → linear), input clamped to [0, 1]
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x >= self.d {
            (self.a * x + self.b).max(0.0).powf(self.g) + self.e
        } else {
            self.c * x + self.f
        }
    }

    /// Evaluate the inverse curve (linear → encoded)
    pub fn eval_inverse(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);

        if self.function_type == 0 {
            return if self.g.abs() > 1e-10 {
                y.powf(1.0 / self.g)
            } else {
                y
            };
        }

        // Closed form on each segment; the break point decides which one
        let y_break = self.eval(self.d);
        if y < y_break {
            if self.c.abs() > 1e-10 {
                ((y - self.f) / self.c).clamp(0.0, 1.0)
            } else {
                0.0
            }
        } else if self.a.abs() > 1e-10 && self.g.abs() > 1e-10 {
            (((y - self.e).max(0.0).powf(1.0 / self.g) - self.b) / self.a).clamp(0.0, 1.0)
        } else {
            y
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_srgb_gamma_roundtrip() {
        for i in 0..=255 {
            let encoded = i as f64 / 255.0;
            let roundtrip = srgb_gamma_encode(srgb_gamma_decode(encoded));
            assert!(
                (roundtrip - encoded).abs() < EPSILON,
                "sRGB roundtrip failed at {}",
                i
            );
        }
    }

    #[test]
    fn test_parametric_srgb_matches_reference() {
        let curve = ParametricCurve::srgb();
        for i in 0..=255 {
            let x = i as f64 / 255.0;
            let parametric = curve.eval(x);
            let reference = srgb_gamma_decode(x);
            assert!(
                (parametric - reference).abs() < 1e-9,
                "sRGB parametric mismatch at {}: {} vs {}",
                i,
                parametric,
                reference
            );
            let back = curve.eval_inverse(parametric);
            assert!((back - x).abs() < 1e-8, "inverse at {}: {}", i, back);
        }
    }

    #[test]
    fn test_type1_threshold() {
        // Y = (2X - 0.5)^1 for X >= 0.25, else 0
        let curve = ParametricCurve::from_params(1, &[1.0, 2.0, -0.5]).unwrap();
        assert!((curve.eval(0.1) - 0.0).abs() < EPSILON);
        assert!((curve.eval(0.5) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(ParametricCurve::from_params(5, &[1.0; 7]).is_none());
        assert!(ParametricCurve::from_params(4, &[1.0; 3]).is_none());
    }
}
