//! Accuracy measurement
//!
//! CIEDE2000 (deltaE2000) is the metric for Lab results, plain absolute
//! error for everything that is not perceptual (XYZ, raw vectors).

use iccflow_core::Lab;

/// Statistics over a set of per-sample errors
#[derive(Debug, Clone)]
pub struct DeltaEStats {
    /// Mean error across all samples
    pub mean: f64,
    /// Maximum error
    pub max: f64,
    /// 95th percentile error
    pub p95: f64,
    /// Number of samples
    pub count: usize,
}

impl DeltaEStats {
    /// Summarize raw error values
    pub fn from_samples(mut errors: Vec<f64>) -> Self {
        errors.sort_by(|a, b| a.total_cmp(b));
        let count = errors.len();
        let mean = if count == 0 {
            0.0
        } else {
            errors.iter().sum::<f64>() / count as f64
        };
        let max = errors.last().copied().unwrap_or(0.0);
        let p95 = errors.get(count * 95 / 100).copied().unwrap_or(max);
        Self { mean, max, p95, count }
    }

    /// All differences are imperceptible (deltaE < 1.0)
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    /// Differences are barely perceptible (deltaE < 2.0)
    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }
}

/// deltaE2000 between two Lab colors
///
/// A deltaE2000 of 1.0 is roughly the smallest difference perceptible to
/// trained observers.
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
    let Lab { l: l1, a: a1, b: b1 } = lab1;
    let Lab { l: l2, a: a2, b: b2 } = lab2;

    // 25^7
    const POW25_7: f64 = 6103515625.0;

    let c1 = a1.hypot(b1);
    let c2 = a2.hypot(b2);
    let c_avg7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_avg7 / (c_avg7 + POW25_7)).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);
    let c1p = a1p.hypot(b1);
    let c2p = a2p.hypot(b2);
    let cp_avg = (c1p + c2p) / 2.0;

    let hue = |a: f64, b: f64| {
        if a == 0.0 && b == 0.0 {
            0.0
        } else {
            b.atan2(a).to_degrees().rem_euclid(360.0)
        }
    };
    let h1p = hue(a1p, b1);
    let h2p = hue(a2p, b2);

    let chroma_product = c1p * c2p;
    let dhp = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let dh_big = 2.0 * chroma_product.sqrt() * (dhp.to_radians() / 2.0).sin();

    let hp_avg = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (hp_avg - 30.0).to_radians().cos()
        + 0.24 * (2.0 * hp_avg).to_radians().cos()
        + 0.32 * (3.0 * hp_avg + 6.0).to_radians().cos()
        - 0.20 * (4.0 * hp_avg - 63.0).to_radians().cos();

    let dl = l2 - l1;
    let dc = c2p - c1p;

    let l50 = ((l1 + l2) / 2.0 - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let s_c = 1.0 + 0.045 * cp_avg;
    let s_h = 1.0 + 0.015 * cp_avg * t;

    let d_theta = 30.0 * (-((hp_avg - 275.0) / 25.0).powi(2)).exp();
    let cp_avg7 = cp_avg.powi(7);
    let r_c = 2.0 * (cp_avg7 / (cp_avg7 + POW25_7)).sqrt();
    let r_t = -r_c * (2.0 * d_theta).to_radians().sin();

    let tl = dl / s_l;
    let tc = dc / s_c;
    let th = dh_big / s_h;
    (tl * tl + tc * tc + th * th + r_t * tc * th).sqrt()
}

/// Compare two Lab buffers sample by sample
pub fn compare_lab(reference: &[Lab], result: &[Lab]) -> DeltaEStats {
    assert_eq!(reference.len(), result.len(), "buffers differ in length");
    DeltaEStats::from_samples(
        reference
            .iter()
            .zip(result)
            .map(|(a, b)| delta_e_2000(*a, *b))
            .collect(),
    )
}

/// Largest per-channel absolute difference
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}
