//! Test input generation
//!
//! All random inputs are seeded with `ChaCha8Rng` so failures reproduce.

use iccflow_core::{Lab, Rgb, Vector, Xyz};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Seeded points in the unit cube
pub fn unit_vectors<const N: usize>(seed: u64, count: usize) -> Vec<Vector<f64, N>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Vector::new(std::array::from_fn(|_| rng.r#gen::<f64>())))
        .collect()
}

/// Seeded 8-bit RGB pixels
pub fn rgb8(seed: u64, count: usize) -> Vec<Rgb<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| Rgb::new(rng.r#gen(), rng.r#gen(), rng.r#gen())).collect()
}

/// Seeded XYZ values inside the D50 white box
pub fn xyz(seed: u64, count: usize) -> Vec<Xyz> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Xyz::new(
                rng.gen_range(0.0..0.96),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..0.82),
            )
        })
        .collect()
}

/// Seeded Lab values over the ICC encoding range
pub fn lab(seed: u64, count: usize) -> Vec<Lab> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Lab::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(-128.0..127.0),
                rng.gen_range(-128.0..127.0),
            )
        })
        .collect()
}

/// Every grid vertex of an `N`-cube with `steps` points per axis, first axis fastest
pub fn grid_vertices<const N: usize>(steps: usize) -> Vec<Vector<f64, N>> {
    let total = steps.pow(N as u32);
    (0..total)
        .map(|t| {
            let mut rest = t;
            Vector::new(std::array::from_fn(|_| {
                let i = rest % steps;
                rest /= steps;
                i as f64 / (steps - 1) as f64
            }))
        })
        .collect()
}

/// The 8 corners of the RGB cube
pub fn rgb8_corners() -> Vec<Rgb<u8>> {
    (0..8u8)
        .map(|i| {
            let c = |bit: u8| if i & bit != 0 { 255 } else { 0 };
            Rgb::new(c(1), c(2), c(4))
        })
        .collect()
}

/// Gray ramp from black to white
pub fn gray_ramp(count: usize) -> Vec<Rgb<u8>> {
    (0..count)
        .map(|i| {
            let v = (i * 255 / count.saturating_sub(1).max(1)) as u8;
            Rgb::new(v, v, v)
        })
        .collect()
}
