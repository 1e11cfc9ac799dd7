//! CLUT interpolation accuracy
//!
//! Linear seeds must be reproduced exactly by both modes, nonlinear seeds
//! within a bound that shrinks with the grid resolution.

use cms_tests::accuracy::max_abs_diff;
use cms_tests::patterns::{grid_vertices, unit_vectors};
use iccflow_core::clut::MAX_CHANNELS;
use iccflow_core::{Clut, Error, Interpolation, Node, Vector};

type V3 = Vector<f64, 3>;
type V4 = Vector<f64, 4>;

const MODES: [Interpolation; 2] = [Interpolation::Tetrahedral, Interpolation::Multilinear];

fn squares(x: &V3) -> V3 {
    Vector::new([x[0] * x[0], x[1] * x[1], x[2] * x[2]])
}

fn products(x: &V4) -> V3 {
    Vector::new([x[0] * x[1], x[1] * x[2], x[0] * x[2] * x[3]])
}

fn max_error<const N: usize, const M: usize>(
    lut: &Clut<Vector<f64, N>, Vector<f64, M>>,
    f: impl Fn(&Vector<f64, N>) -> Vector<f64, M>,
    points: &[Vector<f64, N>],
) -> f64 {
    points
        .iter()
        .map(|x| max_abs_diff(&lut.eval(x).0, &f(x).0))
        .fold(0.0, f64::max)
}

macro_rules! identity_exact {
    ($name:ident, $n:literal, $steps:literal) => {
        #[test]
        fn $name() {
            type V = Vector<f64, $n>;
            for mode in MODES {
                let lut = Clut::<V, V>::sample(|x| *x, $steps, mode).unwrap();
                let error = max_error(&lut, |x| *x, &unit_vectors::<$n>($n, 200));
                assert!(error < 1e-12, "{}-D {:?}: {}", $n, mode, error);
            }
        }
    };
}

identity_exact!(test_identity_seed_3d, 3, 2);
identity_exact!(test_identity_seed_4d, 4, 5);
identity_exact!(test_identity_seed_5d, 5, 3);
identity_exact!(test_identity_seed_8d, 8, 3);

#[test]
fn test_error_shrinks_with_resolution() {
    let points = unit_vectors::<3>(20, 2000);
    for mode in MODES {
        let mut previous = f64::INFINITY;
        for steps in [3, 5, 9, 17, 33] {
            let lut = Clut::<V3, V3>::sample(squares, steps, mode).unwrap();
            let error = max_error(&lut, squares, &points);
            let h = 1.0 / (steps - 1) as f64;
            // Linear interpolation of x^2 is off by at most h^2 / 4
            assert!(error <= h * h / 4.0 + 1e-12, "{:?} steps {}: {}", mode, steps, error);
            assert!(error < previous, "{:?} steps {}: {} !< {}", mode, steps, error, previous);
            previous = error;
        }
    }
}

#[test]
fn test_modes_agree_on_every_vertex() {
    let steps = 5;
    let tetra = Clut::<V4, V3>::sample(products, steps, Interpolation::Tetrahedral).unwrap();
    let multi = tetra.clone().with_interpolation(Interpolation::Multilinear);

    for x in grid_vertices::<4>(steps) {
        let a = tetra.eval(&x);
        let b = multi.eval(&x);
        assert!(max_abs_diff(&a.0, &b.0) < 1e-12, "vertex {:?}: {:?} vs {:?}", x, a, b);
        assert!(max_abs_diff(&a.0, &products(&x).0) < 1e-12, "vertex {:?}", x);
    }
}

#[test]
fn test_modes_differ_boundedly_off_vertex() {
    let steps = 9;
    let h = 1.0 / (steps - 1) as f64;
    let tetra = Clut::<V4, V3>::sample(products, steps, Interpolation::Tetrahedral).unwrap();
    let multi = Clut::<V4, V3>::sample(products, steps, Interpolation::Multilinear).unwrap();

    let points = unit_vectors::<4>(21, 2000);
    // Multilinear reproduces products of distinct axes exactly
    assert!(max_error(&multi, products, &points) < 1e-12);

    let gap = points
        .iter()
        .map(|x| max_abs_diff(&tetra.eval(x).0, &multi.eval(x).0))
        .fold(0.0, f64::max);
    assert!(gap > 0.0, "modes should differ somewhere off the grid");
    assert!(gap < 2.0 * h * h, "gap {}", gap);
}

#[test]
fn test_top_edge_on_every_axis() {
    type V5 = Vector<f64, 5>;
    let f = |x: &V5| Vector::new([x[0] * x[4], x[1] + x[2], x[3] * x[3]]);
    for mode in MODES {
        let lut = Clut::<V5, V3>::sample(f, 4, mode).unwrap();
        for axis in 0..5 {
            let mut x = Vector::new([0.4; 5]);
            x[axis] = 1.0;
            let items = lut.locate(&x);
            assert_eq!(items[axis].cell, 2, "axis {} cell", axis);
            assert!((items[axis].weight - 1.0).abs() < 1e-12, "axis {}: {:?}", axis, items[axis]);
        }
        let top = Vector::new([1.0; 5]);
        assert!(max_abs_diff(&lut.eval(&top).0, &f(&top).0) < 1e-12, "{:?}", mode);
    }
}

#[test]
fn test_far_extrapolation_regression() {
    let seed = |x: &V3| Vector::new([x[0], x[1] / 2.0, x[2] / 3.0]);
    let lut = Clut::<V3, V3>::sample(seed, 6, Interpolation::Tetrahedral).unwrap();
    let x = Vector::new([100.0, 100.0, 100.0]);
    let error = (lut.eval(&x) - seed(&x)).module2();
    assert!(error < 1.0 / 500.0, "squared error {}", error);
}

#[test]
fn test_integer_inputs() {
    type C = Vector<u16, 3>;
    let lut = Clut::<C, V3>::sample(
        |x| Vector::new([x[0] as f64 / 65535.0, x[1] as f64 / 65535.0, x[2] as f64 / 65535.0]),
        17,
        Interpolation::Tetrahedral,
    )
    .unwrap();
    for x in [[0u16, 0, 0], [65535, 65535, 65535], [1234, 40000, 65535]] {
        let y = lut.eval(&Vector::new(x));
        for c in 0..3 {
            assert!((y[c] - x[c] as f64 / 65535.0).abs() < 1e-3, "{:?} -> {:?}", x, y);
        }
    }
}

#[test]
fn test_dimension_limits() {
    type V16 = Vector<f64, 16>;
    assert_eq!(MAX_CHANNELS, 15);
    let too_many = Clut::<V16, V3>::sample(|_| V3::default(), 2, Interpolation::Multilinear);
    assert!(matches!(too_many, Err(Error::InvalidGrid(_))));
    let single = Clut::<V3, V3>::from_fn(&[2, 1, 2], Interpolation::Tetrahedral, |x| *x);
    assert!(matches!(single, Err(Error::InvalidGrid(_))));
}
