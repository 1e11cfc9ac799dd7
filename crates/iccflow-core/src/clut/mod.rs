//! N-dimensional color lookup table
//!
//! A [`Clut`] samples a function `X -> Y` on a dense grid over the input
//! cube and interpolates between grid points. The number of axes is
//! `X::CHANNELS` and each axis has its own grid size.
//!
//! # Layout
//!
//! Samples are stored with the first axis varying fastest. ICC files store
//! the last axis fastest; [`Clut::from_icc_order`] remaps once at load time.
//!
//! # Edges
//!
//! A coordinate is split into a cell index and a weight. The cell index is
//! clamped to the last interior cell (`size - 2`) and the weight absorbs
//! the difference, so a coordinate at the top of the cube lands in the
//! last cell with weight 1.0 and nothing past the grid is read. Inputs
//! beyond the cube extrapolate from the last cell.

pub mod permutation;

use crate::color::{Coordinate, Scalar};
use crate::error::{Error, Result};
use crate::node::{BoxNode, Node};
use permutation::PermutationTable;

/// Most axes (and output channels) a table can have
pub const MAX_CHANNELS: usize = 15;

/// Interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    /// Simplex walk over N + 1 corners
    #[default]
    Tetrahedral,
    /// Weighted sum over all 2^N corners
    Multilinear,
}

/// One axis of a split coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaItem {
    /// Position inside the cell, 0.0 at the lower corner and 1.0 at the upper
    pub weight: f64,
    /// Lower corner index along the axis
    pub cell: usize,
}

/// Dense lookup table from `X` to `Y`
#[derive(Debug, Clone)]
pub struct Clut<X, Y> {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    step: X,
    samples: Vec<Y>,
    interpolation: Interpolation,
    permutations: Option<&'static PermutationTable>,
}

impl<X: Coordinate, Y: Coordinate> Clut<X, Y> {
    /// Build from samples stored first axis fastest
    pub fn new(sizes: &[usize], samples: Vec<Y>, interpolation: Interpolation) -> Result<Self> {
        let total = validate::<X, Y>(sizes)?;
        if samples.len() != total {
            return Err(Error::InvalidGrid(format!(
                "expected {} samples for grid {:?}, got {}",
                total,
                sizes,
                samples.len()
            )));
        }

        let mut strides = Vec::with_capacity(sizes.len());
        let mut stride = 1;
        for &size in sizes {
            strides.push(stride);
            stride *= size;
        }

        let mut step = X::default();
        for (i, &size) in sizes.iter().enumerate() {
            step.set(i, X::Scalar::grid_step(size));
        }

        let permutations = match interpolation {
            Interpolation::Tetrahedral => permutation::table(sizes.len()),
            Interpolation::Multilinear => None,
        };

        tracing::trace!(
            dims = sizes.len(),
            sizes = ?sizes,
            interpolation = ?interpolation,
            "clut constructed"
        );

        Ok(Self {
            sizes: sizes.to_vec(),
            strides,
            step,
            samples,
            interpolation,
            permutations,
        })
    }

    /// Build from samples stored last axis fastest (ICC order)
    pub fn from_icc_order(sizes: &[usize], samples: Vec<Y>, interpolation: Interpolation) -> Result<Self> {
        let total = validate::<X, Y>(sizes)?;
        if samples.len() != total {
            return Err(Error::InvalidGrid(format!(
                "expected {} samples for grid {:?}, got {}",
                total,
                sizes,
                samples.len()
            )));
        }

        let mut remapped = vec![Y::default(); total];
        for (icc_index, sample) in samples.into_iter().enumerate() {
            remapped[reverse_index(icc_index, sizes)] = sample;
        }
        Self::new(sizes, remapped, interpolation)
    }

    /// Sample `f` on a grid with the given per-axis sizes
    pub fn from_fn<F>(sizes: &[usize], interpolation: Interpolation, f: F) -> Result<Self>
    where
        F: Fn(&X) -> Y,
    {
        let total = validate::<X, Y>(sizes)?;
        let mut samples = Vec::with_capacity(total);
        for t in 0..total {
            let mut x = X::default();
            let mut rest = t;
            for (i, &size) in sizes.iter().enumerate() {
                let index = rest % size;
                rest /= size;
                let step = X::Scalar::grid_step(size).to_f64();
                x.set(i, X::Scalar::from_f64(index as f64 * step));
            }
            samples.push(f(&x));
        }
        Self::new(sizes, samples, interpolation)
    }

    /// Sample `f` with `steps` grid points on every axis
    pub fn sample<F>(f: F, steps: usize, interpolation: Interpolation) -> Result<Self>
    where
        F: Fn(&X) -> Y,
    {
        let sizes = vec![steps; X::CHANNELS];
        Self::from_fn(&sizes, interpolation, f)
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Same grid with another interpolation mode
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self.permutations = match interpolation {
            Interpolation::Tetrahedral => permutation::table(self.sizes.len()),
            Interpolation::Multilinear => None,
        };
        self
    }

    /// Grid sample at per-axis indices
    pub fn vertex(&self, indices: &[usize]) -> Y {
        let offset: usize = indices.iter().zip(&self.strides).map(|(i, s)| i * s).sum();
        self.samples[offset]
    }

    /// Split `x` into per-axis cells and weights
    pub fn locate(&self, x: &X) -> Vec<DeltaItem> {
        let mut items = vec![
            DeltaItem {
                weight: 0.0,
                cell: 0
            };
            self.sizes.len()
        ];
        self.split(x, &mut items);
        items
    }

    #[inline]
    fn split(&self, x: &X, items: &mut [DeltaItem]) {
        let one = X::Scalar::ONE;
        for (i, item) in items.iter_mut().enumerate() {
            let (cell, weight) = x.get(i).split(self.step.get(i));
            let last = self.sizes[i] - 2;
            let clamped = cell.min(last);
            *item = DeltaItem {
                weight: (weight + (cell - clamped) as f64 * one) / one,
                cell: clamped,
            };
        }
    }

    #[inline]
    fn accumulate(&self, offset: usize, weight: f64, acc: &mut [f64]) {
        let sample = &self.samples[offset];
        for (c, value) in acc.iter_mut().enumerate() {
            *value += weight * sample.get(c).to_f64();
        }
    }

    fn eval_tetrahedral(&self, items: &[DeltaItem], base: usize, acc: &mut [f64]) {
        let n = items.len();
        let mut weights = [0.0f64; MAX_CHANNELS];
        for (w, item) in weights.iter_mut().zip(items) {
            *w = item.weight;
        }
        let mut order = [0usize; MAX_CHANNELS];
        permutation::order_axes(&weights[..n], self.permutations, &mut order);

        self.accumulate(base, 1.0 - weights[order[0]], acc);
        let mut offset = base;
        for k in 0..n {
            let axis = order[k];
            offset += self.strides[axis];
            let next = if k + 1 < n { weights[order[k + 1]] } else { 0.0 };
            self.accumulate(offset, weights[axis] - next, acc);
        }
    }

    fn eval_multilinear(&self, items: &[DeltaItem], base: usize, acc: &mut [f64]) {
        for corner in 0..(1usize << items.len()) {
            let mut weight = 1.0;
            let mut offset = base;
            for (axis, item) in items.iter().enumerate() {
                if corner & (1 << axis) != 0 {
                    weight *= item.weight;
                    offset += self.strides[axis];
                } else {
                    weight *= 1.0 - item.weight;
                }
            }
            if weight != 0.0 {
                self.accumulate(offset, weight, acc);
            }
        }
    }
}

impl<X: Coordinate, Y: Coordinate> Node<X, Y> for Clut<X, Y> {
    fn eval(&self, x: &X) -> Y {
        let n = self.sizes.len();
        let mut items = [DeltaItem {
            weight: 0.0,
            cell: 0,
        }; MAX_CHANNELS];
        self.split(x, &mut items[..n]);

        let base: usize = items[..n]
            .iter()
            .zip(&self.strides)
            .map(|(item, stride)| item.cell * stride)
            .sum();

        let mut acc = [0.0f64; MAX_CHANNELS];
        let acc = &mut acc[..Y::CHANNELS];
        match self.interpolation {
            Interpolation::Tetrahedral => self.eval_tetrahedral(&items[..n], base, acc),
            Interpolation::Multilinear => self.eval_multilinear(&items[..n], base, acc),
        }

        let mut y = Y::default();
        for (c, &value) in acc.iter().enumerate() {
            y.set(c, Y::Scalar::from_f64(value));
        }
        y
    }

    fn duplicate(&self) -> BoxNode<X, Y> {
        Box::new(self.clone())
    }
}

/// Checks the grid shape and returns the number of grid points
fn validate<X: Coordinate, Y: Coordinate>(sizes: &[usize]) -> Result<usize> {
    if X::CHANNELS == 0 || X::CHANNELS > MAX_CHANNELS || Y::CHANNELS > MAX_CHANNELS {
        return Err(Error::InvalidGrid(format!(
            "{} inputs and {} outputs, at most {} supported",
            X::CHANNELS,
            Y::CHANNELS,
            MAX_CHANNELS
        )));
    }
    if sizes.len() != X::CHANNELS {
        return Err(Error::InvalidGrid(format!(
            "{} grid sizes for {} input channels",
            sizes.len(),
            X::CHANNELS
        )));
    }
    if let Some(size) = sizes.iter().find(|&&s| s < 2) {
        return Err(Error::InvalidGrid(format!("grid size {} below 2", size)));
    }
    sizes
        .iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(s))
        .filter(|&total| {
            total
                .checked_mul(std::mem::size_of::<Y>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or_else(|| Error::InvalidGrid(format!("grid {:?} has too many points", sizes)))
}

/// Flat first-axis-fastest index of the sample at `icc_index` (last axis fastest)
fn reverse_index(icc_index: usize, sizes: &[usize]) -> usize {
    let mut strides = [0usize; MAX_CHANNELS];
    let mut stride = 1;
    for (i, &size) in sizes.iter().enumerate() {
        strides[i] = stride;
        stride *= size;
    }

    let mut rest = icc_index;
    let mut index = 0;
    for (i, &size) in sizes.iter().enumerate().rev() {
        index += (rest % size) * strides[i];
        rest /= size;
    }
    index
}
