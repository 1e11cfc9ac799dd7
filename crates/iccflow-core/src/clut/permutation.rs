//! Axis ordering for tetrahedral interpolation
//!
//! Tetrahedral interpolation walks the hypercube along the axes in order of
//! decreasing fractional weight. For up to [`MAX_TABLE_DIMS`] axes the
//! order comes from a table indexed by the comparison signature of the
//! weights; above that it is sorted on every call.
//!
//! The signature of `v[0..n]` has one bit per pair `i < j`, set when
//! `v[i]` does not exceed `v[j]`. The bits of `v[0]` against the rest fill
//! the low `n - 1` positions, then `v[1..]` continues above them.

use std::sync::OnceLock;

/// Largest dimension count with a precomputed table
pub const MAX_TABLE_DIMS: usize = 5;

static TABLES: [OnceLock<PermutationTable>; MAX_TABLE_DIMS + 1] =
    [const { OnceLock::new() }; MAX_TABLE_DIMS + 1];

/// Signature-indexed axis orders for one dimension count
#[derive(Debug)]
pub struct PermutationTable {
    dims: usize,
    orders: Vec<u8>,
}

impl PermutationTable {
    fn build(dims: usize) -> Self {
        let slots = 1usize << (dims * dims.saturating_sub(1) / 2);
        let mut orders = vec![0u8; slots * dims];

        let mut values: Vec<usize> = (0..dims).collect();
        loop {
            let sig = signature(&values);
            let slot = &mut orders[sig * dims..(sig + 1) * dims];
            for (dst, axis) in slot.iter_mut().zip(sort_decreasing(&values)) {
                *dst = axis as u8;
            }
            if !next_permutation(&mut values) {
                break;
            }
        }

        tracing::trace!(dims, slots, "permutation table built");
        Self { dims, orders }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Axis order for a signature
    #[inline]
    pub fn get(&self, signature: usize) -> &[u8] {
        &self.orders[signature * self.dims..(signature + 1) * self.dims]
    }
}

/// Shared table for `dims` axes, built on first use
///
/// None above [`MAX_TABLE_DIMS`] and for zero axes.
pub fn table(dims: usize) -> Option<&'static PermutationTable> {
    if dims == 0 || dims > MAX_TABLE_DIMS {
        return None;
    }
    Some(TABLES[dims].get_or_init(|| PermutationTable::build(dims)))
}

/// Pairwise comparison signature of `values`
pub fn signature<T: PartialOrd>(values: &[T]) -> usize {
    let n = values.len();
    if n < 2 {
        return 0;
    }
    let reference = &values[0];
    let mut bits = 0usize;
    for (k, other) in values[1..].iter().enumerate() {
        if !(*reference > *other) {
            bits |= 1 << k;
        }
    }
    bits | (signature(&values[1..]) << (n - 1))
}

/// Write the axes of `weights` in decreasing weight order into `order`
///
/// Uses the shared table when one is given, otherwise sorts.
#[inline]
pub fn order_axes(weights: &[f64], table: Option<&PermutationTable>, order: &mut [usize]) {
    let n = weights.len();
    match table {
        Some(table) => {
            for (dst, &axis) in order.iter_mut().zip(table.get(signature(weights))) {
                *dst = axis as usize;
            }
        }
        None => {
            for (i, dst) in order[..n].iter_mut().enumerate() {
                *dst = i;
            }
            order[..n].sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
        }
    }
}

/// Verify the table for `dims` against every ordering of `dims` values
///
/// Each entry must put its values in strictly decreasing order.
pub fn check_permutations(dims: usize) -> bool {
    let Some(table) = table(dims) else {
        return false;
    };

    let mut values: Vec<usize> = (0..dims).collect();
    loop {
        let order = table.get(signature(&values));
        let sorted = order
            .windows(2)
            .all(|pair| values[pair[0] as usize] > values[pair[1] as usize]);
        let complete = {
            let mut seen = vec![false; dims];
            order.iter().for_each(|&axis| seen[axis as usize] = true);
            seen.into_iter().all(|s| s)
        };
        if !(sorted && complete) {
            return false;
        }
        if !next_permutation(&mut values) {
            return true;
        }
    }
}

fn sort_decreasing(values: &[usize]) -> Vec<usize> {
    let mut axes: Vec<usize> = (0..values.len()).collect();
    axes.sort_by(|&a, &b| values[b].cmp(&values[a]));
    axes
}

/// Advance to the next lexicographic permutation, false after the last
fn next_permutation(values: &mut [usize]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = n - 1;
    while values[j] <= values[i - 1] {
        j -= 1;
    }
    values.swap(i - 1, j);
    values[i..].reverse();
    true
}
