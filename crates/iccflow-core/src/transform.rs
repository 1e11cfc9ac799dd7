//! Color Transform operations
//!
//! A [`Transform`] owns a typed node and applies it to single values,
//! slices and raw pixel bytes. The buffer loops are compiled for several
//! SIMD targets with `multiversion`.

use std::mem::size_of;

use bytemuck::Pod;
use multiversion::multiversion;

use crate::convert::Conversions;
use crate::node::{AnyNode, BoxNode, Node, Space, short_name};
use crate::pipeline::TransformOptions;
use crate::profile::ColorProfile;
use crate::{Error, Result};

/// A color transform from `X` to `Y`
///
/// `Transform` is `Send + Sync`; one instance can serve many threads.
pub struct Transform<X, Y> {
    node: BoxNode<X, Y>,
}

impl<X: Space, Y: Space> Transform<X, Y> {
    /// Wrap a typed node
    pub fn new(node: BoxNode<X, Y>) -> Self {
        Self { node }
    }

    /// Join `output ∘ input`, adapting both to `X -> Y`
    ///
    /// Registry conversions are inserted where the range of `input` does
    /// not match the domain of `output`. None when no path exists.
    pub fn create(output: &AnyNode, input: &AnyNode) -> Option<Self> {
        Self::create_with(&Conversions::default(), output, input)
    }

    /// [`Transform::create`] with an explicit registry handle
    pub fn create_with(conversions: &Conversions, output: &AnyNode, input: &AnyNode) -> Option<Self> {
        conversions.join::<X, Y>(output, input).map(Self::new)
    }

    /// Source device to destination device through the profile connection spaces
    pub fn between(source: &ColorProfile, destination: &ColorProfile, options: &TransformOptions) -> Result<Self> {
        let no_transform = || Error::NoTransform {
            from: short_name::<X>(),
            to: short_name::<Y>(),
        };
        let input = source.device_to_pcs_with(options)?.ok_or_else(no_transform)?;
        let output = destination.pcs_to_device_with(options)?.ok_or_else(no_transform)?;
        Self::create_with(&Conversions::new(options.white), &output, &input).ok_or_else(no_transform)
    }

    /// Transform one value
    #[inline]
    pub fn apply(&self, x: &X) -> Y {
        self.node.eval(x)
    }

    /// Transform `src` into `dst`, which must have the same length
    pub fn transform_slice(&self, src: &[X], dst: &mut [Y]) -> Result<()> {
        if src.len() != dst.len() {
            return Err(Error::BufferSize {
                expected: src.len(),
                actual: dst.len(),
            });
        }
        eval_batch(self.node.as_ref(), src, dst);
        Ok(())
    }

    pub fn node(&self) -> &dyn Node<X, Y> {
        self.node.as_ref()
    }

    pub fn into_node(self) -> BoxNode<X, Y> {
        self.node
    }
}

impl<X: Space + Pod, Y: Space + Pod> Transform<X, Y> {
    /// Transform packed pixels given as raw bytes
    ///
    /// `src` must hold a whole number of `X` and `dst` room for exactly as
    /// many `Y`. Alignment is not required.
    pub fn transform_bytes(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        if src.len() % size_of::<X>() != 0 {
            return Err(Error::BufferSize {
                expected: src.len() - src.len() % size_of::<X>(),
                actual: src.len(),
            });
        }
        let count = src.len() / size_of::<X>();
        let expected = count * size_of::<Y>();
        if dst.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: dst.len(),
            });
        }

        match (bytemuck::try_cast_slice::<u8, X>(src), bytemuck::try_cast_slice_mut::<u8, Y>(dst)) {
            (Ok(src), Ok(dst)) => eval_batch(self.node.as_ref(), src, dst),
            _ => {
                for (s, d) in src
                    .chunks_exact(size_of::<X>())
                    .zip(dst.chunks_exact_mut(size_of::<Y>()))
                {
                    let y = self.node.eval(&bytemuck::pod_read_unaligned::<X>(s));
                    d.copy_from_slice(bytemuck::bytes_of(&y));
                }
            }
        }
        Ok(())
    }
}

impl<X: Space, Y: Space> Clone for Transform<X, Y> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.duplicate(),
        }
    }
}

impl<X: Space, Y: Space> std::fmt::Debug for Transform<X, Y> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transform<{}, {}>", short_name::<X>(), short_name::<Y>())
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn eval_batch<X: Space, Y: Space>(node: &dyn Node<X, Y>, src: &[X], dst: &mut [Y]) {
    for (x, y) in src.iter().zip(dst.iter_mut()) {
        *y = node.eval(x);
    }
}
