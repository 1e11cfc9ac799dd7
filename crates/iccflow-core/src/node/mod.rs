//! Transform nodes
//!
//! A node is an immutable function from a domain coordinate type `X` to a
//! range coordinate type `Y`. Pipelines are trees of boxed nodes: a
//! [`Composite`] exclusively owns its two children, and
//! [`Node::duplicate`] produces an independent deep copy so a pipeline can
//! be stored in a cache and handed out again.
//!
//! Typed composition is checked by the compiler. When the endpoint types
//! are only known at runtime the node travels as an [`AnyNode`] and the
//! registry probes in [`registry`] recover its concrete types.

mod any;
pub mod registry;

use std::any::type_name;
use std::fmt::Debug;
use std::marker::PhantomData;

pub use any::{AnyNode, Probe};

/// Marker for types that can sit at a node endpoint
pub trait Space: Copy + Debug + Send + Sync + 'static {}

impl<T: Copy + Debug + Send + Sync + 'static> Space for T {}

/// A unit of computation mapping `X` to `Y`
pub trait Node<X, Y>: Send + Sync {
    /// Evaluate at one coordinate
    fn eval(&self, x: &X) -> Y;

    /// Deep, independent copy
    fn duplicate(&self) -> BoxNode<X, Y>;
}

/// Owned, type-erased node with known endpoints
pub type BoxNode<X, Y> = Box<dyn Node<X, Y>>;

/// `outer ∘ inner`: evaluates `inner` and feeds its result to `outer`
pub struct Composite<X, Z, Y> {
    outer: BoxNode<Z, Y>,
    inner: BoxNode<X, Z>,
}

impl<X: Space, Z: Space, Y: Space> Composite<X, Z, Y> {
    pub fn new(outer: BoxNode<Z, Y>, inner: BoxNode<X, Z>) -> Self {
        Self { outer, inner }
    }
}

impl<X: Space, Z: Space, Y: Space> Node<X, Y> for Composite<X, Z, Y> {
    #[inline]
    fn eval(&self, x: &X) -> Y {
        self.outer.eval(&self.inner.eval(x))
    }

    fn duplicate(&self) -> BoxNode<X, Y> {
        Box::new(Self {
            outer: self.outer.duplicate(),
            inner: self.inner.duplicate(),
        })
    }
}

/// Compose two nodes whose intermediate types agree
///
/// `compose(f, g).eval(x) == f.eval(&g.eval(x))`
pub fn compose<X: Space, Z: Space, Y: Space>(
    outer: BoxNode<Z, Y>,
    inner: BoxNode<X, Z>,
) -> BoxNode<X, Y> {
    Box::new(Composite::new(outer, inner))
}

/// The identity node on `X`
pub struct Identity<X>(PhantomData<fn(X) -> X>);

impl<X> Identity<X> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<X> Default for Identity<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Space> Node<X, X> for Identity<X> {
    #[inline]
    fn eval(&self, x: &X) -> X {
        *x
    }

    fn duplicate(&self) -> BoxNode<X, X> {
        Box::new(Self::new())
    }
}

/// A node backed by a plain function pointer
pub struct FnNode<X, Y> {
    f: fn(&X) -> Y,
}

impl<X, Y> FnNode<X, Y> {
    pub fn new(f: fn(&X) -> Y) -> Self {
        Self { f }
    }
}

impl<X: Space, Y: Space> Node<X, Y> for FnNode<X, Y> {
    #[inline]
    fn eval(&self, x: &X) -> Y {
        (self.f)(x)
    }

    fn duplicate(&self) -> BoxNode<X, Y> {
        Box::new(Self { f: self.f })
    }
}

/// Re-type a boxed node whose endpoints are statically `(A, B)` as `(C, D)`
///
/// Returns None unless `A == C` and `B == D`. Generic code uses this to
/// pass a node through a branch where the compiler cannot see that two
/// type parameters coincide.
pub fn recast<A: Space, B: Space, C: Space, D: Space>(node: BoxNode<A, B>) -> Option<BoxNode<C, D>> {
    let boxed: Box<dyn std::any::Any> = Box::new(node);
    boxed.downcast::<BoxNode<C, D>>().ok().map(|b| *b)
}

/// Readable name of a type for logs and errors
pub(crate) fn short_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    // Keep generic arguments intact, strip the leading module path
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
