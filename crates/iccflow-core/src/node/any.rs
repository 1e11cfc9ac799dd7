use std::any::{Any, TypeId};
use std::fmt;

use super::{BoxNode, Node, Space, registry, short_name};

/// Object-safe view of a `BoxNode<X, Y>` with its types erased
trait Erased: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn duplicate(&self) -> Box<dyn Erased>;
}

struct Typed<X, Y>(BoxNode<X, Y>);

impl<X: Space, Y: Space> Erased for Typed<X, Y> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn duplicate(&self) -> Box<dyn Erased> {
        Box::new(Typed(self.0.duplicate()))
    }
}

/// A node whose endpoint types are only known at runtime
///
/// This is what profile loaders hand out: the domain and range depend on
/// the profile's color spaces, so the caller discovers them through
/// [`AnyNode::probe_domain`] / [`AnyNode::probe_range`] or asks for a
/// specific pair with [`AnyNode::downcast_ref`].
pub struct AnyNode {
    domain: TypeId,
    range: TypeId,
    domain_name: &'static str,
    range_name: &'static str,
    inner: Box<dyn Erased>,
}

/// Visitor over the registry's canonical spaces
///
/// `visit::<S>()` is called with the canonical type that matched the
/// probed endpoint. The visitor typically holds a reference to the node
/// and recovers the typed node with [`AnyNode::downcast_ref`].
pub trait Probe {
    type Output;

    fn visit<S: Space>(self) -> Option<Self::Output>;
}

impl AnyNode {
    /// Erase a typed node
    pub fn new<X: Space, Y: Space>(node: BoxNode<X, Y>) -> Self {
        Self {
            domain: TypeId::of::<X>(),
            range: TypeId::of::<Y>(),
            domain_name: short_name::<X>(),
            range_name: short_name::<Y>(),
            inner: Box::new(Typed(node)),
        }
    }

    /// Does the node's domain have type `T`?
    pub fn domain_is<T: Space>(&self) -> bool {
        self.domain == TypeId::of::<T>()
    }

    /// Does the node's range have type `T`?
    pub fn range_is<T: Space>(&self) -> bool {
        self.range == TypeId::of::<T>()
    }

    pub fn domain_name(&self) -> &'static str {
        self.domain_name
    }

    pub fn range_name(&self) -> &'static str {
        self.range_name
    }

    /// Borrow as a typed node if the endpoints are exactly `(X, Y)`
    pub fn downcast_ref<X: Space, Y: Space>(&self) -> Option<&dyn Node<X, Y>> {
        self.inner
            .as_any()
            .downcast_ref::<Typed<X, Y>>()
            .map(|typed| typed.0.as_ref())
    }

    /// Take the typed node out if the endpoints are exactly `(X, Y)`
    pub fn into_typed<X: Space, Y: Space>(self) -> Option<BoxNode<X, Y>> {
        if !(self.domain_is::<X>() && self.range_is::<Y>()) {
            return None;
        }
        self.inner
            .into_any()
            .downcast::<Typed<X, Y>>()
            .ok()
            .map(|typed| typed.0)
    }

    /// Deep copy
    pub fn duplicate(&self) -> Self {
        Self {
            domain: self.domain,
            range: self.range,
            domain_name: self.domain_name,
            range_name: self.range_name,
            inner: self.inner.duplicate(),
        }
    }

    /// Run `probe` with the canonical type of the domain, if it is one
    pub fn probe_domain<P: Probe>(&self, probe: P) -> Option<P::Output> {
        registry::dispatch(self.domain, probe)
    }

    /// Run `probe` with the canonical type of the range, if it is one
    pub fn probe_range<P: Probe>(&self, probe: P) -> Option<P::Output> {
        registry::dispatch(self.range, probe)
    }

    /// Like [`AnyNode::probe_domain`], but `T` is tried before the registry
    ///
    /// Lets callers that already expect a non-canonical type (8-bit RGB,
    /// a 6-channel device vector) still reach it.
    pub fn probe_domain_or<T: Space, P: Probe>(&self, probe: P) -> Option<P::Output> {
        registry::dispatch_with::<T, P>(self.domain, probe)
    }

    /// Like [`AnyNode::probe_range`], but `T` is tried before the registry
    pub fn probe_range_or<T: Space, P: Probe>(&self, probe: P) -> Option<P::Output> {
        registry::dispatch_with::<T, P>(self.range, probe)
    }

    /// Runtime-checked composition `outer ∘ inner`
    ///
    /// Refused (None) when `inner`'s range differs from `outer`'s domain.
    /// All three endpoint types must be canonical.
    pub fn compose(outer: &AnyNode, inner: &AnyNode) -> Option<AnyNode> {
        if outer.domain != inner.range {
            tracing::debug!(
                outer_domain = outer.domain_name,
                inner_range = inner.range_name,
                "composition refused: intermediate types differ"
            );
            return None;
        }
        inner.probe_range(ComposeMid { outer, inner })
    }
}

impl fmt::Debug for AnyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyNode({} -> {})", self.domain_name, self.range_name)
    }
}

struct ComposeMid<'a> {
    outer: &'a AnyNode,
    inner: &'a AnyNode,
}

impl Probe for ComposeMid<'_> {
    type Output = AnyNode;

    fn visit<Z: Space>(self) -> Option<AnyNode> {
        self.inner.probe_domain(ComposeIn::<Z> {
            outer: self.outer,
            inner: self.inner,
            _mid: std::marker::PhantomData,
        })
    }
}

struct ComposeIn<'a, Z> {
    outer: &'a AnyNode,
    inner: &'a AnyNode,
    _mid: std::marker::PhantomData<fn() -> Z>,
}

impl<Z: Space> Probe for ComposeIn<'_, Z> {
    type Output = AnyNode;

    fn visit<X: Space>(self) -> Option<AnyNode> {
        self.outer.probe_range(ComposeOut::<X, Z> {
            outer: self.outer,
            inner: self.inner,
            _types: std::marker::PhantomData,
        })
    }
}

struct ComposeOut<'a, X, Z> {
    outer: &'a AnyNode,
    inner: &'a AnyNode,
    _types: std::marker::PhantomData<fn() -> (X, Z)>,
}

impl<X: Space, Z: Space> Probe for ComposeOut<'_, X, Z> {
    type Output = AnyNode;

    fn visit<Y: Space>(self) -> Option<AnyNode> {
        let outer = self.outer.downcast_ref::<Z, Y>()?;
        let inner = self.inner.downcast_ref::<X, Z>()?;
        Some(AnyNode::new(super::compose(
            outer.duplicate(),
            inner.duplicate(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Lab, Rgb, Vector, Xyz};
    use crate::node::FnNode;

    fn xyz_to_lab(x: &Xyz) -> Lab {
        Lab::new(x.y * 100.0, x.x, x.z)
    }

    fn lab_to_rgb(l: &Lab) -> Rgb<f64> {
        Rgb::new(l.l / 100.0, l.a, l.b)
    }

    #[test]
    fn test_downcast() {
        let node = AnyNode::new::<Xyz, Lab>(Box::new(FnNode::new(xyz_to_lab)));
        assert!(node.domain_is::<Xyz>());
        assert!(node.range_is::<Lab>());
        assert!(node.downcast_ref::<Xyz, Lab>().is_some());
        assert!(node.downcast_ref::<Lab, Xyz>().is_none());
        assert_eq!(format!("{:?}", node), "AnyNode(Xyz -> Lab)");

        let typed = node.into_typed::<Xyz, Lab>().unwrap();
        let lab = typed.eval(&Xyz::new(0.1, 0.5, 0.2));
        assert_eq!(lab.l, 50.0);
    }

    #[test]
    fn test_checked_compose() {
        let inner = AnyNode::new::<Xyz, Lab>(Box::new(FnNode::new(xyz_to_lab)));
        let outer = AnyNode::new::<Lab, Rgb<f64>>(Box::new(FnNode::new(lab_to_rgb)));

        let joined = AnyNode::compose(&outer, &inner).unwrap();
        let node = joined.downcast_ref::<Xyz, Rgb<f64>>().unwrap();
        let rgb = node.eval(&Xyz::new(0.25, 0.5, 0.75));
        assert_eq!(rgb.to_array(), [0.5, 0.25, 0.75]);

        // Wrong order: inner range Rgb<f64> does not meet outer domain Xyz
        assert!(AnyNode::compose(&inner, &outer).is_none());
    }

    #[test]
    fn test_probe_reports_canonical_type() {
        struct Name;
        impl Probe for Name {
            type Output = &'static str;
            fn visit<S: Space>(self) -> Option<&'static str> {
                Some(crate::node::short_name::<S>())
            }
        }

        fn to_vec4(x: &Xyz) -> Vector<f64, 4> {
            Vector::new([x.x, x.y, x.z, 0.0])
        }

        let node = AnyNode::new::<Xyz, Vector<f64, 4>>(Box::new(FnNode::new(to_vec4)));
        assert_eq!(node.probe_domain(Name), Some("Xyz"));
        assert_eq!(node.probe_range(Name), Some("Vector<f64, 4>"));

        fn to_u8(x: &Xyz) -> Rgb<u8> {
            Rgb::new(x.x as u8, 0, 0)
        }
        let node = AnyNode::new::<Xyz, Rgb<u8>>(Box::new(FnNode::new(to_u8)));
        assert_eq!(node.probe_range(Name), None);
        assert_eq!(node.probe_range_or::<Rgb<u8>, _>(Name), Some("Rgb<u8>"));
    }
}
