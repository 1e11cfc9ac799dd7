//! Domain and range adaptation
//!
//! Adapting puts a registry conversion in front of (domain) or behind
//! (range) a node so that its endpoint becomes the type the caller asks
//! for. The typed forms work on a `BoxNode` whose endpoints the compiler
//! already knows. The untyped forms take an [`AnyNode`] and first recover
//! its endpoints with the registry probes.
//!
//! Every failure is `None`: either an endpoint is not a canonical space or
//! no conversion is registered between the two types.

use std::any::TypeId;
use std::marker::PhantomData;

use super::Conversions;
use crate::node::{AnyNode, BoxNode, Probe, Space, compose, recast, short_name};

impl Conversions {
    /// `node: X -> Y` becomes `Z -> Y`
    ///
    /// Equal `Z` and `X` hand the node back without adding a stage.
    pub fn adapt_typed_domain<Z: Space, X: Space, Y: Space>(
        &self,
        node: BoxNode<X, Y>,
    ) -> Option<BoxNode<Z, Y>> {
        if TypeId::of::<Z>() == TypeId::of::<X>() {
            return recast(node);
        }
        let conversion = self.lookup::<Z, X>()?;
        Some(compose(node, conversion))
    }

    /// `node: X -> Y` becomes `X -> T`
    pub fn adapt_typed_range<T: Space, X: Space, Y: Space>(
        &self,
        node: BoxNode<X, Y>,
    ) -> Option<BoxNode<X, T>> {
        if TypeId::of::<T>() == TypeId::of::<Y>() {
            return recast(node);
        }
        let conversion = self.lookup::<Y, T>()?;
        Some(compose(conversion, node))
    }

    /// Domain-first adaptation of a node whose endpoints are both canonical
    pub fn adapt_domain<Z: Space>(&self, node: &AnyNode) -> Option<AnyNode> {
        if node.domain_is::<Z>() {
            return Some(node.duplicate());
        }
        let adapted = node.probe_domain(DomainFirst::<Z> {
            conv: self,
            node,
            _to: PhantomData,
        });
        if adapted.is_none() {
            log_failure("domain", node, short_name::<Z>());
        }
        adapted
    }

    /// Range-first adaptation of a node whose endpoints are both canonical
    pub fn adapt_range<T: Space>(&self, node: &AnyNode) -> Option<AnyNode> {
        if node.range_is::<T>() {
            return Some(node.duplicate());
        }
        let adapted = node.probe_range(RangeFirst::<T> {
            conv: self,
            node,
            _to: PhantomData,
        });
        if adapted.is_none() {
            log_failure("range", node, short_name::<T>());
        }
        adapted
    }

    /// Domain adaptation when the range type `Y` is already known
    ///
    /// `Y` may be outside the registry; only the domain is probed.
    pub fn adapt_domain_only<Y: Space, Z: Space>(&self, node: &AnyNode) -> Option<BoxNode<Z, Y>> {
        if !node.range_is::<Y>() {
            log_failure("domain", node, short_name::<Z>());
            return None;
        }
        let adapted = node.probe_domain_or::<Z, _>(DomainOnly::<Z, Y> {
            conv: self,
            node,
            _types: PhantomData,
        });
        if adapted.is_none() {
            log_failure("domain", node, short_name::<Z>());
        }
        adapted
    }

    /// Range adaptation when the domain type `X` is already known
    pub fn adapt_range_only<T: Space, X: Space>(&self, node: &AnyNode) -> Option<BoxNode<X, T>> {
        if !node.domain_is::<X>() {
            log_failure("range", node, short_name::<T>());
            return None;
        }
        let adapted = node.probe_range_or::<T, _>(RangeOnly::<T, X> {
            conv: self,
            node,
            _types: PhantomData,
        });
        if adapted.is_none() {
            log_failure("range", node, short_name::<T>());
        }
        adapted
    }

    /// Join `output: R -> Y'` after `input: X' -> D` into `X -> Y`
    ///
    /// 1. probe the input's range for its canonical type `D`
    /// 2. adapt the output's domain from `R` to `D`
    /// 3. compose output after input
    /// 4. adapt the joined domain to `X` and range to `Y`
    ///
    /// The input's domain and the output's range may be `X` / `Y`
    /// themselves even when those are not canonical.
    pub fn join<X: Space, Y: Space>(&self, output: &AnyNode, input: &AnyNode) -> Option<BoxNode<X, Y>> {
        let joined = input.probe_range(JoinMid::<X, Y> {
            conv: self,
            output,
            input,
            _types: PhantomData,
        });
        if joined.is_none() {
            tracing::debug!(
                input = ?input,
                output = ?output,
                to = %format_args!("{} -> {}", short_name::<X>(), short_name::<Y>()),
                "no join between nodes"
            );
        }
        joined
    }
}

fn log_failure(side: &'static str, node: &AnyNode, target: &'static str) {
    tracing::debug!(
        side,
        domain = node.domain_name(),
        range = node.range_name(),
        target,
        "no adaptation path"
    );
}

/// [`Conversions::adapt_domain`] with the default (D50) registry
pub fn adapt_domain<Z: Space>(node: &AnyNode) -> Option<AnyNode> {
    Conversions::default().adapt_domain::<Z>(node)
}

/// [`Conversions::adapt_range`] with the default (D50) registry
pub fn adapt_range<T: Space>(node: &AnyNode) -> Option<AnyNode> {
    Conversions::default().adapt_range::<T>(node)
}

/// [`Conversions::adapt_domain_only`] with the default (D50) registry
pub fn adapt_domain_only<Y: Space, Z: Space>(node: &AnyNode) -> Option<BoxNode<Z, Y>> {
    Conversions::default().adapt_domain_only::<Y, Z>(node)
}

/// [`Conversions::adapt_range_only`] with the default (D50) registry
pub fn adapt_range_only<T: Space, X: Space>(node: &AnyNode) -> Option<BoxNode<X, T>> {
    Conversions::default().adapt_range_only::<T, X>(node)
}

/// [`Conversions::join`] with the default (D50) registry
pub fn join<X: Space, Y: Space>(output: &AnyNode, input: &AnyNode) -> Option<BoxNode<X, Y>> {
    Conversions::default().join::<X, Y>(output, input)
}

// Domain-first: domain X found, now find the range Y.
struct DomainFirst<'a, Z> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _to: PhantomData<fn() -> Z>,
}

impl<Z: Space> Probe for DomainFirst<'_, Z> {
    type Output = AnyNode;

    fn visit<X: Space>(self) -> Option<AnyNode> {
        self.node.probe_range(DomainSecond::<Z, X> {
            conv: self.conv,
            node: self.node,
            _types: PhantomData,
        })
    }
}

struct DomainSecond<'a, Z, X> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _types: PhantomData<fn() -> (Z, X)>,
}

impl<Z: Space, X: Space> Probe for DomainSecond<'_, Z, X> {
    type Output = AnyNode;

    fn visit<Y: Space>(self) -> Option<AnyNode> {
        let node = self.node.downcast_ref::<X, Y>()?;
        let adapted = self.conv.adapt_typed_domain::<Z, X, Y>(node.duplicate())?;
        Some(AnyNode::new(adapted))
    }
}

// Range-first: range R found, now find the domain X.
struct RangeFirst<'a, T> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _to: PhantomData<fn() -> T>,
}

impl<T: Space> Probe for RangeFirst<'_, T> {
    type Output = AnyNode;

    fn visit<R: Space>(self) -> Option<AnyNode> {
        self.node.probe_domain(RangeSecond::<T, R> {
            conv: self.conv,
            node: self.node,
            _types: PhantomData,
        })
    }
}

struct RangeSecond<'a, T, R> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _types: PhantomData<fn() -> (T, R)>,
}

impl<T: Space, R: Space> Probe for RangeSecond<'_, T, R> {
    type Output = AnyNode;

    fn visit<X: Space>(self) -> Option<AnyNode> {
        let node = self.node.downcast_ref::<X, R>()?;
        let adapted = self.conv.adapt_typed_range::<T, X, R>(node.duplicate())?;
        Some(AnyNode::new(adapted))
    }
}

struct DomainOnly<'a, Z, Y> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _types: PhantomData<fn() -> (Z, Y)>,
}

impl<Z: Space, Y: Space> Probe for DomainOnly<'_, Z, Y> {
    type Output = BoxNode<Z, Y>;

    fn visit<X: Space>(self) -> Option<BoxNode<Z, Y>> {
        let node = self.node.downcast_ref::<X, Y>()?;
        self.conv.adapt_typed_domain::<Z, X, Y>(node.duplicate())
    }
}

struct RangeOnly<'a, T, X> {
    conv: &'a Conversions,
    node: &'a AnyNode,
    _types: PhantomData<fn() -> (T, X)>,
}

impl<T: Space, X: Space> Probe for RangeOnly<'_, T, X> {
    type Output = BoxNode<X, T>;

    fn visit<R: Space>(self) -> Option<BoxNode<X, T>> {
        let node = self.node.downcast_ref::<X, R>()?;
        self.conv.adapt_typed_range::<T, X, R>(node.duplicate())
    }
}

// Join, step 1 found D; discover the output's domain R.
struct JoinMid<'a, X, Y> {
    conv: &'a Conversions,
    output: &'a AnyNode,
    input: &'a AnyNode,
    _types: PhantomData<fn() -> (X, Y)>,
}

impl<X: Space, Y: Space> Probe for JoinMid<'_, X, Y> {
    type Output = BoxNode<X, Y>;

    fn visit<D: Space>(self) -> Option<BoxNode<X, Y>> {
        self.output.probe_domain(JoinOutDomain::<X, Y, D> {
            conv: self.conv,
            output: self.output,
            input: self.input,
            _types: PhantomData,
        })
    }
}

struct JoinOutDomain<'a, X, Y, D> {
    conv: &'a Conversions,
    output: &'a AnyNode,
    input: &'a AnyNode,
    _types: PhantomData<fn() -> (X, Y, D)>,
}

impl<X: Space, Y: Space, D: Space> Probe for JoinOutDomain<'_, X, Y, D> {
    type Output = BoxNode<X, Y>;

    fn visit<R: Space>(self) -> Option<BoxNode<X, Y>> {
        self.output.probe_range_or::<Y, _>(JoinOutRange::<X, Y, D, R> {
            conv: self.conv,
            output: self.output,
            input: self.input,
            _types: PhantomData,
        })
    }
}

struct JoinOutRange<'a, X, Y, D, R> {
    conv: &'a Conversions,
    output: &'a AnyNode,
    input: &'a AnyNode,
    _types: PhantomData<fn() -> (X, Y, D, R)>,
}

impl<X: Space, Y: Space, D: Space, R: Space> Probe for JoinOutRange<'_, X, Y, D, R> {
    type Output = BoxNode<X, Y>;

    fn visit<Yo: Space>(self) -> Option<BoxNode<X, Y>> {
        let output = self.output.downcast_ref::<R, Yo>()?;
        let output = self.conv.adapt_typed_domain::<D, R, Yo>(output.duplicate())?;
        self.input.probe_domain_or::<X, _>(JoinIn::<X, Y, D, Yo> {
            conv: self.conv,
            output,
            input: self.input,
            _types: PhantomData,
        })
    }
}

struct JoinIn<'a, X, Y, D, Yo> {
    conv: &'a Conversions,
    output: BoxNode<D, Yo>,
    input: &'a AnyNode,
    _types: PhantomData<fn() -> (X, Y)>,
}

impl<X: Space, Y: Space, D: Space, Yo: Space> Probe for JoinIn<'_, X, Y, D, Yo> {
    type Output = BoxNode<X, Y>;

    fn visit<Xi: Space>(self) -> Option<BoxNode<X, Y>> {
        let input = self.input.downcast_ref::<Xi, D>()?;
        let joined = compose(self.output, input.duplicate());
        let joined = self.conv.adapt_typed_domain::<X, Xi, Yo>(joined)?;
        self.conv.adapt_typed_range::<Y, X, Yo>(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Lab, Rgb, Vector, Xyz};
    use crate::convert::XyzToRgb;
    use crate::node::{FnNode, Node};

    fn xyz_to_rgb_node() -> AnyNode {
        AnyNode::new::<Xyz, Rgb<f64>>(Box::new(XyzToRgb::<f64>::new()))
    }

    #[test]
    fn test_domain_then_range() {
        let conv = Conversions::default();
        let node = xyz_to_rgb_node();

        let lab_in = conv.adapt_domain::<Lab>(&node).unwrap();
        assert!(lab_in.domain_is::<Lab>());
        let adapted = conv.adapt_range::<Rgb<u8>>(&lab_in).unwrap();
        assert!(adapted.domain_is::<Lab>());
        assert!(adapted.range_is::<Rgb<u8>>());

        let lab = Lab::new(52.0, 20.0, -30.0);
        let manual = {
            let xyz = conv.lookup::<Lab, Xyz>().unwrap().eval(&lab);
            let rgb = XyzToRgb::<f64>::new().eval(&xyz);
            rgb.rescale::<u8>()
        };
        let typed = adapted.downcast_ref::<Lab, Rgb<u8>>().unwrap();
        assert_eq!(typed.eval(&lab), manual);
    }

    #[test]
    fn test_identity_adaptation_adds_nothing() {
        let node = xyz_to_rgb_node();
        let same = adapt_domain::<Xyz>(&node).unwrap();
        assert!(same.downcast_ref::<Xyz, Rgb<f64>>().is_some());
    }

    #[test]
    fn test_unregistered_domain() {
        let node = xyz_to_rgb_node();
        assert!(adapt_domain::<Vector<f64, 7>>(&node).is_none());
        assert!(adapt_range::<Vector<u8, 2>>(&node).is_none());
    }

    #[test]
    fn test_non_canonical_endpoint_needs_hint() {
        fn to_u8(x: &Xyz) -> Rgb<u8> {
            Rgb::new(x.x as u8, x.y as u8, x.z as u8)
        }
        let node = AnyNode::new::<Xyz, Rgb<u8>>(Box::new(FnNode::new(to_u8)));

        // The range is not canonical, so the two-sided probe fails
        assert!(adapt_domain::<Lab>(&node).is_none());

        let typed = adapt_domain_only::<Rgb<u8>, Lab>(&node).unwrap();
        let rgb = typed.eval(&Lab::new(100.0, 0.0, 0.0));
        assert_eq!(rgb.g, 1);
    }

    #[test]
    fn test_range_only() {
        let node = xyz_to_rgb_node();
        let typed = adapt_range_only::<Rgb<u16>, Xyz>(&node).unwrap();
        assert_eq!(typed.eval(&Xyz::new(0.0, 0.0, 0.0)), Rgb::new(0, 0, 0));
        assert!(adapt_range_only::<Rgb<u16>, Lab>(&node).is_none());
    }

    #[test]
    fn test_join_bridges_pcs() {
        // input: Rgb<f64> -> Xyz, output: Lab -> Vector<f64, 4>
        fn ink(l: &Lab) -> Vector<f64, 4> {
            Vector::new([l.l / 100.0, 0.0, 0.0, 1.0 - l.l / 100.0])
        }
        let input = AnyNode::new::<Rgb<f64>, Xyz>(Box::new(crate::convert::RgbToXyz::<f64>::new()));
        let output = AnyNode::new::<Lab, Vector<f64, 4>>(Box::new(FnNode::new(ink)));

        let joined = join::<Rgb<u8>, Vector<f64, 4>>(&output, &input).unwrap();
        let white = joined.eval(&Rgb::new(255, 255, 255));
        // sRGB white is D65, slightly off the D50 Lab white
        assert!((white[0] - 1.0).abs() < 0.01, "{:?}", white);
        let black = joined.eval(&Rgb::new(0, 0, 0));
        assert!(black[3] > 0.999, "{:?}", black);

        assert!(join::<Rgb<u8>, Vector<f64, 4>>(&input, &output).is_none());
    }
}
