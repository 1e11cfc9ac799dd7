//! Canonical color space conversions
//!
//! [`Conversions`] is the registry handle. It answers "is there a
//! conversion node from `X` to `Y`?" for the fixed set of pairs below and
//! drives the adapter functions in [`adapt`].
//!
//! | from            | to              | node              |
//! |-----------------|-----------------|-------------------|
//! | `Xyz`           | `Lab`           | [`XyzToLab`]      |
//! | `Lab`           | `Xyz`           | [`LabToXyz`]      |
//! | `Xyz`           | `Rgb<S>`        | [`XyzToRgb`]      |
//! | `Rgb<S>`        | `Xyz`           | [`RgbToXyz`]      |
//! | `Rgb<S>`        | `Rgb<T>`        | [`Rescale`]       |
//! | `Bgr<S>`        | `Bgr<T>`        | [`Rescale`]       |
//! | `Rgb<S>`        | `Bgr<T>` and back | [`Reorder`]     |
//! | `Vector<f64,3>` | `Rgb<f64>`/`Xyz` and back | [`Reinterpret`] |
//! | `Lab`           | `Vector<f64,3>` | [`LabEncode`]     |
//! | `Vector<f64,3>` | `Lab`           | [`LabDecode`]     |
//!
//! `S`, `T` range over `u8`, `u16` and `f64`. Any other pair has no
//! conversion, which adapters report as `None`.

pub mod adapt;

use std::any::TypeId;
use std::marker::PhantomData;

use crate::color::{Bgr, Coordinate, Lab, Rgb, Scalar, Vector, WhitePoint, Xyz};
use crate::math::matrix::{SRGB_TO_XYZ, XYZ_TO_SRGB};
use crate::math::{srgb_gamma_decode, srgb_gamma_encode};
use crate::node::{BoxNode, Identity, Node, Space, recast};

pub use adapt::{adapt_domain, adapt_domain_only, adapt_range, adapt_range_only, join};

/// Registry handle carrying the white point used by Lab conversions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Conversions {
    pub white: WhitePoint,
}

impl Conversions {
    pub fn new(white: WhitePoint) -> Self {
        Self { white }
    }

    /// Is there a conversion from `X` to `Y`?
    pub fn exists<X: Space, Y: Space>(&self) -> bool {
        self.lookup::<X, Y>().is_some()
    }

    /// Conversion node from `X` to `Y`, or None if the pair is not registered
    ///
    /// Equal types yield the identity node.
    pub fn lookup<X: Space, Y: Space>(&self) -> Option<BoxNode<X, Y>> {
        macro_rules! offer {
            ($from:ty => $to:ty, $node:expr) => {
                if TypeId::of::<X>() == TypeId::of::<$from>() && TypeId::of::<Y>() == TypeId::of::<$to>() {
                    let node: BoxNode<$from, $to> = Box::new($node);
                    return recast(node);
                }
            };
        }

        // Equal kinds never get here, the identity check comes first
        macro_rules! offer_rgb {
            (@rescale $s:ty; $($t:ty),*) => {
                $(
                    offer!(Rgb<$s> => Rgb<$t>, Rescale::<$s, $t>::new());
                    offer!(Bgr<$s> => Bgr<$t>, Rescale::<$s, $t>::new());
                    offer!(Rgb<$s> => Bgr<$t>, Reorder::<$s, $t>::new());
                    offer!(Bgr<$s> => Rgb<$t>, Reorder::<$s, $t>::new());
                )*
            };
            ($($s:ty),*) => {
                $(
                    offer!(Xyz => Rgb<$s>, XyzToRgb::<$s>::new());
                    offer!(Rgb<$s> => Xyz, RgbToXyz::<$s>::new());
                    offer_rgb!(@rescale $s; u8, u16, f64);
                )*
            };
        }

        if TypeId::of::<X>() == TypeId::of::<Y>() {
            let node: BoxNode<X, X> = Box::new(Identity::new());
            return recast(node);
        }

        let white = self.white;
        offer!(Xyz => Lab, XyzToLab { white });
        offer!(Lab => Xyz, LabToXyz { white });
        offer_rgb!(u8, u16, f64);
        offer!(Vector<f64, 3> => Rgb<f64>, Reinterpret::<Vector<f64, 3>, Rgb<f64>>::new());
        offer!(Rgb<f64> => Vector<f64, 3>, Reinterpret::<Rgb<f64>, Vector<f64, 3>>::new());
        offer!(Vector<f64, 3> => Xyz, Reinterpret::<Vector<f64, 3>, Xyz>::new());
        offer!(Xyz => Vector<f64, 3>, Reinterpret::<Xyz, Vector<f64, 3>>::new());
        offer!(Lab => Vector<f64, 3>, LabEncode);
        offer!(Vector<f64, 3> => Lab, LabDecode);
        None
    }
}

/// XYZ to Lab relative to a white point
#[derive(Debug, Clone, Copy)]
pub struct XyzToLab {
    pub white: WhitePoint,
}

impl Node<Xyz, Lab> for XyzToLab {
    #[inline]
    fn eval(&self, x: &Xyz) -> Lab {
        Lab::from_xyz_with_white(*x, &self.white)
    }

    fn duplicate(&self) -> BoxNode<Xyz, Lab> {
        Box::new(*self)
    }
}

/// Lab to XYZ relative to a white point
#[derive(Debug, Clone, Copy)]
pub struct LabToXyz {
    pub white: WhitePoint,
}

impl Node<Lab, Xyz> for LabToXyz {
    #[inline]
    fn eval(&self, x: &Lab) -> Xyz {
        x.to_xyz_with_white(&self.white)
    }

    fn duplicate(&self) -> BoxNode<Lab, Xyz> {
        Box::new(*self)
    }
}

/// XYZ to gamma-encoded sRGB, clamped to the cube
pub struct XyzToRgb<S>(PhantomData<fn() -> S>);

impl<S> XyzToRgb<S> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<S> Default for XyzToRgb<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar> Node<Xyz, Rgb<S>> for XyzToRgb<S> {
    fn eval(&self, x: &Xyz) -> Rgb<S> {
        let linear = XYZ_TO_SRGB.multiply_vec(x.to_array());
        let encode = |v: f64| S::from_normalized(srgb_gamma_encode(v.clamp(0.0, 1.0)));
        Rgb::new(encode(linear[0]), encode(linear[1]), encode(linear[2]))
    }

    fn duplicate(&self) -> BoxNode<Xyz, Rgb<S>> {
        Box::new(Self::new())
    }
}

/// Gamma-encoded sRGB to XYZ
pub struct RgbToXyz<S>(PhantomData<fn() -> S>);

impl<S> RgbToXyz<S> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<S> Default for RgbToXyz<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar> Node<Rgb<S>, Xyz> for RgbToXyz<S> {
    fn eval(&self, x: &Rgb<S>) -> Xyz {
        let linear = [
            srgb_gamma_decode(x.r.normalized()),
            srgb_gamma_decode(x.g.normalized()),
            srgb_gamma_decode(x.b.normalized()),
        ];
        Xyz::from_array(SRGB_TO_XYZ.multiply_vec(linear))
    }

    fn duplicate(&self) -> BoxNode<Rgb<S>, Xyz> {
        Box::new(Self::new())
    }
}

/// Rescale RGB or BGR between scalar kinds
pub struct Rescale<S, T>(PhantomData<fn(S) -> T>);

impl<S, T> Rescale<S, T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<S, T> Default for Rescale<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar, T: Scalar> Node<Rgb<S>, Rgb<T>> for Rescale<S, T> {
    #[inline]
    fn eval(&self, x: &Rgb<S>) -> Rgb<T> {
        x.rescale()
    }

    fn duplicate(&self) -> BoxNode<Rgb<S>, Rgb<T>> {
        Box::new(Self::new())
    }
}

impl<S: Scalar, T: Scalar> Node<Bgr<S>, Bgr<T>> for Rescale<S, T> {
    #[inline]
    fn eval(&self, x: &Bgr<S>) -> Bgr<T> {
        x.rescale()
    }

    fn duplicate(&self) -> BoxNode<Bgr<S>, Bgr<T>> {
        Box::new(Self::new())
    }
}

/// Swap between RGB and BGR order, rescaling the scalar kind on the way
pub struct Reorder<S, T>(PhantomData<fn(S) -> T>);

impl<S, T> Reorder<S, T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<S, T> Default for Reorder<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar, T: Scalar> Node<Rgb<S>, Bgr<T>> for Reorder<S, T> {
    #[inline]
    fn eval(&self, x: &Rgb<S>) -> Bgr<T> {
        x.rescale::<T>().into()
    }

    fn duplicate(&self) -> BoxNode<Rgb<S>, Bgr<T>> {
        Box::new(Self::new())
    }
}

impl<S: Scalar, T: Scalar> Node<Bgr<S>, Rgb<T>> for Reorder<S, T> {
    #[inline]
    fn eval(&self, x: &Bgr<S>) -> Rgb<T> {
        Rgb::from(*x).rescale()
    }

    fn duplicate(&self) -> BoxNode<Bgr<S>, Rgb<T>> {
        Box::new(Self::new())
    }
}

/// Channel-by-channel copy between two coordinate types of equal width
///
/// No arithmetic beyond the scalar conversion: this only changes what the
/// numbers are called.
pub struct Reinterpret<A, B>(PhantomData<fn(A) -> B>);

impl<A, B> Reinterpret<A, B> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<A, B> Default for Reinterpret<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Coordinate, B: Coordinate> Node<A, B> for Reinterpret<A, B> {
    #[inline]
    fn eval(&self, x: &A) -> B {
        let mut out = B::default();
        for i in 0..A::CHANNELS.min(B::CHANNELS) {
            out.set(i, B::Scalar::from_f64(x.get(i).to_f64()));
        }
        out
    }

    fn duplicate(&self) -> BoxNode<A, B> {
        Box::new(Self::new())
    }
}

/// Lab to its normalized vector encoding
///
/// `v0 = L / 100`, `v1 = (a + 128) / 255`, `v2 = (b + 128) / 255`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabEncode;

impl Node<Lab, Vector<f64, 3>> for LabEncode {
    #[inline]
    fn eval(&self, x: &Lab) -> Vector<f64, 3> {
        Vector::new([x.l / 100.0, (x.a + 128.0) / 255.0, (x.b + 128.0) / 255.0])
    }

    fn duplicate(&self) -> BoxNode<Lab, Vector<f64, 3>> {
        Box::new(LabEncode)
    }
}

/// Normalized vector encoding to Lab
///
/// `L = v0 * 100`, `a = v1 * 255 - 128`, `b = v2 * 255 - 128`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabDecode;

impl Node<Vector<f64, 3>, Lab> for LabDecode {
    #[inline]
    fn eval(&self, x: &Vector<f64, 3>) -> Lab {
        Lab::new(x[0] * 100.0, x[1] * 255.0 - 128.0, x[2] * 255.0 - 128.0)
    }

    fn duplicate(&self) -> BoxNode<Vector<f64, 3>, Lab> {
        Box::new(LabDecode)
    }
}
