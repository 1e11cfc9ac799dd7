//! Closed registry of canonical color spaces
//!
//! The registry is the fixed list of endpoint types the runtime probes try,
//! in order: [`Xyz`], [`Lab`], `Rgb<f64>` and `Vector<f64, 4>`. The types
//! are mutually distinct so at most one can match a given `TypeId`.
//! Adding a canonical space means adding one arm to [`dispatch`].

use std::any::TypeId;

use super::{Probe, Space};
use crate::color::{Lab, Rgb, Vector, Xyz};

/// Names of the canonical spaces, in probe order
pub const CANONICAL: [&str; 4] = ["Xyz", "Lab", "Rgb<f64>", "Vector<f64, 4>"];

/// Is `T` one of the canonical spaces?
pub fn is_canonical<T: Space>() -> bool {
    is_canonical_id(TypeId::of::<T>())
}

pub(crate) fn is_canonical_id(id: TypeId) -> bool {
    id == TypeId::of::<Xyz>()
        || id == TypeId::of::<Lab>()
        || id == TypeId::of::<Rgb<f64>>()
        || id == TypeId::of::<Vector<f64, 4>>()
}

/// Call `probe.visit::<S>()` for the canonical `S` whose id is `id`
pub(crate) fn dispatch<P: Probe>(id: TypeId, probe: P) -> Option<P::Output> {
    if id == TypeId::of::<Xyz>() {
        probe.visit::<Xyz>()
    } else if id == TypeId::of::<Lab>() {
        probe.visit::<Lab>()
    } else if id == TypeId::of::<Rgb<f64>>() {
        probe.visit::<Rgb<f64>>()
    } else if id == TypeId::of::<Vector<f64, 4>>() {
        probe.visit::<Vector<f64, 4>>()
    } else {
        None
    }
}

/// [`dispatch`] with an extra candidate `T` tried first
pub(crate) fn dispatch_with<T: Space, P: Probe>(id: TypeId, probe: P) -> Option<P::Output> {
    if id == TypeId::of::<T>() {
        probe.visit::<T>()
    } else {
        dispatch(id, probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::short_name;

    struct Name;

    impl Probe for Name {
        type Output = &'static str;

        fn visit<S: Space>(self) -> Option<&'static str> {
            Some(short_name::<S>())
        }
    }

    #[test]
    fn test_dispatch_covers_registry() {
        let ids = [
            TypeId::of::<Xyz>(),
            TypeId::of::<Lab>(),
            TypeId::of::<Rgb<f64>>(),
            TypeId::of::<Vector<f64, 4>>(),
        ];
        for (id, name) in ids.into_iter().zip(CANONICAL) {
            assert_eq!(dispatch(id, Name), Some(name));
        }
    }

    #[test]
    fn test_unregistered_space() {
        assert_eq!(dispatch(TypeId::of::<Rgb<u8>>(), Name), None);
        assert_eq!(dispatch(TypeId::of::<Vector<f64, 3>>(), Name), None);
        assert!(!is_canonical::<Vector<u16, 4>>());
        assert!(is_canonical::<Lab>());
    }

    #[test]
    fn test_extra_candidate_first() {
        let id = TypeId::of::<Vector<f64, 6>>();
        assert_eq!(dispatch_with::<Vector<f64, 6>, _>(id, Name), Some("Vector<f64, 6>"));
        assert_eq!(dispatch_with::<Rgb<u8>, _>(TypeId::of::<Xyz>(), Name), Some("Xyz"));
    }
}
