//! ICC Tag Decoding
//!
//! Every tag starts with a 4-byte type signature and 4 reserved bytes
//! that must be zero, followed by type-specific data. Only the types a
//! transform can be built from are decoded; anything else is rejected
//! with [`IccError::InvalidTagType`].
//!
//! See ICC.1:2022 Section 10.

mod curves;
mod lut;
mod xyz;

pub use curves::Curve;
pub use lut::{ClutGrid, LegacyLut, LutAb, LutDirection, LutMatrix};
pub use xyz::read_xyz_array;

use super::error::IccError;
use super::types::{Reader, TagSignature, TypeSignature};
use crate::color::Xyz;

/// Decoded tag contents
#[derive(Debug, Clone, PartialEq)]
pub enum TagData {
    /// XYZType (colorants, white point)
    Xyz(Vec<Xyz>),
    /// curv or para
    Curve(Curve),
    /// mft1 or mft2
    Lut(LegacyLut),
    /// mAB or mBA
    LutAb(LutAb),
}

impl TagData {
    /// Decode the bytes of tag `tag`, which start at `origin` in the profile
    pub fn parse(data: &[u8], tag: TagSignature, origin: usize) -> Result<Self, IccError> {
        let mut r = Reader::new(data, origin);
        let type_sig = TypeSignature(r.u32()?);
        r.reserved(4)?;

        match type_sig {
            TypeSignature::XYZ => read_xyz_array(&mut r).map(Self::Xyz),
            TypeSignature::CURVE | TypeSignature::PARA => {
                Curve::read_body(type_sig, &mut r).map(Self::Curve)
            }
            TypeSignature::LUT8 => LegacyLut::read_body(&mut r, 1).map(Self::Lut),
            TypeSignature::LUT16 => LegacyLut::read_body(&mut r, 2).map(Self::Lut),
            TypeSignature::LUT_A_TO_B => LutAb::read_body(&mut r, LutDirection::AToB).map(Self::LutAb),
            TypeSignature::LUT_B_TO_A => LutAb::read_body(&mut r, LutDirection::BToA).map(Self::LutAb),
            other => Err(IccError::InvalidTagType {
                tag: tag.0,
                type_sig: other.0,
            }),
        }
    }

    /// First XYZ value, if this is an XYZ tag
    pub fn xyz(&self) -> Option<Xyz> {
        match self {
            Self::Xyz(values) => values.first().copied(),
            _ => None,
        }
    }

    pub fn curve(&self) -> Option<&Curve> {
        match self {
            Self::Curve(c) => Some(c),
            _ => None,
        }
    }
}
