//! ICC Profile Parser
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table: a count at byte 128, then 12-byte entries
//!    (signature, offset, size)
//! 3. Tag data (tags may share bytes)
//!
//! Tag bounds are checked when the profile is parsed. Tag contents are
//! decoded on request, so a profile with a tag this crate cannot use still
//! loads as long as that tag is never asked for.

use std::collections::HashMap;

use super::error::IccError;
use super::header::{ColorSpace, HEADER_SIZE, IccHeader};
use super::tags::{Curve, TagData};
use super::types::{Reader, TagSignature};
use crate::math::Matrix3x3;

/// An ICC profile parsed from bytes
#[derive(Debug, Clone)]
pub struct IccProfile {
    pub header: IccHeader,
    /// Tag signature -> byte range in `data`
    tags: HashMap<TagSignature, (usize, usize)>,
    data: Vec<u8>,
}

impl IccProfile {
    /// Parse the header and tag table
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        let header = IccHeader::parse(data)?;
        // Tags beyond the declared size are out of bounds too
        let data = &data[..header.size as usize];

        let mut r = Reader::new(data, 0);
        r.seek(HEADER_SIZE).map_err(|_| IccError::TooSmall {
            expected: HEADER_SIZE + 4,
            actual: data.len(),
        })?;
        let count = r.u32().map_err(|_| IccError::TooSmall {
            expected: HEADER_SIZE + 4,
            actual: data.len(),
        })? as usize;
        let table_end = HEADER_SIZE + 4 + count.saturating_mul(12);
        if table_end > data.len() {
            return Err(IccError::TooSmall {
                expected: table_end,
                actual: data.len(),
            });
        }

        let mut tags = HashMap::with_capacity(count);
        for _ in 0..count {
            let signature = TagSignature(r.u32()?);
            let offset = r.u32()?;
            let size = r.u32()?;
            let end = offset as usize + size as usize;
            if end > data.len() {
                return Err(IccError::TagOutOfBounds {
                    tag: signature.0,
                    offset,
                    size,
                    profile_size: data.len(),
                });
            }
            tags.insert(signature, (offset as usize, end));
        }

        tracing::debug!(
            class = ?header.device_class,
            color_space = ?header.color_space,
            pcs = ?header.pcs,
            tags = tags.len(),
            "parsed ICC profile"
        );

        Ok(Self {
            header,
            tags,
            data: data.to_vec(),
        })
    }

    pub fn has_tag(&self, sig: TagSignature) -> bool {
        self.tags.contains_key(&sig)
    }

    /// Decode a tag, None if the profile does not carry it
    pub fn tag(&self, sig: TagSignature) -> Result<Option<TagData>, IccError> {
        let Some(&(start, end)) = self.tags.get(&sig) else {
            return Ok(None);
        };
        TagData::parse(&self.data[start..end], sig, start).map(Some)
    }

    /// Colorant tags as a matrix with one column per primary
    pub fn colorant_matrix(&self) -> Result<Option<Matrix3x3>, IccError> {
        let mut columns = [[0.0; 3]; 3];
        let sigs = [
            TagSignature::RED_COLORANT,
            TagSignature::GREEN_COLORANT,
            TagSignature::BLUE_COLORANT,
        ];
        for (column, sig) in columns.iter_mut().zip(sigs) {
            let Some(xyz) = self.tag(sig)?.as_ref().and_then(TagData::xyz) else {
                return Ok(None);
            };
            *column = [xyz.x, xyz.y, xyz.z];
        }
        let m = std::array::from_fn(|row| std::array::from_fn(|col| columns[col][row]));
        Ok(Some(Matrix3x3::new(m)))
    }

    /// A curve tag such as rTRC
    pub fn curve(&self, sig: TagSignature) -> Result<Option<Curve>, IccError> {
        match self.tag(sig)? {
            None => Ok(None),
            Some(TagData::Curve(c)) => Ok(Some(c)),
            Some(_) => Err(IccError::CorruptedData(format!("tag {} is not a curve", sig))),
        }
    }

    /// RGB device space with XYZ connection and all six shaper tags
    pub fn is_matrix_shaper(&self) -> bool {
        self.header.color_space == ColorSpace::Rgb
            && self.header.pcs == ColorSpace::Xyz
            && [
                TagSignature::RED_COLORANT,
                TagSignature::GREEN_COLORANT,
                TagSignature::BLUE_COLORANT,
                TagSignature::RED_TRC,
                TagSignature::GREEN_TRC,
                TagSignature::BLUE_TRC,
            ]
            .into_iter()
            .all(|sig| self.has_tag(sig))
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Tag signatures in the order their data appears in the profile
    pub fn signatures(&self) -> Vec<TagSignature> {
        let mut sigs: Vec<_> = self.tags.iter().map(|(&sig, &(start, _))| (start, sig)).collect();
        sigs.sort_unstable_by_key(|&(start, sig)| (start, sig.0));
        sigs.into_iter().map(|(_, sig)| sig).collect()
    }

    /// Decode every tag of a supported type, in profile order
    ///
    /// Tags of other types, such as descriptions and text, are skipped.
    /// A supported tag that fails to decode is an error.
    pub fn load_all(&self) -> Result<Vec<(TagSignature, TagData)>, IccError> {
        let mut out = Vec::with_capacity(self.tags.len());
        for sig in self.signatures() {
            match self.tag(sig) {
                Ok(Some(data)) => out.push((sig, data)),
                Ok(None) => {}
                Err(IccError::InvalidTagType { type_sig, .. }) => {
                    tracing::debug!(tag = %sig, type_sig = %TagSignature(type_sig), "skipping tag of unsupported type");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }
}
