//! Color profiles
//!
//! A [`ColorProfile`] hands out the two halves of a transform: device to
//! PCS and PCS to device. ICC profiles decode their tags on first use and
//! keep the built node; later requests receive deep duplicates of it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::clut::Interpolation;
use crate::color::{Rgb, Xyz};
use crate::convert::{Conversions, RgbToXyz, XyzToRgb};
use crate::error::Result;
use crate::icc::{ColorSpace, IccHeader, IccProfile, TagSignature};
use crate::node::{AnyNode, BoxNode, Space};
use crate::pipeline::{self, Endpoints, MatrixShaper, RenderingIntent, TransformOptions};

/// Which half of a profile a node implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    DeviceToPcs,
    PcsToDevice,
}

impl Direction {
    /// Tag per intent, with the fallback tag last
    fn tags(self, intent: RenderingIntent) -> [TagSignature; 2] {
        let table = match self {
            Self::DeviceToPcs => [TagSignature::A2B0, TagSignature::A2B1, TagSignature::A2B2],
            Self::PcsToDevice => [TagSignature::B2A0, TagSignature::B2A1, TagSignature::B2A2],
        };
        let preferred = match intent {
            RenderingIntent::Perceptual => table[0],
            RenderingIntent::RelativeColorimetric | RenderingIntent::AbsoluteColorimetric => table[1],
            RenderingIntent::Saturation => table[2],
        };
        [preferred, table[0]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source {
    Tag(TagSignature),
    Shaper(Direction),
}

type CacheKey = (Source, Option<Interpolation>);

enum ProfileKind {
    Icc {
        icc: IccProfile,
        cache: Mutex<HashMap<CacheKey, AnyNode>>,
    },
    Srgb,
}

/// ICC color profile or the built-in sRGB profile
pub struct ColorProfile {
    kind: ProfileKind,
}

impl std::fmt::Debug for ColorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ProfileKind::Icc { icc, .. } => f.debug_tuple("ColorProfile").field(&icc.header).finish(),
            ProfileKind::Srgb => f.write_str("ColorProfile(sRGB)"),
        }
    }
}

impl ColorProfile {
    /// Parse an ICC profile
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let icc = IccProfile::parse(data)?;
        Ok(Self {
            kind: ProfileKind::Icc {
                icc,
                cache: Mutex::new(HashMap::new()),
            },
        })
    }

    /// Read and parse an ICC file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Built-in sRGB: `Rgb<f64>` to XYZ with sRGB primaries and gamma
    ///
    /// Every intent maps to the same pair of conversions.
    pub fn srgb() -> Self {
        Self {
            kind: ProfileKind::Srgb,
        }
    }

    /// Header of an ICC profile, None for built-ins
    pub fn header(&self) -> Option<&IccHeader> {
        self.icc().map(|icc| &icc.header)
    }

    pub fn icc(&self) -> Option<&IccProfile> {
        match &self.kind {
            ProfileKind::Icc { icc, .. } => Some(icc),
            ProfileKind::Srgb => None,
        }
    }

    /// Signatures of the tags an ICC profile carries, in profile order
    ///
    /// Empty for built-ins.
    pub fn tags(&self) -> Vec<TagSignature> {
        self.icc().map(IccProfile::signatures).unwrap_or_default()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.header().map_or(ColorSpace::Rgb, |h| h.color_space)
    }

    pub fn pcs(&self) -> ColorSpace {
        self.header().map_or(ColorSpace::Xyz, |h| h.pcs)
    }

    /// Device to PCS for `intent` with erased endpoint types
    ///
    /// `Ok(None)` when the profile has neither a suitable A2B tag nor the
    /// matrix-shaper tags.
    pub fn device_to_pcs_any(&self, intent: RenderingIntent) -> Result<Option<AnyNode>> {
        self.device_to_pcs_with(&TransformOptions::new().with_intent(intent))
    }

    /// PCS to device for `intent` with erased endpoint types
    pub fn pcs_to_device_any(&self, intent: RenderingIntent) -> Result<Option<AnyNode>> {
        self.pcs_to_device_with(&TransformOptions::new().with_intent(intent))
    }

    pub fn device_to_pcs_with(&self, options: &TransformOptions) -> Result<Option<AnyNode>> {
        self.node(Direction::DeviceToPcs, options)
    }

    pub fn pcs_to_device_with(&self, options: &TransformOptions) -> Result<Option<AnyNode>> {
        self.node(Direction::PcsToDevice, options)
    }

    /// Device to PCS adapted to `X -> Y`
    ///
    /// `Ok(None)` also covers endpoints the registry cannot reach.
    pub fn device_to_pcs<X: Space, Y: Space>(&self, intent: RenderingIntent) -> Result<Option<BoxNode<X, Y>>> {
        Ok(self
            .device_to_pcs_any(intent)?
            .and_then(|node| retype::<X, Y>(&Conversions::default(), &node)))
    }

    /// PCS to device adapted to `X -> Y`
    pub fn pcs_to_device<X: Space, Y: Space>(&self, intent: RenderingIntent) -> Result<Option<BoxNode<X, Y>>> {
        Ok(self
            .pcs_to_device_any(intent)?
            .and_then(|node| retype::<X, Y>(&Conversions::default(), &node)))
    }

    fn node(&self, direction: Direction, options: &TransformOptions) -> Result<Option<AnyNode>> {
        let (icc, cache) = match &self.kind {
            ProfileKind::Icc { icc, cache } => (icc, cache),
            ProfileKind::Srgb => return Ok(Some(srgb_node(direction))),
        };

        let source = direction
            .tags(options.intent)
            .into_iter()
            .find(|&sig| icc.has_tag(sig))
            .map(Source::Tag)
            .or_else(|| icc.is_matrix_shaper().then_some(Source::Shaper(direction)));
        let Some(source) = source else {
            return Ok(None);
        };

        let key = (source, options.interpolation);
        {
            let cache = cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(node) = cache.get(&key) {
                tracing::debug!(source = ?source, "tag node served from cache");
                return Ok(Some(node.duplicate()));
            }
        }

        let Some(node) = build(icc, source, options.interpolation)? else {
            return Ok(None);
        };
        tracing::debug!(
            source = ?source,
            domain = node.domain_name(),
            range = node.range_name(),
            "decoded tag into node"
        );
        let out = node.duplicate();
        cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, node);
        Ok(Some(out))
    }
}

fn build(icc: &IccProfile, source: Source, interpolation: Option<Interpolation>) -> Result<Option<AnyNode>> {
    match source {
        Source::Tag(sig) => {
            let Some(tag) = icc.tag(sig)? else {
                return Ok(None);
            };
            let ends = Endpoints {
                device: icc.header.color_space,
                pcs: icc.header.pcs,
                interpolation,
            };
            let node = if sig == TagSignature::A2B0 || sig == TagSignature::A2B1 || sig == TagSignature::A2B2 {
                pipeline::device_to_pcs(&tag, sig, &ends)?
            } else {
                pipeline::pcs_to_device(&tag, sig, &ends)?
            };
            Ok(Some(node))
        }
        Source::Shaper(direction) => {
            let Some(shaper) = MatrixShaper::from_profile(icc)? else {
                return Ok(None);
            };
            Ok(Some(match direction {
                Direction::DeviceToPcs => AnyNode::new(shaper.to_pcs()),
                Direction::PcsToDevice => AnyNode::new(shaper.from_pcs()?),
            }))
        }
    }
}

fn srgb_node(direction: Direction) -> AnyNode {
    match direction {
        Direction::DeviceToPcs => {
            let node: BoxNode<Rgb<f64>, Xyz> = Box::new(RgbToXyz::<f64>::new());
            AnyNode::new(node)
        }
        Direction::PcsToDevice => {
            let node: BoxNode<Xyz, Rgb<f64>> = Box::new(XyzToRgb::<f64>::new());
            AnyNode::new(node)
        }
    }
}

/// Adapt an erased node to `X -> Y`, probing only the ends that differ
fn retype<X: Space, Y: Space>(conv: &Conversions, node: &AnyNode) -> Option<BoxNode<X, Y>> {
    if node.range_is::<Y>() {
        conv.adapt_domain_only::<Y, X>(node)
    } else if node.domain_is::<X>() {
        conv.adapt_range_only::<Y, X>(node)
    } else {
        conv.adapt_range_only::<Y, X>(&conv.adapt_domain::<X>(node)?)
    }
}
