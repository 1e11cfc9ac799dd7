//! Transform Options
//!
//! Configuration for building transforms out of profiles.

use crate::clut::Interpolation;
use crate::color::{D50, WhitePoint};

/// Rendering intent for color conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingIntent {
    /// Perceptual - best for photos, maintains relative appearance
    #[default]
    Perceptual,
    /// Relative colorimetric - preserves in-gamut colors exactly
    RelativeColorimetric,
    /// Saturation - maintains saturation, good for business graphics
    Saturation,
    /// Absolute colorimetric - preserves white point
    AbsoluteColorimetric,
}

impl RenderingIntent {
    /// Convert from ICC rendering intent value, Perceptual when out of range
    pub fn from_icc(value: u32) -> Self {
        Self::try_from_icc(value).unwrap_or_default()
    }

    /// Convert from ICC rendering intent value, None when out of range
    pub fn try_from_icc(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Perceptual),
            1 => Some(Self::RelativeColorimetric),
            2 => Some(Self::Saturation),
            3 => Some(Self::AbsoluteColorimetric),
            _ => None,
        }
    }

    /// Convert to ICC rendering intent value
    pub fn to_icc(self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }
}

/// Options for [`Transform::between`](crate::Transform::between)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Selects the A2B/B2A tag pair
    pub intent: RenderingIntent,
    /// White point for Lab conversions inserted between stages
    pub white: WhitePoint,
    /// Forces the CLUT interpolation of loaded tables
    pub interpolation: Option<Interpolation>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            intent: RenderingIntent::default(),
            white: D50,
            interpolation: None,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering intent
    pub fn with_intent(mut self, intent: RenderingIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_white_point(mut self, white: WhitePoint) -> Self {
        self.white = white;
        self
    }

    /// Use `interpolation` for every table regardless of the PCS
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }
}
