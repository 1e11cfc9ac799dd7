//! ICC Profile Header
//!
//! The header is exactly 128 bytes. Only the fields a transform needs are
//! kept. See ICC.1:2022 Section 7.2.

use super::error::IccError;
use super::types::Reader;
use crate::color::Xyz;
use crate::pipeline::RenderingIntent;

/// Profile file signature - must be 'acsp'
pub const PROFILE_SIGNATURE: u32 = u32::from_be_bytes(*b"acsp");

/// Header size, also the smallest possible profile
pub const HEADER_SIZE: usize = 128;

/// ICC Profile Header
#[derive(Debug, Clone, PartialEq)]
pub struct IccHeader {
    /// Profile size in bytes
    pub size: u32,
    /// Major and minor version
    pub version: (u8, u8),
    pub device_class: ProfileClass,
    /// Color space of device data
    pub color_space: ColorSpace,
    /// Profile connection space, XYZ or Lab (device links use the output space)
    pub pcs: ColorSpace,
    /// Default rendering intent
    pub rendering_intent: RenderingIntent,
    /// PCS illuminant, normally D50
    pub illuminant: Xyz,
}

impl IccHeader {
    /// Parse and validate the header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < HEADER_SIZE {
            return Err(IccError::TooSmall {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut r = Reader::new(&data[..HEADER_SIZE], 0);
        let size = r.u32()?;
        r.seek(8)?;
        let version = (r.u8()?, r.u8()? >> 4);
        r.seek(12)?;
        let device_class = ProfileClass::from_u32(r.u32()?)?;
        let color_space = ColorSpace::from_u32(r.u32()?)?;
        let pcs = ColorSpace::from_u32(r.u32()?)?;
        r.seek(36)?;
        let signature = r.u32()?;
        if signature != PROFILE_SIGNATURE {
            return Err(IccError::InvalidSignature(signature));
        }
        r.seek(64)?;
        let intent = r.u32()?;
        let rendering_intent =
            RenderingIntent::try_from_icc(intent).ok_or(IccError::InvalidRenderingIntent(intent))?;
        let illuminant = r.xyz()?;

        if size as usize > data.len() || (size as usize) < HEADER_SIZE {
            return Err(IccError::SizeMismatch {
                header_size: size,
                actual_size: data.len(),
            });
        }

        Ok(Self {
            size,
            version,
            device_class,
            color_space,
            pcs,
            rendering_intent,
            illuminant,
        })
    }
}

macro_rules! signature_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident {
            $($variant:ident = $sig:literal;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            /// Decode a header signature
            pub fn from_u32(value: u32) -> Result<Self, IccError> {
                match &value.to_be_bytes() {
                    $($sig => Ok(Self::$variant),)*
                    _ => Err(IccError::$err(value)),
                }
            }

            /// Header signature
            pub fn to_u32(self) -> u32 {
                match self {
                    $(Self::$variant => u32::from_be_bytes(*$sig),)*
                }
            }
        }
    };
}

signature_enum! {
    /// ICC Profile Class (Device Class)
    ProfileClass, InvalidProfileClass {
        Input = b"scnr";
        Display = b"mntr";
        Output = b"prtr";
        DeviceLink = b"link";
        ColorSpace = b"spac";
        Abstract = b"abst";
        NamedColor = b"nmcl";
    }
}

signature_enum! {
    /// Data and connection color spaces
    ColorSpace, InvalidColorSpace {
        Xyz = b"XYZ ";
        Lab = b"Lab ";
        Luv = b"Luv ";
        YCbCr = b"YCbr";
        Yxy = b"Yxy ";
        Rgb = b"RGB ";
        Gray = b"GRAY";
        Hsv = b"HSV ";
        Hls = b"HLS ";
        Cmyk = b"CMYK";
        Cmy = b"CMY ";
        Color2 = b"2CLR";
        Color3 = b"3CLR";
        Color4 = b"4CLR";
        Color5 = b"5CLR";
        Color6 = b"6CLR";
        Color7 = b"7CLR";
        Color8 = b"8CLR";
        Color9 = b"9CLR";
        Color10 = b"ACLR";
        Color11 = b"BCLR";
        Color12 = b"CCLR";
        Color13 = b"DCLR";
        Color14 = b"ECLR";
        Color15 = b"FCLR";
    }
}

impl ColorSpace {
    /// Channel count of the space
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Color2 => 2,
            Self::Cmyk | Self::Color4 => 4,
            Self::Color5 => 5,
            Self::Color6 => 6,
            Self::Color7 => 7,
            Self::Color8 => 8,
            Self::Color9 => 9,
            Self::Color10 => 10,
            Self::Color11 => 11,
            Self::Color12 => 12,
            Self::Color13 => 13,
            Self::Color14 => 14,
            Self::Color15 => 15,
            _ => 3,
        }
    }

    pub fn is_pcs(self) -> bool {
        matches!(self, Self::Xyz | Self::Lab)
    }
}
