//! ICC Profile Basic Types
//!
//! Signatures and a big-endian reader over profile bytes. Numbers follow
//! ICC.1:2022 section 4: s15Fixed16 is 16.16 signed fixed point, u8Fixed8
//! is 8.8 unsigned.

use std::fmt;

use super::error::IccError;
use crate::color::Xyz;

/// ICC Tag Signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const A2B1: Self = Self::from_bytes(*b"A2B1");
    pub const A2B2: Self = Self::from_bytes(*b"A2B2");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const B2A1: Self = Self::from_bytes(*b"B2A1");
    pub const B2A2: Self = Self::from_bytes(*b"B2A2");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0.to_be_bytes()))
    }
}

/// Type signatures for ICC tag data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const LUT8: Self = Self::from_bytes(*b"mft1");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const LUT_A_TO_B: Self = Self::from_bytes(*b"mAB ");
    pub const LUT_B_TO_A: Self = Self::from_bytes(*b"mBA ");
}

/// Bounds-checked big-endian cursor over a tag
///
/// Positions are relative to the start of the slice; `origin` is where the
/// slice begins inside the profile and only feeds error offsets.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    origin: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], origin: usize) -> Self {
        Self { data, pos: 0, origin }
    }

    /// Current position relative to the slice start
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position inside the slice
    pub fn seek(&mut self, pos: usize) -> Result<(), IccError> {
        if pos > self.data.len() {
            return Err(self.truncated(pos - self.data.len()));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance to the next multiple of four
    pub fn align4(&mut self) {
        self.pos = ((self.pos + 3) & !3).min(self.data.len());
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], IccError> {
        if self.remaining() < n {
            return Err(self.truncated(n));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, IccError> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, IccError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32, IccError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// s15Fixed16Number
    pub fn s15f16(&mut self) -> Result<f64, IccError> {
        Ok(self.u32()? as i32 as f64 / 65536.0)
    }

    /// u8Fixed8Number
    pub fn u8f8(&mut self) -> Result<f64, IccError> {
        Ok(self.u16()? as f64 / 256.0)
    }

    /// XYZNumber
    pub fn xyz(&mut self) -> Result<Xyz, IccError> {
        Ok(Xyz::new(self.s15f16()?, self.s15f16()?, self.s15f16()?))
    }

    /// Reserved bytes that must be zero
    pub fn reserved(&mut self, n: usize) -> Result<(), IccError> {
        let start = self.pos;
        let bytes = self.bytes(n)?;
        match bytes.iter().position(|&b| b != 0) {
            Some(i) => Err(IccError::NonZeroPadding {
                offset: self.origin + start + i,
            }),
            None => Ok(()),
        }
    }

    fn truncated(&self, wanted: usize) -> IccError {
        IccError::CorruptedData(format!(
            "need {} bytes at offset {}, tag has {}",
            wanted,
            self.origin + self.pos,
            self.data.len()
        ))
    }
}
