//! XYZ Tag Type
//!
//! An array of XYZNumbers. Colorant and white point tags hold one entry.
//!
//! See ICC.1:2022 Section 10.31

use crate::color::Xyz;
use crate::icc::error::IccError;
use crate::icc::types::Reader;

/// Read every XYZNumber left in the tag
pub fn read_xyz_array(r: &mut Reader<'_>) -> Result<Vec<Xyz>, IccError> {
    let count = r.remaining() / 12;
    if count == 0 {
        return Err(IccError::CorruptedData("XYZ tag has no values".to_string()));
    }
    (0..count).map(|_| r.xyz()).collect()
}
