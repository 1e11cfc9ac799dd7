//! LUT Tag Types
//!
//! Types:
//! - mft1 (lut8Type) and mft2 (lut16Type): matrix, input curves, CLUT,
//!   output curves
//! - mAB (lutAToBType) and mBA (lutBToAType): optional curve sets, matrix
//!   and CLUT at offsets relative to the tag start
//!
//! Table values are normalized to [0, 1] on load. CLUT samples are kept
//! in file order (last input axis fastest).
//!
//! See ICC.1:2022 Sections 10.10-10.13

use crate::clut::MAX_CHANNELS;
use crate::icc::error::IccError;
use crate::icc::tags::curves::Curve;
use crate::icc::types::Reader;
use crate::math::Matrix3x3;

/// Grid of a lut tag, samples in ICC order
#[derive(Debug, Clone, PartialEq)]
pub struct ClutGrid {
    /// Grid points per input axis
    pub sizes: Vec<usize>,
    /// Values per grid point
    pub outputs: usize,
    /// Normalized samples, `outputs` per grid point
    pub values: Vec<f64>,
}

impl ClutGrid {
    fn read(r: &mut Reader<'_>, sizes: Vec<usize>, outputs: usize, precision: u8) -> Result<Self, IccError> {
        if precision != 1 && precision != 2 {
            return Err(IccError::InvalidClutPrecision(precision));
        }
        let too_large = || IccError::CorruptedData(format!("clut grid {:?} x {} too large", sizes, outputs));
        let count = grid_points(&sizes)?.checked_mul(outputs).ok_or_else(too_large)?;
        let bytes = count.checked_mul(precision as usize).ok_or_else(too_large)?;
        if r.remaining() < bytes {
            return Err(IccError::CorruptedData(format!(
                "clut of {} values truncated",
                count
            )));
        }
        let values = match precision {
            1 => (0..count)
                .map(|_| r.u8().map(|v| v as f64 / 255.0))
                .collect::<Result<Vec<_>, _>>()?,
            _ => (0..count)
                .map(|_| r.u16().map(|v| v as f64 / 65535.0))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(Self { sizes, outputs, values })
    }

    /// Grid point `index` (ICC order) as a fixed-size array
    pub fn point<const O: usize>(&self, index: usize) -> [f64; O] {
        let mut out = [0.0; O];
        out.copy_from_slice(&self.values[index * O..(index + 1) * O]);
        out
    }
}

/// Contents of an mft1 or mft2 tag
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyLut {
    pub inputs: usize,
    pub outputs: usize,
    /// Only applied when the input has three channels
    pub matrix: Matrix3x3,
    pub input_curves: Vec<Curve>,
    pub clut: ClutGrid,
    pub output_curves: Vec<Curve>,
}

impl LegacyLut {
    /// Read the body after the type signature and reserved bytes
    ///
    /// `precision` is 1 for mft1 and 2 for mft2.
    pub fn read_body(r: &mut Reader<'_>, precision: u8) -> Result<Self, IccError> {
        let inputs = r.u8()? as usize;
        let outputs = r.u8()? as usize;
        let grid = r.u8()? as usize;
        r.reserved(1)?;
        check_channels(inputs, outputs)?;

        let mut m = [[0.0; 3]; 3];
        for row in m.iter_mut() {
            for v in row.iter_mut() {
                *v = r.s15f16()?;
            }
        }

        let (input_entries, output_entries) = if precision == 1 {
            (256, 256)
        } else {
            (r.u16()? as usize, r.u16()? as usize)
        };

        let input_curves = (0..inputs)
            .map(|_| read_table(r, input_entries, precision))
            .collect::<Result<Vec<_>, _>>()?;
        let clut = ClutGrid::read(r, vec![grid; inputs], outputs, precision)?;
        let output_curves = (0..outputs)
            .map(|_| read_table(r, output_entries, precision))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            inputs,
            outputs,
            matrix: Matrix3x3::new(m),
            input_curves,
            clut,
            output_curves,
        })
    }
}

/// Direction of a lutAToB / lutBToA tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutDirection {
    /// mAB: A, CLUT, M, Matrix, B
    AToB,
    /// mBA: B, Matrix, M, CLUT, A
    BToA,
}

/// Matrix element of an mAB / mBA tag: 3x3 followed by an offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutMatrix {
    pub matrix: Matrix3x3,
    pub offset: [f64; 3],
}

/// Contents of an mAB or mBA tag
#[derive(Debug, Clone, PartialEq)]
pub struct LutAb {
    pub direction: LutDirection,
    pub inputs: usize,
    pub outputs: usize,
    pub a_curves: Option<Vec<Curve>>,
    pub clut: Option<ClutGrid>,
    pub m_curves: Option<Vec<Curve>>,
    pub matrix: Option<LutMatrix>,
    /// Always present
    pub b_curves: Vec<Curve>,
}

impl LutAb {
    /// Read the body after the type signature and reserved bytes
    ///
    /// The reader must cover the whole tag since element offsets are
    /// relative to its start.
    pub fn read_body(r: &mut Reader<'_>, direction: LutDirection) -> Result<Self, IccError> {
        let inputs = r.u8()? as usize;
        let outputs = r.u8()? as usize;
        r.reserved(2)?;
        check_channels(inputs, outputs)?;

        let b_offset = r.u32()? as usize;
        let matrix_offset = r.u32()? as usize;
        let m_offset = r.u32()? as usize;
        let clut_offset = r.u32()? as usize;
        let a_offset = r.u32()? as usize;

        if b_offset == 0 {
            return Err(IccError::CorruptedData("lut tag without B curves".to_string()));
        }

        // Channel count at each end of the chain
        let (a_count, mid_count, b_count) = match direction {
            LutDirection::AToB => (inputs, outputs, outputs),
            LutDirection::BToA => (outputs, inputs, inputs),
        };
        if (matrix_offset != 0 || m_offset != 0) && mid_count != 3 {
            return Err(IccError::CorruptedData(format!(
                "matrix element needs 3 channels, found {}",
                mid_count
            )));
        }
        if clut_offset == 0 && inputs != outputs {
            return Err(IccError::UnsupportedChannels { inputs, outputs });
        }

        let b_curves = read_curve_set(r, b_offset, b_count)?;
        let matrix = match matrix_offset {
            0 => None,
            offset => Some(read_matrix(r, offset)?),
        };
        let m_curves = match m_offset {
            0 => None,
            offset => Some(read_curve_set(r, offset, mid_count)?),
        };
        let clut = match clut_offset {
            0 => None,
            offset => Some(read_clut(r, offset, inputs, outputs)?),
        };
        let a_curves = match a_offset {
            0 => None,
            offset => Some(read_curve_set(r, offset, a_count)?),
        };

        Ok(Self {
            direction,
            inputs,
            outputs,
            a_curves,
            clut,
            m_curves,
            matrix,
            b_curves,
        })
    }
}

fn check_channels(inputs: usize, outputs: usize) -> Result<(), IccError> {
    let valid = 1..=MAX_CHANNELS;
    if valid.contains(&inputs) && valid.contains(&outputs) {
        Ok(())
    } else {
        Err(IccError::UnsupportedChannels { inputs, outputs })
    }
}

fn grid_points(sizes: &[usize]) -> Result<usize, IccError> {
    sizes
        .iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(s))
        .ok_or_else(|| IccError::CorruptedData(format!("clut grid {:?} too large", sizes)))
}

fn read_table(r: &mut Reader<'_>, entries: usize, precision: u8) -> Result<Curve, IccError> {
    let table: Vec<f64> = if precision == 1 {
        r.bytes(entries)?.iter().map(|&v| v as f64 / 255.0).collect()
    } else {
        (0..entries)
            .map(|_| r.u16().map(|v| v as f64 / 65535.0))
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(Curve::Table(table))
}

fn read_curve_set(r: &mut Reader<'_>, offset: usize, count: usize) -> Result<Vec<Curve>, IccError> {
    r.seek(offset)?;
    let mut curves = Vec::with_capacity(count);
    for _ in 0..count {
        curves.push(Curve::read(r)?);
        r.align4();
    }
    Ok(curves)
}

fn read_matrix(r: &mut Reader<'_>, offset: usize) -> Result<LutMatrix, IccError> {
    r.seek(offset)?;
    let mut m = [[0.0; 3]; 3];
    for row in m.iter_mut() {
        for v in row.iter_mut() {
            *v = r.s15f16()?;
        }
    }
    let offset = [r.s15f16()?, r.s15f16()?, r.s15f16()?];
    Ok(LutMatrix {
        matrix: Matrix3x3::new(m),
        offset,
    })
}

fn read_clut(r: &mut Reader<'_>, offset: usize, inputs: usize, outputs: usize) -> Result<ClutGrid, IccError> {
    r.seek(offset)?;
    let dims = r.bytes(16)?;
    let sizes = dims[..inputs].iter().map(|&d| d as usize).collect();
    let precision = r.u8()?;
    r.reserved(3)?;
    ClutGrid::read(r, sizes, outputs, precision)
}
