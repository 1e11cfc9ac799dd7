//! Synthetic ICC profiles
//!
//! [`IccBuilder`] assembles a profile from a header and raw tag bodies.
//! The tag helpers encode the tag types the loader understands, so tests
//! can build exactly the malformed or minimal profile they need.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG` driven subscriber once per test binary
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds an ICC profile byte by byte
#[derive(Debug, Clone)]
pub struct IccBuilder {
    class: [u8; 4],
    color_space: [u8; 4],
    pcs: [u8; 4],
    intent: u32,
    version: (u8, u8),
    tags: Vec<([u8; 4], Vec<u8>)>,
}

impl IccBuilder {
    /// Display class profile with the given data color space and PCS signatures
    pub fn new(color_space: &[u8; 4], pcs: &[u8; 4]) -> Self {
        Self {
            class: *b"mntr",
            color_space: *color_space,
            pcs: *pcs,
            intent: 0,
            version: (4, 0x30),
            tags: Vec::new(),
        }
    }

    pub fn class(mut self, class: &[u8; 4]) -> Self {
        self.class = *class;
        self
    }

    /// Raw rendering intent field, not validated
    pub fn intent(mut self, intent: u32) -> Self {
        self.intent = intent;
        self
    }

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.version = (major, minor);
        self
    }

    /// Add a tag; bodies are padded to 4 bytes when laid out
    pub fn tag(mut self, sig: &[u8; 4], body: Vec<u8>) -> Self {
        self.tags.push((*sig, body));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; 128];
        data[8] = self.version.0;
        data[9] = self.version.1;
        data[12..16].copy_from_slice(&self.class);
        data[16..20].copy_from_slice(&self.color_space);
        data[20..24].copy_from_slice(&self.pcs);
        data[36..40].copy_from_slice(b"acsp");
        data[64..68].copy_from_slice(&self.intent.to_be_bytes());
        // D50 illuminant
        for (i, v) in [0.9642, 1.0, 0.8249].into_iter().enumerate() {
            data[68 + i * 4..72 + i * 4].copy_from_slice(&s15f16(v));
        }

        data.extend_from_slice(&(self.tags.len() as u32).to_be_bytes());
        let mut offset = 128 + 4 + self.tags.len() * 12;
        let mut body = Vec::new();
        for (sig, bytes) in &self.tags {
            data.extend_from_slice(sig);
            data.extend_from_slice(&(offset as u32).to_be_bytes());
            data.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            body.extend_from_slice(bytes);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 128 + 4 + self.tags.len() * 12 + body.len();
        }
        data.extend(body);
        let size = data.len() as u32;
        data[0..4].copy_from_slice(&size.to_be_bytes());
        data
    }
}

/// s15Fixed16Number
pub fn s15f16(v: f64) -> [u8; 4] {
    ((v * 65536.0).round() as i32).to_be_bytes()
}

fn u16_norm(v: f64) -> [u8; 2] {
    ((v.clamp(0.0, 1.0) * 65535.0).round() as u16).to_be_bytes()
}

/// `XYZ ` tag with one value
pub fn xyz_tag(v: [f64; 3]) -> Vec<u8> {
    let mut out = b"XYZ ".to_vec();
    out.extend([0; 4]);
    for c in v {
        out.extend(s15f16(c));
    }
    out
}

/// `curv` tag with a single gamma exponent (u8Fixed8)
pub fn gamma_tag(gamma: f64) -> Vec<u8> {
    let mut out = b"curv".to_vec();
    out.extend([0; 4]);
    out.extend(1u32.to_be_bytes());
    out.extend(((gamma * 256.0).round() as u16).to_be_bytes());
    out
}

/// `para` tag with an ICC function type and its parameters
pub fn para_tag(function_type: u16, params: &[f64]) -> Vec<u8> {
    let mut out = b"para".to_vec();
    out.extend([0; 4]);
    out.extend(function_type.to_be_bytes());
    out.extend([0; 2]);
    for &p in params {
        out.extend(s15f16(p));
    }
    out
}

/// The 9 s15Fixed16 values of a 3x3 identity matrix
fn identity_matrix() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..9 {
        out.extend(s15f16(if i % 4 == 0 { 1.0 } else { 0.0 }));
    }
    out
}

/// Grid values for `f` with the last axis fastest, as stored in ICC files
pub fn icc_grid(inputs: usize, grid: usize, outputs: usize, f: impl Fn(&[f64]) -> Vec<f64>) -> Vec<f64> {
    let total = grid.pow(inputs as u32);
    let mut values = Vec::with_capacity(total * outputs);
    let mut x = vec![0.0; inputs];
    for t in 0..total {
        let mut rest = t;
        for axis in (0..inputs).rev() {
            x[axis] = (rest % grid) as f64 / (grid - 1) as f64;
            rest /= grid;
        }
        let y = f(&x);
        assert_eq!(y.len(), outputs, "seed returned the wrong channel count");
        values.extend(y);
    }
    values
}

/// `mft2` tag with linear curves, an identity matrix and a CLUT sampled from `f`
pub fn lut16_tag(inputs: u8, outputs: u8, grid: u8, f: impl Fn(&[f64]) -> Vec<f64>) -> Vec<u8> {
    let mut out = b"mft2".to_vec();
    out.extend([0; 4]);
    out.extend([inputs, outputs, grid, 0]);
    out.extend(identity_matrix());
    out.extend(2u16.to_be_bytes());
    out.extend(2u16.to_be_bytes());
    let linear = [0u8, 0, 0xFF, 0xFF];
    for _ in 0..inputs {
        out.extend(linear);
    }
    for v in icc_grid(inputs as usize, grid as usize, outputs as usize, f) {
        out.extend(u16_norm(v));
    }
    for _ in 0..outputs {
        out.extend(linear);
    }
    out
}

/// `mft2` tag whose output equals its input
pub fn identity_lut16(channels: u8) -> Vec<u8> {
    lut16_tag(channels, channels, 2, |x| x.to_vec())
}

/// `mft1` tag with linear 256-entry curves and a CLUT sampled from `f`
pub fn lut8_tag(inputs: u8, outputs: u8, grid: u8, f: impl Fn(&[f64]) -> Vec<f64>) -> Vec<u8> {
    let mut out = b"mft1".to_vec();
    out.extend([0; 4]);
    out.extend([inputs, outputs, grid, 0]);
    out.extend(identity_matrix());
    for _ in 0..inputs {
        out.extend(0..=255u8);
    }
    for v in icc_grid(inputs as usize, grid as usize, outputs as usize, f) {
        out.push((v.clamp(0.0, 1.0) * 255.0).round() as u8);
    }
    for _ in 0..outputs {
        out.extend(0..=255u8);
    }
    out
}

/// Matrix/TRC RGB profile with one gamma for all channels
pub fn matrix_shaper_profile(colorants: [[f64; 3]; 3], gamma: f64) -> Vec<u8> {
    IccBuilder::new(b"RGB ", b"XYZ ")
        .tag(b"rXYZ", xyz_tag(colorants[0]))
        .tag(b"gXYZ", xyz_tag(colorants[1]))
        .tag(b"bXYZ", xyz_tag(colorants[2]))
        .tag(b"rTRC", gamma_tag(gamma))
        .tag(b"gTRC", gamma_tag(gamma))
        .tag(b"bTRC", gamma_tag(gamma))
        .build()
}

/// D50-adapted sRGB colorants, as found in most sRGB profiles
pub const SRGB_D50_COLORANTS: [[f64; 3]; 3] = [
    [0.4361, 0.2225, 0.0139],
    [0.3851, 0.7169, 0.0971],
    [0.1431, 0.0606, 0.7141],
];
