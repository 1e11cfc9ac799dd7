//! # iccflow - composable ICC color transforms
//!
//! Color transforms are trees of typed nodes. Each node maps a coordinate
//! type `X` to a coordinate type `Y` and can be evaluated, composed and
//! deeply duplicated. ICC profiles decode into such trees, and the
//! conversion registry joins the two halves of a transform even when their
//! coordinate types differ.
//!
//! ## Layers
//!
//! - [`node`]: the [`Node`] trait, composition and type-erased [`AnyNode`]
//! - [`convert`]: XYZ, Lab and sRGB conversions and the adapter registry
//! - [`clut`]: N-dimensional lookup tables with tetrahedral and
//!   multilinear interpolation
//! - [`icc`] and [`pipeline`]: ICC parsing and tag to node decoding
//! - [`profile`] and [`transform`]: the user facing API
//!
//! ## Quick Start
//!
//! ```no_run
//! use iccflow_core::{ColorProfile, Rgb, Transform, TransformOptions};
//!
//! let source = ColorProfile::from_file("display.icc").unwrap();
//! let srgb = ColorProfile::srgb();
//!
//! let transform =
//!     Transform::<Rgb<u8>, Rgb<u8>>::between(&source, &srgb, &TransformOptions::default()).unwrap();
//!
//! let src = [255u8, 128, 64];
//! let mut dst = [0u8; 3];
//! transform.transform_bytes(&src, &mut dst).unwrap();
//! ```

pub mod clut;
pub mod color;
pub mod convert;
pub mod error;
pub mod icc;
pub mod math;
pub mod node;
pub mod pipeline;
pub mod profile;
pub mod transform;

pub use clut::{Clut, Interpolation};
pub use color::{Bgr, D50, D65, Lab, Rgb, Scalar, Vector, WhitePoint, Xyz};
pub use convert::{Conversions, adapt_domain, adapt_domain_only, adapt_range, adapt_range_only, join};
pub use error::{Error, Result};
pub use node::{AnyNode, BoxNode, Node, Space, compose};
pub use pipeline::{RenderingIntent, TransformOptions};
pub use profile::ColorProfile;
pub use transform::Transform;

/// Version of iccflow
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
