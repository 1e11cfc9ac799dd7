//! Parity with lcms2
//!
//! lcms2 is the reference for the Lab math, for matrix-shaper profiles and
//! for the Lab v4 encoding. Profiles are generated by lcms2 and loaded
//! through `ColorProfile::from_bytes`.

use anyhow::{Context, Result};
use cms_tests::accuracy::{compare_lab, max_abs_diff};
use cms_tests::init_tracing;
use cms_tests::patterns::{gray_ramp, lab, rgb8, rgb8_corners, unit_vectors, xyz};
use iccflow_core::convert::{LabEncode, XyzToLab};
use iccflow_core::node::Identity;
use iccflow_core::{
    AnyNode, BoxNode, ColorProfile, D50, Lab, Node, RenderingIntent, Rgb, Transform, TransformOptions, Vector, Xyz,
};
use lcms2::{CIExyY, GlobalContext, Intent, PixelFormat, Profile};

const D50_XYY: CIExyY = CIExyY {
    x: 0.3457,
    y: 0.3585,
    Y: 1.0,
};

fn lcms2_lab_profile() -> Result<Profile> {
    Profile::new_lab4_context(GlobalContext::new(), &D50_XYY).context("lcms2 Lab profile")
}

fn lcms2_srgb_bytes() -> Result<Vec<u8>> {
    Profile::new_srgb().icc().context("serializing lcms2 sRGB")
}

fn to_lab(v: &[f64; 3]) -> Lab {
    Lab::new(v[0], v[1], v[2])
}

#[test]
fn test_xyz_to_lab_matches_lcms2() -> Result<()> {
    init_tracing();
    let t = lcms2::Transform::<[f64; 3], [f64; 3]>::new(
        &Profile::new_xyz(),
        PixelFormat::XYZ_DBL,
        &lcms2_lab_profile()?,
        PixelFormat::Lab_DBL,
        Intent::Perceptual,
    )?;

    let samples = xyz(30, 2000);
    let input: Vec<[f64; 3]> = samples.iter().map(Xyz::to_array).collect();
    let mut output = vec![[0.0; 3]; input.len()];
    t.transform_pixels(&input, &mut output);

    let reference: Vec<Lab> = output.iter().map(to_lab).collect();
    let ours = XyzToLab { white: D50 };
    let result: Vec<Lab> = samples.iter().map(|x| ours.eval(x)).collect();

    let stats = compare_lab(&reference, &result);
    assert!(stats.max < 0.01, "XYZ -> Lab vs lcms2: {:?}", stats);
    Ok(())
}

#[test]
fn test_srgb_profile_to_xyz_matches_lcms2() -> Result<()> {
    let profile = ColorProfile::from_bytes(&lcms2_srgb_bytes()?)?;
    let to_xyz = profile
        .device_to_pcs::<Rgb<f64>, Xyz>(RenderingIntent::Perceptual)?
        .context("lcms2 sRGB is a matrix-shaper profile")?;

    let t = lcms2::Transform::<[f64; 3], [f64; 3]>::new(
        &Profile::new_srgb(),
        PixelFormat::RGB_DBL,
        &Profile::new_xyz(),
        PixelFormat::XYZ_DBL,
        Intent::Perceptual,
    )?;

    let samples = unit_vectors::<3>(31, 2000);
    let input: Vec<[f64; 3]> = samples.iter().map(|v| v.0).collect();
    let mut output = vec![[0.0; 3]; input.len()];
    t.transform_pixels(&input, &mut output);

    for (v, expected) in samples.iter().zip(&output) {
        let got = to_xyz.eval(&Rgb::new(v[0], v[1], v[2]));
        let diff = max_abs_diff(&got.to_array(), expected);
        assert!(diff < 1e-3, "{:?}: {:?} vs {:?}", v, got, expected);
    }
    Ok(())
}

#[test]
fn test_srgb_to_lab_matches_lcms2() -> Result<()> {
    let profile = ColorProfile::from_bytes(&lcms2_srgb_bytes()?)?;
    let input = profile
        .device_to_pcs_any(RenderingIntent::Perceptual)?
        .context("device to PCS")?;
    let output: BoxNode<Lab, Lab> = Box::new(Identity::new());
    let ours = Transform::<Rgb<u8>, Lab>::create(&AnyNode::new(output), &input).context("join to Lab")?;

    let t = lcms2::Transform::<[f64; 3], [f64; 3]>::new(
        &Profile::new_srgb(),
        PixelFormat::RGB_DBL,
        &lcms2_lab_profile()?,
        PixelFormat::Lab_DBL,
        Intent::Perceptual,
    )?;

    let mut pixels = rgb8(32, 3000);
    pixels.extend(rgb8_corners());
    pixels.extend(gray_ramp(64));
    let input: Vec<[f64; 3]> = pixels
        .iter()
        .map(|p| [p.r as f64 / 255.0, p.g as f64 / 255.0, p.b as f64 / 255.0])
        .collect();
    let mut output = vec![[0.0; 3]; input.len()];
    t.transform_pixels(&input, &mut output);

    let reference: Vec<Lab> = output.iter().map(to_lab).collect();
    let mut result = vec![Lab::default(); pixels.len()];
    ours.transform_slice(&pixels, &mut result)?;

    let stats = compare_lab(&reference, &result);
    assert!(stats.mean < 0.05, "sRGB -> Lab mean vs lcms2: {:?}", stats);
    assert!(stats.max < 0.5, "sRGB -> Lab max vs lcms2: {:?}", stats);
    Ok(())
}

#[test]
fn test_srgb_round_trip_8bit_matches_lcms2() -> Result<()> {
    let profile = ColorProfile::from_bytes(&lcms2_srgb_bytes()?)?;
    let ours = Transform::<Rgb<u8>, Rgb<u8>>::between(&profile, &profile, &TransformOptions::default())?;

    let srgb = Profile::new_srgb();
    let t = lcms2::Transform::<[u8; 3], [u8; 3]>::new(
        &srgb,
        PixelFormat::RGB_8,
        &srgb,
        PixelFormat::RGB_8,
        Intent::Perceptual,
    )?;

    let mut pixels = rgb8(33, 5000);
    pixels.extend(rgb8_corners());
    let input: Vec<[u8; 3]> = pixels.iter().map(|p| [p.r, p.g, p.b]).collect();
    let mut reference = vec![[0u8; 3]; input.len()];
    t.transform_pixels(&input, &mut reference);

    let src: &[u8] = input.as_flattened();
    let mut dst = vec![0u8; src.len()];
    ours.transform_bytes(src, &mut dst)?;

    for ((px, expected), got) in input.iter().zip(&reference).zip(dst.chunks_exact(3)) {
        for c in 0..3 {
            assert!(
                expected[c].abs_diff(got[c]) <= 1,
                "{:?}: lcms2 {:?} vs ours {:?}",
                px,
                expected,
                got
            );
        }
    }
    Ok(())
}

#[test]
fn test_lab_v4_profile_encoding() -> Result<()> {
    let bytes = lcms2_lab_profile()?.icc().context("serializing lcms2 Lab")?;
    let profile = ColorProfile::from_bytes(&bytes)?;
    let node = profile
        .device_to_pcs_any(RenderingIntent::Perceptual)?
        .context("Lab profile has an A2B0 table")?;
    assert!(node.domain_is::<Vector<f64, 3>>(), "{:?}", node);
    assert!(node.range_is::<Lab>(), "{:?}", node);

    let decode = node
        .downcast_ref::<Vector<f64, 3>, Lab>()
        .context("typed Lab decode")?;
    for x in lab(34, 500) {
        let back = decode.eval(&LabEncode.eval(&x));
        assert!(back.approx_eq(&x, 1e-4), "{:?} -> {:?}", x, back);
    }
    Ok(())
}
