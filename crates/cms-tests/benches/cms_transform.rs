//! Performance benchmarks for CMS transform operations
//!
//! Compares iccflow and lcms2 on 8-bit sRGB transforms, on building a
//! transform from profiles, and on the CMYK table path.

use cms_tests::fixtures::{IccBuilder, lut16_tag};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use iccflow_core::{ColorProfile, Lab, Rgb, Transform, TransformOptions, Vector};

const PIXEL_COUNTS: &[usize] = &[1, 16, 256, 4096, 65536, 262144];

fn bench_srgb_identity_8bit(c: &mut Criterion) {
    let mut group = c.benchmark_group("sRGB Identity 8-bit");

    let srgb = ColorProfile::srgb();
    let iccflow_transform =
        Transform::<Rgb<u8>, Rgb<u8>>::between(&srgb, &srgb, &TransformOptions::default()).unwrap();

    let lcms2_srgb = lcms2::Profile::new_srgb();
    let lcms2_transform = lcms2::Transform::<[u8; 3], [u8; 3]>::new(
        &lcms2_srgb,
        lcms2::PixelFormat::RGB_8,
        &lcms2_srgb,
        lcms2::PixelFormat::RGB_8,
        lcms2::Intent::Perceptual,
    )
    .unwrap();

    for &count in PIXEL_COUNTS {
        let size = count * 3;
        group.throughput(Throughput::Bytes(size as u64));

        let input: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        let mut output = vec![0u8; size];

        group.bench_with_input(BenchmarkId::new("iccflow", count), &count, |b, _| {
            b.iter(|| {
                iccflow_transform
                    .transform_bytes(black_box(&input), black_box(&mut output))
                    .unwrap()
            })
        });

        let input_px: Vec<[u8; 3]> = input.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        let mut output_px = vec![[0u8; 3]; count];
        group.bench_with_input(BenchmarkId::new("lcms2", count), &count, |b, _| {
            b.iter(|| lcms2_transform.transform_pixels(black_box(&input_px), black_box(&mut output_px)))
        });
    }

    group.finish();
}

fn bench_srgb_to_lab(c: &mut Criterion) {
    let mut group = c.benchmark_group("sRGB to Lab f64");

    let srgb = ColorProfile::srgb();
    let input = srgb
        .device_to_pcs_any(iccflow_core::RenderingIntent::Perceptual)
        .unwrap()
        .unwrap();
    let lab: iccflow_core::BoxNode<Lab, Lab> = Box::new(iccflow_core::node::Identity::new());
    let iccflow_transform =
        Transform::<Rgb<f64>, Lab>::create(&iccflow_core::AnyNode::new(lab), &input).unwrap();

    let lcms2_srgb = lcms2::Profile::new_srgb();
    let lcms2_lab = lcms2::Profile::new_lab4_context(
        lcms2::GlobalContext::new(),
        &lcms2::CIExyY {
            x: 0.3457,
            y: 0.3585,
            Y: 1.0,
        },
    )
    .unwrap();
    let lcms2_transform = lcms2::Transform::<[f64; 3], [f64; 3]>::new(
        &lcms2_srgb,
        lcms2::PixelFormat::RGB_DBL,
        &lcms2_lab,
        lcms2::PixelFormat::Lab_DBL,
        lcms2::Intent::Perceptual,
    )
    .unwrap();

    for &count in &PIXEL_COUNTS[2..] {
        group.throughput(Throughput::Elements(count as u64));
        let input: Vec<[f64; 3]> = (0..count)
            .map(|i| {
                let t = i as f64 / count as f64;
                [t, (t * 2.0) % 1.0, (t * 3.0) % 1.0]
            })
            .collect();

        let rgb: Vec<Rgb<f64>> = input.iter().map(|p| Rgb::new(p[0], p[1], p[2])).collect();
        let mut labs = vec![Lab::default(); count];
        group.bench_with_input(BenchmarkId::new("iccflow", count), &count, |b, _| {
            b.iter(|| {
                iccflow_transform
                    .transform_slice(black_box(&rgb), black_box(&mut labs))
                    .unwrap()
            })
        });

        let mut output = vec![[0.0f64; 3]; count];
        group.bench_with_input(BenchmarkId::new("lcms2", count), &count, |b, _| {
            b.iter(|| lcms2_transform.transform_pixels(black_box(&input), black_box(&mut output)))
        });
    }

    group.finish();
}

fn cmyk_profile_bytes() -> Vec<u8> {
    IccBuilder::new(b"CMYK", b"Lab ")
        .class(b"prtr")
        .tag(
            b"A2B0",
            lut16_tag(4, 3, 9, |x| {
                let ink = 1.0 - (x[0] + x[1] + x[2]) / 3.0;
                vec![ink * (1.0 - x[3]), 0.5 + (x[2] - x[0]) * 0.2, 0.5 + (x[0] - x[1]) * 0.2]
            }),
        )
        .build()
}

fn bench_cmyk_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("CMYK lut16 to sRGB 8-bit");

    let bytes = cmyk_profile_bytes();
    let iccflow_cmyk = ColorProfile::from_bytes(&bytes).unwrap();
    let iccflow_transform = Transform::<Vector<f64, 4>, Rgb<u8>>::between(
        &iccflow_cmyk,
        &ColorProfile::srgb(),
        &TransformOptions::default(),
    )
    .unwrap();

    let lcms2_cmyk = lcms2::Profile::new_icc(&bytes).unwrap();
    let lcms2_transform = lcms2::Transform::<[f64; 4], [u8; 3]>::new(
        &lcms2_cmyk,
        lcms2::PixelFormat::CMYK_DBL,
        &lcms2::Profile::new_srgb(),
        lcms2::PixelFormat::RGB_8,
        lcms2::Intent::Perceptual,
    )
    .unwrap();

    for &count in &PIXEL_COUNTS[2..] {
        group.throughput(Throughput::Elements(count as u64));
        let ink: Vec<[f64; 4]> = (0..count)
            .map(|i| {
                let t = (i % 101) as f64 / 100.0;
                [t, 1.0 - t, (t * 3.0) % 1.0, (t * 7.0) % 1.0]
            })
            .collect();

        let vectors: Vec<Vector<f64, 4>> = ink.iter().map(|&v| Vector::new(v)).collect();
        let mut out = vec![Rgb::new(0u8, 0, 0); count];
        group.bench_with_input(BenchmarkId::new("iccflow", count), &count, |b, _| {
            b.iter(|| {
                iccflow_transform
                    .transform_slice(black_box(&vectors), black_box(&mut out))
                    .unwrap()
            })
        });

        // lcms2 CMYK_DBL takes ink in percent
        let percent: Vec<[f64; 4]> = ink.iter().map(|v| v.map(|c| c * 100.0)).collect();
        let mut output = vec![[0u8; 3]; count];
        group.bench_with_input(BenchmarkId::new("lcms2", count), &count, |b, _| {
            b.iter(|| lcms2_transform.transform_pixels(black_box(&percent), black_box(&mut output)))
        });
    }

    group.finish();
}

fn bench_profile_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Profile Parsing");
    let bytes = cmyk_profile_bytes();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("iccflow", |b| {
        b.iter(|| {
            let profile = ColorProfile::from_bytes(black_box(&bytes)).unwrap();
            profile
                .device_to_pcs_any(iccflow_core::RenderingIntent::Perceptual)
                .unwrap()
        })
    });

    group.bench_function("lcms2", |b| b.iter(|| lcms2::Profile::new_icc(black_box(&bytes)).unwrap()));

    group.finish();
}

criterion_group!(
    benches,
    bench_srgb_identity_8bit,
    bench_srgb_to_lab,
    bench_cmyk_table,
    bench_profile_parsing,
);

criterion_main!(benches);
