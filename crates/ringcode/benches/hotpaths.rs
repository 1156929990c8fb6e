use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ringcode::preprocess;
use ringcode::render::render_raster;
use ringcode::sampler;
use ringcode::search::{self, DecodeConfig};
use ringcode::style::Style;
use ringcode::{encode, EccLevel};

fn make_capture_fixture(size: u32, seed: u64) -> GrayImage {
    // Full-capacity payload: every ring carries mixed bits, so the search
    // bench measures the fast accept path rather than a degenerate sweep.
    let payload = "hotpath fixture payload ".repeat(6);
    let bits = encode(&payload.as_bytes()[..141], EccLevel::Medium)
        .expect("fixture payload fits");
    let img = render_raster(&bits, size, Style::default_style());
    let mut gray = preprocess::luminance(img.as_raw(), size, size);

    // Mild deterministic sensor noise so thresholds do real work.
    let mut rng = StdRng::seed_from_u64(seed);
    for px in gray.pixels_mut() {
        let jitter: i16 = rng.gen_range(-6..=6);
        px.0 = [(px.0[0] as i16 + jitter).clamp(0, 255) as u8];
    }
    gray
}

fn bench_render(c: &mut Criterion) {
    let bits = encode(b"render bench payload", EccLevel::Low).expect("payload fits");
    let style = Style::default_style();

    c.bench_function("render_raster_512", |b| {
        b.iter(|| black_box(render_raster(black_box(&bits), 512, style)))
    });

    c.bench_function("render_raster_1024", |b| {
        b.iter(|| black_box(render_raster(black_box(&bits), 1024, style)))
    });
}

fn bench_preprocess(c: &mut Criterion) {
    let gray = make_capture_fixture(512, 7);

    c.bench_function("preprocess_variants_512", |b| {
        b.iter(|| black_box(preprocess::variants(black_box(&gray)).len()))
    });
}

fn bench_sampling(c: &mut Criterion) {
    let gray = make_capture_fixture(512, 11);

    c.bench_function("sample_all_rings_512", |b| {
        b.iter(|| {
            let rings =
                sampler::sample_all_rings(black_box(&gray), (256.0, 256.0), 512, 0.0);
            black_box(rings.len())
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let gray = make_capture_fixture(400, 13);
    let surfaces = preprocess::variants(&gray);
    let config = DecodeConfig::default();

    c.bench_function("search_clean_capture_400", |b| {
        b.iter(|| {
            let outcome = search::run(
                black_box(&surfaces),
                (200.0, 200.0),
                400,
                &config,
                None,
            );
            black_box(outcome.text().is_some())
        })
    });
}

criterion_group!(
    hotpaths,
    bench_render,
    bench_preprocess,
    bench_sampling,
    bench_search
);
criterion_main!(hotpaths);
