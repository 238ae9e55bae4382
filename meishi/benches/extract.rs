use criterion::{criterion_group, criterion_main, Criterion};

use meishi::frame::FrameSize;
use meishi::geometry::{extraction_region, Viewport};
use meishi::guide::AlignmentGuide;
use meishi::pattern;

fn geometry(c: &mut Criterion) {
    let frame = FrameSize::new(4096, 3072);
    let viewport = Viewport::new(375.0, 812.0);
    let guide = AlignmentGuide::default();

    c.bench_function("extraction_region", |b| {
        b.iter(|| extraction_region(frame, viewport, guide))
    });
}

fn blit(c: &mut Criterion) {
    let fb = pattern::render(1920, 1080, 0);
    let region = extraction_region(
        FrameSize::new(1920, 1080),
        Viewport::new(390.0, 844.0),
        AlignmentGuide::default(),
    )
    .unwrap();

    c.bench_function("extract_1080p", |b| b.iter(|| fb.extract(&region)));
}

fn pattern_render(c: &mut Criterion) {
    c.bench_function("pattern_720p", |b| b.iter(|| pattern::render(1280, 720, 0)));
}

criterion_group!(benches, geometry, blit, pattern_render);
criterion_main!(benches);
