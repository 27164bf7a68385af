use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rubberband_ui::{parabola_scroll_easing, OverscrollConfig, ScrollEasing};

const DRAG_FRAMES: usize = 240;
const RESISTANCE_SAMPLES: &[f32] = &[10.0, 50.0, 200.0];

fn pull_sequence(easing: &ScrollEasing) -> f32 {
    let mut offset = 0.0;
    for frame in 0..DRAG_FRAMES {
        let incoming = if frame % 60 < 45 { 6.0 } else { -4.0 };
        offset = easing.ease(offset, incoming);
    }
    offset
}

fn bench_parabola(c: &mut Criterion) {
    let mut group = c.benchmark_group("parabola_scroll_easing");
    for &p in RESISTANCE_SAMPLES {
        group.bench_with_input(BenchmarkId::from_parameter(p), &p, |b, &p| {
            b.iter(|| black_box(parabola_scroll_easing(black_box(120.0), black_box(8.0), p)));
        });
    }
    group.finish();
}

fn bench_drag_sequence(c: &mut Criterion) {
    let parabolic = OverscrollConfig::default().easing;
    c.bench_function("drag_sequence_parabolic", |b| {
        b.iter(|| black_box(pull_sequence(&parabolic)));
    });

    let custom = ScrollEasing::custom(|current, incoming| current + incoming * 0.5);
    c.bench_function("drag_sequence_custom", |b| {
        b.iter(|| black_box(pull_sequence(&custom)));
    });
}

criterion_group!(easing, bench_parabola, bench_drag_sequence);
criterion_main!(easing);
