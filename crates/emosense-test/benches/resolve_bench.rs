//! Benchmarks for label resolution and overlay rendering

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use emosense_core::{dominant, resolve, DisplaySize, Emotion, Point, Rect};
use emosense_test::{dominant_scores, face_showing, landmarks_68};
use emosense_visual::{render, Color, OverlayStyle, OverlaySurface};

/// Counts calls without keeping them around
#[derive(Default)]
struct CountingSurface {
    size: Option<DisplaySize>,
    calls: u64,
}

impl OverlaySurface for CountingSurface {
    fn resize(&mut self, size: DisplaySize) {
        self.size = Some(size);
    }

    fn size(&self) -> Option<DisplaySize> {
        self.size
    }

    fn clear(&mut self) {
        self.calls += 1;
    }

    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f32) {
        self.calls += 1;
    }

    fn fill_text(&mut self, _text: &str, _at: Point, _color: Color) {
        self.calls += 1;
    }

    fn fill_point(&mut self, _at: Point, _radius: f32, _color: Color) {
        self.calls += 1;
    }
}

fn bench_dominant(c: &mut Criterion) {
    let scores = dominant_scores(Emotion::Surprised, 0.7);

    c.bench_function("dominant_emotion", |b| {
        b.iter(|| black_box(dominant(black_box(&scores))))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let plain = dominant_scores(Emotion::Sad, 0.6);
    let laughing = dominant_scores(Emotion::Happy, 0.97);

    c.bench_function("resolve_plain", |b| {
        b.iter(|| black_box(resolve(black_box(&plain))))
    });

    c.bench_function("resolve_override", |b| {
        b.iter(|| black_box(resolve(black_box(&laughing))))
    });
}

fn bench_render(c: &mut Criterion) {
    let source = DisplaySize::new(320, 240).unwrap();
    let display = DisplaySize::new(960, 720).unwrap();
    let faces: Vec<_> = Emotion::ALL
        .iter()
        .map(|emotion| face_showing(*emotion, 0.6))
        .collect();
    let style = OverlayStyle::default();
    let mut surface = CountingSurface::default();

    c.bench_function("render_seven_faces", |b| {
        b.iter(|| render(&mut surface, black_box(&faces), source, display, &style))
    });

    let with_landmarks: Vec<_> = faces
        .iter()
        .cloned()
        .map(|face| {
            let region = face.region;
            face.with_landmarks(landmarks_68(region))
        })
        .collect();
    let style = OverlayStyle {
        draw_landmarks: true,
        ..OverlayStyle::default()
    };

    c.bench_function("render_seven_faces_landmarks", |b| {
        b.iter(|| render(&mut surface, black_box(&with_landmarks), source, display, &style))
    });

    black_box(surface.calls);
}

criterion_group!(benches, bench_dominant, bench_resolve, bench_render);
criterion_main!(benches);
