//! Benchmarks for the per-frame tracking path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use head_scroll::{
    face_estimation::FaceEstimator,
    frame::{Frame, FrameQueue},
    scroll_decider::ScrollDecider,
    session::{TrackingConfig, TrackingSession, TrackingStatus},
    settings::Settings,
    smooth_scroll::PageScroll,
};
use rand::Rng;
use std::time::{Duration, Instant};

const SKIN: [u8; 4] = [200, 140, 110, 255];

fn face_frame(width: u32, height: u32, top: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    let mut rng = rand::thread_rng();
    for _ in 0..width * height {
        data.extend_from_slice(&[rng.gen_range(0..=95), rng.gen(), rng.gen(), 255]);
    }
    let mut frame = Frame::new(width, height, data).unwrap();
    frame.fill_rect(width / 3, top, width * 2 / 3, top + height / 2, SKIN);
    frame
}

fn benchmark_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimation");

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let frame = face_frame(width, height, height / 6);
        for stride in [1, 4, 8] {
            let estimator = FaceEstimator::new(stride, 100, 0.35);
            group.bench_with_input(
                BenchmarkId::new(format!("stride_{stride}"), format!("{width}x{height}")),
                &frame,
                |b, frame| b.iter(|| black_box(estimator.estimate(black_box(frame)))),
            );
        }
    }

    group.finish();
}

fn benchmark_decision(c: &mut Criterion) {
    let estimator = FaceEstimator::default();
    let estimate = estimator.estimate(&face_frame(320, 240, 60));
    let decider = ScrollDecider::default();
    let settings = Settings::default();
    let last = Instant::now();

    c.bench_function("decide", |b| {
        b.iter(|| {
            black_box(decider.decide(
                black_box(estimate.as_ref()),
                black_box(0.3),
                &settings,
                last + Duration::from_millis(100),
                Some(last),
            ))
        });
    });
}

fn benchmark_session(c: &mut Criterion) {
    let frames: Vec<Frame> = (0..60u32).map(|i| face_frame(320, 240, 40 + (i % 8) * 4)).collect();

    c.bench_function("session_60_refreshes", |b| {
        b.iter(|| {
            let mut session: TrackingSession<PageScroll, Vec<TrackingStatus>> = TrackingSession::new(
                &TrackingConfig::default(),
                PageScroll::new(0.0),
                Vec::new(),
                Settings::default(),
            );
            session.start(frames.iter().cloned().collect::<FrameQueue>());
            let t0 = Instant::now();
            for i in 0..60u32 {
                black_box(session.on_refresh(t0 + Duration::from_millis(16) * i));
            }
            session.stop();
        });
    });
}

criterion_group!(benches, benchmark_estimation, benchmark_decision, benchmark_session);
criterion_main!(benches);
