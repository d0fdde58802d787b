//! End-to-end tests of the tracking session lifecycle


use head_scroll::{
    scroll_decider::{Direction, ScrollIntent},
    session::{SessionState, TickOutcome, TrackingConfig, TrackingSession, TrackingStatus},
    settings::{Settings, SettingsUpdate, SharedSettings},
    smooth_scroll::{PageScroll, ScrollSink},
};
use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};
use test_helpers::{expected_eye_line, scripted, HandleSlot, StoppingSource};

type Session = TrackingSession<PageScroll, Vec<TrackingStatus>>;

fn session() -> Session {
    TrackingSession::new(&TrackingConfig::default(), PageScroll::new(0.0), Vec::new(), Settings::default())
}

fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

#[test]
fn test_full_lifecycle() {
    let mut session = session();
    let t0 = Instant::now();
    session.start(scripted(&[Some(40), Some(40), Some(52), Some(52), Some(52), None]).unwrap());
    assert_eq!(session.state(), SessionState::Calibrating);
    assert_eq!(session.baseline(), None);

    let outcome = session.on_refresh(at(t0, 0));
    assert!(matches!(outcome, TickOutcome::BaselineSet(b) if (b - expected_eye_line(40)).abs() < 1e-12));
    assert_eq!(session.state(), SessionState::Active);

    assert_eq!(session.on_refresh(at(t0, 16)), TickOutcome::Hold);

    // 12 rows of 240 is 0.05; 0.05 * 3 * 40 = 6
    let down = ScrollIntent { direction: Direction::Down, magnitude: 6 };
    assert_eq!(session.on_refresh(at(t0, 32)), TickOutcome::Scrolled(down));
    assert_eq!(session.on_refresh(at(t0, 48)), TickOutcome::Throttled);
    assert_eq!(session.on_refresh(at(t0, 120)), TickOutcome::Scrolled(down));
    assert_eq!(session.on_refresh(at(t0, 300)), TickOutcome::FaceLost);

    // Baseline survives face loss
    assert!(session.baseline().is_some());
    assert_eq!(session.on_refresh(at(t0, 316)), TickOutcome::SourceClosed);

    // Second request restarted from wherever the first one had got to
    let offset = session.scroller().sink().scroll_offset();
    assert!(offset > 6.0 && offset < 12.0, "offset {offset}");
    assert!(session.scroller().sink().history().windows(2).all(|p| p[0] <= p[1]));

    let stats = session.stats();
    assert_eq!(stats.ticks, 7);
    assert_eq!(stats.detections, 5);
    assert_eq!(stats.intents, 2);

    session.stop();
    assert_eq!(
        session.feedback(),
        &vec![
            TrackingStatus::Calibrating,
            TrackingStatus::BaselineSet,
            TrackingStatus::Tracking,
            TrackingStatus::ScrollingDown,
            TrackingStatus::Tracking,
            TrackingStatus::ScrollingDown,
            TrackingStatus::FaceLost,
            TrackingStatus::Idle,
        ]
    );
}

#[test]
fn test_baseline_is_set_exactly_once() {
    let mut session = session();
    let t0 = Instant::now();
    session.start(scripted(&[Some(40), Some(80), Some(80)]).unwrap());

    session.on_refresh(at(t0, 0));
    let baseline = session.baseline();
    session.on_refresh(at(t0, 16));
    session.on_refresh(at(t0, 200));

    assert_eq!(session.baseline(), baseline);
    let sets = session
        .feedback()
        .iter()
        .filter(|s| **s == TrackingStatus::BaselineSet)
        .count();
    assert_eq!(sets, 1);
}

#[test]
fn test_face_lost_while_calibrating() {
    let mut session = session();
    let t0 = Instant::now();
    session.start(scripted(&[None, None, Some(40)]).unwrap());

    assert_eq!(session.tick(at(t0, 0)), TickOutcome::FaceLost);
    assert_eq!(session.tick(at(t0, 16)), TickOutcome::FaceLost);
    assert_eq!(session.state(), SessionState::Calibrating);
    assert!(matches!(session.tick(at(t0, 32)), TickOutcome::BaselineSet(_)));
    assert_eq!(
        session.feedback(),
        &vec![TrackingStatus::Calibrating, TrackingStatus::FaceLost, TrackingStatus::BaselineSet]
    );
}

#[test]
fn test_stop_silences_everything() {
    let mut session = session();
    let t0 = Instant::now();
    session.start(scripted(&[Some(40), Some(80), Some(80)]).unwrap());
    session.on_refresh(at(t0, 0));
    session.on_refresh(at(t0, 16));
    assert!(session.scroller().is_animating());

    session.stop();
    let reported = session.feedback().len();
    let offset = session.scroller().sink().scroll_offset();

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.baseline(), None);
    assert_eq!(session.on_refresh(at(t0, 32)), TickOutcome::Stopped);
    assert!(!session.animate(at(t0, 500)));
    assert_eq!(session.scroller().sink().scroll_offset(), offset);
    assert_eq!(session.feedback().len(), reported);
    assert_eq!(session.feedback().last(), Some(&TrackingStatus::Idle));

    // A second stop is a no-op
    session.stop();
    assert_eq!(session.feedback().len(), reported);
}

#[test]
fn test_stop_during_frame_delivery() {
    let mut session = session();
    let t0 = Instant::now();
    let slot: HandleSlot = Rc::new(RefCell::new(None));
    session.start(StoppingSource {
        inner: scripted(&[Some(40), Some(80), Some(80)]).unwrap(),
        handle: Rc::clone(&slot),
        stop_at: 2,
        delivered: 0,
    });
    *slot.borrow_mut() = Some(session.stop_handle());

    assert!(matches!(session.on_refresh(at(t0, 0)), TickOutcome::BaselineSet(_)));
    // The frame that would have scrolled arrives after the stop
    assert_eq!(session.on_refresh(at(t0, 16)), TickOutcome::Stopped);
    assert_eq!(session.stats().intents, 0);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.scroller().sink().scroll_offset(), 0.0);
    assert_eq!(session.feedback().last(), Some(&TrackingStatus::Idle));
}

#[test]
fn test_old_stop_handle_does_not_touch_new_run() {
    let mut session = session();
    session.start(scripted(&[Some(40)]).unwrap());
    let old = session.stop_handle();

    session.start(scripted(&[Some(40)]).unwrap());
    old.stop();

    assert!(!old.is_live());
    assert_eq!(session.state(), SessionState::Calibrating);
    assert!(matches!(session.tick(Instant::now()), TickOutcome::BaselineSet(_)));
}

#[test]
fn test_settings_change_applies_next_tick() {
    let settings = SharedSettings::new(Settings::new(10, 3));
    let mut session: Session =
        TrackingSession::new(&TrackingConfig::default(), PageScroll::new(0.0), Vec::new(), settings.clone());
    let t0 = Instant::now();
    session.start(scripted(&[Some(40), Some(48), Some(48)]).unwrap());

    session.on_refresh(at(t0, 0));
    // 8 rows is 0.033, inside the 0.05 deadband of sensitivity 10
    assert_eq!(session.on_refresh(at(t0, 16)), TickOutcome::Hold);

    settings.update(SettingsUpdate { sensitivity: Some(5), scroll_speed: None });
    let outcome = session.on_refresh(at(t0, 32));
    assert_eq!(
        outcome,
        TickOutcome::Scrolled(ScrollIntent { direction: Direction::Down, magnitude: 4 })
    );
}

#[test]
fn test_restart_recalibrates() {
    let mut session = session();
    let t0 = Instant::now();
    session.start(scripted(&[Some(40)]).unwrap());
    session.on_refresh(at(t0, 0));
    let first = session.baseline().unwrap();

    session.start(scripted(&[Some(80)]).unwrap());
    assert_eq!(session.state(), SessionState::Calibrating);
    assert_eq!(session.baseline(), None);

    session.on_refresh(at(t0, 16));
    let second = session.baseline().unwrap();
    assert!((second - first - 40.0 / 240.0).abs() < 1e-12);
    assert_eq!(session.stats().ticks, 1);
    assert_eq!(
        session.feedback(),
        &vec![
            TrackingStatus::Calibrating,
            TrackingStatus::BaselineSet,
            TrackingStatus::Calibrating,
            TrackingStatus::BaselineSet,
        ]
    );
}
