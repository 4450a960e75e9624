//! Integration tests for the session lifecycle across both host cadences.

use proptest::prelude::*;
use treadmill_core::{
    CallbackSink, DeltaSource, Event, FrameTick, LaunchRequest, MotionIntegrator, Route,
    SessionController, SessionMetrics, SessionParams, SessionState, TrackedObject,
};

fn belt_at(position: f64) -> SessionController {
    let motion = MotionIntegrator::new(
        vec![TrackedObject::new("belt", -15.0, 20.0).at(position)],
        DeltaSource::Fixed(0.005),
    );
    SessionController::new(motion, &SessionParams::default())
}

#[test]
fn test_reset_fires_instead_of_overflow() {
    let mut session = belt_at(19.998);
    session.start();
    session.per_frame(FrameTick::at(0.0));
    assert_eq!(session.objects()[0].axis_position(), -15.0);
}

#[test]
fn test_milestone_fires_once_per_ten_minutes() {
    let mut session = belt_at(0.0);
    session.start();

    let mut fired_at = Vec::new();
    for _ in 0..45 {
        if let Some(Event::MilestoneReached { elapsed_minutes, .. }) = session.minute_tick() {
            fired_at.push(elapsed_minutes);
        }
    }
    assert_eq!(fired_at, vec![10, 20, 30, 40]);
}

#[test]
fn test_timer_suspends_on_stop_and_resets_on_start() {
    let mut session = belt_at(0.0);
    session.start();
    for _ in 0..9 {
        session.minute_tick();
    }
    session.stop();

    // A stale tick after stop must not count or fire.
    assert!(session.minute_tick().is_none());
    assert_eq!(session.metrics().elapsed_minutes, 9);

    session.start();
    assert_eq!(session.metrics().elapsed_minutes, 0);
    for _ in 0..9 {
        assert!(session.minute_tick().is_none());
    }
    assert!(session.minute_tick().is_some_and(|e| e.is_milestone()));
}

#[test]
fn test_double_start_matches_single_start() {
    let mut once = belt_at(0.0);
    let mut twice = belt_at(0.0);
    once.start();
    twice.start();
    twice.start();

    for i in 0..10 {
        once.per_frame(FrameTick::at(i as f64));
        twice.per_frame(FrameTick::at(i as f64));
    }
    assert_eq!(once.metrics(), twice.metrics());
    assert_eq!(once.state(), twice.state());
    assert_eq!(once.objects(), twice.objects());
}

#[test]
fn test_launch_from_route_runs_a_workout() {
    let request = LaunchRequest::new("/Vrscene".parse::<Route>().unwrap(), "jo", 15);
    let mut session = request.launch(&SessionParams::default()).unwrap();

    let mut notified = Vec::new();
    let mut sink = CallbackSink(|event: Event| notified.push(event));
    session.start();
    for frame in 0..600 {
        session.per_frame_into(FrameTick::at(frame as f64 * 16.0), &mut sink);
    }
    drop(sink);

    let metrics = session.metrics();
    assert!((metrics.distance - 600.0 * 0.005).abs() < 1e-9);
    assert!(notified.is_empty());
    assert!(session.yaw().is_some());
    assert_eq!(session.profile().user_name, "jo");
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Stop,
    Frame,
    Minute,
    Faster,
    Slower,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Stop),
        6 => Just(Op::Frame),
        2 => Just(Op::Minute),
        1 => Just(Op::Faster),
        1 => Just(Op::Slower),
    ]
}

proptest! {
    #[test]
    fn metrics_hold_invariants_under_any_command_sequence(
        ops in proptest::collection::vec(op(), 0..400)
    ) {
        let motion = MotionIntegrator::new(
            vec![
                TrackedObject::new("a", -9.0, 25.0),
                TrackedObject::new("b", -10.0, 25.0),
            ],
            DeltaSource::Speed,
        );
        let mut session = SessionController::new(motion, &SessionParams::default());
        let mut now = 0.0;

        for op in ops {
            let before = session.metrics();
            match op {
                Op::Start => {
                    let was_active = session.state() == SessionState::Active;
                    session.start();
                    if !was_active {
                        prop_assert_eq!(session.metrics(), SessionMetrics::default());
                    } else {
                        prop_assert_eq!(session.metrics(), before);
                    }
                }
                Op::Stop => {
                    session.stop();
                    prop_assert_eq!(session.metrics(), before);
                }
                Op::Frame => {
                    now += 16.0;
                    session.per_frame(FrameTick::at(now));
                    let after = session.metrics();
                    if session.is_active() {
                        prop_assert!(after.distance >= before.distance);
                    } else {
                        prop_assert_eq!(after, before);
                    }
                }
                Op::Minute => {
                    session.minute_tick();
                    if !session.is_active() {
                        prop_assert_eq!(session.metrics(), before);
                    }
                }
                Op::Faster => { session.increase_speed(); }
                Op::Slower => { session.decrease_speed(); }
            }

            let m = session.metrics();
            prop_assert_eq!(m.calories, m.distance * 0.05);
            let speed = session.speed();
            prop_assert!(speed.min() <= speed.value() && speed.value() <= speed.max());
            for object in session.objects() {
                prop_assert!(object.axis_position() <= object.reset_threshold());
            }
            let light = session.light_intensity();
            prop_assert!((0.0..=1.0).contains(&light));
        }
    }
}
