use std::sync::mpsc;
use std::time::{Duration, Instant};

use pust::effects::{RecordingSink, Signal};
use pust::phase::Phase;
use pust::runtime::Sampler;
use pust::session::{Session, SessionConfig, Status};

// Headless integration: drive a full breathing session through the real
// controller with synthetic instants, no terminal and no sleeping.

fn session_with(
    config: SessionConfig,
) -> (Session<RecordingSink>, mpsc::Receiver<pust::runtime::Event>) {
    let (tx, rx) = mpsc::channel();
    (
        Session::new(config, RecordingSink::default(), Sampler::new(tx)),
        rx,
    )
}

fn run_seconds(session: &mut Session<RecordingSink>, start: Instant, secs: impl Iterator<Item = u64>) {
    for s in secs {
        session.tick(start + Duration::from_secs(s));
    }
}

#[test]
fn unlimited_session_breathes_forever() {
    let (mut session, _rx) = session_with(SessionConfig::default());
    let t0 = Instant::now();

    session.start(t0);
    run_seconds(&mut session, t0, 1..=600);

    assert!(session.is_running());
    assert!(!session.limit_reached());
    // One opening cue plus one per phase boundary: 4/6 gives two boundaries
    // per 10s cycle, 600s is 60 full cycles.
    assert_eq!(session.sink().count(Signal::Cue), 1 + 120);
}

#[test]
fn second_by_second_walk_matches_the_documented_map() {
    let (mut session, _rx) = session_with(SessionConfig::default());
    let t0 = Instant::now();
    session.start(t0);

    session.tick(t0 + Duration::from_secs(9));
    assert_eq!(session.phase(), Phase::Exhale);
    assert_eq!(session.countdown(), 1);

    session.tick(t0 + Duration::from_secs(10));
    assert_eq!(session.phase(), Phase::Inhale);
    assert_eq!(session.countdown(), 4);
}

#[test]
fn irregular_sampling_reaches_the_same_state_as_regular_sampling() {
    let config = SessionConfig::default();
    let t0 = Instant::now();

    let (mut regular, _rx1) = session_with(config.clone());
    regular.start(t0);
    run_seconds(&mut regular, t0, 1..=97);

    // Bursty, gappy sampling of the same 97 seconds.
    let (mut bursty, _rx2) = session_with(config);
    bursty.start(t0);
    run_seconds(&mut bursty, t0, [3, 4, 29, 30, 31, 88, 97].into_iter());

    assert_eq!(regular.elapsed_secs(), bursty.elapsed_secs());
    assert_eq!(regular.phase(), bursty.phase());
    assert_eq!(regular.countdown(), bursty.countdown());
}

#[test]
fn limited_session_completes_at_the_wrap_after_the_limit() {
    let (mut session, _rx) = session_with(SessionConfig {
        inhale_secs: 4,
        exhale_secs: 7,
        time_limit_mins: Some(1),
    });
    let t0 = Instant::now();
    session.start(t0);

    run_seconds(&mut session, t0, 1..=65);
    assert!(session.limit_reached());
    assert!(session.is_running());

    session.tick(t0 + Duration::from_secs(66));
    assert_eq!(session.status(), Status::Complete);
    assert!(!session.is_running());

    // Wake request acquired once at start, released once on completion.
    assert_eq!(session.sink().count(Signal::WakeAcquire), 1);
    assert_eq!(session.sink().count(Signal::WakeRelease), 1);
}

#[test]
fn completion_is_reached_even_when_every_tick_near_the_limit_is_missed() {
    let (mut session, _rx) = session_with(SessionConfig {
        inhale_secs: 4,
        exhale_secs: 6,
        time_limit_mins: Some(1),
    });
    let t0 = Instant::now();
    session.start(t0);

    // The sampler stalls from 55s all the way past the limit; the first
    // tick after the stall lands beyond the 60s wrap.
    run_seconds(&mut session, t0, 1..=55);
    session.tick(t0 + Duration::from_secs(63));

    // 63 is mid-cycle, so the session keeps going until the next wrap.
    assert!(session.limit_reached());
    assert!(session.is_running());

    session.tick(t0 + Duration::from_secs(70));
    assert_eq!(session.status(), Status::Complete);
}

#[test]
fn pause_then_start_is_a_restart_not_a_resume() {
    let (mut session, _rx) = session_with(SessionConfig::default());
    let t0 = Instant::now();
    session.start(t0);
    run_seconds(&mut session, t0, 1..=42);
    assert_eq!(session.elapsed_secs(), 42);

    session.pause();
    assert_eq!(session.status(), Status::Idle);
    assert_eq!(session.elapsed_secs(), 42);

    let t1 = t0 + Duration::from_secs(100);
    session.start(t1);
    assert_eq!(session.elapsed_secs(), 0);
    assert_eq!(session.phase(), Phase::Inhale);
    assert_eq!(session.countdown(), 4);

    // The new run counts from its own start instant.
    session.tick(t1 + Duration::from_secs(5));
    assert_eq!(session.elapsed_secs(), 5);
}

#[test]
fn completed_session_requires_reset_before_the_ui_reopens_settings() {
    let (mut session, _rx) = session_with(SessionConfig {
        inhale_secs: 4,
        exhale_secs: 6,
        time_limit_mins: Some(1),
    });
    let t0 = Instant::now();
    session.start(t0);
    run_seconds(&mut session, t0, 1..=60);
    assert_eq!(session.status(), Status::Complete);

    // Ticks after completion change nothing.
    session.tick(t0 + Duration::from_secs(61));
    assert_eq!(session.elapsed_secs(), 60);

    session.reset();
    assert_eq!(session.status(), Status::Idle);
    assert_eq!(session.elapsed_secs(), 0);
    assert_eq!(session.config().time_limit_mins, None);
}

#[test]
fn a_full_user_journey() {
    // Type a limit, start, breathe, pause, restart with a preset, complete,
    // reset: the lifecycle a user actually exercises.
    let (mut session, _rx) = session_with(SessionConfig::default());
    let t0 = Instant::now();

    session.set_time_limit(Some(30));
    session.start(t0);
    run_seconds(&mut session, t0, 1..=25);
    assert!(session.is_running());

    session.pause();
    assert!(!session.is_running());

    let t1 = t0 + Duration::from_secs(60);
    session.start_with_preset(1, t1);
    assert_eq!(session.config().time_limit_mins, Some(1));
    assert_eq!(session.elapsed_secs(), 0);

    run_seconds(&mut session, t1, 1..=60);
    assert_eq!(session.status(), Status::Complete);

    session.reset();
    assert_eq!(session.status(), Status::Idle);
    assert!(!session.limit_reached());
}
