//! End-to-end control loop scenarios on the mock prop.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use titanprop::app::events::{AppEvent, SensorKind};
use titanprop::app::press::PressDurationBucket;
use titanprop::app::service::PropService;
use titanprop::config::PropConfig;
use titanprop::drivers::led_patterns::{AuxMask, MAIN_FULL};
use titanprop::error::{PlaybackFault, SensorError};
use titanprop::library::{SoundCategory, SoundLibrary};

use crate::mock_hw::{LedCall, MockProp, RecordingSink};

fn library() -> SoundLibrary {
    SoundLibrary::from_assets([
        (SoundCategory::Old, "old1.wav"),
        (SoundCategory::Old, "old2.wav"),
        (SoundCategory::Titan, "titan1.wav"),
        (SoundCategory::Funny, "funny1.wav"),
    ])
}

fn service_with(config: &PropConfig, library: SoundLibrary) -> PropService<StdRng> {
    PropService::new(config, library, StdRng::seed_from_u64(7)).unwrap()
}

fn service() -> PropService<StdRng> {
    service_with(&PropConfig::default(), library())
}

fn run_until(svc: &mut PropService<StdRng>, hw: &mut MockProp, sink: &mut RecordingSink, ms: u64) {
    while hw.now() < ms {
        svc.tick(hw, sink);
    }
}

fn completed(sink: &RecordingSink) -> Vec<(u64, PressDurationBucket)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PressCompleted {
                duration_ms,
                bucket,
            } => Some((*duration_ms, *bucket)),
            _ => None,
        })
        .collect()
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn short_press_plays_one_old_clip_and_acknowledges() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 1300)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 10_000);

    assert_eq!(completed(&sink), [(300, PressDurationBucket::Short)]);
    let played = hw.assets_played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].parent(), Some(Path::new("/sounds/old")));
    assert_eq!(hw.aux_calls(), [AuxMask::ALL, AuxMask::NONE]);
    assert_eq!(svc.completed_sessions(), 1);
}

#[test]
fn medium_press_plays_titan() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 3000)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 12_000);

    assert_eq!(completed(&sink), [(2000, PressDurationBucket::Medium)]);
    assert_eq!(hw.assets_played(), [Path::new("/sounds/titan/titan1.wav")]);
    assert_eq!(hw.aux_calls(), [AuxMask::ALL, AuxMask::NONE]);
}

#[test]
fn five_second_press_plays_funny_without_acknowledge() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 6000)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 15_000);

    assert_eq!(completed(&sink), [(5000, PressDurationBucket::FunnyLength)]);
    assert_eq!(hw.assets_played(), [Path::new("/sounds/funny/funny1.wav")]);
    assert!(hw.aux_calls().is_empty());
}

#[test]
fn six_second_press_plays_old_name_from_test_dir() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 7000)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 15_000);

    assert_eq!(completed(&sink), [(6000, PressDurationBucket::Long)]);
    let played = hw.assets_played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].parent(), Some(Path::new("/sounds/test")));
    let name = played[0].file_name().and_then(|n| n.to_str()).unwrap();
    assert!(["old1.wav", "old2.wav"].contains(&name));
}

#[test]
fn release_without_press_is_ignored() {
    let mut svc = service();
    // Held at boot: the debouncer starts low, so the release has no press.
    let mut hw = MockProp::new(&[(0, 500)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 3000);

    assert_eq!(sink.count(|e| *e == AppEvent::StrayRelease), 1);
    assert!(hw.plays.is_empty());
}

#[test]
fn empty_category_is_skipped_without_leds() {
    let library = SoundLibrary::from_assets([(SoundCategory::Old, "old1.wav")]);
    let mut svc = service_with(&PropConfig::default(), library);
    let mut hw = MockProp::new(&[(1000, 6000)]);
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 10_000);

    assert!(sink.events.contains(&AppEvent::PlaybackSkipped {
        category: SoundCategory::Funny
    }));
    assert!(hw.plays.is_empty());
    assert!(hw.leds.is_empty());
}

#[test]
fn unreadable_asset_fails_and_still_runs_follow_up() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 1300)]);
    hw.missing_assets = vec!["/sounds/old/old1.wav".into(), "/sounds/old/old2.wav".into()];
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 6000);

    assert!(sink.events.contains(&AppEvent::PlaybackFailed {
        fault: PlaybackFault::Open
    }));
    assert_eq!(hw.stops, 1);
    assert!(hw.leds.contains(&LedCall::Main(MAIN_FULL)));
    assert_eq!(hw.aux_calls(), [AuxMask::ALL, AuxMask::NONE]);
    assert_eq!(svc.completed_sessions(), 0);
}

// ── Shake ─────────────────────────────────────────────────────

#[test]
fn shake_during_press_plays_warning_first() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(1000, 1500)]);
    hw.shakes = vec![1200];
    let mut sink = RecordingSink::default();

    run_until(&mut svc, &mut hw, &mut sink, 20_000);

    let played = hw.assets_played();
    assert_eq!(played.len(), 2);
    assert_eq!(played[0], Path::new("/sounds/putmedown.wav"));
    assert_ne!(played[1], Path::new("/sounds/putmedown.wav"));
    assert!(hw.plays[1].at_ms > hw.plays[0].at_ms);

    let shake_at = sink.events.iter().position(|e| *e == AppEvent::ShakeDetected);
    let press_at = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::PressCompleted { .. }));
    assert!(shake_at < press_at);
}

#[test]
fn shake_alarm_blinks_after_warning() {
    let mut svc = service();
    let mut hw = MockProp::new(&[]);
    hw.shakes = vec![0];
    let mut sink = RecordingSink::default();

    svc.tick(&mut hw, &mut sink);

    let aux = hw.aux_calls();
    // Lead-in on, alarm hold on, then ten on/off pairs.
    assert_eq!(aux.len(), 2 + 2 * 10);
    assert_eq!(aux[0], AuxMask::ALL);
    assert_eq!(aux.last(), Some(&AuxMask::NONE));
    assert_eq!(sink.count(|e| *e == AppEvent::ShakeDetected), 1);
}

// ── Motion ────────────────────────────────────────────────────

#[test]
fn motion_past_cooldown_plays_titan_and_resets() {
    let config = PropConfig {
        motion_initial_ticks: 600,
        ..PropConfig::default()
    };
    let mut svc = service_with(&config, library());
    let mut hw = MockProp::new(&[]);
    hw.motion = vec![(0, u64::MAX)];
    let mut sink = RecordingSink::default();

    svc.tick(&mut hw, &mut sink);

    assert_eq!(hw.assets_played(), [Path::new("/sounds/titan/titan1.wav")]);
    assert_eq!(sink.count(|e| *e == AppEvent::MotionDetected), 1);
    // Reset to zero, then advanced once at the end of the tick.
    assert_eq!(svc.cooldown(), 1);
    let chase = [0b001, 0b011, 0b111, 0b110, 0b100, 0b000].map(AuxMask);
    assert_eq!(hw.aux_calls()[..6], chase);
    assert_eq!(hw.aux_calls()[6..12], chase);

    // Still in front of the sensor, but the window is closed.
    for _ in 0..500 {
        svc.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.plays.len(), 1);
    assert_eq!(svc.cooldown(), 501);

    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.plays.len(), 2);
}

#[test]
fn motion_inside_cooldown_is_not_sampled() {
    let config = PropConfig {
        motion_initial_ticks: 10,
        ..PropConfig::default()
    };
    let mut svc = service_with(&config, library());
    let mut hw = MockProp::new(&[]);
    hw.motion = vec![(0, u64::MAX)];
    let mut sink = RecordingSink::default();

    for _ in 0..20 {
        svc.tick(&mut hw, &mut sink);
    }

    assert!(hw.plays.is_empty());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::MotionDetected | AppEvent::MotionArmed { .. })),
        0
    );
    assert_eq!(svc.cooldown(), 30);
}

#[test]
fn boot_cooldown_opens_after_eleven_ticks() {
    let mut svc = service();
    let mut hw = MockProp::new(&[]);
    hw.motion = vec![(0, u64::MAX)];
    let mut sink = RecordingSink::default();

    for _ in 0..11 {
        svc.tick(&mut hw, &mut sink);
    }
    assert!(hw.plays.is_empty());

    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.plays.len(), 1);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn sensor_faults_are_reported_and_loop_continues() {
    let config = PropConfig {
        motion_initial_ticks: 600,
        ..PropConfig::default()
    };
    let mut svc = service_with(&config, library());
    let mut hw = MockProp::new(&[]);
    hw.shake_fault = true;
    hw.motion_fault = true;
    let mut sink = RecordingSink::default();

    svc.tick(&mut hw, &mut sink);

    assert!(sink.events.contains(&AppEvent::SensorFault {
        sensor: SensorKind::Accelerometer,
        error: SensorError::Bus,
    }));
    assert!(sink.events.contains(&AppEvent::SensorFault {
        sensor: SensorKind::Motion,
        error: SensorError::Gpio,
    }));
    assert!(hw.plays.is_empty());
    assert_eq!(svc.cooldown(), 601);
    assert_eq!(hw.now(), 100);
}

// ── Exclusivity ───────────────────────────────────────────────

#[test]
fn busy_minute_never_overlaps_playback() {
    let mut svc = service();
    let mut hw = MockProp::new(&[(500, 800), (2000, 4000), (9000, 14_500), (30_000, 30_200)]);
    hw.motion = vec![(0, 60_000)];
    hw.shakes = vec![1000, 1100, 25_000];
    let mut sink = RecordingSink::default();

    // MockProp panics if a second clip starts while one is active.
    run_until(&mut svc, &mut hw, &mut sink, 60_000);

    assert!(hw.plays.len() >= 5);
    assert!(hw.plays.windows(2).all(|w| w[0].at_ms < w[1].at_ms));
    assert_eq!(svc.completed_sessions(), hw.plays.len() as u64);
}
