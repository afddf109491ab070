//! Fuzz target: `PressClassifier`
//!
//! Drives arbitrary fell/rose sequences with arbitrary (monotonic)
//! timestamps and verifies:
//! - No panics, including on timestamp saturation
//! - A completed press only follows a fell edge
//! - The reported bucket matches `classify(duration)`
//!
//! cargo fuzz run fuzz_press_classifier

#![no_main]

use libfuzzer_sys::fuzz_target;
use titanprop::app::press::{ButtonState, PressClassifier, PressThresholds};

fuzz_target!(|data: &[u8]| {
    let thresholds = PressThresholds::default();
    let mut classifier = PressClassifier::new(thresholds);
    let mut now: u64 = 0;

    for chunk in data.chunks(3) {
        let step = u64::from(u16::from_le_bytes([chunk[0], *chunk.get(1).unwrap_or(&0)]));
        now = now.saturating_add(step);
        let fell = chunk.get(2).is_some_and(|b| b & 1 == 0);

        if fell {
            classifier.on_fell(now);
            assert_eq!(classifier.state(), ButtonState::Pressed { since_ms: now });
        } else {
            let was_pressed = matches!(classifier.state(), ButtonState::Pressed { .. });
            match classifier.on_rose(now) {
                Some(press) => {
                    assert!(was_pressed, "completed press without a fell edge");
                    assert_eq!(press.bucket, thresholds.classify(press.duration));
                }
                None => assert!(!was_pressed, "tracked press dropped on release"),
            }
            assert_eq!(classifier.state(), ButtonState::Idle);
        }
    }
});
