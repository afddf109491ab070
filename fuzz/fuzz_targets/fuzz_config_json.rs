//! Fuzz target: `PropConfig::from_json`
//!
//! Feeds arbitrary bytes to the boot-time config parser and verifies:
//! - No panics under arbitrary input
//! - Anything accepted also passes `validate()`
//! - Accepted configs build a `PropService`
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use titanprop::app::service::PropService;
use titanprop::config::PropConfig;
use titanprop::library::SoundLibrary;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = PropConfig::from_json(data) else {
        return;
    };
    assert!(config.validate().is_ok(), "accepted config fails validation");
    assert!(
        PropService::new(&config, SoundLibrary::default(), SmallRng::seed_from_u64(0)).is_ok(),
        "accepted config rejected by the service"
    );
});
