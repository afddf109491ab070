//! TitanProp firmware entry point
//!
//! Hexagonal architecture with a single blocking control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                       LogEventSink            │
//! │  (button · PIR · LIS3DH · LEDs ·       (EventSink)             │
//! │   I²S stream · MonotonicClock)                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PropService (pure logic)                  │    │
//! │  │  shake · motion cooldown · press classifier · arbiter  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use esp_idf_hal::delay::Delay;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use titanprop::adapters::hardware::HardwareAdapter;
use titanprop::adapters::log_sink::LogEventSink;
use titanprop::adapters::time::MonotonicClock;
use titanprop::app::service::PropService;
use titanprop::config::PropConfig;
use titanprop::drivers::audio::StreamingSink;
use titanprop::drivers::debounce::DebouncedInput;
use titanprop::drivers::hw_init;
use titanprop::drivers::i2s::I2sWriter;
use titanprop::drivers::led::{AuxLeds, PwmLed};
use titanprop::drivers::lis3dh::{self, Lis3dh, Range};
use titanprop::drivers::pir::PirSensor;
use titanprop::error::Error;
use titanprop::library::SoundLibrary;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TitanProp v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Sound storage + config ─────────────────────────────
    let mount = PropConfig::default().sound_root;
    hw_init::mount_sound_storage(&mount).context("mounting sound storage")?;
    let config = PropConfig::load(Path::new(&mount));
    let root = Path::new(&config.sound_root);

    // ── 3. Peripherals ────────────────────────────────────────
    let board = hw_init::init_board(config.audio_sample_rate_hz, config.audio_buffer_ms)
        .context("board init")?;
    // Held for the life of the loop; dropping it mutes the amplifier.
    let _amp_enable = board.amp_enable;

    let mut accel = Lis3dh::new(board.i2c, Delay::new_default(), lis3dh::DEFAULT_ADDRESS);
    if let Err(e) = accel.init(Range::G2) {
        warn!("accelerometer: {}", e);
        return Err(Error::Init("LIS3DH did not respond").into());
    }

    let mut hw = HardwareAdapter::new(
        DebouncedInput::new(board.button, config.debounce_samples),
        PirSensor::new(board.pir),
        accel,
        PwmLed::new(board.eye),
        AuxLeds::new(board.aux),
        StreamingSink::new(
            I2sWriter::new(board.i2s, config.audio_sample_rate_hz, board.i2s_drain_frames),
            config.tick_ms,
        ),
        MonotonicClock::new(),
    );

    // ── 4. Asset inventory ────────────────────────────────────
    let library = SoundLibrary::discover(root, &config.asset_filter());

    // ── 5. Service + loop ─────────────────────────────────────
    let rng = SmallRng::seed_from_u64(hw_init::hardware_seed());
    let mut service = PropService::new(&config, library, rng).context("service init")?;
    let mut log_sink = LogEventSink::new();

    service.start(&mut log_sink);
    service.run(&mut hw, &mut log_sink)
}
