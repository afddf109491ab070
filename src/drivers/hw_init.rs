//! One-shot hardware bring-up for the prop board (ESP32-S3).
//!
//! Takes the peripheral singletons, builds every esp-idf-hal driver the
//! adapters need, powers the amplifier and mounts the sound partition.
//! Called once from `main()` before the control loop starts.
//!
//! ## Pin map
//!
//! | Signal           | GPIO | Notes                              |
//! |------------------|------|------------------------------------|
//! | Button           | 4    | active-low, internal pull-up       |
//! | PIR out          | 5    | active-high                        |
//! | Eye LED          | 6    | LEDC timer 0 / channel 0, 5 kHz    |
//! | Aux LED 1..3     | 7, 15, 16 | push-pull                     |
//! | I²C SDA / SCL    | 8 / 9 | LIS3DH @ 0x18, 400 kHz            |
//! | I²S BCLK / WS / DOUT | 10 / 11 / 12 | amplifier input          |
//! | Amp enable       | 13   | driven high at boot                |

use std::ffi::CString;

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, IOPin, Output, OutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::i2s::config::{
    Config, DataBitWidth, SlotMode, StdClkConfig, StdConfig, StdGpioConfig, StdSlotConfig,
};
use esp_idf_hal::i2s::{I2sDriver, I2sTx};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use esp_idf_sys::{ESP_OK, EspError, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};
use log::info;

const EYE_PWM_FREQ_KHZ: u32 = 5;
const I2C_BAUD_KHZ: u32 = 400;
const SPIFFS_MAX_FILES: usize = 5;
/// Frames per DMA descriptor; 4 bytes per stereo frame keeps each buffer
/// under the 4092-byte descriptor limit.
const DMA_FRAMES_MAX: u32 = 1000;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    PeripheralsTaken,
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    I2cInitFailed(i32),
    I2sInitFailed(i32),
    StorageMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PeripheralsTaken      => write!(f, "peripherals already taken"),
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)    => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::I2cInitFailed(rc)     => write!(f, "I2C init failed (rc={})", rc),
            Self::I2sInitFailed(rc)     => write!(f, "I2S init failed (rc={})", rc),
            Self::StorageMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── Board ─────────────────────────────────────────────────────

/// Every configured driver, ready to be wrapped by the adapters.
pub struct Board {
    pub button: PinDriver<'static, AnyIOPin, Input>,
    pub pir: PinDriver<'static, AnyIOPin, Input>,
    pub eye: LedcDriver<'static>,
    pub aux: [PinDriver<'static, AnyOutputPin, Output>; 3],
    pub i2c: I2cDriver<'static>,
    pub i2s: I2sDriver<'static, I2sTx>,
    /// Frames of silence that flush the whole DMA ring.
    pub i2s_drain_frames: usize,
    /// Must stay alive: dropping the driver releases the pin and mutes the amp.
    pub amp_enable: PinDriver<'static, AnyOutputPin, Output>,
}

/// DMA descriptor count and frames per descriptor for a ring holding at
/// least `buffer_ms` of audio.
fn dma_layout(sample_rate_hz: u32, buffer_ms: u32) -> (u32, u32) {
    let total = (u64::from(sample_rate_hz) * u64::from(buffer_ms) / 1000).max(1) as u32;
    let descriptors = total.div_ceil(DMA_FRAMES_MAX).max(2);
    (descriptors, total.div_ceil(descriptors))
}

pub fn init_board(sample_rate_hz: u32, audio_buffer_ms: u32) -> Result<Board, HwInitError> {
    let p = Peripherals::take().map_err(|_| HwInitError::PeripheralsTaken)?;
    let gpio = |e: EspError| HwInitError::GpioConfigFailed(e.code());

    let mut button = PinDriver::input(p.pins.gpio4.downgrade()).map_err(gpio)?;
    button.set_pull(Pull::Up).map_err(gpio)?;
    let mut pir = PinDriver::input(p.pins.gpio5.downgrade()).map_err(gpio)?;
    pir.set_pull(Pull::Down).map_err(gpio)?;
    info!("hw_init: inputs configured (button=4, pir=5)");

    let timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::default()
            .frequency(EYE_PWM_FREQ_KHZ.kHz().into())
            .resolution(Resolution::Bits13),
    )
    .map_err(|e| HwInitError::LedcInitFailed(e.code()))?;
    let eye = LedcDriver::new(p.ledc.channel0, timer, p.pins.gpio6)
        .map_err(|e| HwInitError::LedcInitFailed(e.code()))?;

    let aux = [
        PinDriver::output(p.pins.gpio7.downgrade_output()).map_err(gpio)?,
        PinDriver::output(p.pins.gpio15.downgrade_output()).map_err(gpio)?,
        PinDriver::output(p.pins.gpio16.downgrade_output()).map_err(gpio)?,
    ];
    info!("hw_init: LEDs configured (eye=LEDC CH0, aux=7/15/16)");

    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio8,
        p.pins.gpio9,
        &I2cConfig::new().baudrate(I2C_BAUD_KHZ.kHz().into()),
    )
    .map_err(|e| HwInitError::I2cInitFailed(e.code()))?;

    let (descriptors, frames) = dma_layout(sample_rate_hz, audio_buffer_ms);
    let channel = Config::default()
        .dma_buffer_count(descriptors)
        .frames_per_buffer(frames)
        .auto_clear(true);
    let std_config = StdConfig::new(
        channel,
        StdClkConfig::from_sample_rate_hz(sample_rate_hz),
        StdSlotConfig::philips_slot_default(DataBitWidth::Bits16, SlotMode::Stereo),
        StdGpioConfig::default(),
    );
    let i2s = I2sDriver::new_std_tx(
        p.i2s0,
        &std_config,
        p.pins.gpio10,
        p.pins.gpio12,
        Option::<AnyIOPin>::None,
        p.pins.gpio11,
    )
    .map_err(|e| HwInitError::I2sInitFailed(e.code()))?;

    let mut amp_enable = PinDriver::output(p.pins.gpio13.downgrade_output()).map_err(gpio)?;
    amp_enable.set_high().map_err(gpio)?;
    info!(
        "hw_init: audio configured ({} Hz, DMA {}x{} frames, amp enabled)",
        sample_rate_hz, descriptors, frames
    );

    Ok(Board {
        button,
        pir,
        eye,
        aux,
        i2c,
        i2s,
        i2s_drain_frames: ((descriptors + 1) * frames) as usize,
        amp_enable,
    })
}

// ── Storage ───────────────────────────────────────────────────

/// Mount the default SPIFFS partition at `base_path`.
pub fn mount_sound_storage(base_path: &str) -> Result<(), HwInitError> {
    let base = CString::new(base_path).map_err(|_| HwInitError::StorageMountFailed(-1))?;
    let conf = esp_vfs_spiffs_conf_t {
        base_path: base.as_ptr(),
        partition_label: core::ptr::null(),
        max_files: SPIFFS_MAX_FILES,
        format_if_mount_failed: false,
    };
    // SAFETY: `conf` and the path it points to outlive the call; the VFS
    // layer copies the base path during registration.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::StorageMountFailed(ret));
    }
    info!("hw_init: SPIFFS mounted at {}", base_path);
    Ok(())
}

// ── Entropy ───────────────────────────────────────────────────

/// 64-bit seed from the hardware RNG.
pub fn hardware_seed() -> u64 {
    let mut buf = [0u8; 8];
    // SAFETY: `buf` is valid for writes of its full length.
    unsafe {
        esp_idf_sys::esp_fill_random(buf.as_mut_ptr().cast(), buf.len());
    }
    u64::from_le_bytes(buf)
}
