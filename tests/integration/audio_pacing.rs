//! Streaming sink pacing against the arbiter's poll interval.
//!
//! A simulated DAC shares the millisecond clock with the arbiter: queued
//! audio drains in real time, `write` blocks while the queue is full and
//! `drain` blocks until the last sample has played. A session must last at
//! least as long as its clip and the queue must never run dry mid-clip.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use titanprop::app::arbiter::PlaybackArbiter;
use titanprop::app::ports::{AudioSink, LedPort, TimePort};
use titanprop::config::PropConfig;
use titanprop::drivers::audio::{AudioFormat, FrameWriter, StreamingSink};
use titanprop::drivers::led_patterns::AuxMask;
use titanprop::error::PlaybackFault;

const RATE: u32 = 22_050;

// ── Simulated DAC ─────────────────────────────────────────────

struct SimulatedDac {
    clock: Rc<Cell<u64>>,
    capacity_ms: u64,
    sample_rate: u32,
    channels: u16,
    /// Clock time at which everything queued so far has played.
    played_until: u64,
    streaming: bool,
    /// Clock times at which a write found the queue already empty.
    underruns: Vec<u64>,
    drained_at: Option<u64>,
    halted: u32,
    samples: usize,
}

impl SimulatedDac {
    fn new(clock: Rc<Cell<u64>>, capacity_ms: u64) -> Self {
        Self {
            clock,
            capacity_ms,
            sample_rate: RATE,
            channels: 1,
            played_until: 0,
            streaming: false,
            underruns: Vec::new(),
            drained_at: None,
            halted: 0,
            samples: 0,
        }
    }
}

impl FrameWriter for SimulatedDac {
    fn begin(&mut self, format: AudioFormat) -> Result<(), PlaybackFault> {
        self.sample_rate = format.sample_rate;
        self.channels = format.channels;
        self.played_until = self.clock.get();
        self.streaming = false;
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<(), PlaybackFault> {
        let now = self.clock.get();
        if self.streaming && self.played_until < now {
            self.underruns.push(now);
        }
        let frames = (samples.len() / usize::from(self.channels)) as u64;
        let start = self.played_until.max(now);
        let end = start + frames * 1000 / u64::from(self.sample_rate);
        if end > now + self.capacity_ms {
            self.clock.set(end - self.capacity_ms);
        }
        self.played_until = end;
        self.streaming = true;
        self.samples += samples.len();
        Ok(())
    }

    fn drain(&mut self) {
        let done = self.played_until.max(self.clock.get());
        self.clock.set(done);
        self.drained_at = Some(done);
        self.streaming = false;
    }

    fn halt(&mut self) {
        self.halted += 1;
        self.streaming = false;
    }
}

// ── Rig: sink + LEDs on the shared clock ──────────────────────

struct PacedRig {
    clock: Rc<Cell<u64>>,
    sink: StreamingSink<SimulatedDac>,
    play_started_at: Option<u64>,
}

impl PacedRig {
    fn new(capacity_ms: u64, tick_ms: u32) -> Self {
        let clock = Rc::new(Cell::new(0));
        let dac = SimulatedDac::new(Rc::clone(&clock), capacity_ms);
        Self {
            clock,
            sink: StreamingSink::new(dac, tick_ms),
            play_started_at: None,
        }
    }

    fn dac(&self) -> &SimulatedDac {
        self.sink.writer()
    }
}

impl AudioSink for PacedRig {
    fn play(&mut self, asset: &Path) -> Result<(), PlaybackFault> {
        self.play_started_at = Some(self.clock.get());
        self.sink.play(asset)
    }

    fn is_playing(&mut self) -> Result<bool, PlaybackFault> {
        self.sink.is_playing()
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

impl LedPort for PacedRig {
    fn set_brightness(&mut self, _duty: u16) {}

    fn set_aux(&mut self, _mask: AuxMask) {}
}

impl TimePort for PacedRig {
    fn now_ms(&self) -> u64 {
        self.clock.get()
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.clock.set(self.clock.get() + u64::from(ms));
    }
}

fn write_clip(dir: &Path, ms: u32) -> PathBuf {
    let path = dir.join("clip.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut w = WavWriter::create(&path, spec).unwrap();
    for i in 0..RATE * ms / 1000 {
        w.write_sample((i % 512) as i16).unwrap();
    }
    w.finalize().unwrap();
    path
}

fn arbiter(dir: &Path, tick_ms: u32) -> PlaybackArbiter<StdRng> {
    PlaybackArbiter::new(StdRng::seed_from_u64(7), dir, 5000..=30000, tick_ms)
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn session_lasts_as_long_as_the_clip() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(dir.path(), 1000);
    let mut rig = PacedRig::new(300, 100);

    let report = arbiter(dir.path(), 100).play_asset(&clip, &mut rig).unwrap();

    // Pre-roll takes 400 ms before the clip starts.
    let started = rig.play_started_at.unwrap();
    assert_eq!(started, 400);
    assert_eq!(report.polls, 9);
    assert_eq!(rig.dac().drained_at, Some(started + 1000));
    assert_eq!(rig.now_ms(), started + 1000);
    assert!(rig.dac().underruns.is_empty(), "gaps at {:?}", rig.dac().underruns);
    assert_eq!(rig.dac().samples, 22_050);
    assert_eq!(rig.dac().halted, 0);
}

#[test]
fn default_config_keeps_the_device_fed() {
    let config = PropConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(dir.path(), 2500);

    // The configured buffer and the smallest one the validator accepts.
    for capacity_ms in [config.audio_buffer_ms, 2 * config.tick_ms] {
        let mut rig = PacedRig::new(u64::from(capacity_ms), config.tick_ms);
        arbiter(dir.path(), config.tick_ms)
            .play_asset(&clip, &mut rig)
            .unwrap();

        let started = rig.play_started_at.unwrap();
        assert!(rig.dac().underruns.is_empty(), "capacity {capacity_ms} ms underran");
        assert_eq!(rig.dac().drained_at, Some(started + 2500));
        assert!(rig.now_ms() - started >= 2500);
    }
}

#[test]
fn stop_mid_clip_halts_instead_of_draining() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(dir.path(), 1000);
    let mut rig = PacedRig::new(300, 100);

    rig.play(&clip).unwrap();
    assert_eq!(rig.is_playing(), Ok(true));
    rig.sleep_ms(100);
    rig.stop();

    assert_eq!(rig.dac().halted, 1);
    assert_eq!(rig.dac().drained_at, None);
    assert_eq!(rig.is_playing(), Ok(false));
}
