//! WAV streaming audio sink.
//!
//! [`StreamingSink`] decodes a clip with `hound` and pushes it to a
//! [`FrameWriter`] one chunk per `is_playing` poll, so the control loop can
//! flicker the LED between chunks. On the board the writer is the I²S
//! transmitter ([`crate::drivers::i2s`]); in tests it records what it was
//! handed.
//!
//! ## Pacing
//!
//! A chunk covers exactly one poll interval. `play` queues the first chunk
//! and every poll queues the next, so the device always holds between one
//! and two intervals of audio. The writer's queue must therefore fit two
//! chunks. When the clip runs out the writer is drained before the poll
//! reports the clip finished.
//!
//! ```text
//!  play        poll 1      poll 2            poll n
//!   │ chunk 1   │ chunk 2   │ chunk 3   ...    │ (empty) ─▶ drain ─▶ false
//!   ▼           ▼           ▼                  ▼
//!  ├── interval ──┼── interval ──┼── ... ──────┤ last sample played
//! ```
//!
//! Only 16-bit integer PCM is accepted. Every asset on the card is
//! expected to share that encoding.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, warn};

use crate::app::ports::AudioSink;
use crate::error::PlaybackFault;

/// Stream parameters handed to the writer before the first chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Destination for decoded PCM.
pub trait FrameWriter {
    /// Prepare the output for a new clip.
    fn begin(&mut self, format: AudioFormat) -> Result<(), PlaybackFault>;
    /// Queue interleaved samples. Blocks while the device queue is full.
    fn write(&mut self, samples: &[i16]) -> Result<(), PlaybackFault>;
    /// Block until every queued sample has been played, then silence the
    /// output.
    fn drain(&mut self);
    /// Silence the output now, discarding whatever is still queued.
    fn halt(&mut self);
}

struct Clip {
    reader: WavReader<BufReader<File>>,
    chunk_samples: usize,
}

pub struct StreamingSink<W> {
    writer: W,
    chunk_ms: u32,
    clip: Option<Clip>,
    buffer: Vec<i16>,
}

impl<W: FrameWriter> StreamingSink<W> {
    /// `chunk_ms` must match the interval between `is_playing` polls.
    pub fn new(writer: W, chunk_ms: u32) -> Self {
        Self {
            writer,
            chunk_ms: chunk_ms.max(1),
            clip: None,
            buffer: Vec::new(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn halt_clip(&mut self) {
        if self.clip.take().is_some() {
            self.writer.halt();
        }
    }

    /// Decode the next chunk and hand it to the writer. Returns the sample
    /// count; zero means the clip is exhausted.
    fn queue_next(&mut self) -> Result<usize, PlaybackFault> {
        self.buffer.clear();
        let Some(clip) = self.clip.as_mut() else {
            return Ok(0);
        };
        for sample in clip.reader.samples::<i16>().take(clip.chunk_samples) {
            self.buffer.push(sample.map_err(|_| PlaybackFault::Decode)?);
        }
        if !self.buffer.is_empty() {
            self.writer.write(&self.buffer)?;
        }
        Ok(self.buffer.len())
    }
}

impl<W: FrameWriter> AudioSink for StreamingSink<W> {
    fn play(&mut self, asset: &Path) -> Result<(), PlaybackFault> {
        if self.clip.is_some() {
            return Err(PlaybackFault::Busy);
        }

        let reader = WavReader::open(asset).map_err(|e| {
            warn!("audio: cannot open {}: {}", asset.display(), e);
            PlaybackFault::Open
        })?;
        let spec = reader.spec();
        if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
            return Err(PlaybackFault::UnsupportedFormat {
                bits: spec.bits_per_sample,
            });
        }

        let format = AudioFormat {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        };
        let frames = (u64::from(spec.sample_rate) * u64::from(self.chunk_ms) / 1000).max(1);
        let chunk_samples = frames as usize * usize::from(spec.channels.max(1));

        self.writer.begin(format)?;
        debug!(
            "audio: {} ({} Hz, {} ch, {} samples)",
            asset.display(),
            spec.sample_rate,
            spec.channels,
            reader.len()
        );
        self.clip = Some(Clip {
            reader,
            chunk_samples,
        });

        // Lead chunk: keeps the device fed while the caller sleeps before
        // its first poll.
        if let Err(fault) = self.queue_next() {
            self.halt_clip();
            return Err(fault);
        }
        Ok(())
    }

    fn is_playing(&mut self) -> Result<bool, PlaybackFault> {
        if self.clip.is_none() {
            return Ok(false);
        }

        match self.queue_next() {
            Ok(0) => {
                self.clip = None;
                self.writer.drain();
                Ok(false)
            }
            Ok(_) => Ok(true),
            Err(fault) => {
                self.halt_clip();
                Err(fault)
            }
        }
    }

    fn stop(&mut self) {
        self.halt_clip();
    }
}
