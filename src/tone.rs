//! Knock tone synthesis.
//!
//! The knock is a short sine "tock": pitch falls from 220 Hz to 110 Hz while
//! the level decays from 0.5 to 0.01, both along exponential ramps.

use std::fs;
use std::path::Path;

use crossbeam_channel::{Sender, TrySendError};

use crate::{zlog_debug, Error, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEnvelope {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds for the pitch ramp; the pitch holds at `end_hz` afterwards.
    pub sweep_secs: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub decay_secs: f32,
    pub duration_secs: f32,
}

pub const KNOCK: ToneEnvelope = ToneEnvelope {
    start_hz: 220.0,
    end_hz: 110.0,
    sweep_secs: 0.2,
    start_gain: 0.5,
    end_gain: 0.01,
    decay_secs: 0.3,
    duration_secs: 0.3,
};

/// Exponential ramp from `from` at t=0 to `to` at t=`span`, clamped outside.
fn exp_ramp(from: f32, to: f32, span: f32, t: f32) -> f32 {
    if t <= 0.0 || span <= 0.0 {
        return if span <= 0.0 { to } else { from };
    }
    if t >= span {
        return to;
    }
    from * (to / from).powf(t / span)
}

impl ToneEnvelope {
    pub fn frequency_at(&self, t: f32) -> f32 {
        exp_ramp(self.start_hz, self.end_hz, self.sweep_secs, t)
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        exp_ramp(self.start_gain, self.end_gain, self.decay_secs, t)
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration_secs * sample_rate as f32).round() as usize
    }

    /// Render mono samples in [-1, 1]. Phase is accumulated per sample so
    /// the falling pitch stays continuous.
    pub fn synthesize(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let mut phase = 0.0f32;
        (0..self.sample_count(sample_rate))
            .map(|i| {
                let t = i as f32 / rate;
                let sample = phase.sin() * self.gain_at(t);
                phase += std::f32::consts::TAU * self.frequency_at(t) / rate;
                if phase > std::f32::consts::TAU {
                    phase -= std::f32::consts::TAU;
                }
                sample
            })
            .collect()
    }
}

/// Something that can make the knock audible.
pub trait TonePlayer: Send {
    fn play(&mut self, tone: &ToneEnvelope) -> Result<()>;
}

/// Rings the terminal bell. Most terminals have no way to play PCM, so the
/// TUI settles for this.
///
/// The render thread owns stdout, so this only queues a ring; the render
/// loop writes the BEL byte between frames.
#[derive(Debug, Clone)]
pub struct TerminalBell {
    ring_tx: Sender<()>,
}

impl TerminalBell {
    pub fn new(ring_tx: Sender<()>) -> Self {
        Self { ring_tx }
    }
}

impl TonePlayer for TerminalBell {
    fn play(&mut self, _tone: &ToneEnvelope) -> Result<()> {
        match self.ring_tx.try_send(()) {
            // A ring still waiting covers this one.
            Ok(()) | Err(TrySendError::Full(())) => Ok(()),
            Err(TrySendError::Disconnected(())) => Err(Error::RenderClosed),
        }
    }
}

/// 16-bit little-endian mono PCM in a RIFF/WAVE container.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const BITS: u16 = 16;
    const CHANNELS: u16 = 1;
    let block_align = CHANNELS * BITS / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_len = (samples.len() * block_align as usize) as u32;

    let mut buf = Vec::with_capacity(44 + data_len as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

pub fn write_wav(path: &Path, tone: &ToneEnvelope, sample_rate: u32) -> Result<()> {
    let samples = tone.synthesize(sample_rate);
    zlog_debug!(
        "write_wav path={} samples={} rate={}",
        path.display(),
        samples.len(),
        sample_rate
    );
    fs::write(path, encode_wav(&samples, sample_rate))?;
    Ok(())
}
