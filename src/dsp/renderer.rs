//! Offline renderer: turns a cue into samples or a WAV file.

use crate::audio::cue::{Cue, ScheduledTone};

use super::mixer::Mixer;
use super::voice::Voice;

/// Render scheduled tones to mono samples. The buffer ends when the last
/// tone ends.
pub fn render_tones(tones: &[ScheduledTone], sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    let to_samples = |secs: f64| (secs * sr).round() as usize;

    let len = tones
        .iter()
        .map(|t| to_samples(t.offset_ms as f64 / 1000.0) + to_samples(t.tone.duration))
        .max()
        .unwrap_or(0);

    let mut mixer = Mixer::new(len);
    for scheduled in tones {
        let start = to_samples(scheduled.offset_ms as f64 / 1000.0);
        let mut voice = Voice::new(&scheduled.tone, sr);
        mixer.add_at(
            start,
            std::iter::from_fn(|| (!voice.is_finished()).then(|| voice.next_sample())),
        );
    }
    mixer.output()
}

pub fn render_cue(cue: Cue, sample_rate: u32) -> Vec<f64> {
    render_tones(&cue.tones(), sample_rate)
}

/// Render a cue as a 16-bit stereo PCM WAV file.
pub fn render_cue_wav(cue: Cue, sample_rate: u32) -> Vec<u8> {
    let mono = render_cue(cue, sample_rate);
    let mut pcm = Vec::with_capacity(mono.len() * 2);
    for s in mono {
        let v = (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
        pcm.extend([v, v]);
    }
    encode_wav(&pcm, sample_rate, 2)
}

/// Wrap interleaved i16 PCM in a RIFF/WAVE container.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    const BYTES_PER_SAMPLE: u16 = 2;
    let block_align = channels * BYTES_PER_SAMPLE;
    let data_len = (samples.len() * BYTES_PER_SAMPLE as usize) as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&(BYTES_PER_SAMPLE * 8).to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}
