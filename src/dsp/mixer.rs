//! Mixer: sums overlapping voices into one buffer.

/// A summing buffer. Voices are added at sample offsets; the output gets
/// master gain and tanh soft clipping so stacked cues never hard-clip.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new(len: usize) -> Self {
        Mixer {
            master_gain: 1.0,
            buffer: vec![0.0; len],
        }
    }

    /// Add `samples` starting at `offset`. Samples past the end are dropped.
    pub fn add_at(&mut self, offset: usize, samples: impl IntoIterator<Item = f64>) {
        for (slot, s) in self.buffer.iter_mut().skip(offset).zip(samples) {
            *slot += s;
        }
    }

    pub fn output(&self) -> Vec<f64> {
        self.buffer
            .iter()
            .map(|&s| (s * self.master_gain).tanh())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
