use serde::{Deserialize, Serialize};

/// One contiguous segment of the decoded loop, in frames.
///
/// After parsing, `offset + length` never exceeds the file's frame count.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub offset: u32,
    pub length: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

/// A fully parsed REX2 file: loop metadata, the slice table and the decoded
/// PCM buffer, which this value exclusively owns. Stereo PCM is interleaved
/// L,R,L,R. Dropping the value releases the buffer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RexFile {
    pub sample_rate: u32,
    pub channels: u8,
    pub bytes_per_sample: u8,
    pub tempo_bpm: f64,
    pub time_signature: TimeSignature,
    pub bars: u16,
    pub beats: u8,
    /// Decoded frame count. One frame is one sample in mono, an L,R pair in
    /// stereo.
    pub frames: u32,
    pub slices: Vec<Slice>,
    /// Undocumented GLOB leader bytes, kept verbatim as hex.
    pub glob_leader: String,
    #[serde(skip)]
    pub pcm: Vec<i16>,
}

impl RexFile {
    /// Total sample count of the PCM buffer, `frames * channels`.
    pub fn frame_samples(&self) -> usize {
        self.frames as usize * usize::from(self.channels.max(1))
    }

    /// The interleaved samples covered by slice `index`, or `None` for an
    /// out-of-range index.
    pub fn slice_samples(&self, index: usize) -> Option<&[i16]> {
        let slice = self.slices.get(index)?;
        let channels = usize::from(self.channels.max(1));
        let start = slice.offset as usize * channels;
        let end = start + slice.length as usize * channels;
        self.pcm.get(start..end)
    }
}
