//! Whole-stream decoding entry points.

use crate::bit_reader::BitReader;
use crate::channel::ChannelState;

/// Decode a mono DWOP stream into `out`, one sample per slot.
///
/// Returns the number of samples produced. Decoding stops early when the
/// stream degenerates (unary cap, range collapse); callers that know the
/// declared sample count treat a short return as corruption.
pub fn decode_mono(data: &[u8], out: &mut [i16]) -> usize {
    let mut bits = BitReader::new(data);
    let mut channel = ChannelState::new();

    for (produced, slot) in out.iter_mut().enumerate() {
        match channel.decode_sample(&mut bits) {
            Ok(sample) => *slot = sample,
            Err(_) => return produced,
        }
    }
    out.len()
}

/// Decode a stereo DWOP stream into `out` as interleaved L,R pairs.
///
/// The stream alternates one left sample and one right delta per frame. Both
/// channels keep fully independent predictor state over the shared bit
/// reader; the right sample is reconstructed as L + delta in the 16-bit
/// domain. Returns the number of frames produced.
pub fn decode_stereo(data: &[u8], out: &mut [i16]) -> usize {
    let mut bits = BitReader::new(data);
    let mut left = ChannelState::new();
    let mut right = ChannelState::new();

    let frames = out.len() / 2;
    for frame in 0..frames {
        let Ok(l) = left.decode_sample(&mut bits) else {
            return frame;
        };
        let Ok(delta) = right.decode_sample(&mut bits) else {
            return frame;
        };
        out[frame * 2] = l;
        out[frame * 2 + 1] = l.wrapping_add(delta);
    }
    frames
}
