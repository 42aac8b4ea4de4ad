//! WAV export for decoded REX2 audio.

use std::io::{Seek, Write};

use crate::error::Result;
use crate::types::RexFile;

/// Write the decoded loop as a 16-bit integer WAV.
pub fn write_wav<W: Write + Seek>(rex: &RexFile, output: W) -> Result<()> {
    let spec = hound::WavSpec {
        channels: u16::from(rex.channels.max(1)),
        sample_rate: rex.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::new(output, spec)?;
    for &sample in &rex.pcm {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
