use std::io::Cursor;

use byteorder::{BE, ReadBytesExt};
use log::{debug, warn};

use crate::error::{Result, RexError};
use crate::types::{RexFile, Slice, TimeSignature};

/// Ceiling on decoded frames, against pathological SINF counts.
const MAX_FRAMES: u32 = 10_000_000;
/// Slice descriptors kept per file; later SLCE chunks are dropped.
const MAX_SLICES: usize = 256;
/// Container nesting accepted before deeper CAT chunks are skipped. Real
/// files use two or three levels.
const MAX_DEPTH: u32 = 32;

/// Cross-chunk bookkeeping for one walk of the tree.
struct WalkState {
    sdat_done: bool,
    truncated: Option<String>,
}

// Parsing functions

pub(crate) fn parse_rex(data: &[u8], rex: &mut RexFile) -> Result<()> {
    if data.len() < 12 {
        return Err(RexError::TooSmall);
    }
    if &data[0..4] != b"CAT " {
        return Err(RexError::NotIff);
    }

    let mut walk = WalkState {
        sdat_done: false,
        truncated: None,
    };
    walk_chunks(data, rex, &mut walk, 0)?;

    if !walk.sdat_done || rex.frames == 0 {
        return Err(match walk.truncated {
            Some(tag) => RexError::TruncatedChunk { tag },
            None => RexError::NoAudio,
        });
    }

    // A file without SLCE chunks is one slice spanning the whole loop.
    if rex.slices.is_empty() {
        rex.slices.push(Slice {
            offset: 0,
            length: rex.frames,
        });
    }

    // Clamp slice lengths into the decoded buffer, keeping order.
    for slice in &mut rex.slices {
        let end = u64::from(slice.offset) + u64::from(slice.length);
        if end > u64::from(rex.frames) {
            slice.length = if slice.offset < rex.frames {
                rex.frames - slice.offset
            } else {
                0
            };
        }
    }

    Ok(())
}

/// Walk one run of chunks. `data` is bounded by the enclosing container, so
/// a declared length past its end means the container is truncated; whatever
/// was parsed before that point stays valid.
fn walk_chunks(data: &[u8], rex: &mut RexFile, walk: &mut WalkState, depth: u32) -> Result<()> {
    let mut pos = 0usize;
    while pos + 8 <= data.len() {
        let tag: [u8; 4] = data[pos..pos + 4].try_into().unwrap();
        let length = u32::from_be_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body = pos + 8;

        let Some(end) = body.checked_add(length).filter(|&end| end <= data.len()) else {
            let tag = String::from_utf8_lossy(&tag).into_owned();
            warn!("chunk '{tag}' declares {length} bytes past its container, stopping this level");
            walk.truncated.get_or_insert(tag);
            break;
        };
        let payload = &data[body..end];

        match &tag {
            b"CAT " => {
                // Four subtype bytes, then nested chunks.
                if depth >= MAX_DEPTH {
                    warn!("container nested deeper than {MAX_DEPTH} levels, skipping");
                } else if payload.len() >= 4 {
                    walk_chunks(&payload[4..], rex, walk, depth + 1)?;
                }
            }
            b"GLOB" => read_glob(payload, rex)?,
            b"HEAD" => read_head(payload, rex),
            b"SINF" => read_sinf(payload, rex, walk)?,
            b"SLCE" => read_slce(payload, rex)?,
            b"SDAT" => decode_sdat(payload, rex, walk)?,
            _ => debug!("skipping unknown chunk '{}'", String::from_utf8_lossy(&tag)),
        }

        // Payloads are even-padded; the pad byte is not counted in `length`.
        pos = end + (length & 1);
    }
    Ok(())
}

fn read_glob(payload: &[u8], rex: &mut RexFile) -> Result<()> {
    if payload.len() < 20 {
        debug!("GLOB payload of {} bytes is too short, ignoring", payload.len());
        return Ok(());
    }

    // The first four bytes are undocumented; keep them verbatim.
    rex.glob_leader = hex::encode_upper(&payload[0..4]);

    let mut reader = Cursor::new(payload);
    reader.set_position(4);
    rex.bars = reader.read_u16::<BE>()?;
    rex.beats = reader.read_u8()?;
    rex.time_signature = TimeSignature {
        numerator: reader.read_u8()?,
        denominator: reader.read_u8()?,
    };

    reader.set_position(16);
    rex.tempo_bpm = f64::from(reader.read_u32::<BE>()?) / 1000.0;
    Ok(())
}

fn read_head(payload: &[u8], rex: &mut RexFile) {
    if payload.len() < 6 {
        debug!("HEAD payload of {} bytes is too short, ignoring", payload.len());
        return;
    }
    rex.bytes_per_sample = payload[5];
}

fn read_sinf(payload: &[u8], rex: &mut RexFile, walk: &WalkState) -> Result<()> {
    if payload.len() < 10 {
        debug!("SINF payload of {} bytes is too short, ignoring", payload.len());
        return Ok(());
    }

    let mut reader = Cursor::new(payload);
    let channels = reader.read_u8()?;
    reader.set_position(4);
    let sample_rate = reader.read_u16::<BE>()?;
    let frames = reader.read_u32::<BE>()?;

    if sample_rate != 0 {
        rex.sample_rate = u32::from(sample_rate);
    }

    // Channel count and frame count feed the SDAT decode; once the audio is
    // decoded they describe the owned buffer and must not change under it.
    if walk.sdat_done {
        debug!("SINF after SDAT, keeping the decoded layout");
        return Ok(());
    }
    if channels == 1 || channels == 2 {
        rex.channels = channels;
    } else {
        warn!("SINF declares {channels} channels, keeping {}", rex.channels);
    }
    rex.frames = frames;
    Ok(())
}

fn read_slce(payload: &[u8], rex: &mut RexFile) -> Result<()> {
    if payload.len() < 8 {
        debug!("SLCE payload of {} bytes is too short, ignoring", payload.len());
        return Ok(());
    }

    let mut reader = Cursor::new(payload);
    let offset = reader.read_u32::<BE>()?;
    let length = reader.read_u32::<BE>()?;

    // Length 0 or 1 marks a transient, not an audible slice.
    if length <= 1 {
        debug!("dropping transient marker at frame {offset}");
        return Ok(());
    }
    if rex.slices.len() >= MAX_SLICES {
        warn!("slice table full, dropping slice at frame {offset}");
        return Ok(());
    }

    rex.slices.push(Slice { offset, length });
    Ok(())
}

/// Decode the first SDAT payload with the SINF state accumulated so far.
/// Later SDAT chunks are ignored.
fn decode_sdat(payload: &[u8], rex: &mut RexFile, walk: &mut WalkState) -> Result<()> {
    if walk.sdat_done {
        debug!("ignoring a second SDAT chunk");
        return Ok(());
    }
    walk.sdat_done = true;

    let channels = usize::from(rex.channels.max(1));
    let declared = rex.frames;
    // Without a declared length, size for the worst case of the unary code
    // and keep whatever the stream actually yields.
    let frames = if declared > 0 {
        u64::from(declared)
    } else {
        payload.len() as u64 * 2 + 1024
    };
    if frames > u64::from(MAX_FRAMES) {
        return Err(RexError::Oversize {
            frames,
            limit: MAX_FRAMES,
        });
    }

    let samples = frames as usize * channels;
    let mut pcm: Vec<i16> = Vec::new();
    pcm.try_reserve_exact(samples)
        .map_err(|_| RexError::OutOfMemory)?;
    pcm.resize(samples, 0);

    let produced = if channels == 2 {
        dwop::decode_stereo(payload, &mut pcm)
    } else {
        dwop::decode_mono(payload, &mut pcm)
    } as u32;

    if declared > 0 && produced < declared {
        return Err(RexError::Corrupt {
            produced,
            expected: declared,
        });
    }

    pcm.truncate(produced as usize * channels);
    rex.frames = produced;
    rex.pcm = pcm;
    Ok(())
}

// API for instantiating RexFile

impl RexFile {
    /// Parse a REX2 file from a byte buffer. The buffer is only borrowed for
    /// the duration of the call; the returned value owns everything it
    /// needs, including the decoded PCM.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut rex = RexFile {
            sample_rate: 44100,
            channels: 1,
            ..RexFile::default()
        };
        parse_rex(data, &mut rex)?;
        Ok(rex)
    }
}
