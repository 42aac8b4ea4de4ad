use thiserror::Error;

pub type Result<T> = std::result::Result<T, RexError>;

#[derive(Error, Debug)]
pub enum RexError {
    #[error("input too small to hold a chunk header")]
    TooSmall,
    #[error("not a REX2 file: the top-level chunk is not CAT")]
    NotIff,
    #[error("chunk '{tag}' runs past the end of its container")]
    TruncatedChunk { tag: String },
    #[error("no audio: the file carries no decodable SDAT chunk")]
    NoAudio,
    #[error("corrupt DWOP stream: decoded {produced} of {expected} frames")]
    Corrupt { produced: u32, expected: u32 },
    #[error("frame count {frames} exceeds the {limit} frame ceiling")]
    Oversize { frames: u64, limit: u32 },
    #[error("failed to allocate the PCM buffer")]
    OutOfMemory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
}
