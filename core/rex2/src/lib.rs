//! Reader for REX2 sliced-loop files.
//!
//! A REX2 file is an IFF-style tree of big-endian chunks holding loop
//! metadata (tempo, bars, time signature), slice descriptors, and one SDAT
//! chunk whose payload is a DWOP-compressed audio stream. [`RexFile::parse`]
//! walks the tree, decodes the audio to 16-bit PCM and post-processes the
//! slice table so every slice stays inside the decoded buffer.

pub mod error;
pub mod reader;
pub mod types;
pub mod wav;

pub use error::*;
pub use types::*;
