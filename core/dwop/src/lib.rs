//! Decoder for the DWOP lossless audio codec found inside REX2 files.
//!
//! DWOP drives five cascaded linear predictors, selects among them with a
//! running energy metric, and codes each residual as a unary quotient plus an
//! adaptive range-coded remainder. State carries across samples, so small
//! decoding mistakes diverge quickly; every constant here is wire contract.

pub mod bit_reader;
pub mod channel;
pub mod error;
pub mod stream;

pub use bit_reader::*;
pub use channel::*;
pub use error::*;
pub use stream::*;
