use thiserror::Error;

pub type DwopResult<T> = std::result::Result<T, DwopError>;

/// Hard failures while decoding one sample. Running off the end of the
/// bitstream is not one of them; trailing reads yield zero bits.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwopError {
    #[error("unary quotient ran past the safety cap")]
    UnaryLimit,
    #[error("range register collapsed to zero")]
    RangeCollapse,
}
