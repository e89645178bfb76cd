//! Binary pack/unpack codec.
//!
//! A [`PackFormat`] describes a fixed binary layout; [`pack`] serializes a
//! list of values into it and [`unpack`] reads them back.

mod codec;
mod format;

pub use codec::{pack, unpack};
pub use format::{Endianness, PackFormat, PackItem, PackType, MAX_LAYOUT_BYTES};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("unexpected character `{ch}` at position {position} in pack format")]
    UnexpectedChar { ch: char, position: usize },
    #[error("endianness marker `{marker}` at position {position} must lead the pack format")]
    MisplacedEndianness { marker: char, position: usize },
    #[error("invalid repeat count at position {position} in pack format")]
    InvalidCount { position: usize },
    #[error("repeat count at end of pack format has no type code")]
    DanglingCount,
    #[error("pack format describes more than {max} bytes", max = MAX_LAYOUT_BYTES)]
    TooLarge,
    #[error("pack format expects {expected} values, got {got}")]
    ValueCount { expected: usize, got: usize },
    #[error("value {index} cannot be packed as {expected}: got {found}")]
    ValueType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {index} is out of range for {expected}")]
    OutOfRange { index: usize, expected: &'static str },
    #[error("input too short: format needs {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },
    #[error("unpacked {expected} does not fit a 64-bit signed integer")]
    Overflow { expected: &'static str },
}

impl PackError {
    /// True for errors in the format string itself, as opposed to the data.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PackError::UnexpectedChar { .. }
                | PackError::MisplacedEndianness { .. }
                | PackError::InvalidCount { .. }
                | PackError::DanglingCount
                | PackError::TooLarge
        )
    }
}

#[cfg(test)]
mod tests;
