use thiserror::Error;

use super::Type;

/// Error encoding or decoding a DNS packet
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("packet size {0} is outside of 12..=512 bytes")]
    InvalidPacketSize(usize),
    #[error("not enough bytes")]
    NotEnoughBytes,
    #[error("too many bytes")]
    TooManyBytes,
    #[error("compression pointer to offset {0} forms a loop")]
    PointerLoop(usize),
    #[error("label in domain name has unknown label format {0:#04x}")]
    UnknownLabelFormat(u8),
    #[error("empty label in domain name")]
    EmptyLabel,
    #[error("label of {0} bytes exceeds 63 bytes")]
    LabelTooLong(usize),
    #[error("invalid characters encountered while reading label")]
    LabelIsNotAscii,
    #[error("wrong size of RDATA for {typ:?}: expected {expected}, got {actual}")]
    WrongRdataLength {
        typ: Type,
        expected: usize,
        actual: usize,
    },
}
