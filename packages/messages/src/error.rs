//! Error types for wire-format encoding and decoding

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("Incorrect payload prefix: expected 0x{expected}, got 0x{got}")]
    IncorrectPrefix { expected: String, got: String },

    #[error("Unexpected end of payload: need {need} bytes at offset {offset}, have {have}")]
    UnexpectedEnd {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("Trailing bytes after payload: {count}")]
    TrailingBytes { count: usize },

    #[error("Payload too long for a u16 length field: {len}")]
    PayloadTooLong { len: usize },

    #[error("Trimmed amount does not fit in 64 bits")]
    AmountOverflow,

    #[error("Untrimmed amount does not fit in 128 bits")]
    UntrimOverflow,
}
