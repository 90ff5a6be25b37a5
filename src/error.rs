use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualityError {
    /// Missing start-of-image signature, or no usable DQT segment before the stream ended.
    #[error("Invalid JPEG content")]
    InvalidFormat,
    #[error("Short segment length")]
    MalformedSegment,
    #[error("Wrong size for quantization table: {0} bytes")]
    WrongTableSize(usize),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
