use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),

    #[error("Input too large: {size} bytes exceeds the 4 GiB container limit")]
    InputTooLarge { size: usize },

    // Encoding errors
    #[error("Unsupported token: length {length}, offset {offset} outside encodable range")]
    UnsupportedToken { length: usize, offset: usize },

    // Container errors
    #[error("Malformed header: need {needed} bytes, only {available} available")]
    MalformedHeader { needed: usize, available: usize },

    #[error("Malformed Huffman tree: {0}")]
    MalformedTree(String),

    #[error("Corrupt bitstream: {0}")]
    CorruptBitstream(String),

    // Framed container errors
    #[error("Invalid container magic: expected 0x{expected:08x}, got 0x{found:08x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u8),

    #[error("Reserved preamble byte must be zero, got {0}")]
    InvalidReserved(u8),

    #[error(
        "Codec configuration mismatch: container has window {container_window}, max match \
         {container_max_match}; decoder has window {decoder_window}, max match {decoder_max_match}"
    )]
    ConfigMismatch {
        container_window: u32,
        container_max_match: u16,
        decoder_window: u32,
        decoder_max_match: u16,
    },

    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the container itself could not be decoded
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MalformedHeader { .. }
                | Error::MalformedTree(_)
                | Error::CorruptBitstream(_)
                | Error::BadMagic { .. }
                | Error::UnsupportedVersion(_)
                | Error::InvalidReserved(_)
                | Error::ConfigMismatch { .. }
                | Error::ChecksumMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
