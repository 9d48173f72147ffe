//! Lossless LZ77 + Huffman codec.
//!
//! Input is rewritten as literal/match tokens by a sliding-window match
//! finder, then bit-packed with a Huffman code built over the literal and
//! match next-byte values. The result is a self-describing container:
//!
//! ```text
//! treeSize u32le | originalSize u32le | serialized tree | packed content
//! ```
//!
//! optionally prefixed by a framed preamble carrying a magic number,
//! version, codec parameters and a CRC32 of the original bytes.

pub mod batch;
pub mod bits;
pub mod container;
pub mod error;
pub mod huffman;
pub mod lz77;

pub use container::{
    compress, compress_parts, compress_with_stats, decompress, decompress_parts, inspect,
    CompressedParts, ContainerInfo,
};
pub use error::{Error, Result};
pub use lz77::LZ77Token;

/// Default sliding window size in bytes
pub const DEFAULT_WINDOW_SIZE: u32 = 4096;

/// Largest supported sliding window (16-bit offset field)
pub const MAX_WINDOW_SIZE: u32 = 65536;

/// Default minimum length for a back-reference to be emitted
pub const DEFAULT_MIN_MATCH: u16 = 3;

/// Default maximum back-reference length (8-bit length field)
pub const DEFAULT_MAX_MATCH: u16 = 255;

/// Container layout selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContainerFormat {
    /// Bare 8-byte header, tree and content
    #[default]
    Raw,
    /// Raw container prefixed with magic, version, codec parameters and CRC32
    Framed,
}

impl ContainerFormat {
    /// Detect the layout of an encoded container
    ///
    /// A raw container never starts with the framed magic: its first field
    /// is the serialized tree size, which is far below the magic's value.
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= 4 && data[..4] == container::header::FRAME_MAGIC {
            Self::Framed
        } else {
            Self::Raw
        }
    }
}

/// Codec parameters shared by the encoder and decoder
///
/// Encoder and decoder must agree on `window_size` and `max_match`, since
/// they fix the widths of the packed offset and length fields. The framed
/// format records both and fails fast on a mismatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Sliding window size (1-65536, default: 4096)
    pub window_size: u32,
    /// Shortest run emitted as a match (2..=max_match, default: 3)
    pub min_match: u16,
    /// Longest run emitted as a match (min_match..=65535, default: 255)
    pub max_match: u16,
    /// Container layout written by `compress`
    pub format: ContainerFormat,
}

impl CodecConfig {
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_min_match(mut self, min_match: u16) -> Self {
        self.min_match = min_match;
        self
    }

    pub fn with_max_match(mut self, max_match: u16) -> Self {
        self.max_match = max_match;
        self
    }

    pub fn with_format(mut self, format: ContainerFormat) -> Self {
        self.format = format;
        self
    }

    /// Check every parameter against its valid range
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WINDOW_SIZE).contains(&self.window_size) {
            return Err(Error::InvalidConfig(format!(
                "window size {} outside 1..={}",
                self.window_size, MAX_WINDOW_SIZE
            )));
        }
        if self.min_match < 2 {
            return Err(Error::InvalidConfig(format!(
                "minimum match length {} is below 2",
                self.min_match
            )));
        }
        if self.max_match < self.min_match {
            return Err(Error::InvalidConfig(format!(
                "maximum match length {} is below minimum {}",
                self.max_match, self.min_match
            )));
        }
        Ok(())
    }

    /// Width of the packed match length field
    pub fn length_bits(&self) -> u8 {
        field_width(self.max_match as u32 + 1)
    }

    /// Width of the packed match offset field (stores `offset - 1`)
    pub fn offset_bits(&self) -> u8 {
        field_width(self.window_size)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_match: DEFAULT_MIN_MATCH,
            max_match: DEFAULT_MAX_MATCH,
            format: ContainerFormat::Raw,
        }
    }
}

/// Bits needed to represent every value in `0..count`
fn field_width(count: u32) -> u8 {
    if count <= 1 {
        0
    } else {
        (32 - (count - 1).leading_zeros()) as u8
    }
}

/// Statistics from a compression operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub tree_size: u64,
    pub literal_tokens: u64,
    pub match_tokens: u64,
    pub distinct_symbols: usize,
}

impl CompressionStats {
    /// Compressed size as a fraction of the original (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }
}
