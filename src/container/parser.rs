use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::encoder::MATCH_TAG;
use crate::huffman::HuffmanDecoder;
use crate::lz77::{LZ77Token, OutputWindow};
use crate::CodecConfig;

/// Unpacks the token stream and reconstructs the original bytes
pub struct ContentParser<'a> {
    bits: BitReader<'a>,
    decoder: &'a HuffmanDecoder,
    length_bits: u8,
    offset_bits: u8,
    max_match: u64,
}

impl<'a> ContentParser<'a> {
    pub fn new(content: &'a [u8], decoder: &'a HuffmanDecoder, config: &CodecConfig) -> Self {
        Self {
            bits: BitReader::new(content),
            decoder,
            length_bits: config.length_bits(),
            offset_bits: config.offset_bits(),
            max_match: config.max_match as u64,
        }
    }

    /// Parse the next token from the bitstream
    pub fn parse_token(&mut self) -> Result<LZ77Token> {
        if self.bits.read_bit()? == MATCH_TAG {
            let length = self.bits.read_bits(self.length_bits)?;
            if length == 0 || length > self.max_match {
                return Err(Error::CorruptBitstream(format!("invalid match length {}", length)));
            }
            let offset = self.bits.read_bits(self.offset_bits)? + 1;
            let next_byte = self.decoder.decode(&mut self.bits)?;

            Ok(LZ77Token::Match { offset: offset as u32, length: length as u16, next_byte })
        } else {
            Ok(LZ77Token::Literal(self.decoder.decode(&mut self.bits)?))
        }
    }

    /// Decode tokens until `original_size` bytes are rebuilt
    ///
    /// The padding in the final byte is not a token boundary, so decoding
    /// stops on the byte count. Anything left after that other than zero
    /// padding is rejected.
    pub fn decode_all(mut self, original_size: usize) -> Result<Vec<u8>> {
        // Every token costs at least a tag bit and a one-bit code
        let max_tokens = self.bits.bits_remaining() / 2;
        let max_output = max_tokens.saturating_mul(self.max_match + 1);
        if original_size as u64 > max_output {
            return Err(Error::CorruptBitstream(format!(
                "{} content bits cannot encode {} bytes",
                self.bits.bits_remaining(),
                original_size
            )));
        }

        let mut window = OutputWindow::new(original_size);
        let mut tokens = 0u64;
        while !window.is_complete() {
            let token = self.parse_token()?;
            window.push_token(token)?;
            tokens += 1;
        }

        self.bits.expect_end()?;
        tracing::trace!(tokens, bytes = original_size, "decoded content");

        window.finish()
    }
}
