use super::codes::CodeTable;
use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::lz77::LZ77Token;
use crate::CodecConfig;

/// Tag bit preceding a literal token
pub const LITERAL_TAG: bool = false;

/// Tag bit preceding a match token
pub const MATCH_TAG: bool = true;

/// Packs LZ77 tokens into a bitstream
///
/// Per token: a 1-bit tag, then for a literal its Huffman code; for a match
/// the length and `offset - 1` as fixed-width fields followed by the
/// Huffman code of the next byte.
pub struct TokenEncoder<'a> {
    codes: &'a CodeTable,
    length_bits: u8,
    offset_bits: u8,
    max_match: usize,
    window_size: usize,
}

impl<'a> TokenEncoder<'a> {
    pub fn new(config: &CodecConfig, codes: &'a CodeTable) -> Self {
        Self {
            codes,
            length_bits: config.length_bits(),
            offset_bits: config.offset_bits(),
            max_match: config.max_match as usize,
            window_size: config.window_size as usize,
        }
    }

    /// Encode tokens to packed, zero-padded bytes
    pub fn encode(&self, tokens: &[LZ77Token]) -> Result<Vec<u8>> {
        let mut writer = BitWriter::with_capacity(tokens.len());

        for token in tokens {
            match *token {
                LZ77Token::Literal(byte) => {
                    writer.write_bit(LITERAL_TAG);
                    self.write_symbol(&mut writer, byte)?;
                }
                LZ77Token::Match { offset, length, next_byte } => {
                    let (offset, length) = (offset as usize, length as usize);
                    if !(1..=self.max_match).contains(&length)
                        || !(1..=self.window_size).contains(&offset)
                    {
                        return Err(Error::UnsupportedToken { length, offset });
                    }

                    writer.write_bit(MATCH_TAG);
                    writer.write_bits(length as u64, self.length_bits);
                    writer.write_bits(offset as u64 - 1, self.offset_bits);
                    self.write_symbol(&mut writer, next_byte)?;
                }
            }
        }

        Ok(writer.finish())
    }

    fn write_symbol(&self, writer: &mut BitWriter, symbol: u8) -> Result<()> {
        let code = self
            .codes
            .get(symbol)
            .ok_or_else(|| Error::Internal(format!("no Huffman code for symbol {}", symbol)))?;
        writer.write_bits(code.bits, code.len);
        Ok(())
    }
}
