use crate::error::{Error, Result};

/// Bit-level reader over an in-memory packed buffer
///
/// Reads bits MSB-first, mirroring [`BitWriter`](super::BitWriter).
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the byte holding the next unread bit
    byte_pos: usize,
    /// Bits already consumed from `data[byte_pos]` (0-7)
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, byte_pos: 0, bit_pos: 0 }
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = *self.data.get(self.byte_pos).ok_or_else(end_of_stream)?;
        let bit = (byte >> (7 - self.bit_pos)) & 1;

        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }

        Ok(bit != 0)
    }

    /// Read `n` bits (0-64) as an MSB-first integer
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        debug_assert!(n <= 64, "Cannot read more than 64 bits at once");

        if (n as u64) > self.bits_remaining() {
            return Err(end_of_stream());
        }

        let mut result = 0u64;
        let mut remaining = n;
        while remaining > 0 {
            let available = 8 - self.bit_pos;
            let to_read = remaining.min(available);

            let byte = self.data[self.byte_pos];
            let shift = available - to_read;
            let mask = ((1u16 << to_read) - 1) as u8;
            let chunk = (byte >> shift) & mask;

            result = (result << to_read) | chunk as u64;
            remaining -= to_read;
            self.bit_pos += to_read;
            if self.bit_pos == 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
        }

        Ok(result)
    }

    /// Number of unread bits, padding included
    pub fn bits_remaining(&self) -> u64 {
        let total = self.data.len() as u64 * 8;
        let consumed = self.byte_pos as u64 * 8 + self.bit_pos as u64;
        total.saturating_sub(consumed)
    }

    /// Get position in bytes (the partially read byte counts as consumed)
    pub fn bytes_consumed(&self) -> usize {
        self.byte_pos + if self.bit_pos > 0 { 1 } else { 0 }
    }

    /// Verify the stream ends here: only zero padding bits may remain in
    /// the current byte, and no whole bytes may follow it.
    pub fn expect_end(&self) -> Result<()> {
        if self.bytes_consumed() != self.data.len() {
            return Err(Error::CorruptBitstream(format!(
                "{} trailing bytes after final token",
                self.data.len() - self.bytes_consumed()
            )));
        }

        if self.bit_pos > 0 {
            let padding_mask = (1u8 << (8 - self.bit_pos)) - 1;
            if self.data[self.byte_pos] & padding_mask != 0 {
                return Err(Error::CorruptBitstream("non-zero padding bits".into()));
            }
        }

        Ok(())
    }
}

fn end_of_stream() -> Error {
    Error::CorruptBitstream("unexpected end of packed content".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits() {
        let data = vec![0b1101_0011, 0xAA];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(3).unwrap(), 0b110);
        assert_eq!(reader.read_bits(5).unwrap(), 0b10011);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);
        assert_eq!(reader.bits_remaining(), 0);
    }

    #[test]
    fn test_read_bit() {
        let data = vec![0b1011_0001];
        let mut reader = BitReader::new(&data);

        let bits: Vec<bool> = (0..8).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(bits, vec![true, false, true, true, false, false, false, true]);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_cross_byte_boundary() {
        let data = vec![0xAB, 0xC0];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
        assert_eq!(reader.bits_remaining(), 4);
    }

    #[test]
    fn test_read_past_end_fails_without_consuming() {
        let data = vec![0xFF];
        let mut reader = BitReader::new(&data);
        reader.read_bits(5).unwrap();

        let err = reader.read_bits(4).unwrap_err();
        assert!(matches!(err, Error::CorruptBitstream(_)));
        assert_eq!(reader.read_bits(3).unwrap(), 0b111);
    }

    #[test]
    fn test_expect_end_accepts_zero_padding() {
        let data = vec![0b1010_0000];
        let mut reader = BitReader::new(&data);
        reader.read_bits(3).unwrap();
        assert!(reader.expect_end().is_ok());
    }

    #[test]
    fn test_expect_end_rejects_dirty_padding() {
        let data = vec![0b1010_0001];
        let mut reader = BitReader::new(&data);
        reader.read_bits(3).unwrap();
        assert!(reader.expect_end().is_err());
    }

    #[test]
    fn test_expect_end_rejects_trailing_bytes() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(&data);
        reader.read_bits(8).unwrap();
        assert!(reader.expect_end().is_err());
    }

    #[test]
    fn test_roundtrip_with_writer() {
        use crate::bits::BitWriter;

        let mut writer = BitWriter::new();
        writer.write_bits(0x5, 3);
        writer.write_bits(4095, 12);
        writer.write_bit(true);
        writer.write_bits(200, 8);
        let packed = writer.finish();

        let mut reader = BitReader::new(&packed);
        assert_eq!(reader.read_bits(3).unwrap(), 0x5);
        assert_eq!(reader.read_bits(12).unwrap(), 4095);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(8).unwrap(), 200);
        assert!(reader.expect_end().is_ok());
    }
}
