use super::tokens::LZ77Token;
use crate::error::{Error, Result};

/// Upper bound on the up-front allocation; larger outputs grow on demand
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Output buffer that reconstructs the original bytes from tokens
///
/// The buffer never grows past the expected size; any token that would
/// overrun it, or reference bytes before the start of output, is reported
/// as a corrupt bitstream.
pub struct OutputWindow {
    data: Vec<u8>,
    expected: usize,
}

impl OutputWindow {
    pub fn new(expected: usize) -> Self {
        Self { data: Vec::with_capacity(expected.min(MAX_PREALLOC)), expected }
    }

    /// Bytes still missing before the output is complete
    #[inline]
    pub fn remaining(&self) -> usize {
        self.expected - self.data.len()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.expected
    }

    /// Append a decoded token
    pub fn push_token(&mut self, token: LZ77Token) -> Result<()> {
        match token {
            LZ77Token::Literal(byte) => self.push_byte(byte),
            LZ77Token::Match { offset, length, next_byte } => {
                self.copy_match(offset as usize, length as usize)?;
                self.push_byte(next_byte)
            }
        }
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        if self.remaining() == 0 {
            return Err(Error::CorruptBitstream("token overruns original size".into()));
        }
        self.data.push(byte);
        Ok(())
    }

    /// Copy `length` bytes starting `offset` bytes back
    ///
    /// Length can exceed offset (run-length case); bytes are copied one at
    /// a time so the source may overlap what is being written.
    fn copy_match(&mut self, offset: usize, length: usize) -> Result<()> {
        if offset == 0 || offset > self.data.len() {
            return Err(Error::CorruptBitstream(format!(
                "back-reference offset {} exceeds {} decoded bytes",
                offset,
                self.data.len()
            )));
        }
        if length == 0 || length >= self.remaining() {
            // A match is always followed by its next byte, so it needs length + 1
            return Err(Error::CorruptBitstream(format!(
                "match of length {} overruns original size ({} bytes left)",
                length,
                self.remaining()
            )));
        }

        let start = self.data.len() - offset;
        if length <= offset {
            self.data.extend_from_within(start..start + length);
        } else {
            for i in 0..length {
                let byte = self.data[start + i];
                self.data.push(byte);
            }
        }
        Ok(())
    }

    /// Finish and return the reconstructed bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.is_complete() {
            return Err(Error::CorruptBitstream(format!(
                "reconstructed {} of {} bytes",
                self.data.len(),
                self.expected
            )));
        }
        Ok(self.data)
    }
}
