/// Represents a single token in the LZ77 stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LZ77Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `offset` bytes back, then
    /// emit `next_byte`
    Match { offset: u32, length: u16, next_byte: u8 },
}

impl LZ77Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            LZ77Token::Literal(_) => 1,
            LZ77Token::Match { length, .. } => *length as usize + 1,
        }
    }

    /// The byte value that is entropy coded for this token
    pub fn coded_symbol(&self) -> u8 {
        match self {
            LZ77Token::Literal(byte) => *byte,
            LZ77Token::Match { next_byte, .. } => *next_byte,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, LZ77Token::Match { .. })
    }
}

/// Total uncompressed size of a token sequence
pub fn uncompressed_size(tokens: &[LZ77Token]) -> usize {
    tokens.iter().map(|t| t.uncompressed_size()).sum()
}
