use crate::lz77::LZ77Token;

/// Symbol frequencies for Huffman code generation
///
/// Only the entropy-coded byte of each token is counted: the literal byte,
/// or a match's next byte. Match lengths and offsets are packed as
/// fixed-width fields and never enter the code space.
#[derive(Clone, Debug)]
pub struct FrequencyCounter {
    counts: [u64; 256],
    /// Symbols in order of first appearance
    order: Vec<u8>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self { counts: [0; 256], order: Vec::new() }
    }

    /// Count frequencies from tokens
    pub fn count_tokens(&mut self, tokens: &[LZ77Token]) {
        for token in tokens {
            self.add(token.coded_symbol());
        }
    }

    #[inline]
    pub fn add(&mut self, symbol: u8) {
        let count = &mut self.counts[symbol as usize];
        if *count == 0 {
            self.order.push(symbol);
        }
        *count += 1;
    }

    /// Occurrences of `symbol` (0 if never seen)
    pub fn frequency(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Every symbol seen at least once, with its count, in first-appearance order
    pub fn entries(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.order.iter().map(move |&sym| (sym, self.counts[sym as usize]))
    }

    pub fn distinct_symbols(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}
