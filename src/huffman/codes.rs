use super::tree::{HuffmanTree, Node};
use crate::error::{Error, Result};

/// Longest code the table can hold
pub const MAX_CODE_LENGTH: u8 = 64;

/// A Huffman code: `len` bits of `bits`, most significant first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

/// Symbol to code mapping, read-only once built
#[derive(Clone, Debug)]
pub struct CodeTable {
    /// Indexed by symbol; `len == 0` marks a symbol with no code
    codes: [Code; 256],
}

impl CodeTable {
    /// Assign codes by walking the tree: `0` for left, `1` for right
    ///
    /// A lone leaf root gets the one-bit code `0` so every token still
    /// occupies at least one bit in the packed stream.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = [Code::default(); 256];

        if let Node::Leaf { symbol } = tree.node(tree.root()) {
            codes[symbol as usize] = Code { bits: 0, len: 1 };
            return Ok(Self { codes });
        }

        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((id, code)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol } => {
                    codes[symbol as usize] = code;
                }
                Node::Internal { left, right } => {
                    if code.len == MAX_CODE_LENGTH {
                        return Err(Error::Internal(format!(
                            "Huffman code exceeds {} bits",
                            MAX_CODE_LENGTH
                        )));
                    }
                    let len = code.len + 1;
                    stack.push((right, Code { bits: (code.bits << 1) | 1, len }));
                    stack.push((left, Code { bits: code.bits << 1, len }));
                }
            }
        }

        Ok(Self { codes })
    }

    /// Code for `symbol`, if it has one
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<Code> {
        let code = self.codes[symbol as usize];
        (code.len > 0).then_some(code)
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.len > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
