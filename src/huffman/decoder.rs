use super::tree::{HuffmanTree, Node};
use crate::bits::BitReader;
use crate::error::{Error, Result};

/// Decodes symbols by walking the tree one bit at a time
pub struct HuffmanDecoder {
    tree: HuffmanTree,
}

impl HuffmanDecoder {
    pub fn new(tree: HuffmanTree) -> Self {
        Self { tree }
    }

    /// Decode next symbol from bitstream
    pub fn decode(&self, bits: &mut BitReader<'_>) -> Result<u8> {
        let mut node = self.tree.node(self.tree.root());

        if let Node::Leaf { symbol } = node {
            // Single-symbol alphabet: the code is the one bit `0`
            if bits.read_bit()? {
                return Err(Error::CorruptBitstream(
                    "invalid code for single-symbol tree".into(),
                ));
            }
            return Ok(symbol);
        }

        loop {
            match node {
                Node::Leaf { symbol } => return Ok(symbol),
                Node::Internal { left, right } => {
                    let next = if bits.read_bit()? { right } else { left };
                    node = self.tree.node(next);
                }
            }
        }
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }
}
