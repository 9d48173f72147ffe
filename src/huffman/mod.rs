pub mod codes;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod serialize;
pub mod tree;

pub use codes::{Code, CodeTable};
pub use decoder::HuffmanDecoder;
pub use encoder::TokenEncoder;
pub use frequency::FrequencyCounter;
pub use serialize::{deserialize_tree, serialize_tree};
pub use tree::{HuffmanTree, Node, NodeId};
