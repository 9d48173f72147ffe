use super::tree::{HuffmanTree, Node, NodeId};
use crate::error::{Error, Result};

/// Flag byte for an internal node
pub const INTERNAL_FLAG: u8 = 0;

/// Flag byte for a leaf, followed by its symbol byte
pub const LEAF_FLAG: u8 = 1;

/// Serialize a tree in preorder: `1 symbol` per leaf, `0` per internal node
pub fn serialize_tree(tree: &HuffmanTree) -> Vec<u8> {
    let mut out = Vec::with_capacity(tree.node_count() * 2);
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        match tree.node(id) {
            Node::Leaf { symbol } => {
                out.push(LEAF_FLAG);
                out.push(symbol);
            }
            Node::Internal { left, right } => {
                out.push(INTERNAL_FLAG);
                stack.push(right);
                stack.push(left);
            }
        }
    }

    out
}

/// Rebuild a tree from its preorder serialization
///
/// The tree must end exactly at the end of `data`.
pub fn deserialize_tree(data: &[u8]) -> Result<HuffmanTree> {
    if data.is_empty() {
        return Err(Error::MalformedTree("empty tree".into()));
    }

    let mut nodes: Vec<Node> = Vec::new();
    // Internal nodes still waiting for children: (node, children attached)
    let mut pending: Vec<(NodeId, u8)> = Vec::new();
    let mut pos = 0;

    loop {
        let flag = *data.get(pos).ok_or_else(|| truncated(pos))?;
        pos += 1;

        let node = match flag {
            LEAF_FLAG => {
                let symbol = *data.get(pos).ok_or_else(|| truncated(pos))?;
                pos += 1;
                Node::Leaf { symbol }
            }
            INTERNAL_FLAG => Node::Internal { left: 0, right: 0 },
            other => {
                return Err(Error::MalformedTree(format!(
                    "invalid flag byte {} at offset {}",
                    other,
                    pos - 1
                )))
            }
        };
        let id = nodes.len();
        nodes.push(node);

        if let Some((parent, attached)) = pending.last_mut() {
            if let Node::Internal { left, right } = &mut nodes[*parent] {
                if *attached == 0 {
                    *left = id;
                } else {
                    *right = id;
                }
            }
            *attached += 1;
        }
        while matches!(pending.last(), Some(&(_, 2))) {
            pending.pop();
        }

        if flag == INTERNAL_FLAG {
            pending.push((id, 0));
        }
        if pending.is_empty() {
            break;
        }
    }

    if pos != data.len() {
        return Err(Error::MalformedTree(format!(
            "tree ends at byte {} but {} bytes were declared",
            pos,
            data.len()
        )));
    }

    Ok(HuffmanTree::from_parts(nodes, 0))
}

fn truncated(pos: usize) -> Error {
    Error::MalformedTree(format!("ran out of bytes at offset {}", pos))
}
