//! Container assembly and parsing: the codec's two entry points.

pub mod header;
pub mod parser;

pub use header::{ContainerHeader, FrameHeader, FRAME_MAGIC, FRAME_SIZE, HEADER_SIZE};
pub use parser::ContentParser;

use crate::error::{Error, Result};
use crate::huffman::{
    deserialize_tree, serialize_tree, CodeTable, FrequencyCounter, HuffmanDecoder, HuffmanTree,
    TokenEncoder,
};
use crate::lz77::MatchFinder;
use crate::{CodecConfig, CompressionStats, ContainerFormat};

/// The three parts of a container, before header assembly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedParts {
    /// Preorder-serialized Huffman tree (empty for empty input)
    pub tree: Vec<u8>,
    /// Packed token bitstream
    pub content: Vec<u8>,
    /// Length of the original input
    pub original_size: u32,
}

/// Container metadata read without decoding the content
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerInfo {
    pub format: ContainerFormat,
    pub frame: Option<FrameHeader>,
    pub header: ContainerHeader,
    /// Number of leaves in the serialized tree
    pub leaf_count: usize,
    pub content_size: usize,
}

/// Compress `input` into a container laid out per `config.format`
pub fn compress(input: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    compress_with_stats(input, config).map(|(container, _)| container)
}

/// Compress `input`, also returning statistics about the encoding
pub fn compress_with_stats(
    input: &[u8],
    config: &CodecConfig,
) -> Result<(Vec<u8>, CompressionStats)> {
    let (parts, mut stats) = encode(input, config)?;

    let frame_len = match config.format {
        ContainerFormat::Raw => 0,
        ContainerFormat::Framed => FRAME_SIZE,
    };
    let mut out =
        Vec::with_capacity(frame_len + HEADER_SIZE + parts.tree.len() + parts.content.len());

    if config.format == ContainerFormat::Framed {
        FrameHeader::new(config, crc32fast::hash(input)).write(&mut out);
    }

    let header =
        ContainerHeader { tree_size: parts.tree.len() as u32, original_size: parts.original_size };
    header.write(&mut out);
    out.extend_from_slice(&parts.tree);
    out.extend_from_slice(&parts.content);

    stats.compressed_size = out.len() as u64;
    tracing::debug!(
        original = stats.original_size,
        compressed = stats.compressed_size,
        tree = stats.tree_size,
        literals = stats.literal_tokens,
        matches = stats.match_tokens,
        symbols = stats.distinct_symbols,
        format = ?config.format,
        "compressed buffer"
    );

    Ok((out, stats))
}

/// Compress `input` into its tree, content and size parts
pub fn compress_parts(input: &[u8], config: &CodecConfig) -> Result<CompressedParts> {
    encode(input, config).map(|(parts, _)| parts)
}

/// Match finder -> frequency model -> tree -> codes -> packer
fn encode(input: &[u8], config: &CodecConfig) -> Result<(CompressedParts, CompressionStats)> {
    config.validate()?;

    let original_size =
        u32::try_from(input.len()).map_err(|_| Error::InputTooLarge { size: input.len() })?;

    let tokens = MatchFinder::new(config).find_tokens(input);

    let mut frequencies = FrequencyCounter::new();
    frequencies.count_tokens(&tokens);

    let match_tokens = tokens.iter().filter(|t| t.is_match()).count() as u64;
    let mut stats = CompressionStats {
        original_size: input.len() as u64,
        literal_tokens: tokens.len() as u64 - match_tokens,
        match_tokens,
        distinct_symbols: frequencies.distinct_symbols(),
        ..Default::default()
    };

    // Empty input has no symbols, hence no tree and no content
    let Some(tree) = HuffmanTree::build(&frequencies) else {
        return Ok((CompressedParts { tree: Vec::new(), content: Vec::new(), original_size }, stats));
    };

    let codes = CodeTable::from_tree(&tree)?;
    let tree_bytes = serialize_tree(&tree);
    drop(tree);

    let content = TokenEncoder::new(config, &codes).encode(&tokens)?;
    stats.tree_size = tree_bytes.len() as u64;

    Ok((CompressedParts { tree: tree_bytes, content, original_size }, stats))
}

/// Decompress a container, detecting raw or framed layout
///
/// `config` must carry the same window size and maximum match length the
/// container was written with. Framed containers record both and are
/// checked; raw containers are trusted.
pub fn decompress(container: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    config.validate()?;

    let (frame, body) = split_frame(container)?;
    if let Some(frame) = &frame {
        frame.check_config(config)?;
    }

    let (header, tree, content) = split_body(body)?;
    let output = decompress_parts(tree, content, header.original_size, config)?;

    if let Some(frame) = frame {
        let found = crc32fast::hash(&output);
        if found != frame.crc32 {
            return Err(Error::ChecksumMismatch { expected: frame.crc32, found });
        }
    }

    tracing::debug!(
        container = container.len(),
        tree = header.tree_size,
        original = header.original_size,
        framed = frame.is_some(),
        "decompressed buffer"
    );

    Ok(output)
}

/// Decompress from separate tree, content and size parts
pub fn decompress_parts(
    tree: &[u8],
    content: &[u8],
    original_size: u32,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    config.validate()?;

    if original_size == 0 {
        if !tree.is_empty() {
            return Err(Error::MalformedTree("tree present for empty output".into()));
        }
        if !content.is_empty() {
            return Err(Error::CorruptBitstream(format!(
                "{} content bytes for empty output",
                content.len()
            )));
        }
        return Ok(Vec::new());
    }

    if tree.is_empty() {
        return Err(Error::MalformedTree("missing tree for non-empty output".into()));
    }

    let decoder = HuffmanDecoder::new(deserialize_tree(tree)?);
    ContentParser::new(content, &decoder, config).decode_all(original_size as usize)
}

/// Read container metadata and validate the tree without decoding content
pub fn inspect(container: &[u8]) -> Result<ContainerInfo> {
    let (frame, body) = split_frame(container)?;
    let (header, tree, content) = split_body(body)?;

    let leaf_count =
        if tree.is_empty() { 0 } else { deserialize_tree(tree)?.leaf_symbols().len() };

    Ok(ContainerInfo {
        format: if frame.is_some() { ContainerFormat::Framed } else { ContainerFormat::Raw },
        frame,
        header,
        leaf_count,
        content_size: content.len(),
    })
}

/// Strip the framed preamble if present
fn split_frame(container: &[u8]) -> Result<(Option<FrameHeader>, &[u8])> {
    match ContainerFormat::detect(container) {
        ContainerFormat::Framed => {
            let frame = FrameHeader::parse(container)?;
            Ok((Some(frame), &container[FRAME_SIZE..]))
        }
        ContainerFormat::Raw => Ok((None, container)),
    }
}

/// Split a raw container into header, tree bytes and content bytes
fn split_body(body: &[u8]) -> Result<(ContainerHeader, &[u8], &[u8])> {
    let header = ContainerHeader::parse(body)?;

    let tree_end = HEADER_SIZE as u64 + header.tree_size as u64;
    if tree_end > body.len() as u64 {
        return Err(Error::MalformedHeader {
            needed: tree_end as usize,
            available: body.len(),
        });
    }
    let tree_end = tree_end as usize;

    Ok((header, &body[HEADER_SIZE..tree_end], &body[tree_end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let config = CodecConfig::default();
        let container = compress(b"", &config).unwrap();
        assert_eq!(container, vec![0u8; 8]);
        assert!(decompress(&container, &config).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_small() {
        let config = CodecConfig::default();
        let data = b"Hello, World! Hello, World!";
        let container = compress(data, &config).unwrap();
        assert_eq!(decompress(&container, &config).unwrap(), data);
    }

    #[test]
    fn test_header_fields() {
        let config = CodecConfig::default();
        let data = b"abcabcabcabc";
        let parts = compress_parts(data, &config).unwrap();
        let container = compress(data, &config).unwrap();

        let header = ContainerHeader::parse(&container).unwrap();
        assert_eq!(header.tree_size as usize, parts.tree.len());
        assert_eq!(header.original_size, data.len() as u32);
        assert_eq!(&container[8..8 + parts.tree.len()], parts.tree.as_slice());
        assert_eq!(&container[8 + parts.tree.len()..], parts.content.as_slice());
    }

    #[test]
    fn test_parts_roundtrip() {
        let config = CodecConfig::default();
        let data = b"to be or not to be, that is the question";
        let parts = compress_parts(data, &config).unwrap();
        let out =
            decompress_parts(&parts.tree, &parts.content, parts.original_size, &config).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_tree_size_past_end() {
        let mut container = compress(b"some data here", &CodecConfig::default()).unwrap();
        container[0..4].copy_from_slice(&10_000u32.to_le_bytes());
        let err = decompress(&container, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }

    #[test]
    fn test_missing_tree() {
        let config = CodecConfig::default();
        let err = decompress_parts(&[], &[0xFF], 4, &config).unwrap_err();
        assert!(matches!(err, Error::MalformedTree(_)));
    }

    #[test]
    fn test_content_for_empty_output() {
        let config = CodecConfig::default();
        let err = decompress_parts(&[], &[0x00], 0, &config).unwrap_err();
        assert!(matches!(err, Error::CorruptBitstream(_)));
    }

    #[test]
    fn test_framed_roundtrip_and_crc() {
        let config = CodecConfig::default().with_format(ContainerFormat::Framed);
        let data = b"framed framed framed framed";
        let container = compress(data, &config).unwrap();
        assert_eq!(&container[..4], b"LZHF");
        assert_eq!(decompress(&container, &config).unwrap(), data);

        let frame = FrameHeader::parse(&container).unwrap();
        assert_eq!(frame.crc32, crc32fast::hash(data));
    }

    #[test]
    fn test_framed_checksum_mismatch() {
        let config = CodecConfig::default().with_format(ContainerFormat::Framed);
        let mut container = compress(b"checksummed payload", &config).unwrap();
        container[12] ^= 0xFF;
        let err = decompress(&container, &config).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_framed_config_mismatch() {
        let config = CodecConfig::default().with_format(ContainerFormat::Framed);
        let container = compress(b"payload payload payload", &config).unwrap();
        let other = CodecConfig::default().with_window_size(512);
        let err = decompress(&container, &other).unwrap_err();
        assert!(matches!(err, Error::ConfigMismatch { .. }));
    }

    #[test]
    fn test_stats() {
        let config = CodecConfig::default();
        let data = b"abcabcabcabcabcabc";
        let (container, stats) = compress_with_stats(data, &config).unwrap();

        assert_eq!(stats.original_size, data.len() as u64);
        assert_eq!(stats.compressed_size, container.len() as u64);
        assert_eq!(stats.literal_tokens, 3);
        assert_eq!(stats.match_tokens, 1);
        assert_eq!(stats.distinct_symbols, 3);
    }

    #[test]
    fn test_inspect() {
        let config = CodecConfig::default().with_format(ContainerFormat::Framed);
        let data = b"inspect me, inspect me";
        let container = compress(data, &config).unwrap();

        let info = inspect(&container).unwrap();
        assert_eq!(info.format, ContainerFormat::Framed);
        assert_eq!(info.header.original_size, data.len() as u32);
        assert!(info.leaf_count > 0);
        assert_eq!(
            FRAME_SIZE + HEADER_SIZE + info.header.tree_size as usize + info.content_size,
            container.len()
        );
    }
}
