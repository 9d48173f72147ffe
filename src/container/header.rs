use crate::error::{Error, Result};
use crate::CodecConfig;

/// Size of the fixed container header (tree size + original size)
pub const HEADER_SIZE: usize = 8;

/// Magic bytes opening a framed container
pub const FRAME_MAGIC: [u8; 4] = *b"LZHF";

/// Framed container format version
pub const FRAME_VERSION: u8 = 1;

/// Size of the framed preamble preceding the fixed header
pub const FRAME_SIZE: usize = 16;

/// Fixed container header (all fields little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Byte length of the serialized tree
    pub tree_size: u32,
    /// Byte length of the reconstructed output
    pub original_size: u32,
}

impl ContainerHeader {
    /// Parse the header from the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        let buf: [u8; HEADER_SIZE] = data
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::MalformedHeader { needed: HEADER_SIZE, available: data.len() })?;

        Ok(Self {
            tree_size: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            original_size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tree_size.to_le_bytes());
        out.extend_from_slice(&self.original_size.to_le_bytes());
    }
}

/// Framed preamble: magic, version, codec parameters and CRC32
///
/// ```text
/// 0  magic "LZHF"   4  version   5  reserved (0)
/// 6  max_match u16  8  window_size u32  12  crc32 of original u32
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub max_match: u16,
    pub window_size: u32,
    pub crc32: u32,
}

impl FrameHeader {
    pub fn new(config: &CodecConfig, crc32: u32) -> Self {
        Self {
            version: FRAME_VERSION,
            max_match: config.max_match,
            window_size: config.window_size,
            crc32,
        }
    }

    /// Parse the preamble from the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        let buf: [u8; FRAME_SIZE] = data
            .get(..FRAME_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::MalformedHeader { needed: FRAME_SIZE, available: data.len() })?;

        if buf[..4] != FRAME_MAGIC {
            return Err(Error::BadMagic {
                expected: u32::from_le_bytes(FRAME_MAGIC),
                found: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            });
        }

        let version = buf[4];
        if version != FRAME_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        if buf[5] != 0 {
            return Err(Error::InvalidReserved(buf[5]));
        }

        Ok(Self {
            version,
            max_match: u16::from_le_bytes([buf[6], buf[7]]),
            window_size: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            crc32: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&FRAME_MAGIC);
        out.push(self.version);
        out.push(0);
        out.extend_from_slice(&self.max_match.to_le_bytes());
        out.extend_from_slice(&self.window_size.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
    }

    /// Fail unless the decoder's field widths match the encoder's
    pub fn check_config(&self, config: &CodecConfig) -> Result<()> {
        if self.window_size != config.window_size || self.max_match != config.max_match {
            return Err(Error::ConfigMismatch {
                container_window: self.window_size,
                container_max_match: self.max_match,
                decoder_window: config.window_size,
                decoder_max_match: config.max_match,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = ContainerHeader { tree_size: 5, original_size: 0x0102_0304 };
        let mut out = Vec::new();
        header.write(&mut out);
        assert_eq!(out, vec![5, 0, 0, 0, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(ContainerHeader::parse(&out).unwrap(), header);
    }

    #[test]
    fn test_header_too_short() {
        let err = ContainerHeader::parse(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { needed: 8, available: 3 }));
    }

    #[test]
    fn test_frame_layout() {
        let frame = FrameHeader::new(&CodecConfig::default(), 0xDEAD_BEEF);
        let mut out = Vec::new();
        frame.write(&mut out);

        assert_eq!(out.len(), FRAME_SIZE);
        assert_eq!(&out[..4], b"LZHF");
        assert_eq!(out[4], FRAME_VERSION);
        assert_eq!(&out[6..8], &255u16.to_le_bytes());
        assert_eq!(&out[8..12], &4096u32.to_le_bytes());
        assert_eq!(&out[12..16], &0xDEAD_BEEFu32.to_le_bytes());
        assert_eq!(FrameHeader::parse(&out).unwrap(), frame);
    }

    #[test]
    fn test_frame_bad_magic() {
        let mut out = Vec::new();
        FrameHeader::new(&CodecConfig::default(), 0).write(&mut out);
        out[0] = b'X';
        assert!(matches!(FrameHeader::parse(&out), Err(Error::BadMagic { .. })));
    }

    #[test]
    fn test_frame_bad_version() {
        let mut out = Vec::new();
        FrameHeader::new(&CodecConfig::default(), 0).write(&mut out);
        out[4] = 9;
        assert!(matches!(FrameHeader::parse(&out), Err(Error::UnsupportedVersion(9))));
    }

    #[test]
    fn test_frame_reserved_byte() {
        let mut out = Vec::new();
        FrameHeader::new(&CodecConfig::default(), 0).write(&mut out);
        out[5] = 1;
        assert!(matches!(FrameHeader::parse(&out), Err(Error::InvalidReserved(1))));
    }

    #[test]
    fn test_frame_config_mismatch() {
        let frame = FrameHeader::new(&CodecConfig::default(), 0);
        assert!(frame.check_config(&CodecConfig::default()).is_ok());

        let other = CodecConfig::default().with_window_size(1024);
        assert!(matches!(frame.check_config(&other), Err(Error::ConfigMismatch { .. })));

        // min_match only steers the encoder and does not need to agree
        let relaxed = CodecConfig::default().with_min_match(4);
        assert!(frame.check_config(&relaxed).is_ok());
    }
}
