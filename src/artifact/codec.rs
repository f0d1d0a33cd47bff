use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::artifact::types::{Artifact, Extensions, FORMAT_VERSION, VideoTrack};
use crate::error::{FormatError, Result};

/// File signature of every format 1.0 artifact
pub const MAGIC: [u8; 8] = *b"SYNTH\x00\x01\x00";

pub const FLAG_VIDEO: u32 = 0x01;
pub const FLAG_SHADER: u32 = 0x02;
const KNOWN_FLAGS: u32 = FLAG_VIDEO | FLAG_SHADER;

const LENGTH_PREFIX: usize = 4;

/// The blocks of a `.synth` file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Analysis,
    VideoSegments,
    Transitions,
    ShaderCurves,
    Style,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Header => "header",
            BlockKind::Analysis => "analysis block",
            BlockKind::VideoSegments => "video segments block",
            BlockKind::Transitions => "transitions block",
            BlockKind::ShaderCurves => "shader curves block",
            BlockKind::Style => "style block",
        };
        f.write_str(name)
    }
}

/// Binary encoder/decoder for `.synth` artifacts.
///
/// Layout, integers little-endian:
///
/// ```text
/// magic[8] flags:u32 (len:u32 payload)* trailing
/// ```
///
/// Payloads are MessagePack maps. The analysis block always comes first and
/// the style block last; the video and shader blocks are present only when
/// their flag bit is set.
pub struct ArtifactCodec;

impl ArtifactCodec {
    pub fn encode(artifact: &Artifact) -> Result<Vec<u8>> {
        let mut flags = artifact.extensions.flags & !KNOWN_FLAGS;
        if artifact.video.is_some() {
            flags |= FLAG_VIDEO;
        }
        if artifact.shader_curves.is_some() {
            flags |= FLAG_SHADER;
        }

        let mut out = Vec::with_capacity(4096);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&flags.to_le_bytes());

        write_block(&mut out, BlockKind::Analysis, &artifact.analysis)?;

        if let Some(video) = &artifact.video {
            write_block(&mut out, BlockKind::VideoSegments, &video.segments)?;
            write_block(&mut out, BlockKind::Transitions, &video.transitions)?;
        }

        if let Some(curves) = &artifact.shader_curves {
            write_block(&mut out, BlockKind::ShaderCurves, curves)?;
        }

        write_block(&mut out, BlockKind::Style, &artifact.style)?;
        out.extend_from_slice(&artifact.extensions.trailing);

        Ok(out)
    }

    /// Decode a complete artifact. Any structural problem fails the whole
    /// decode; no partial artifact is returned.
    pub fn decode(bytes: &[u8]) -> Result<Artifact> {
        let mut reader = BlockReader::new(bytes);

        let magic = reader.take(MAGIC.len(), BlockKind::Header)?;
        if magic != MAGIC {
            return Err(FormatError::BadMagic { found: magic.to_vec() }.into());
        }

        let flags = reader.read_u32(BlockKind::Header)?;

        let analysis = reader.read_block(BlockKind::Analysis)?;

        let video = if flags & FLAG_VIDEO != 0 {
            Some(VideoTrack {
                segments: reader.read_block(BlockKind::VideoSegments)?,
                transitions: reader.read_block(BlockKind::Transitions)?,
            })
        } else {
            None
        };

        let shader_curves = if flags & FLAG_SHADER != 0 {
            Some(reader.read_block(BlockKind::ShaderCurves)?)
        } else {
            None
        };

        let style = reader.read_block(BlockKind::Style)?;

        let trailing = reader.rest().to_vec();
        if !trailing.is_empty() {
            tracing::debug!(
                "Skipping {} unknown trailing block(s) ({} bytes)",
                count_trailing_blocks(&trailing),
                trailing.len()
            );
        }

        Ok(Artifact {
            version: FORMAT_VERSION,
            analysis,
            video,
            shader_curves,
            style,
            extensions: Extensions {
                flags: flags & !KNOWN_FLAGS,
                trailing,
            },
            created_at: None,
        })
    }
}

fn write_block<T: Serialize>(out: &mut Vec<u8>, kind: BlockKind, value: &T) -> Result<()> {
    let payload = rmp_serde::to_vec_named(value).map_err(|e| FormatError::EncodeFailed {
        block: kind.to_string(),
        reason: e.to_string(),
    })?;

    let len = u32::try_from(payload.len()).map_err(|_| FormatError::EncodeFailed {
        block: kind.to_string(),
        reason: format!("payload of {} bytes exceeds the 32-bit length prefix", payload.len()),
    })?;

    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(())
}

/// Number of whole length-prefixed blocks in `bytes`. Stops at the first
/// fragment that is too short to be a block.
fn count_trailing_blocks(bytes: &[u8]) -> usize {
    let mut reader = BlockReader::new(bytes);
    let mut count = 0;
    while reader.remaining() >= LENGTH_PREFIX {
        match reader.read_raw_block(BlockKind::Style) {
            Ok(_) => count += 1,
            Err(_) => break,
        }
    }
    count
}

/// Cursor over an in-memory artifact that never reads past the end
pub struct BlockReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Everything not yet consumed
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn take(&mut self, len: usize, kind: BlockKind) -> std::result::Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(FormatError::Truncated {
                block: kind.to_string(),
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u32(&mut self, kind: BlockKind) -> std::result::Result<u32, FormatError> {
        let raw = self.take(LENGTH_PREFIX, kind)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Length-prefixed payload bytes
    pub fn read_raw_block(&mut self, kind: BlockKind) -> std::result::Result<&'a [u8], FormatError> {
        let declared = self.read_u32(kind)? as usize;
        if declared > self.remaining() {
            return Err(FormatError::LengthOverrun {
                block: kind.to_string(),
                declared,
                remaining: self.remaining(),
            });
        }
        self.take(declared, kind)
    }

    /// Length-prefixed MessagePack payload, decoded
    pub fn read_block<T: DeserializeOwned>(&mut self, kind: BlockKind) -> std::result::Result<T, FormatError> {
        let payload = self.read_raw_block(kind)?;
        rmp_serde::from_slice(payload).map_err(|e| FormatError::DecodeFailed {
            block: kind.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::types::{MusicAnalysis, ShaderCurves, StyleBlock};
    use crate::error::SynthError;

    fn analysis() -> MusicAnalysis {
        MusicAnalysis {
            duration: 2.0,
            sample_rate: 44100,
            audio_hash: "00".repeat(32),
            key: "C".to_string(),
            mode: "major".to_string(),
            key_confidence: 0.9,
            tempo: 120.0,
            tempo_confidence: 0.8,
            beats: vec![0.0, 0.5, 1.0, 1.5],
            downbeats: vec![0.0],
            time_signature: (4, 4),
            chords: vec![],
            sections: vec![],
            climaxes: vec![],
            energy_curve: vec![0.1; 20],
            tension_curve: vec![0.0; 20],
            loudness_curve: vec![],
            emotion_arc: vec![],
            spectral_centroid: None,
            spectral_flux: None,
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = ArtifactCodec::encode(&Artifact::new(analysis())).unwrap();
        assert_eq!(&bytes[..8], &[0x53, 0x59, 0x4E, 0x54, 0x48, 0x00, 0x01, 0x00]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_flags_follow_optional_blocks() {
        let artifact = Artifact::new(analysis()).with_shader_curves(ShaderCurves::from_energy(&[0.5; 4], 10.0));
        let bytes = ArtifactCodec::encode(&artifact).unwrap();
        assert_eq!(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), FLAG_SHADER);

        let decoded = ArtifactCodec::decode(&bytes).unwrap();
        assert!(decoded.video.is_none());
        assert_eq!(decoded.shader_curves, artifact.shader_curves);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = ArtifactCodec::encode(&Artifact::new(analysis())).unwrap();
        bytes[0] = b'X';
        let err = ArtifactCodec::decode(&bytes).unwrap_err();
        assert!(matches!(err, SynthError::Format(FormatError::BadMagic { .. })));
    }

    #[test]
    fn test_short_header() {
        let err = ArtifactCodec::decode(&MAGIC[..5]).unwrap_err();
        assert!(matches!(err, SynthError::Format(FormatError::Truncated { .. })));
    }

    #[test]
    fn test_missing_flagged_block_is_truncation() {
        let artifact = Artifact::new(analysis());
        let mut bytes = ArtifactCodec::encode(&artifact).unwrap();
        // Claim shader curves that are not there: the style block is read
        // as shader curves and the real style block is then missing
        bytes[8] = FLAG_SHADER as u8;
        assert!(ArtifactCodec::decode(&bytes).is_err());
    }

    #[test]
    fn test_length_overrun() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&[0x80]);

        let err = ArtifactCodec::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            SynthError::Format(FormatError::LengthOverrun { declared: 1000, remaining: 1, .. })
        ));
    }

    #[test]
    fn test_undecodable_payload() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.push(0xC1); // never used in MessagePack

        let err = ArtifactCodec::decode(&bytes).unwrap_err();
        assert!(matches!(err, SynthError::Format(FormatError::DecodeFailed { .. })));
    }

    #[test]
    fn test_trailing_blocks_are_kept() {
        let artifact = Artifact::new(analysis()).with_style(StyleBlock::default());
        let mut bytes = ArtifactCodec::encode(&artifact).unwrap();
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0x93, 0x01, 0x02]);
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let decoded = ArtifactCodec::decode(&bytes).unwrap();
        assert_eq!(decoded.analysis, artifact.analysis);
        assert_eq!(decoded.extensions.trailing.len(), 9);
        assert_eq!(ArtifactCodec::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_unknown_flag_bits_survive() {
        let mut bytes = ArtifactCodec::encode(&Artifact::new(analysis())).unwrap();
        bytes[8] |= 0x10;
        let decoded = ArtifactCodec::decode(&bytes).unwrap();
        assert_eq!(decoded.extensions.flags, 0x10);
        assert_eq!(ArtifactCodec::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_trailing_block_count() {
        let mut tail = Vec::new();
        tail.extend_from_slice(&2u32.to_le_bytes());
        tail.extend_from_slice(&[1, 2]);
        tail.extend_from_slice(&0u32.to_le_bytes());
        tail.push(7);
        assert_eq!(count_trailing_blocks(&tail), 2);
    }
}
