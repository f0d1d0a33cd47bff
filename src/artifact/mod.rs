//! # Artifact Module
//!
//! The `.synth` container: a versioned binary file bundling the analysis of a
//! track with optional video records, shader curves and a style block.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::artifact::Artifact;
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let artifact = Artifact::load("song.synth")?;
//! println!("{} sections", artifact.analysis.sections.len());
//!
//! artifact.export_json("song.json")?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod io;
pub mod types;

pub use codec::{ArtifactCodec, BlockKind, BlockReader, FLAG_SHADER, FLAG_VIDEO, MAGIC};
pub use types::{
    Artifact, Extensions, MusicAnalysis, ShaderCurves, StyleBlock,
    TransitionPoint, VideoSegment, VideoTrack, FORMAT_VERSION,
};
