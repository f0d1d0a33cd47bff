//! # Synth Analyzer
//!
//! Turn the low-level features of a music track into a song structure, an
//! emotional arc and a compact `.synth` artifact for a playback engine.
//!
//! The crate consumes a JSON feature document (key, tempo, beats, chords and
//! 10 Hz energy/spectral curves) produced by an external extraction step.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use synth_analyzer::{artifact::Artifact, config::Config, pipeline::AnalysisEngine};
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let engine = AnalysisEngine::new(Config::default());
//! engine.run("song.features.json", "song.synth", None)?;
//!
//! let artifact = Artifact::load("song.synth")?;
//! for section in &artifact.analysis.sections {
//!     println!("{} {:.1}s - {:.1}s", section.section_type, section.start, section.end);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`features`] - Feature document loading and validation
//! - [`structure`] - Self-similarity, boundaries, sections and climaxes
//! - [`emotion`] - Valence/arousal arc and categorical emotions
//! - [`artifact`] - The binary `.synth` container
//! - [`styles`] - Visual style presets for the style block
//! - [`render`] - Hints for, and records from, the video renderer
//! - [`pipeline`] - Single-track engine and parallel batch runner
//! - [`config`] - Configuration management

pub mod artifact;
pub mod config;
pub mod emotion;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod structure;
pub mod styles;

// Re-export commonly used types for convenience
pub use crate::{
    artifact::{Artifact, ArtifactCodec},
    config::Config,
    error::{Result, SynthError},
    pipeline::{AnalysisEngine, BatchRunner},
    styles::{Style, StyleRegistry},
};
