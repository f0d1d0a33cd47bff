//! # Feature Input Module
//!
//! Reads the feature documents produced by the extraction step. A document
//! carries everything the analysis needs for one track: duration, key, mode,
//! tempo, beats, chords and a set of curves sampled at a fixed 10 Hz.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::features::FeatureLoader;
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let stream = FeatureLoader::load("song.features.json")?;
//! println!("{} frames, {} beats", stream.frame_count(), stream.beats.len());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod types;

pub use loader::FeatureLoader;
pub use types::{
    Chord, FeatureFrame, FeatureStream, SpectralCurves,
    BEATS_PER_BAR, FEATURE_WIDTH, FRAME_RATE,
};
