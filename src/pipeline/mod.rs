//! # Analysis Pipeline
//!
//! Drives the stages end to end: feature loading, structure detection,
//! emotion mapping and artifact assembly for one track, and a parallel batch
//! runner on top of that.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::{config::Config, pipeline::AnalysisEngine};
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let engine = AnalysisEngine::new(Config::default());
//! let artifact = engine.run("song.features.json", "song.synth", None)?;
//! println!("Style: {}", artifact.style.name);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod engine;

pub use batch::{artifact_path, BatchReport, BatchRunner};
pub use engine::{AnalysisEngine, StructureResult};
