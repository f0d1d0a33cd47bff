//! # Song Structure Module
//!
//! Segments a track into labelled sections and finds its climaxes.
//!
//! ## Core Features
//!
//! - **Self-Similarity**: cosine similarity between spectral descriptor frames
//! - **Novelty Detection**: checkerboard kernel over the similarity matrix
//! - **Boundaries**: thresholded novelty peaks, snapped to nearby beats
//! - **Sections**: ordered rule table over position, energy and variance
//! - **Climaxes**: peaks of the smoothed energy curve, labelled by section
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::features::FeatureLoader;
//! use synth_analyzer::structure::{BoundaryDetector, SectionClassifier, SimilarityEngine};
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let stream = FeatureLoader::load("song.features.json")?;
//!
//! let engine = SimilarityEngine::default();
//! let ssm = engine.self_similarity(&stream.feature_frames())?;
//! let novelty = engine.novelty(&ssm);
//!
//! let boundaries = BoundaryDetector::default().detect(&novelty, &stream.beats, stream.duration);
//! let sections = SectionClassifier::new().classify(
//!     &boundaries,
//!     &stream.energy_curve,
//!     stream.duration,
//!     stream.tempo,
//! );
//!
//! for section in &sections {
//!     println!("{:>12} {:6.1}s - {:6.1}s", section.section_type, section.start, section.end);
//! }
//! # Ok(())
//! # }
//! ```

pub mod boundaries;
pub mod climax;
pub mod sections;
pub mod similarity;

pub use boundaries::BoundaryDetector;
pub use climax::{ClimaxDetector, ClimaxKind, ClimaxPoint};
pub use sections::{section_at, Section, SectionClassifier, SectionType};
pub use similarity::{SimilarityEngine, SimilarityMatrix};
