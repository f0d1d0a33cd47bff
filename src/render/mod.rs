//! # Render Planning Module
//!
//! The boundary with the external video renderer. The analyzer hands out
//! [`RenderHints`] describing each section and the emotion arc, and accepts
//! back [`RendererRecords`] (video segments plus transitions) which are stored
//! in the artifact unchanged.
//!
//! When no renderer is involved, [`RenderPlanner::plan`] produces procedural
//! records with the same shape.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::artifact::Artifact;
//! use synth_analyzer::render::RenderPlanner;
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let artifact = Artifact::load("song.synth")?;
//! let planner = RenderPlanner::default();
//!
//! planner.hints(&artifact.analysis).save("song.hints.json")?;
//!
//! let with_video = planner.plan(&artifact.analysis).attach_to(&artifact);
//! with_video.save("song.synth")?;
//! # Ok(())
//! # }
//! ```

pub mod hints;
pub mod planner;

pub use hints::{EmotionHint, RenderHints, SectionHint};
pub use planner::{RenderPlanner, RendererRecords};
