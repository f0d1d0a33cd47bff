//! # Visual Style System
//!
//! Named presets that describe how a track should look when rendered. The
//! chosen style's parameters are written into the artifact's style block, and
//! its transition preferences feed the render plan.
//!
//! ## Built-in Styles
//!
//! - **default**: balanced, works with any music
//! - **neon**: vibrant cyberpunk, flash transitions
//! - **ethereal**: soft and dreamy, long crossfades
//! - **cinematic**: film-like with dramatic lighting
//! - **retro**: 80s synthwave, chromatic splits
//! - **minimal**: clean and understated
//! - **psychedelic**: saturated kaleidoscope visuals
//! - **noir**: black and white with heavy vignette
//!
//! `auto` picks one of these from the dominant emotion of the track.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::emotion::Emotion;
//! use synth_analyzer::styles::StyleRegistry;
//!
//! # fn main() -> synth_analyzer::Result<()> {
//! let registry = StyleRegistry::new();
//! let style = registry.resolve("auto", Emotion::Euphoria)?;
//! let params = style.default_config().into_params();
//! println!("{}: {} parameters", style.name(), params.len());
//! # Ok(())
//! # }
//! ```

pub mod presets;
pub mod registry;
pub mod traits;

pub use presets::PresetStyle;
pub use registry::{style_for_emotion, StyleRegistry, AUTO_STYLE};
pub use traits::{Style, StyleConfig, StyleValue};
