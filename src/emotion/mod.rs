//! # Emotion Mapping Module
//!
//! Places each second of a track on the valence/arousal circumplex and names
//! the resulting emotion.
//!
//! Valence starts from the key and mode, then shifts with the current
//! section, the tension of the sounding chord and high energy. Arousal
//! combines tempo, energy and section. Both are clipped to [-1, 1] and
//! exponentially smoothed over time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synth_analyzer::emotion::{EmotionArcBuilder, EmotionContext};
//!
//! let energy = vec![0.5; 1000];
//! let arc = EmotionArcBuilder::default().build(&EmotionContext {
//!     key: "C",
//!     mode: "major",
//!     tempo: 120.0,
//!     duration: 100.0,
//!     energy: &energy,
//!     sections: &[],
//!     chords: &[],
//! });
//!
//! println!("Dominant emotion: {}", arc.dominant_emotion);
//! ```

pub mod mapper;
pub mod tables;
pub mod types;

pub use mapper::{EmotionArcBuilder, EmotionContext};
pub use types::{dominant_emotion, Emotion, EmotionArc, EmotionPoint};
