use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionArc, EmotionPoint};
use crate::features::Chord;
use crate::structure::{ClimaxPoint, Section};
use crate::styles::StyleValue;

/// Format version carried in the magic bytes (major, minor)
pub const FORMAT_VERSION: (u8, u8) = (1, 0);

/// Complete analysis of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicAnalysis {
    pub duration: f64,
    pub sample_rate: u32,

    /// SHA-256 hex digest of the source audio
    pub audio_hash: String,

    pub key: String,
    pub mode: String,
    pub key_confidence: f64,

    pub tempo: f64,
    pub tempo_confidence: f64,
    pub beats: Vec<f64>,
    pub downbeats: Vec<f64>,
    pub time_signature: (u32, u32),

    pub chords: Vec<Chord>,

    pub sections: Vec<Section>,
    pub climaxes: Vec<ClimaxPoint>,

    /// 10 Hz curves
    pub energy_curve: Vec<f64>,
    pub tension_curve: Vec<f64>,
    pub loudness_curve: Vec<f64>,

    pub emotion_arc: Vec<EmotionPoint>,

    #[serde(default)]
    pub spectral_centroid: Option<Vec<f64>>,
    #[serde(default)]
    pub spectral_flux: Option<Vec<f64>>,
}

impl MusicAnalysis {
    /// Emotion arc with its summary statistics
    pub fn emotion_summary(&self) -> EmotionArc {
        EmotionArc::from_points(self.emotion_arc.clone())
    }
}

/// A pre-rendered video segment, as supplied by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    pub segment_id: u32,
    pub start_time: f64,
    pub end_time: f64,

    /// Path of the clip, relative to the artifact
    pub video_path: String,
    pub mood: String,
    pub clarity_level: f64,

    pub base_hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub motion_speed: f64,
}

/// A transition between two segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPoint {
    pub time: f64,
    pub from_segment: u32,
    pub to_segment: u32,
    pub transition_type: String,
    pub duration: f64,
}

/// Video records, stored as a pair of blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoTrack {
    pub segments: Vec<VideoSegment>,
    pub transitions: Vec<TransitionPoint>,
}

/// Shader parameter animation curves, sampled at 10 Hz
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShaderCurves {
    pub times: Vec<f64>,
    pub bloom_intensity: Vec<f64>,
    pub chromatic_amount: Vec<f64>,
    pub vignette_strength: Vec<f64>,
    pub grain_amount: Vec<f64>,
    pub color_shift: Vec<f64>,
}

impl ShaderCurves {
    /// Default curves driven by the energy curve
    pub fn from_energy(energy: &[f64], frame_rate: f64) -> Self {
        Self {
            times: (0..energy.len()).map(|i| i as f64 / frame_rate).collect(),
            bloom_intensity: energy.iter().map(|e| e * 0.5).collect(),
            chromatic_amount: energy.iter().map(|e| e * 0.02).collect(),
            vignette_strength: vec![0.3; energy.len()],
            grain_amount: energy.iter().map(|e| (0.1 - e * 0.1).max(0.0)).collect(),
            color_shift: vec![0.0; energy.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// The style block: a style name and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleBlock {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, StyleValue>,
}

impl Default for StyleBlock {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            params: BTreeMap::new(),
        }
    }
}

/// Content written by newer writers that this version does not interpret
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extensions {
    /// Flag bits other than video and shader curves
    pub flags: u32,

    /// Raw bytes following the style block
    pub trailing: Vec<u8>,
}

impl Extensions {
    pub fn is_empty(&self) -> bool {
        self.flags == 0 && self.trailing.is_empty()
    }
}

/// Everything stored in a `.synth` file
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub version: (u8, u8),
    pub analysis: MusicAnalysis,
    pub video: Option<VideoTrack>,
    pub shader_curves: Option<ShaderCurves>,
    pub style: StyleBlock,
    pub extensions: Extensions,

    /// RFC 3339 creation time; not part of the binary encoding
    pub created_at: Option<String>,
}

impl Artifact {
    pub fn new(analysis: MusicAnalysis) -> Self {
        Self {
            version: FORMAT_VERSION,
            analysis,
            video: None,
            shader_curves: None,
            style: StyleBlock::default(),
            extensions: Extensions::default(),
            created_at: None,
        }
    }

    pub fn with_shader_curves(mut self, curves: ShaderCurves) -> Self {
        self.shader_curves = Some(curves);
        self
    }

    pub fn with_style(mut self, style: StyleBlock) -> Self {
        self.style = style;
        self
    }

    /// New artifact carrying the renderer's records verbatim. An empty
    /// segment list clears the video blocks.
    pub fn with_video(&self, segments: Vec<VideoSegment>, transitions: Vec<TransitionPoint>) -> Self {
        let video = if segments.is_empty() {
            None
        } else {
            Some(VideoTrack { segments, transitions })
        };

        Self { video, ..self.clone() }
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn has_shader_curves(&self) -> bool {
        self.shader_curves.is_some()
    }

    pub fn video_segments(&self) -> &[VideoSegment] {
        self.video.as_ref().map(|v| v.segments.as_slice()).unwrap_or(&[])
    }

    pub fn transitions(&self) -> &[TransitionPoint] {
        self.video.as_ref().map(|v| v.transitions.as_slice()).unwrap_or(&[])
    }
}
