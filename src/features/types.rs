use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sample rate of every feature curve, in frames per second
pub const FRAME_RATE: f64 = 10.0;

/// Number of descriptors in a [`FeatureFrame`]
pub const FEATURE_WIDTH: usize = 4;

/// Beats per bar assumed when downbeats are not supplied
pub const BEATS_PER_BAR: usize = 4;

/// Spectral descriptors for one 10 Hz frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureFrame {
    /// Frame time in seconds
    pub time: f64,

    descriptor: [f64; FEATURE_WIDTH],
}

impl FeatureFrame {
    pub fn new(time: f64, centroid: f64, rolloff: f64, flux: f64, rms: f64) -> Self {
        Self {
            time,
            descriptor: [centroid, rolloff, flux, rms],
        }
    }

    pub fn centroid(&self) -> f64 {
        self.descriptor[0]
    }

    pub fn rolloff(&self) -> f64 {
        self.descriptor[1]
    }

    pub fn flux(&self) -> f64 {
        self.descriptor[2]
    }

    pub fn rms(&self) -> f64 {
        self.descriptor[3]
    }
}

impl AsRef<[f64]> for FeatureFrame {
    fn as_ref(&self) -> &[f64] {
        &self.descriptor
    }
}

/// A chord event from the extraction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Start time in seconds
    pub time: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Chord label, e.g. "Am7" or "F#dim"
    #[serde(rename = "chord")]
    pub name: String,

    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
}

impl Chord {
    /// Whether the chord sounds at `time`
    pub fn contains(&self, time: f64) -> bool {
        self.time <= time && time < self.time + self.duration
    }
}

/// Spectral curves, all sampled at [`FRAME_RATE`] and aligned with the energy curve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralCurves {
    pub centroid: Vec<f64>,
    pub rolloff: Vec<f64>,
    pub flux: Vec<f64>,
    pub rms: Vec<f64>,
}

impl SpectralCurves {
    /// Number of frames (length of the centroid curve)
    pub fn len(&self) -> usize {
        self.centroid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroid.is_empty()
    }
}

/// Everything the extraction step supplies for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStream {
    /// Track duration in seconds
    pub duration: f64,

    /// Sample rate of the decoded source audio (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Musical key, e.g. "C" or "F#"
    pub key: String,

    /// Scale mode, e.g. "major" or "dorian"
    pub mode: String,

    #[serde(default)]
    pub key_confidence: f64,

    /// Tempo in BPM
    pub tempo: f64,

    #[serde(default)]
    pub tempo_confidence: f64,

    /// Ascending beat timestamps in seconds
    #[serde(default)]
    pub beats: Vec<f64>,

    /// Bar-start timestamps; derived from `beats` when absent
    #[serde(default)]
    pub downbeats: Option<Vec<f64>>,

    #[serde(default)]
    pub chords: Vec<Chord>,

    /// Normalized energy (0.0-1.0)
    pub energy_curve: Vec<f64>,

    #[serde(default)]
    pub loudness_curve: Vec<f64>,

    pub spectral: SpectralCurves,

    /// Source audio, used for the content hash
    #[serde(default)]
    pub audio_path: Option<PathBuf>,
}

fn default_sample_rate() -> u32 {
    44100
}

impl FeatureStream {
    /// Number of 10 Hz frames
    pub fn frame_count(&self) -> usize {
        self.energy_curve.len()
    }

    /// Frames of [centroid, rolloff, flux, rms] descriptors
    pub fn feature_frames(&self) -> Vec<FeatureFrame> {
        let s = &self.spectral;
        (0..s.len())
            .map(|i| {
                FeatureFrame::new(
                    i as f64 / FRAME_RATE,
                    s.centroid[i],
                    s.rolloff[i],
                    s.flux[i],
                    s.rms[i],
                )
            })
            .collect()
    }

    /// Supplied downbeats, or every 4th beat (4/4 is assumed)
    pub fn downbeats(&self) -> Vec<f64> {
        match &self.downbeats {
            Some(downbeats) => downbeats.clone(),
            None => self.beats.iter().copied().step_by(BEATS_PER_BAR).collect(),
        }
    }
}
