use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the synth analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Structure analysis settings
    pub analysis: AnalysisConfig,

    /// Emotion mapping settings
    pub emotion: EmotionConfig,

    /// Artifact output settings
    pub output: OutputConfig,

    /// Batch processing settings
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.emotion.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

/// Structure analysis configuration
///
/// Feature streams are always sampled at [`FRAME_RATE`](crate::features::FRAME_RATE);
/// every duration below is converted to frames at that rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum section length in seconds
    pub min_segment_secs: f64,

    /// Upper bound on the checkerboard kernel half-width (frames)
    pub max_kernel_size: usize,

    /// Novelty threshold as a multiple of the novelty standard deviation
    pub novelty_threshold_std: f64,

    /// Boundaries snap to a beat closer than this many seconds
    pub beat_snap_secs: f64,

    /// Moving average window for climax detection (frames)
    pub climax_window: usize,

    /// Fraction of the track after which a climax may be labelled "final"
    pub final_climax_position: f64,

    /// Fraction of the peak smoothed energy a "final" climax must exceed
    pub final_climax_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_segment_secs: 4.0,
            max_kernel_size: 32,
            novelty_threshold_std: 0.5,
            beat_snap_secs: 1.0,
            climax_window: 20,
            final_climax_position: 0.7,
            final_climax_ratio: 0.8,
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<()> {
        if !(self.min_segment_secs > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "analysis.min_segment_secs".to_string(),
                value: self.min_segment_secs.to_string()
            }.into());
        }

        if self.max_kernel_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.max_kernel_size".to_string(),
                value: self.max_kernel_size.to_string()
            }.into());
        }

        if self.climax_window == 0 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.climax_window".to_string(),
                value: self.climax_window.to_string()
            }.into());
        }

        if self.beat_snap_secs < 0.0 || self.novelty_threshold_std < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.beat_snap_secs".to_string(),
                value: format!("{} (threshold factor {})", self.beat_snap_secs, self.novelty_threshold_std)
            }.into());
        }

        for (key, value) in [
            ("analysis.final_climax_position", self.final_climax_position),
            ("analysis.final_climax_ratio", self.final_climax_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string()
                }.into());
            }
        }

        Ok(())
    }
}

/// Emotion mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Exponential smoothing factor applied between consecutive points (0.0-1.0)
    pub smoothing: f64,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self { smoothing: 0.3 }
    }
}

impl EmotionConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::InvalidValue {
                key: "emotion.smoothing".to_string(),
                value: self.smoothing.to_string()
            }.into());
        }
        Ok(())
    }
}

/// Artifact output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Style preset name, or "auto" to pick one from the dominant emotion
    pub style: String,

    /// Write a debug JSON export next to each artifact
    pub write_json: bool,

    /// Derive shader animation curves from the energy curve
    pub shader_curves: bool,

    /// Keep the spectral centroid and flux curves in the artifact
    pub spectral_curves: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            style: "auto".to_string(),
            write_json: false,
            shader_curves: true,
            spectral_curves: true,
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of tracks analyzed in parallel
    pub workers: usize,

    /// File name suffix identifying feature documents
    pub input_suffix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            input_suffix: ".features.json".to_string(),
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.workers".to_string(),
                value: self.workers.to_string()
            }.into());
        }

        if self.input_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "batch.input_suffix".to_string(),
                value: String::new()
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.output.style = "neon".to_string();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.analysis.min_segment_secs, loaded_config.analysis.min_segment_secs);
        assert_eq!(original_config.emotion.smoothing, loaded_config.emotion.smoothing);
        assert_eq!(loaded_config.output.style, "neon");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[analysis]\nmin_segment_secs = 6.0\n\n[output]\nwrite_json = true\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.analysis.min_segment_secs, 6.0);
        assert_eq!(config.analysis.max_kernel_size, 32);
        assert!(config.output.write_json);
        assert_eq!(config.output.style, "auto");
    }

    #[test]
    fn test_single_section_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("emotion.toml");
        std::fs::write(&file_path, "[emotion]\nsmoothing = 0.5\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.emotion.smoothing, 0.5);
        assert_eq!(config.analysis.min_segment_secs, 4.0);
        assert_eq!(config.output.style, "auto");
        assert_eq!(config.batch.input_suffix, ".features.json");

        let empty = dir.path().join("empty.toml");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(Config::from_file(&empty).unwrap().emotion.smoothing, 0.3);
    }

    #[test]
    fn test_parse_error_keeps_reason() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.toml");
        std::fs::write(&file_path, "[analysis]\nmin_segment_secs = \"long\"\n").unwrap();

        let err = Config::from_file(&file_path).unwrap_err();
        match err {
            SynthError::Config(ConfigError::ParseFailed { path, reason }) => {
                assert!(path.ends_with("broken.toml"));
                assert!(reason.contains("expected f64"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_smoothing() {
        let mut config = Config::default();
        config.emotion.smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_min_segment() {
        let mut config = Config::default();
        config.analysis.min_segment_secs = 0.0;
        assert!(config.validate().is_err());
    }
}
