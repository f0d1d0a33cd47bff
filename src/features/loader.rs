use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{InputError, Result};
use crate::features::types::FeatureStream;

/// Loader for feature documents written by the extraction step
pub struct FeatureLoader;

impl FeatureLoader {
    /// Load and validate a JSON feature document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FeatureStream> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| InputError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let stream: FeatureStream = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| InputError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::validate(&stream)?;

        tracing::debug!(
            "Loaded {} frames, {} beats, {} chords from {:?}",
            stream.frame_count(),
            stream.beats.len(),
            stream.chords.len(),
            path
        );

        Ok(stream)
    }

    /// Parse a feature document held in memory
    pub fn from_json(json: &str) -> Result<FeatureStream> {
        let stream: FeatureStream = serde_json::from_str(json)
            .map_err(|e| InputError::ParseFailed {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            })?;
        Self::validate(&stream)?;
        Ok(stream)
    }

    /// Check the lengths and ranges the analysis stages rely on
    pub fn validate(stream: &FeatureStream) -> std::result::Result<(), InputError> {
        if !stream.duration.is_finite() || stream.duration < 0.0 {
            return Err(InputError::InvalidValue {
                field: "duration".to_string(),
                details: format!("expected a non-negative number, found {}", stream.duration),
            });
        }

        if !stream.tempo.is_finite() || stream.tempo <= 0.0 {
            return Err(InputError::InvalidValue {
                field: "tempo".to_string(),
                details: format!("expected a positive BPM, found {}", stream.tempo),
            });
        }

        let frames = stream.energy_curve.len();
        let spectral = [
            ("spectral.centroid", stream.spectral.centroid.len()),
            ("spectral.rolloff", stream.spectral.rolloff.len()),
            ("spectral.flux", stream.spectral.flux.len()),
            ("spectral.rms", stream.spectral.rms.len()),
        ];
        for (field, len) in spectral {
            if len != frames {
                return Err(InputError::LengthMismatch {
                    field: field.to_string(),
                    expected: frames,
                    actual: len,
                });
            }
        }

        if !stream.loudness_curve.is_empty() && stream.loudness_curve.len() != frames {
            return Err(InputError::LengthMismatch {
                field: "loudness_curve".to_string(),
                expected: frames,
                actual: stream.loudness_curve.len(),
            });
        }

        let curves = [
            ("energy_curve", &stream.energy_curve),
            ("loudness_curve", &stream.loudness_curve),
            ("spectral.centroid", &stream.spectral.centroid),
            ("spectral.rolloff", &stream.spectral.rolloff),
            ("spectral.flux", &stream.spectral.flux),
            ("spectral.rms", &stream.spectral.rms),
        ];
        for (field, curve) in curves {
            if let Some(i) = curve.iter().position(|v| !v.is_finite()) {
                return Err(InputError::InvalidValue {
                    field: field.to_string(),
                    details: format!("non-finite sample at frame {}", i),
                });
            }
        }

        if stream.beats.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(InputError::NotSorted { field: "beats".to_string() });
        }

        if let Some(chord) = stream.chords.iter().find(|c| c.duration < 0.0) {
            return Err(InputError::InvalidValue {
                field: "chords".to_string(),
                details: format!("chord '{}' at {:.2}s has negative duration", chord.name, chord.time),
            });
        }

        Ok(())
    }

    /// SHA-256 of a file's full contents as lowercase hex
    pub fn content_hash<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| InputError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}
