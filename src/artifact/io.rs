use std::io::Write;
use std::path::Path;

use serde_json::json;
use tempfile::NamedTempFile;

use crate::artifact::codec::{ArtifactCodec, MAGIC};
use crate::artifact::types::Artifact;
use crate::error::{InputError, Result};

impl Artifact {
    /// Write the artifact atomically: encode, write to a temporary file in
    /// the destination directory, then rename over `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = ArtifactCodec::encode(self)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        tracing::info!("Saved {:?} ({:.1} KB)", path, bytes.len() as f64 / 1024.0);
        Ok(())
    }

    /// Read and decode an artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| InputError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Loading {:?} ({} bytes)", path, bytes.len());
        ArtifactCodec::decode(&bytes)
    }

    /// Whether `path` starts with the artifact magic bytes
    pub fn is_valid<P: AsRef<Path>>(path: P) -> bool {
        use std::io::Read;

        let mut magic = [0u8; 8];
        std::fs::File::open(path)
            .and_then(|mut f| f.read_exact(&mut magic))
            .map(|_| magic == MAGIC)
            .unwrap_or(false)
    }

    /// Pretty-printed JSON view for inspection. Not a stable format.
    pub fn to_json(&self) -> Result<String> {
        let created_at = self
            .created_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let value = json!({
            "version": [self.version.0, self.version.1],
            "created_at": created_at,
            "analysis": self.analysis,
            "video_segments": self.video_segments(),
            "transitions": self.transitions(),
            "shader_curves": self.shader_curves,
            "style_name": self.style.name,
            "style_params": self.style.params,
        });

        serde_json::to_string_pretty(&value)
            .map_err(|e| crate::error::SynthError::generic(format!("JSON export failed: {}", e)))
    }

    /// Write [`Artifact::to_json`] to a file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        tracing::info!("Exported JSON to {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::types::MusicAnalysis;
    use tempfile::tempdir;

    fn artifact() -> Artifact {
        Artifact::new(MusicAnalysis {
            duration: 1.0,
            sample_rate: 22050,
            audio_hash: "ab".repeat(32),
            key: "G".to_string(),
            mode: "minor".to_string(),
            key_confidence: 0.5,
            tempo: 90.0,
            tempo_confidence: 0.5,
            beats: vec![],
            downbeats: vec![],
            time_signature: (4, 4),
            chords: vec![],
            sections: vec![],
            climaxes: vec![],
            energy_curve: vec![0.25; 10],
            tension_curve: vec![0.0; 10],
            loudness_curve: vec![-12.0; 10],
            emotion_arc: vec![],
            spectral_centroid: Some(vec![1500.0; 10]),
            spectral_flux: None,
        })
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("track.synth");

        let original = artifact();
        original.save(&path).unwrap();
        assert!(Artifact::is_valid(&path));

        let loaded = Artifact::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_is_valid_rejects_other_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(!Artifact::is_valid(&path));
        assert!(!Artifact::is_valid(dir.path().join("missing.synth")));
    }

    #[test]
    fn test_missing_directory_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("track.synth");
        assert!(artifact().save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_json_view() {
        let mut original = artifact();
        original.created_at = Some("2024-01-01T00:00:00+00:00".to_string());

        let value: serde_json::Value = serde_json::from_str(&original.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], json!([1, 0]));
        assert_eq!(value["created_at"], "2024-01-01T00:00:00+00:00");
        assert_eq!(value["analysis"]["key"], "G");
        assert_eq!(value["analysis"]["time_signature"], json!([4, 4]));
        assert!(value["analysis"]["spectral_flux"].is_null());
        assert_eq!(value["style_name"], "default");
        assert_eq!(value["video_segments"], json!([]));
    }
}
