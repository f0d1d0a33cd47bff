use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    artifact::{Artifact, MusicAnalysis, ShaderCurves, StyleBlock},
    config::Config,
    emotion::{EmotionArc, EmotionArcBuilder, EmotionContext},
    error::Result,
    features::{FeatureLoader, FeatureStream, FRAME_RATE},
    structure::{
        BoundaryDetector, ClimaxDetector, ClimaxPoint, Section, SectionClassifier,
        SimilarityEngine,
    },
    styles::StyleRegistry,
};

/// Sections and climaxes of one track
#[derive(Debug, Clone, PartialEq)]
pub struct StructureResult {
    pub boundaries: Vec<f64>,
    pub sections: Vec<Section>,
    pub climaxes: Vec<ClimaxPoint>,
}

/// Orchestrates the analysis of a single track
///
/// The engine follows a fixed pipeline:
/// 1. Structure - similarity matrix, novelty, boundaries, sections, climaxes
/// 2. Emotion - per-second valence/arousal arc
/// 3. Assembly - analysis record, shader curves and style block
///
/// [`AnalysisEngine::run`] wraps this with loading, hashing and an atomic save.
pub struct AnalysisEngine {
    config: Config,
    styles: StyleRegistry,
}

impl AnalysisEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            styles: StyleRegistry::new(),
        }
    }

    /// Use a registry with custom styles
    pub fn with_styles(config: Config, styles: StyleRegistry) -> Self {
        Self { config, styles }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Load a feature document, analyze it and save the artifact to `output`.
    ///
    /// `audio` overrides the audio path named in the document for hashing.
    /// Errors name the failing stage and the input file.
    pub fn run<P: AsRef<Path>>(&self, input: P, output: P, audio: Option<&Path>) -> Result<Artifact> {
        let input = input.as_ref();
        let output = output.as_ref();
        let input_id = input.display().to_string();

        info!("🎼 Analyzing {:?}", input);

        let stream = FeatureLoader::load(input)
            .map_err(|e| e.at_stage("feature loading", input_id.clone()))?;

        let audio_hash = self
            .audio_hash(input, &stream, audio)
            .map_err(|e| e.at_stage("audio hashing", input_id.clone()))?;

        let artifact = self
            .analyze(&stream, &audio_hash)
            .map_err(|e| e.at_stage("analysis", input_id.clone()))?;

        artifact
            .save(output)
            .map_err(|e| e.at_stage("artifact write", output.display().to_string()))?;

        if self.config.output.write_json {
            let json_path = output.with_extension("json");
            artifact
                .export_json(&json_path)
                .map_err(|e| e.at_stage("json export", json_path.display().to_string()))?;
        }

        info!("🎉 Wrote {:?}", output);
        Ok(artifact)
    }

    /// Hash of the source audio, falling back to the feature document itself
    fn audio_hash(&self, input: &Path, stream: &FeatureStream, audio: Option<&Path>) -> Result<String> {
        let audio_path: Option<PathBuf> = audio.map(Path::to_path_buf).or_else(|| {
            stream.audio_path.as_ref().map(|p| match input.parent() {
                Some(dir) if p.is_relative() => dir.join(p),
                _ => p.clone(),
            })
        });

        match audio_path {
            Some(path) if path.exists() => {
                debug!("Hashing audio {:?}", path);
                FeatureLoader::content_hash(&path)
            }
            other => {
                if let Some(path) = other {
                    warn!("Audio file {:?} not found", path);
                }
                warn!("No source audio available; hashing the feature document instead");
                FeatureLoader::content_hash(input)
            }
        }
    }

    /// Run the full pipeline on a feature stream
    pub fn analyze(&self, stream: &FeatureStream, audio_hash: &str) -> Result<Artifact> {
        FeatureLoader::validate(stream)?;

        let structure = self.detect_structure(stream)?;
        let arc = self.map_emotions(stream, &structure.sections);
        let artifact = self.assemble(stream, audio_hash, structure, &arc)?;

        Ok(artifact)
    }

    // ==========================================
    // PIPELINE STEP 1: STRUCTURE
    // ==========================================

    /// Boundaries, labelled sections and climaxes
    pub fn detect_structure(&self, stream: &FeatureStream) -> Result<StructureResult> {
        info!("🧩 Step 1: Detecting structure...");

        let cfg = &self.config.analysis;
        let detector = BoundaryDetector::new(cfg.min_segment_secs, cfg.novelty_threshold_std, cfg.beat_snap_secs);
        let frames = stream.frame_count();

        let degenerate = frames == 0 || detector.is_degenerate(frames);
        let boundaries = if degenerate {
            warn!(
                "Track too short to segment ({} frames, need {}); using a single section",
                frames,
                2 * detector.min_segment()
            );
            detector.detect(&[], &[], stream.duration)
        } else {
            let similarity = SimilarityEngine::new(cfg.max_kernel_size);
            let ssm = similarity.self_similarity(&stream.feature_frames())?;
            let novelty = similarity.novelty(&ssm);
            debug!("Self-similarity {}x{}, kernel {}", ssm.size(), ssm.size(), similarity.kernel_size(frames));
            detector.detect(&novelty, &stream.beats, stream.duration)
        };

        let sections = SectionClassifier::new().classify(
            &boundaries,
            &stream.energy_curve,
            stream.duration,
            stream.tempo,
        );

        let climaxes = if degenerate {
            Vec::new()
        } else {
            ClimaxDetector::new(cfg.climax_window, cfg.final_climax_position, cfg.final_climax_ratio)
                .detect(&stream.energy_curve, &sections, stream.duration)
        };

        info!("   ✅ {} sections, {} climaxes", sections.len(), climaxes.len());
        for section in &sections {
            debug!(
                "      {:>12} #{} {:6.1}s - {:6.1}s energy {:.2}",
                section.section_type, section.repetition, section.start, section.end, section.energy
            );
        }

        Ok(StructureResult { boundaries, sections, climaxes })
    }

    // ==========================================
    // PIPELINE STEP 2: EMOTION
    // ==========================================

    pub fn map_emotions(&self, stream: &FeatureStream, sections: &[Section]) -> EmotionArc {
        info!("💫 Step 2: Mapping emotions...");

        let arc = EmotionArcBuilder::new(self.config.emotion.smoothing).build(&EmotionContext {
            key: &stream.key,
            mode: &stream.mode,
            tempo: stream.tempo,
            duration: stream.duration,
            energy: &stream.energy_curve,
            sections,
            chords: &stream.chords,
        });

        info!(
            "   ✅ Dominant emotion {} (valence {:+.2}, arousal {:+.2})",
            arc.dominant_emotion, arc.overall_valence, arc.overall_arousal
        );
        arc
    }

    // ==========================================
    // PIPELINE STEP 3: ASSEMBLY
    // ==========================================

    fn assemble(&self, stream: &FeatureStream, audio_hash: &str, structure: StructureResult, arc: &EmotionArc) -> Result<Artifact> {
        info!("📦 Step 3: Assembling artifact...");

        let keep_spectral = |curve: &Vec<f64>| {
            if self.config.output.spectral_curves && !curve.is_empty() {
                Some(curve.clone())
            } else {
                None
            }
        };

        let analysis = MusicAnalysis {
            duration: stream.duration,
            sample_rate: stream.sample_rate,
            audio_hash: audio_hash.to_string(),
            key: stream.key.clone(),
            mode: stream.mode.clone(),
            key_confidence: stream.key_confidence,
            tempo: stream.tempo,
            tempo_confidence: stream.tempo_confidence,
            beats: stream.beats.clone(),
            downbeats: stream.downbeats(),
            time_signature: (4, 4),
            chords: stream.chords.clone(),
            sections: structure.sections,
            climaxes: structure.climaxes,
            energy_curve: stream.energy_curve.clone(),
            tension_curve: stream.spectral.flux.clone(),
            loudness_curve: stream.loudness_curve.clone(),
            emotion_arc: arc.points.clone(),
            spectral_centroid: keep_spectral(&stream.spectral.centroid),
            spectral_flux: keep_spectral(&stream.spectral.flux),
        };

        let style = self.styles.resolve(&self.config.output.style, arc.dominant_emotion)?;
        debug!("Style: {} ({})", style.name(), style.description());

        let mut artifact = Artifact::new(analysis).with_style(StyleBlock {
            name: style.name().to_string(),
            params: style.default_config().into_params(),
        });

        if self.config.output.shader_curves {
            artifact = artifact.with_shader_curves(ShaderCurves::from_energy(&stream.energy_curve, FRAME_RATE));
        }

        artifact.created_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(artifact)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
