use std::collections::HashMap;

use synth_analyzer::{
    config::Config,
    features::{FeatureLoader, FeatureStream, SpectralCurves},
    pipeline::{AnalysisEngine, BatchRunner},
    structure::SectionType,
};
use tempfile::tempdir;

fn track(key: &str, mode: &str, tempo: f64, energy: Vec<f64>, duration: f64) -> FeatureStream {
    let frames = energy.len();
    FeatureStream {
        duration,
        sample_rate: 44100,
        key: key.to_string(),
        mode: mode.to_string(),
        key_confidence: 0.8,
        tempo,
        tempo_confidence: 0.8,
        beats: (0..(duration * tempo / 60.0) as usize).map(|i| i as f64 * 60.0 / tempo).collect(),
        downbeats: None,
        chords: vec![],
        loudness_curve: vec![],
        spectral: SpectralCurves {
            centroid: energy.iter().map(|e| 1000.0 + 3000.0 * e).collect(),
            rolloff: energy.iter().map(|e| 2000.0 + 4000.0 * e).collect(),
            flux: vec![0.1; frames],
            rms: energy.clone(),
        },
        energy_curve: energy,
        audio_path: None,
    }
}

fn two_part() -> FeatureStream {
    let mut energy = vec![0.3; 300];
    energy.extend(vec![0.8; 300]);
    track("C", "major", 120.0, energy, 60.0)
}

#[test]
fn test_bright_track_has_positive_valence() {
    let artifact = AnalysisEngine::default()
        .analyze(&track("C", "major", 120.0, vec![0.5; 1000], 100.0), "hash")
        .unwrap();

    let arc = artifact.analysis.emotion_summary();
    assert_eq!(arc.len(), 100);
    assert!(arc.overall_valence > 0.0);
    assert!(arc.overall_arousal.abs() <= 0.3 + 1e-9);
}

#[test]
fn test_dark_slow_track_is_lower_on_both_axes() {
    let engine = AnalysisEngine::default();
    let bright = engine
        .analyze(&track("C", "major", 120.0, vec![0.5; 1000], 100.0), "hash")
        .unwrap()
        .analysis
        .emotion_summary();
    let dark = engine
        .analyze(&track("A", "minor", 70.0, vec![0.3; 1000], 100.0), "hash")
        .unwrap()
        .analysis
        .emotion_summary();

    assert!(dark.overall_valence < bright.overall_valence);
    assert!(dark.overall_arousal < bright.overall_arousal);
}

#[test]
fn test_two_part_track_sections_cover_the_track() {
    let artifact = AnalysisEngine::default().analyze(&two_part(), "hash").unwrap();
    let sections = &artifact.analysis.sections;

    assert!(sections.len() >= 2);
    assert!(sections[0].start <= 5.0);
    assert!(sections.last().unwrap().end >= 55.0);

    // Contiguous, ordered, non-empty
    assert_eq!(sections[0].start, 0.0);
    assert_eq!(sections.last().unwrap().end, 60.0);
    for pair in sections.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(sections.iter().all(|s| s.end > s.start));
}

#[test]
fn test_repetition_counts_per_type() {
    let artifact = AnalysisEngine::default().analyze(&two_part(), "hash").unwrap();

    let mut seen: HashMap<SectionType, u32> = HashMap::new();
    for section in &artifact.analysis.sections {
        let count = seen.entry(section.section_type).or_insert(0);
        *count += 1;
        assert_eq!(section.repetition, *count);
        assert_eq!(section.confidence, 0.8);
    }
}

#[test]
fn test_emotion_and_climax_ranges() {
    let artifact = AnalysisEngine::default().analyze(&two_part(), "hash").unwrap();
    let analysis = &artifact.analysis;

    for point in &analysis.emotion_arc {
        assert!((-1.0..=1.0).contains(&point.valence));
        assert!((-1.0..=1.0).contains(&point.arousal));
        assert!((0.0..=1.0).contains(&point.intensity));
    }
    for climax in &analysis.climaxes {
        assert!((0.0..=analysis.duration).contains(&climax.time));
        assert!((0.0..=1.0).contains(&climax.intensity));
    }
    let arc = analysis.emotion_summary();
    assert!((0.0..=2.0).contains(&arc.emotional_range));
}

#[test]
fn test_auto_style_follows_dominant_emotion() {
    let artifact = AnalysisEngine::default().analyze(&two_part(), "hash").unwrap();
    let dominant = artifact.analysis.emotion_summary().dominant_emotion;
    assert_eq!(
        artifact.style.name,
        synth_analyzer::styles::style_for_emotion(dominant)
    );
}

#[test]
fn test_run_and_batch_agree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.features.json");
    std::fs::write(&input, serde_json::to_string(&two_part()).unwrap()).unwrap();

    let single = AnalysisEngine::default()
        .run(&input, &dir.path().join("single.synth"), None)
        .unwrap();

    let report = BatchRunner::new(Config::default()).run(dir.path(), None).unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded, vec![dir.path().join("song.synth")]);

    let batched = synth_analyzer::Artifact::load(dir.path().join("song.synth")).unwrap();
    assert_eq!(batched.analysis, single.analysis);
    assert_eq!(
        batched.analysis.audio_hash,
        FeatureLoader::content_hash(&input).unwrap()
    );
}

#[test]
fn test_invalid_document_is_rejected() {
    let mut stream = two_part();
    stream.spectral.rms.pop();
    assert!(AnalysisEngine::default().analyze(&stream, "hash").is_err());
}
