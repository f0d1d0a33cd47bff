// Demo binary: analyze a synthetic track end to end

use synth_analyzer::{
    artifact::{Artifact, ArtifactCodec},
    config::Config,
    features::{Chord, FeatureStream, SpectralCurves},
    pipeline::AnalysisEngine,
    render::RenderPlanner,
    styles::StyleRegistry,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("🎵 Synth Analyzer demo");

    // Step 1: synthetic feature stream
    println!("\n1. Creating synthetic features...");
    let stream = create_test_stream(90.0);
    println!(
        "   ✅ {:.1}s, {} frames, {} beats, {} chords",
        stream.duration,
        stream.frame_count(),
        stream.beats.len(),
        stream.chords.len()
    );

    // Step 2: analysis
    println!("\n2. Running analysis...");
    let engine = AnalysisEngine::new(Config::default());
    let artifact = engine.analyze(&stream, "synthetic")?;
    let analysis = &artifact.analysis;

    println!("   Sections:");
    for section in &analysis.sections {
        println!(
            "     {:<12} {:6.1}s - {:6.1}s energy {:.2} (#{})",
            section.section_type, section.start, section.end, section.energy, section.repetition
        );
    }
    println!("   Climaxes:");
    for climax in &analysis.climaxes {
        println!("     {:6.1}s {} ({:.2})", climax.time, climax.climax_type, climax.intensity);
    }
    let arc = analysis.emotion_summary();
    println!(
        "   ✅ Dominant emotion: {}, style: {}",
        arc.dominant_emotion, artifact.style.name
    );

    // Step 3: binary round trip
    println!("\n3. Encoding artifact...");
    let bytes = ArtifactCodec::encode(&artifact)?;
    let decoded = ArtifactCodec::decode(&bytes)?;
    println!("   ✅ {} bytes, round trip {}", bytes.len(), status(decoded.analysis == artifact.analysis));

    // Step 4: procedural video plan
    println!("\n4. Planning video segments...");
    let planner = match StyleRegistry::new().get_style(&artifact.style.name) {
        Some(style) => RenderPlanner::new(style.as_ref()),
        None => RenderPlanner::default(),
    };
    let with_video: Artifact = planner.plan(analysis).attach_to(&artifact);
    for t in with_video.transitions() {
        println!(
            "     {:6.1}s {} -> {} {}",
            t.time, t.from_segment, t.to_segment, t.transition_type
        );
    }
    let reencoded = ArtifactCodec::encode(&with_video)?;
    println!(
        "   ✅ {} segments, {} bytes with video",
        with_video.video_segments().len(),
        reencoded.len()
    );

    println!("\n🎉 Demo complete");
    Ok(())
}

fn status(ok: bool) -> &'static str {
    if ok { "ok" } else { "MISMATCH" }
}

/// Quiet verse, loud chorus, quiet verse, loud chorus with a late peak
fn create_test_stream(duration: f64) -> FeatureStream {
    let frames = (duration * 10.0) as usize;
    let quarter = frames / 4;

    let energy: Vec<f64> = (0..frames)
        .map(|i| {
            let base = if (i / quarter) % 2 == 0 { 0.3 } else { 0.8 };
            let swell = if i > frames * 3 / 4 { 0.15 * ((i - frames * 3 / 4) as f64 / quarter as f64) } else { 0.0 };
            (base + swell).min(1.0)
        })
        .collect();

    let spectral = SpectralCurves {
        centroid: energy.iter().map(|e| 1500.0 + 3000.0 * e).collect(),
        rolloff: energy.iter().map(|e| 4000.0 + 6000.0 * e).collect(),
        flux: energy.iter().map(|e| e * 0.5).collect(),
        rms: energy.iter().map(|e| e * 0.4).collect(),
    };

    let beats: Vec<f64> = (0..)
        .map(|i| i as f64 * 0.5)
        .take_while(|t| *t < duration)
        .collect();

    let progression = ["C", "G", "Am", "F"];
    let chords = (0..(duration / 2.0) as usize)
        .map(|i| Chord {
            time: i as f64 * 2.0,
            duration: 2.0,
            name: progression[i % progression.len()].to_string(),
            confidence: 0.9,
        })
        .collect();

    FeatureStream {
        duration,
        sample_rate: 44100,
        key: "C".to_string(),
        mode: "major".to_string(),
        key_confidence: 0.85,
        tempo: 120.0,
        tempo_confidence: 0.9,
        beats,
        downbeats: None,
        chords,
        loudness_curve: energy.iter().map(|e| -30.0 + 24.0 * e).collect(),
        energy_curve: energy,
        spectral,
        audio_path: None,
    }
}
