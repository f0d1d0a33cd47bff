use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use synth_analyzer::{
    artifact::Artifact,
    config::Config,
    pipeline::{artifact_path, AnalysisEngine, BatchRunner},
    render::{RenderPlanner, RendererRecords},
    styles::StyleRegistry,
};

#[derive(Parser)]
#[command(
    name = "synth-analyzer",
    version,
    about = "Analyze music features into song structure, emotion arcs and .synth artifacts",
    long_about = "Synth Analyzer reads the feature document of a track, segments it into labelled sections, maps its emotional arc and writes a compact .synth artifact for playback and visualization."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one feature document into a .synth artifact
    Analyze {
        /// Feature document (JSON)
        input: PathBuf,

        /// Output artifact path (defaults to <input stem>.synth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source audio file, hashed into the artifact
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Also write a JSON export next to the artifact
        #[arg(long)]
        json: bool,

        /// Style preset, or "auto"
        #[arg(short, long)]
        style: Option<String>,
    },

    /// Analyze every feature document in a directory
    Batch {
        dir: PathBuf,

        /// Write artifacts here instead of next to each input
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a summary of a .synth artifact
    Info { file: PathBuf },

    /// Export a .synth artifact as JSON
    ExportJson { file: PathBuf, output: PathBuf },

    /// Write render hints for the video renderer
    Hints { file: PathBuf, output: PathBuf },

    /// Store video segment and transition records in an artifact
    AttachVideo {
        file: PathBuf,

        /// Renderer records (JSON); the procedural plan is used when omitted
        records: Option<PathBuf>,

        /// Output artifact path (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the procedural plan even when records are given
        #[arg(long)]
        plan: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting synth-analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Analyze { input, output, audio, json, style } => {
            if let Some(style) = style {
                config.output.style = style;
            }
            config.output.write_json |= json;

            let registry = StyleRegistry::new();
            if !registry.has_style(&config.output.style) {
                anyhow::bail!(
                    "Unknown style '{}'. Available: auto, {}",
                    config.output.style,
                    registry.available_styles().join(", ")
                );
            }

            let output = output
                .unwrap_or_else(|| artifact_path(&input, &config.batch.input_suffix, None));
            let engine = AnalysisEngine::new(config);
            let artifact = engine
                .run(&input, &output, audio.as_deref())
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            print_summary(&artifact);
        }

        Command::Batch { dir, output_dir } => {
            let runner = BatchRunner::new(config);
            let report = runner
                .run(&dir, output_dir.as_deref())
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            for (path, message) in &report.failed {
                eprintln!("FAILED {}: {}", path.display(), message);
            }
            println!("{} succeeded, {} failed", report.succeeded.len(), report.failed.len());

            if !report.is_success() {
                std::process::exit(1);
            }
        }

        Command::Info { file } => {
            let artifact = load(&file)?;
            print_summary(&artifact);
        }

        Command::ExportJson { file, output } => {
            let artifact = load(&file)?;
            artifact
                .export_json(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Exported to {}", output.display());
        }

        Command::Hints { file, output } => {
            let artifact = load(&file)?;
            let hints = planner_for(&artifact).hints(&artifact.analysis);
            hints
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote render hints for {} sections to {}", hints.sections.len(), output.display());
        }

        Command::AttachVideo { file, records, output, plan } => {
            let artifact = load(&file)?;

            let records = match records {
                Some(path) if !plan => {
                    info!("Attaching renderer records from {:?}", path);
                    RendererRecords::load(&path).map_err(|e| anyhow::anyhow!(e.user_message()))?
                }
                _ => {
                    info!("Attaching procedural render plan");
                    planner_for(&artifact).plan(&artifact.analysis)
                }
            };

            let updated = records.attach_to(&artifact);
            let output = output.unwrap_or(file);
            updated
                .save(&output)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            println!(
                "Stored {} segments and {} transitions in {}",
                updated.video_segments().len(),
                updated.transitions().len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Artifact> {
    Artifact::load(path).map_err(|e| anyhow::anyhow!(e.user_message()))
}

/// Planner using the transition settings of the artifact's style
fn planner_for(artifact: &Artifact) -> RenderPlanner {
    StyleRegistry::new()
        .get_style(&artifact.style.name)
        .map(|style| RenderPlanner::new(style.as_ref()))
        .unwrap_or_default()
}

fn print_summary(artifact: &Artifact) {
    let a = &artifact.analysis;
    let arc = a.emotion_summary();

    println!();
    println!("🎵 {:.1}s, {} {}, {:.1} BPM", a.duration, a.key, a.mode, a.tempo);
    println!("   Audio hash: {}", a.audio_hash);
    println!("   Beats: {}, chords: {}", a.beats.len(), a.chords.len());
    println!(
        "💫 Emotion: {} (valence {:+.2}, arousal {:+.2}, range {:.2})",
        arc.dominant_emotion, arc.overall_valence, arc.overall_arousal, arc.emotional_range
    );
    println!("🎨 Style: {}", artifact.style.name);
    println!(
        "📦 Video: {} segments, shader curves: {}",
        artifact.video_segments().len(),
        if artifact.has_shader_curves() { "yes" } else { "no" }
    );

    println!();
    println!("   {:<12} {:>8} {:>8} {:>7} {:>4}", "SECTION", "START", "END", "ENERGY", "REP");
    for s in &a.sections {
        println!(
            "   {:<12} {:>7.1}s {:>7.1}s {:>7.2} {:>4}",
            s.section_type.as_str(),
            s.start,
            s.end,
            s.energy,
            s.repetition
        );
    }

    if !a.climaxes.is_empty() {
        println!();
        for c in &a.climaxes {
            println!("   ⚡ {:>7.1}s {:<9} intensity {:.2}", c.time, c.climax_type.as_str(), c.intensity);
        }
    }
}
