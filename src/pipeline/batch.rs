use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, SynthError};
use crate::pipeline::engine::AnalysisEngine;

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Artifacts written, in input order
    pub succeeded: Vec<PathBuf>,

    /// Inputs that failed, with a user-facing message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Analyzes many independent tracks in parallel
pub struct BatchRunner {
    engine: AnalysisEngine,
}

impl BatchRunner {
    pub fn new(config: Config) -> Self {
        Self {
            engine: AnalysisEngine::new(config),
        }
    }

    pub fn with_engine(engine: AnalysisEngine) -> Self {
        Self { engine }
    }

    /// Feature documents under `dir` (recursively), sorted and deduplicated
    pub fn collect_inputs<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let suffix = &self.engine.config().batch.input_suffix;
        let mut inputs = Vec::new();
        collect_recursive(dir.as_ref(), suffix, &mut inputs)?;
        inputs.sort();
        inputs.dedup();
        Ok(inputs)
    }

    /// Where the artifact for `input` goes
    pub fn output_path(&self, input: &Path, output_dir: Option<&Path>) -> PathBuf {
        artifact_path(input, &self.engine.config().batch.input_suffix, output_dir)
    }

    /// Analyze every feature document under `dir`. A failing track is
    /// recorded in the report and never stops the others.
    pub fn run<P: AsRef<Path>>(&self, dir: P, output_dir: Option<&Path>) -> Result<BatchReport> {
        let inputs = self.collect_inputs(&dir)?;
        let workers = self.engine.config().batch.workers;

        info!("📂 Batch: {} inputs in {:?}, {} workers", inputs.len(), dir.as_ref(), workers);

        if let Some(out) = output_dir {
            std::fs::create_dir_all(out)?;
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| SynthError::generic(format!("Failed to start worker pool: {}", e)))?;

        let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    let output = self.output_path(input, output_dir);
                    let result = self.engine.run(input.as_path(), output.as_path(), None).map(|_| output);
                    (input.clone(), result)
                })
                .collect()
        });

        let mut report = BatchReport::default();
        for (input, result) in results {
            match result {
                Ok(output) => report.succeeded.push(output),
                Err(e) => {
                    if e.is_recoverable() {
                        warn!("Skipping {:?}: {}", input, e);
                    } else {
                        warn!("Failed {:?} (not recoverable): {}", input, e);
                    }
                    report.failed.push((input, e.user_message()));
                }
            }
        }

        info!(
            "✅ Batch complete: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

/// `<stem>.synth` for a feature document, next to it or in `output_dir`.
///
/// The stem drops `input_suffix` when present, otherwise the last extension.
pub fn artifact_path(input: &Path, input_suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match file_name.strip_suffix(input_suffix) {
        Some(stem) if !input_suffix.is_empty() => stem.to_string(),
        _ => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file_name),
    };
    let artifact_name = format!("{}.synth", stem);

    match output_dir {
        Some(dir) => dir.join(artifact_name),
        None => input.with_file_name(artifact_name),
    }
}

fn collect_recursive(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_recursive(&path, suffix, out)?;
        } else if path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn document(frames: usize) -> String {
        let curve = vec![0.5; frames];
        serde_json::json!({
            "duration": frames as f64 / 10.0,
            "key": "D",
            "mode": "dorian",
            "tempo": 100.0,
            "energy_curve": curve,
            "spectral": {"centroid": curve, "rolloff": curve, "flux": curve, "rms": curve}
        })
        .to_string()
    }

    fn runner() -> BatchRunner {
        let mut config = Config::default();
        config.batch.workers = 2;
        BatchRunner::new(config)
    }

    #[test]
    fn test_collect_inputs_recursive_and_sorted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.features.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.features.json"), "{}").unwrap();
        std::fs::write(dir.path().join("nested").join("c.features.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let inputs = runner().collect_inputs(dir.path()).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.features.json", "b.features.json", "c.features.json"]);
    }

    #[test]
    fn test_output_path() {
        let runner = runner();
        let input = Path::new("/music/song.features.json");
        assert_eq!(runner.output_path(input, None), PathBuf::from("/music/song.synth"));
        assert_eq!(
            runner.output_path(input, Some(Path::new("/out"))),
            PathBuf::from("/out/song.synth")
        );
    }

    #[test]
    fn test_artifact_path_without_suffix() {
        let suffix = ".features.json";
        assert_eq!(
            artifact_path(Path::new("/music/song.json"), suffix, None),
            PathBuf::from("/music/song.synth")
        );
        assert_eq!(
            artifact_path(Path::new("/music/take.2.features.json"), suffix, None),
            PathBuf::from("/music/take.2.synth")
        );
        assert_eq!(
            artifact_path(Path::new("raw"), suffix, Some(Path::new("out"))),
            PathBuf::from("out/raw.synth")
        );
        assert_eq!(
            artifact_path(Path::new("/music/song.features.json"), "", None),
            PathBuf::from("/music/song.features.synth")
        );
    }

    #[test]
    fn test_failing_track_does_not_abort_batch() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("good.features.json"), document(100)).unwrap();
        std::fs::write(dir.path().join("bad.features.json"), "{ not json").unwrap();

        let out = dir.path().join("out");
        let report = runner().run(dir.path(), Some(&out)).unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded, vec![out.join("good.synth")]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("bad.features.json"));
        assert!(out.join("good.synth").exists());
        assert!(!out.join("bad.synth").exists());
    }
}
