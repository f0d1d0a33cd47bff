use crate::emotion::tables;
use crate::emotion::types::{EmotionArc, EmotionPoint};
use crate::features::Chord;
use crate::stats;
use crate::structure::{section_at, Section, SectionType};

/// Musical inputs for one track's emotion arc
#[derive(Debug, Clone, Copy)]
pub struct EmotionContext<'a> {
    pub key: &'a str,
    pub mode: &'a str,
    pub tempo: f64,
    pub duration: f64,
    /// Energy samples, indexed by whole seconds
    pub energy: &'a [f64],
    pub sections: &'a [Section],
    pub chords: &'a [Chord],
}

/// Maps musical features to a per-second emotion arc
#[derive(Debug, Clone)]
pub struct EmotionArcBuilder {
    /// Weight of the previous smoothed point, in [0, 1)
    smoothing: f64,
}

impl EmotionArcBuilder {
    pub fn new(smoothing: f64) -> Self {
        Self { smoothing }
    }

    /// Valence implied by key and mode alone
    pub fn base_valence(key: &str, mode: &str) -> f64 {
        stats::clip_unit(tables::key_valence(key) + tables::mode_valence(mode))
    }

    /// Build the arc: one raw point per whole second, then exponential
    /// smoothing, then the summary statistics
    pub fn build(&self, ctx: &EmotionContext<'_>) -> EmotionArc {
        tracing::info!("Mapping emotions for {} {} at {:.1} BPM", ctx.key, ctx.mode, ctx.tempo);

        let base_valence = Self::base_valence(ctx.key, ctx.mode);
        let seconds = ctx.duration.max(0.0).floor() as usize;

        let raw: Vec<EmotionPoint> = (0..seconds)
            .map(|t| self.raw_point(ctx, base_valence, t))
            .collect();

        let arc = EmotionArc::from_points(self.smooth(raw));

        tracing::debug!(
            "Emotion arc: {} points, dominant {}, valence {:.2}, arousal {:.2}, range {:.3}",
            arc.len(),
            arc.dominant_emotion,
            arc.overall_valence,
            arc.overall_arousal,
            arc.emotional_range
        );

        arc
    }

    fn raw_point(&self, ctx: &EmotionContext<'_>, base_valence: f64, t: usize) -> EmotionPoint {
        let time = t as f64;
        let energy = match ctx.energy.len() {
            0 => 0.5,
            len => ctx.energy[t.min(len - 1)],
        };

        let section = section_at(ctx.sections, time).map(|s| s.section_type);
        let tension = chord_tension_at(ctx.chords, time);

        let valence = Self::valence(base_valence, section, tension, energy);
        let arousal = Self::arousal(ctx.tempo, energy, section);

        EmotionPoint::from_circumplex(time, valence, arousal)
    }

    fn valence(base: f64, section: Option<SectionType>, tension: f64, energy: f64) -> f64 {
        let mut valence = base + tables::section_valence(section) - 0.3 * tension;
        // High energy pushes further from neutral
        if energy > 0.7 {
            valence += 0.1 * stats::sign(valence);
        }
        stats::clip_unit(valence)
    }

    fn arousal(tempo: f64, energy: f64, section: Option<SectionType>) -> f64 {
        stats::clip_unit(
            tables::tempo_arousal(tempo) + 0.8 * (energy - 0.5) + tables::section_arousal(section),
        )
    }

    /// Exponential smoothing of valence and arousal; emotion and intensity
    /// are recomputed from the smoothed values. The first point is kept as is.
    pub fn smooth(&self, points: Vec<EmotionPoint>) -> Vec<EmotionPoint> {
        let alpha = self.smoothing;
        let mut smoothed: Vec<EmotionPoint> = Vec::with_capacity(points.len());

        for point in points {
            let next = match smoothed.last() {
                None => point,
                Some(prev) => EmotionPoint::from_circumplex(
                    point.time,
                    prev.valence * alpha + point.valence * (1.0 - alpha),
                    prev.arousal * alpha + point.arousal * (1.0 - alpha),
                ),
            };
            smoothed.push(next);
        }

        smoothed
    }
}

impl Default for EmotionArcBuilder {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// Tension of the first chord sounding at `time`, 0 when none is
fn chord_tension_at(chords: &[Chord], time: f64) -> f64 {
    chords
        .iter()
        .find(|c| c.contains(time))
        .map(|c| tables::chord_tension(&c.name))
        .unwrap_or(0.0)
}
