use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::features::FRAME_RATE;
use crate::stats;
use crate::structure::sections::{section_at, Section, SectionType};

/// How a climax is perceived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ClimaxKind {
    Energy,
    Drop,
    Emotional,
    Final,
}

impl ClimaxKind {
    pub const ALL: [ClimaxKind; 4] = [
        ClimaxKind::Energy,
        ClimaxKind::Drop,
        ClimaxKind::Emotional,
        ClimaxKind::Final,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimaxKind::Energy => "energy",
            ClimaxKind::Drop => "drop",
            ClimaxKind::Emotional => "emotional",
            ClimaxKind::Final => "final",
        }
    }
}

impl fmt::Display for ClimaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimaxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClimaxKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown climax type '{}'", s))
    }
}

impl From<ClimaxKind> for String {
    fn from(value: ClimaxKind) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for ClimaxKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A significant energy peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimaxPoint {
    pub time: f64,

    /// Smoothed energy at the peak, in [0, 1]
    pub intensity: f64,

    #[serde(rename = "type")]
    pub climax_type: ClimaxKind,
}

/// Label of a peak by the section it falls in. Unlisted sections map to
/// `ClimaxKind::Energy`.
pub const CLIMAX_LABELS: [(SectionType, ClimaxKind); 2] = [
    (SectionType::Drop, ClimaxKind::Drop),
    (SectionType::Chorus, ClimaxKind::Emotional),
];

fn label_for(section: Option<&Section>) -> ClimaxKind {
    section
        .and_then(|s| {
            CLIMAX_LABELS
                .iter()
                .find(|(section_type, _)| *section_type == s.section_type)
                .map(|(_, kind)| *kind)
        })
        .unwrap_or(ClimaxKind::Energy)
}

/// Tracks whether the single "final" climax has been handed out
#[derive(Debug, Clone, Copy)]
struct FinalClimaxState {
    emitted: bool,
    min_time: f64,
    min_level: f64,
}

impl FinalClimaxState {
    fn new(min_time: f64, min_level: f64) -> Self {
        Self { emitted: false, min_time, min_level }
    }

    /// Returns the relabelled kind and the updated state
    fn offer(self, time: f64, level: f64, kind: ClimaxKind) -> (Self, ClimaxKind) {
        if !self.emitted && time > self.min_time && level > self.min_level {
            (Self { emitted: true, ..self }, ClimaxKind::Final)
        } else {
            (self, kind)
        }
    }
}

/// Finds local maxima of the smoothed energy curve
#[derive(Debug, Clone)]
pub struct ClimaxDetector {
    window: usize,
    final_position: f64,
    final_ratio: f64,
}

impl ClimaxDetector {
    pub fn new(window: usize, final_position: f64, final_ratio: f64) -> Self {
        Self { window, final_position, final_ratio }
    }

    /// Climaxes in ascending time order, at most one labelled final
    pub fn detect(&self, energy: &[f64], sections: &[Section], duration: f64) -> Vec<ClimaxPoint> {
        if energy.is_empty() {
            return Vec::new();
        }

        let smoothed = stats::moving_average(energy, self.window);
        let threshold = stats::mean(&smoothed) + stats::std_dev(&smoothed);
        let peak_level = stats::max(&smoothed);

        let mut state = FinalClimaxState::new(
            self.final_position * duration,
            self.final_ratio * peak_level,
        );
        let mut climaxes = Vec::new();

        for i in 1..smoothed.len().saturating_sub(1) {
            let level = smoothed[i];
            let is_peak = level > smoothed[i - 1] && level > smoothed[i + 1] && level > threshold;
            if !is_peak {
                continue;
            }

            let time = i as f64 / FRAME_RATE;
            let kind = label_for(section_at(sections, time));
            let (next, kind) = state.offer(time, level, kind);
            state = next;

            climaxes.push(ClimaxPoint {
                time,
                intensity: level.clamp(0.0, 1.0),
                climax_type: kind,
            });
        }

        tracing::debug!("Found {} climaxes above {:.3}", climaxes.len(), threshold);
        climaxes
    }
}

impl Default for ClimaxDetector {
    fn default() -> Self {
        Self::new(20, 0.7, 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::sections::SECTION_CONFIDENCE;

    fn section(section_type: SectionType, start: f64, end: f64) -> Section {
        Section {
            section_type,
            start,
            end,
            energy: 0.5,
            repetition: 1,
            confidence: SECTION_CONFIDENCE,
        }
    }

    /// Flat curve with a lopsided triangular bump peaking at `center`
    fn bump(frames: usize, center: usize, height: f64) -> Vec<f64> {
        (0..frames)
            .map(|i| {
                let offset = i as f64 - center as f64;
                let slope = if offset < 0.0 { 30.0 } else { 25.0 };
                0.2 + (height - 0.2) * (1.0 - offset.abs() / slope).max(0.0)
            })
            .collect()
    }

    #[test]
    fn test_empty_curve_has_no_climaxes() {
        assert!(ClimaxDetector::default().detect(&[], &[], 10.0).is_empty());
    }

    #[test]
    fn test_flat_curve_has_no_climaxes() {
        let climaxes = ClimaxDetector::default().detect(&vec![0.5; 300], &[], 30.0);
        assert!(climaxes.is_empty());
    }

    #[test]
    fn test_peak_labelled_by_section() {
        let energy = bump(600, 150, 0.9);
        let sections = vec![
            section(SectionType::Drop, 0.0, 30.0),
            section(SectionType::Verse, 30.0, 60.0),
        ];
        let climaxes = ClimaxDetector::default().detect(&energy, &sections, 60.0);

        assert_eq!(climaxes.len(), 1);
        assert!((climaxes[0].time - 15.0).abs() < 0.25);
        assert_eq!(climaxes[0].climax_type, ClimaxKind::Drop);
        assert!(climaxes[0].intensity <= 1.0);
    }

    #[test]
    fn test_late_strong_peak_is_final() {
        let mut energy = bump(1000, 200, 0.7);
        let late = bump(1000, 850, 0.95);
        for (e, l) in energy.iter_mut().zip(&late) {
            *e = e.max(*l);
        }
        let sections = vec![section(SectionType::Chorus, 0.0, 100.0)];
        let climaxes = ClimaxDetector::default().detect(&energy, &sections, 100.0);

        assert_eq!(climaxes.len(), 2);
        assert_eq!(climaxes[0].climax_type, ClimaxKind::Emotional);
        assert_eq!(climaxes[1].climax_type, ClimaxKind::Final);
        assert_eq!(
            climaxes.iter().filter(|c| c.climax_type == ClimaxKind::Final).count(),
            1
        );
    }

    #[test]
    fn test_only_one_final() {
        let state = FinalClimaxState::new(10.0, 0.5);
        let (state, first) = state.offer(20.0, 0.9, ClimaxKind::Energy);
        let (_, second) = state.offer(30.0, 0.9, ClimaxKind::Drop);
        assert_eq!(first, ClimaxKind::Final);
        assert_eq!(second, ClimaxKind::Drop);
    }

    #[test]
    fn test_intensity_is_clamped() {
        let energy = bump(400, 200, 3.0);
        let climaxes = ClimaxDetector::default().detect(&energy, &[], 40.0);
        assert!(!climaxes.is_empty());
        assert!(climaxes.iter().all(|c| (0.0..=1.0).contains(&c.intensity)));
    }
}
