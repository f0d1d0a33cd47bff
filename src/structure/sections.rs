use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::features::FRAME_RATE;
use crate::stats;

/// Confidence assigned to every rule-based classification
pub const SECTION_CONFIDENCE: f64 = 0.8;

/// Types of song sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SectionType {
    Intro,
    Verse,
    PreChorus,
    Chorus,
    Bridge,
    Breakdown,
    Buildup,
    Drop,
    Outro,
    Instrumental,
    Unknown,
}

impl SectionType {
    pub const ALL: [SectionType; 11] = [
        SectionType::Intro,
        SectionType::Verse,
        SectionType::PreChorus,
        SectionType::Chorus,
        SectionType::Bridge,
        SectionType::Breakdown,
        SectionType::Buildup,
        SectionType::Drop,
        SectionType::Outro,
        SectionType::Instrumental,
        SectionType::Unknown,
    ];

    /// Serialized tag
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Intro => "intro",
            SectionType::Verse => "verse",
            SectionType::PreChorus => "pre_chorus",
            SectionType::Chorus => "chorus",
            SectionType::Bridge => "bridge",
            SectionType::Breakdown => "breakdown",
            SectionType::Buildup => "buildup",
            SectionType::Drop => "drop",
            SectionType::Outro => "outro",
            SectionType::Instrumental => "instrumental",
            SectionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown section type '{}'", s))
    }
}

impl From<SectionType> for String {
    fn from(value: SectionType) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for SectionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A labelled section of the song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub section_type: SectionType,

    /// Start time in seconds (inclusive)
    pub start: f64,

    /// End time in seconds (exclusive)
    pub end: f64,

    /// Mean energy over the section
    pub energy: f64,

    /// Occurrence number of this section type, starting at 1
    pub repetition: u32,

    pub confidence: f64,
}

impl Section {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls in `[start, end)`
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// First section containing `time`
pub fn section_at(sections: &[Section], time: f64) -> Option<&Section> {
    sections.iter().find(|s| s.contains(time))
}

/// Measurements a classification rule can look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFeatures {
    pub start: f64,
    pub end: f64,
    /// `start / duration`
    pub position: f64,
    /// Mean energy, clamped to [0, 1]
    pub energy: f64,
    pub energy_var: f64,
    pub tempo: f64,
}

impl SegmentFeatures {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// One row of the classification table
pub struct SectionRule {
    pub name: &'static str,
    pub matches: fn(&SegmentFeatures) -> bool,
    pub label: SectionType,
}

impl fmt::Debug for SectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionRule")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish()
    }
}

/// Classification rules, evaluated top to bottom; the first match wins.
/// The last row always matches.
pub static SECTION_RULES: [SectionRule; 12] = [
    SectionRule { name: "quiet opening", matches: quiet_opening, label: SectionType::Intro },
    SectionRule { name: "quiet ending", matches: quiet_ending, label: SectionType::Outro },
    SectionRule { name: "fast volatile peak", matches: fast_volatile_peak, label: SectionType::Drop },
    SectionRule { name: "peak energy", matches: peak_energy, label: SectionType::Chorus },
    SectionRule { name: "rising high energy", matches: rising_high_energy, label: SectionType::Buildup },
    SectionRule { name: "steady high energy", matches: high_energy, label: SectionType::Chorus },
    SectionRule { name: "long medium energy", matches: long_medium_energy, label: SectionType::Verse },
    SectionRule { name: "short medium energy", matches: medium_energy, label: SectionType::PreChorus },
    SectionRule { name: "flat low energy", matches: flat_low_energy, label: SectionType::Breakdown },
    SectionRule { name: "varying low energy", matches: low_energy, label: SectionType::Verse },
    SectionRule { name: "quiet middle", matches: quiet_middle, label: SectionType::Bridge },
    SectionRule { name: "fallback", matches: always, label: SectionType::Verse },
];

fn quiet_opening(f: &SegmentFeatures) -> bool {
    f.position < 0.1 && f.energy < 0.4
}

fn quiet_ending(f: &SegmentFeatures) -> bool {
    f.position > 0.85 && f.energy < 0.5
}

fn peak_energy(f: &SegmentFeatures) -> bool {
    f.energy > 0.8
}

fn fast_volatile_peak(f: &SegmentFeatures) -> bool {
    peak_energy(f) && f.tempo > 130.0 && f.energy_var > 0.05
}

fn high_energy(f: &SegmentFeatures) -> bool {
    f.energy > 0.6
}

fn rising_high_energy(f: &SegmentFeatures) -> bool {
    high_energy(f) && f.energy_var > 0.1
}

fn medium_energy(f: &SegmentFeatures) -> bool {
    f.energy > 0.4
}

fn long_medium_energy(f: &SegmentFeatures) -> bool {
    medium_energy(f) && f.length() > 20.0
}

fn low_energy(f: &SegmentFeatures) -> bool {
    f.energy > 0.2
}

fn flat_low_energy(f: &SegmentFeatures) -> bool {
    low_energy(f) && f.energy_var < 0.02
}

fn quiet_middle(f: &SegmentFeatures) -> bool {
    f.position > 0.4 && f.position < 0.7
}

fn always(_: &SegmentFeatures) -> bool {
    true
}

/// Label a segment with the first matching rule
pub fn classify_segment(features: &SegmentFeatures) -> SectionType {
    SECTION_RULES
        .iter()
        .find(|rule| (rule.matches)(features))
        .map(|rule| rule.label)
        .unwrap_or(SectionType::Verse)
}

/// Per-type occurrence counts, threaded through the classification pass
#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    counts: HashMap<SectionType, u32>,
}

impl RepetitionCounter {
    /// Count one more occurrence of `section_type`, returning the updated
    /// counter and the occurrence number
    pub fn advance(mut self, section_type: SectionType) -> (Self, u32) {
        let count = self.counts.entry(section_type).or_insert(0);
        *count += 1;
        let repetition = *count;
        (self, repetition)
    }
}

/// Labels the segments between consecutive boundaries
#[derive(Debug, Clone, Default)]
pub struct SectionClassifier;

impl SectionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Measure the energy window of `[start, end)`
    pub fn measure(&self, start: f64, end: f64, duration: f64, energy: &[f64], tempo: f64) -> (f64, SegmentFeatures) {
        let start_idx = ((start * FRAME_RATE) as usize).min(energy.len());
        let end_idx = ((end * FRAME_RATE) as usize).min(energy.len());
        let window = if start_idx < end_idx { &energy[start_idx..end_idx] } else { &[][..] };

        let mean_energy = stats::mean(window);
        let position = if duration > 0.0 { start / duration } else { 0.0 };

        let features = SegmentFeatures {
            start,
            end,
            position,
            energy: mean_energy.clamp(0.0, 1.0),
            energy_var: stats::variance(window),
            tempo,
        };

        (mean_energy, features)
    }

    /// One section per consecutive pair of `boundaries`
    pub fn classify(&self, boundaries: &[f64], energy: &[f64], duration: f64, tempo: f64) -> Vec<Section> {
        let mut counter = RepetitionCounter::default();
        let mut sections = Vec::with_capacity(boundaries.len().saturating_sub(1));

        for pair in boundaries.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let (mean_energy, features) = self.measure(start, end, duration, energy, tempo);
            let section_type = classify_segment(&features);

            let (next, repetition) = counter.advance(section_type);
            counter = next;

            tracing::debug!(
                "{:6.1}s - {:6.1}s: {} #{} (energy {:.2}, var {:.3})",
                start, end, section_type, repetition, mean_energy, features.energy_var
            );

            sections.push(Section {
                section_type,
                start,
                end,
                energy: mean_energy,
                repetition,
                confidence: SECTION_CONFIDENCE,
            });
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(position: f64, energy: f64, energy_var: f64, length: f64, tempo: f64) -> SegmentFeatures {
        SegmentFeatures {
            start: position * 100.0,
            end: position * 100.0 + length,
            position,
            energy,
            energy_var,
            tempo,
        }
    }

    #[test]
    fn test_rule_table_order() {
        assert_eq!(classify_segment(&features(0.05, 0.3, 0.0, 10.0, 120.0)), SectionType::Intro);
        assert_eq!(classify_segment(&features(0.9, 0.45, 0.0, 10.0, 120.0)), SectionType::Outro);
        assert_eq!(classify_segment(&features(0.5, 0.9, 0.06, 10.0, 140.0)), SectionType::Drop);
        assert_eq!(classify_segment(&features(0.5, 0.9, 0.06, 10.0, 120.0)), SectionType::Chorus);
        assert_eq!(classify_segment(&features(0.5, 0.7, 0.2, 10.0, 120.0)), SectionType::Buildup);
        assert_eq!(classify_segment(&features(0.5, 0.7, 0.01, 10.0, 120.0)), SectionType::Chorus);
        assert_eq!(classify_segment(&features(0.5, 0.5, 0.01, 25.0, 120.0)), SectionType::Verse);
        assert_eq!(classify_segment(&features(0.5, 0.5, 0.01, 10.0, 120.0)), SectionType::PreChorus);
        assert_eq!(classify_segment(&features(0.3, 0.3, 0.01, 10.0, 120.0)), SectionType::Breakdown);
        assert_eq!(classify_segment(&features(0.3, 0.3, 0.05, 10.0, 120.0)), SectionType::Verse);
        assert_eq!(classify_segment(&features(0.5, 0.1, 0.0, 10.0, 120.0)), SectionType::Bridge);
        assert_eq!(classify_segment(&features(0.2, 0.1, 0.0, 10.0, 120.0)), SectionType::Verse);
    }

    #[test]
    fn test_intro_rule_wins_over_energy_rules() {
        // Quiet opening with low energy is an intro even though the flat
        // low-energy rule would also match
        assert_eq!(classify_segment(&features(0.0, 0.25, 0.0, 10.0, 120.0)), SectionType::Intro);
    }

    #[test]
    fn test_last_rule_always_matches() {
        let last = SECTION_RULES.last().unwrap();
        assert!((last.matches)(&features(0.0, 0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_section_type_string_mapping() {
        for section_type in SectionType::ALL {
            let parsed: SectionType = section_type.as_str().parse().unwrap();
            assert_eq!(parsed, section_type);
        }
        assert!("chorus!".parse::<SectionType>().is_err());
        assert_eq!(SectionType::PreChorus.to_string(), "pre_chorus");
    }

    #[test]
    fn test_repetition_counter() {
        let counter = RepetitionCounter::default();
        let (counter, a) = counter.advance(SectionType::Verse);
        let (counter, b) = counter.advance(SectionType::Chorus);
        let (_, c) = counter.advance(SectionType::Verse);
        assert_eq!((a, b, c), (1, 1, 2));
    }

    #[test]
    fn test_classify_partitions_track() {
        let energy: Vec<f64> = (0..600).map(|i| if i < 300 { 0.3 } else { 0.9 }).collect();
        let boundaries = [0.0, 10.0, 30.0, 45.0, 60.0];
        let sections = SectionClassifier::new().classify(&boundaries, &energy, 60.0, 120.0);

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].start, 0.0);
        assert_eq!(sections.last().unwrap().end, 60.0);
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }

        assert_eq!(sections[0].section_type, SectionType::Intro);
        assert_eq!(sections[1].section_type, SectionType::Breakdown);
        assert_eq!(sections[2].section_type, SectionType::Chorus);
        assert_eq!(sections[3].section_type, SectionType::Chorus);
        assert_eq!(sections[3].repetition, 2);
        assert!((sections[2].energy - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_empty_energy_window_still_emits_section() {
        let sections = SectionClassifier::new().classify(&[0.0, 10.0], &[], 10.0, 120.0);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].energy, 0.0);
        assert_eq!(sections[0].repetition, 1);
    }

    #[test]
    fn test_section_lookup_is_half_open() {
        let sections = SectionClassifier::new().classify(&[0.0, 10.0, 20.0], &vec![0.5; 200], 20.0, 120.0);
        assert_eq!(section_at(&sections, 10.0).unwrap().start, 10.0);
        assert!(section_at(&sections, 20.0).is_none());
    }
}
