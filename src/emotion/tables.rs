//! Lookup tables feeding the valence/arousal model.
//!
//! Keys and modes missing from the tables contribute 0. Chord names are
//! matched on their longest known suffix, so "Cmaj7" reads as `maj7` rather
//! than `7`.

use crate::structure::SectionType;

/// Valence contribution of the tonic
pub const KEY_VALENCE: [(&str, f64); 12] = [
    ("C", 0.3),
    ("G", 0.35),
    ("D", 0.4),
    ("A", 0.3),
    ("E", 0.25),
    ("B", 0.2),
    ("F", 0.25),
    ("Bb", 0.15),
    ("Eb", 0.1),
    ("Ab", 0.0),
    ("Db", -0.05),
    ("F#", 0.15),
];

/// Valence contribution of the scale mode (lowercase)
pub const MODE_VALENCE: [(&str, f64); 8] = [
    ("major", 0.3),
    ("minor", -0.3),
    ("dorian", -0.1),
    ("phrygian", -0.4),
    ("lydian", 0.4),
    ("mixolydian", 0.2),
    ("aeolian", -0.25),
    ("locrian", -0.5),
];

/// Harmonic tension by chord suffix, longest suffix first
pub const CHORD_TENSION: [(&str, f64); 10] = [
    ("maj7", 0.15),
    ("sus2", 0.2),
    ("sus4", 0.25),
    ("dim", 0.6),
    ("aug", 0.5),
    ("m7", 0.2),
    ("m", 0.1),
    ("7", 0.3),
    ("5", 0.05),
    ("", 0.0),
];

pub fn key_valence(key: &str) -> f64 {
    KEY_VALENCE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

/// Mode lookup, case-insensitive
pub fn mode_valence(mode: &str) -> f64 {
    let mode = mode.to_lowercase();
    MODE_VALENCE
        .iter()
        .find(|(name, _)| *name == mode)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

pub fn chord_tension(chord: &str) -> f64 {
    CHORD_TENSION
        .iter()
        .find(|(suffix, _)| chord.ends_with(suffix))
        .map(|(_, t)| *t)
        .unwrap_or(0.0)
}

/// Valence shift by section. Pre-choruses count as chorus material.
pub fn section_valence(section: Option<SectionType>) -> f64 {
    match section {
        Some(SectionType::Chorus | SectionType::PreChorus | SectionType::Drop) => 0.2,
        Some(SectionType::Breakdown) => -0.1,
        Some(SectionType::Bridge) => -0.05,
        _ => 0.0,
    }
}

/// Arousal shift by section
pub fn section_arousal(section: Option<SectionType>) -> f64 {
    match section {
        Some(SectionType::Drop) => 0.3,
        Some(SectionType::Chorus | SectionType::PreChorus) => 0.2,
        Some(SectionType::Buildup) => 0.15,
        Some(SectionType::Breakdown | SectionType::Intro) => -0.2,
        Some(SectionType::Outro) => -0.15,
        _ => 0.0,
    }
}

/// Arousal contribution of the tempo in BPM
pub fn tempo_arousal(tempo: f64) -> f64 {
    if tempo > 140.0 {
        0.4
    } else if tempo > 120.0 {
        0.2
    } else if tempo > 100.0 {
        0.0
    } else if tempo > 80.0 {
        -0.2
    } else {
        -0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entries_default_to_zero() {
        assert_eq!(key_valence("H"), 0.0);
        assert_eq!(mode_valence("blues"), 0.0);
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        assert_eq!(mode_valence("Minor"), -0.3);
        assert_eq!(mode_valence("LYDIAN"), 0.4);
    }

    #[test]
    fn test_chord_longest_suffix() {
        assert_eq!(chord_tension("Cmaj7"), 0.15);
        assert_eq!(chord_tension("Am7"), 0.2);
        assert_eq!(chord_tension("G7"), 0.3);
        assert_eq!(chord_tension("Em"), 0.1);
        assert_eq!(chord_tension("Bdim"), 0.6);
        assert_eq!(chord_tension("Dsus4"), 0.25);
        assert_eq!(chord_tension("E5"), 0.05);
        assert_eq!(chord_tension("C"), 0.0);
    }

    #[test]
    fn test_chord_table_sorted_by_suffix_length() {
        assert!(CHORD_TENSION.windows(2).all(|w| w[0].0.len() >= w[1].0.len()));
    }

    #[test]
    fn test_tempo_bands() {
        assert_eq!(tempo_arousal(150.0), 0.4);
        assert_eq!(tempo_arousal(130.0), 0.2);
        assert_eq!(tempo_arousal(120.0), 0.0);
        assert_eq!(tempo_arousal(90.0), -0.2);
        assert_eq!(tempo_arousal(70.0), -0.4);
    }

    #[test]
    fn test_section_adjustments() {
        assert_eq!(section_valence(Some(SectionType::Drop)), 0.2);
        assert_eq!(section_valence(Some(SectionType::Bridge)), -0.05);
        assert_eq!(section_valence(None), 0.0);
        assert_eq!(section_arousal(Some(SectionType::Intro)), -0.2);
        assert_eq!(section_arousal(Some(SectionType::Verse)), 0.0);
    }
}
