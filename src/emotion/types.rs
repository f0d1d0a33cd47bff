use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stats;

/// Categorical emotions on the valence/arousal circumplex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Emotion {
    // High arousal, positive valence
    Joy,
    Triumph,
    Excitement,
    Euphoria,

    // High arousal, negative valence
    Anger,
    Intensity,
    Urgency,
    Chaos,

    // Low arousal, positive valence
    Peace,
    Tenderness,
    Hope,
    Nostalgia,

    // Low arousal, negative valence
    Sadness,
    Melancholy,
    Tension,
    Dread,

    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 17] = [
        Emotion::Joy,
        Emotion::Triumph,
        Emotion::Excitement,
        Emotion::Euphoria,
        Emotion::Anger,
        Emotion::Intensity,
        Emotion::Urgency,
        Emotion::Chaos,
        Emotion::Peace,
        Emotion::Tenderness,
        Emotion::Hope,
        Emotion::Nostalgia,
        Emotion::Sadness,
        Emotion::Melancholy,
        Emotion::Tension,
        Emotion::Dread,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Triumph => "triumph",
            Emotion::Excitement => "excitement",
            Emotion::Euphoria => "euphoria",
            Emotion::Anger => "anger",
            Emotion::Intensity => "intensity",
            Emotion::Urgency => "urgency",
            Emotion::Chaos => "chaos",
            Emotion::Peace => "peace",
            Emotion::Tenderness => "tenderness",
            Emotion::Hope => "hope",
            Emotion::Nostalgia => "nostalgia",
            Emotion::Sadness => "sadness",
            Emotion::Melancholy => "melancholy",
            Emotion::Tension => "tension",
            Emotion::Dread => "dread",
            Emotion::Neutral => "neutral",
        }
    }

    /// Base hue in degrees used when colouring visuals for this emotion
    pub fn hue(&self) -> f64 {
        match self {
            Emotion::Joy => 45.0,
            Emotion::Triumph => 30.0,
            Emotion::Excitement => 15.0,
            Emotion::Euphoria => 300.0,
            Emotion::Anger => 0.0,
            Emotion::Intensity => 350.0,
            Emotion::Urgency => 20.0,
            Emotion::Chaos => 280.0,
            Emotion::Peace => 180.0,
            Emotion::Tenderness => 330.0,
            Emotion::Hope => 60.0,
            Emotion::Nostalgia => 35.0,
            Emotion::Sadness => 220.0,
            Emotion::Melancholy => 250.0,
            Emotion::Tension => 270.0,
            Emotion::Dread => 260.0,
            Emotion::Neutral => 200.0,
        }
    }

    /// Category for a (valence, arousal) pair.
    ///
    /// Arousal above 0.3 is high, below -0.3 is low, anything else medium.
    pub fn from_circumplex(valence: f64, arousal: f64) -> Self {
        if arousal > 0.3 {
            if valence > 0.3 {
                if arousal > 0.7 {
                    Emotion::Euphoria
                } else if valence > 0.6 {
                    Emotion::Joy
                } else {
                    Emotion::Excitement
                }
            } else if valence < -0.3 {
                if arousal > 0.7 {
                    Emotion::Chaos
                } else if valence < -0.6 {
                    Emotion::Anger
                } else {
                    Emotion::Intensity
                }
            } else {
                Emotion::Urgency
            }
        } else if arousal < -0.3 {
            if valence > 0.3 {
                if valence > 0.6 {
                    Emotion::Peace
                } else {
                    Emotion::Tenderness
                }
            } else if valence < -0.3 {
                if valence < -0.6 {
                    Emotion::Dread
                } else {
                    Emotion::Sadness
                }
            } else {
                Emotion::Melancholy
            }
        } else if valence > 0.3 {
            if valence > 0.5 {
                Emotion::Hope
            } else {
                Emotion::Nostalgia
            }
        } else if valence < -0.3 {
            Emotion::Tension
        } else {
            Emotion::Neutral
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown emotion '{}'", s))
    }
}

impl From<Emotion> for String {
    fn from(value: Emotion) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for Emotion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Emotional state at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPoint {
    pub time: f64,
    pub emotion: Emotion,

    /// `(|valence| + |arousal|) / 2`
    pub intensity: f64,

    /// Negative to positive, in [-1, 1]
    pub valence: f64,

    /// Calm to energetic, in [-1, 1]
    pub arousal: f64,
}

impl EmotionPoint {
    /// Point with emotion and intensity derived from valence and arousal
    pub fn from_circumplex(time: f64, valence: f64, arousal: f64) -> Self {
        Self {
            time,
            emotion: Emotion::from_circumplex(valence, arousal),
            intensity: (valence.abs() + arousal.abs()) / 2.0,
            valence,
            arousal,
        }
    }
}

/// Emotional journey through a track with summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionArc {
    pub points: Vec<EmotionPoint>,
    pub dominant_emotion: Emotion,
    pub emotional_range: f64,
    pub overall_valence: f64,
    pub overall_arousal: f64,
}

impl EmotionArc {
    /// Build the summary for an ordered list of points
    pub fn from_points(points: Vec<EmotionPoint>) -> Self {
        let valences: Vec<f64> = points.iter().map(|p| p.valence).collect();
        let arousals: Vec<f64> = points.iter().map(|p| p.arousal).collect();

        Self {
            dominant_emotion: dominant_emotion(&points),
            emotional_range: (stats::std_dev(&valences) + stats::std_dev(&arousals)) / 2.0,
            overall_valence: stats::mean(&valences),
            overall_arousal: stats::mean(&arousals),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point at or before `time`, or the first point when `time`
    /// precedes the arc
    pub fn point_at(&self, time: f64) -> Option<&EmotionPoint> {
        self.points
            .iter()
            .take_while(|p| p.time <= time)
            .last()
            .or_else(|| self.points.first())
    }

    /// Emotion at `time`, neutral for an empty arc
    pub fn emotion_at(&self, time: f64) -> Emotion {
        self.point_at(time).map(|p| p.emotion).unwrap_or_default()
    }
}

/// Category with the largest summed intensity; ties go to the category seen first
pub fn dominant_emotion(points: &[EmotionPoint]) -> Emotion {
    let mut totals: Vec<(Emotion, f64)> = Vec::new();
    for point in points {
        match totals.iter_mut().find(|(emotion, _)| *emotion == point.emotion) {
            Some((_, total)) => *total += point.intensity,
            None => totals.push((point.emotion, point.intensity)),
        }
    }

    totals
        .into_iter()
        .fold(None, |best: Option<(Emotion, f64)>, (emotion, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ => Some((emotion, total)),
        })
        .map(|(emotion, _)| emotion)
        .unwrap_or(Emotion::Neutral)
}
