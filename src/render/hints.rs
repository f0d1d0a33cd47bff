use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::error::{InputError, Result};
use crate::structure::SectionType;

/// What the renderer needs to know about one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHint {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub start: f64,
    pub end: f64,
    pub energy: f64,
    pub repetition: u32,

    /// How concrete the imagery should be, 0 (abstract) to 1 (literal)
    pub clarity: f64,

    /// Text prompt for generative renderers
    pub prompt: String,
}

/// Emotion sample handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionHint {
    pub time: f64,
    pub emotion: Emotion,
    pub intensity: f64,
}

/// Everything the video renderer is given for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    pub duration: f64,
    pub tempo: f64,
    pub key: String,
    pub mode: String,
    pub style: String,
    pub sections: Vec<SectionHint>,
    pub emotions: Vec<EmotionHint>,
}

impl RenderHints {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::SynthError::generic(format!("Failed to serialize render hints: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| InputError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| {
            InputError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Imagery prompt from musical context
pub fn section_prompt(section_type: SectionType, emotion: Emotion, key: &str, mode: &str, energy: f64, clarity: f64) -> String {
    let mood = match section_type {
        SectionType::Intro => "emerging from darkness, mysterious beginning",
        SectionType::Verse => "narrative unfolding, steady progression",
        SectionType::PreChorus => "building anticipation, rising tension",
        SectionType::Chorus => "powerful revelation, emotional peak",
        SectionType::Drop => "explosive transformation, maximum impact",
        SectionType::Bridge => "perspective shift, contemplative moment",
        SectionType::Breakdown => "stripped down, intimate focus",
        SectionType::Buildup => "ascending intensity, growing power",
        SectionType::Outro => "resolution, fading into peace",
        SectionType::Instrumental | SectionType::Unknown => "abstract motion",
    };

    let energy_desc = if energy > 0.8 {
        "explosive"
    } else if energy > 0.5 {
        "dynamic"
    } else if energy > 0.3 {
        "gentle"
    } else {
        "calm"
    };

    let mode_feel = if mode.eq_ignore_ascii_case("major") {
        "bright, hopeful"
    } else {
        "deep, introspective"
    };

    let clarity_style = if clarity < 0.3 {
        "abstract, undefined shapes, pure color and motion"
    } else if clarity < 0.6 {
        "forms emerging, dreamlike quality"
    } else {
        "clear vision, detailed cinematic scene"
    };

    format!("{}, {} atmosphere, {} {} in {}, {}", mood, emotion, energy_desc, mode_feel, key, clarity_style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt() {
        let prompt = section_prompt(SectionType::Drop, Emotion::Euphoria, "F#", "minor", 0.9, 0.9);
        assert_eq!(
            prompt,
            "explosive transformation, maximum impact, euphoria atmosphere, explosive deep, introspective in F#, clear vision, detailed cinematic scene"
        );
    }

    #[test]
    fn test_hints_json_uses_type_key() {
        let hints = RenderHints {
            duration: 10.0,
            tempo: 120.0,
            key: "C".to_string(),
            mode: "major".to_string(),
            style: "default".to_string(),
            sections: vec![SectionHint {
                section_type: SectionType::PreChorus,
                start: 0.0,
                end: 10.0,
                energy: 0.5,
                repetition: 1,
                clarity: 0.45,
                prompt: String::new(),
            }],
            emotions: vec![EmotionHint { time: 0.0, emotion: Emotion::Hope, intensity: 0.3 }],
        };

        let value: serde_json::Value = serde_json::from_str(&hints.to_json().unwrap()).unwrap();
        assert_eq!(value["sections"][0]["type"], "pre_chorus");
        assert_eq!(value["emotions"][0]["emotion"], "hope");
    }
}
