use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, MusicAnalysis, TransitionPoint, VideoSegment};
use crate::emotion::{Emotion, EmotionPoint};
use crate::error::{InputError, Result};
use crate::render::hints::{section_prompt, EmotionHint, RenderHints, SectionHint};
use crate::structure::{ClimaxPoint, Section, SectionType};
use crate::styles::Style;

/// Climaxes closer than this to a section change force a flash transition
const CLIMAX_FLASH_WINDOW: f64 = 1.0;

/// Renderer output: the records to store in an artifact
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RendererRecords {
    pub segments: Vec<VideoSegment>,
    #[serde(default)]
    pub transitions: Vec<TransitionPoint>,
}

impl RendererRecords {
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

    /// Copy of `artifact` carrying these records
    pub fn attach_to(self, artifact: &Artifact) -> Artifact {
        artifact.with_video(self.segments, self.transitions)
    }
}

/// Plans per-section video segments and the transitions between them
#[derive(Debug, Clone)]
pub struct RenderPlanner {
    style_name: String,
    transition_duration: f64,
}

impl RenderPlanner {
    pub fn new(style: &dyn Style) -> Self {
        Self {
            style_name: style.name().to_string(),
            transition_duration: style.transition_duration(),
        }
    }

    /// Section and emotion summary for the renderer
    pub fn hints(&self, analysis: &MusicAnalysis) -> RenderHints {
        let sections = analysis
            .sections
            .iter()
            .map(|section| {
                let emotion = emotion_at(&analysis.emotion_arc, section.start);
                let clarity = clarity(section.section_type, section.repetition);
                SectionHint {
                    section_type: section.section_type,
                    start: section.start,
                    end: section.end,
                    energy: section.energy,
                    repetition: section.repetition,
                    clarity,
                    prompt: section_prompt(
                        section.section_type,
                        emotion,
                        &analysis.key,
                        &analysis.mode,
                        section.energy,
                        clarity,
                    ),
                }
            })
            .collect();

        let emotions = analysis
            .emotion_arc
            .iter()
            .map(|p| EmotionHint {
                time: p.time,
                emotion: p.emotion,
                intensity: p.intensity,
            })
            .collect();

        RenderHints {
            duration: analysis.duration,
            tempo: analysis.tempo,
            key: analysis.key.clone(),
            mode: analysis.mode.clone(),
            style: self.style_name.clone(),
            sections,
            emotions,
        }
    }

    /// One procedural segment per section
    pub fn plan_segments(&self, analysis: &MusicAnalysis) -> Vec<VideoSegment> {
        analysis
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let emotion = emotion_at(&analysis.emotion_arc, section.start);
                VideoSegment {
                    segment_id: i as u32,
                    start_time: section.start,
                    end_time: section.end,
                    video_path: format!("segments/segment_{:03}.mp4", i),
                    mood: emotion.to_string(),
                    clarity_level: clarity(section.section_type, section.repetition),
                    base_hue: emotion.hue(),
                    saturation: 0.5 + section.energy * 0.3,
                    brightness: 0.4 + section.energy * 0.3,
                    motion_speed: analysis.tempo / 120.0,
                }
            })
            .collect()
    }

    /// One transition at every internal section boundary
    pub fn plan_transitions(&self, analysis: &MusicAnalysis, segments: &[VideoSegment]) -> Vec<TransitionPoint> {
        segments
            .windows(2)
            .filter_map(|pair| {
                let (from, to) = (&pair[0], &pair[1]);
                let incoming = analysis.sections.get(to.segment_id as usize)?;
                Some(TransitionPoint {
                    time: to.start_time,
                    from_segment: from.segment_id,
                    to_segment: to.segment_id,
                    transition_type: transition_type(incoming, &analysis.climaxes).to_string(),
                    duration: self.transition_duration,
                })
            })
            .collect()
    }

    /// Procedural segments and transitions, as the renderer would return them
    pub fn plan(&self, analysis: &MusicAnalysis) -> RendererRecords {
        let segments = self.plan_segments(analysis);
        let transitions = self.plan_transitions(analysis, &segments);
        tracing::debug!(
            "Planned {} segments and {} transitions",
            segments.len(),
            transitions.len()
        );
        RendererRecords { segments, transitions }
    }
}

impl Default for RenderPlanner {
    fn default() -> Self {
        Self {
            style_name: "default".to_string(),
            transition_duration: 0.5,
        }
    }
}

/// Emotion of the last point at or before `time`; neutral if there is none
pub fn emotion_at(arc: &[EmotionPoint], time: f64) -> Emotion {
    arc.iter()
        .take_while(|p| p.time <= time)
        .last()
        .map(|p| p.emotion)
        .unwrap_or(Emotion::Neutral)
}

/// Base clarity of a section type plus a bonus for repeats, capped at 1
pub fn clarity(section_type: SectionType, repetition: u32) -> f64 {
    let base = match section_type {
        SectionType::Intro => 0.1,
        SectionType::Verse => 0.25,
        SectionType::PreChorus => 0.35,
        SectionType::Chorus => 0.6,
        SectionType::Drop => 0.8,
        SectionType::Bridge => 0.4,
        SectionType::Breakdown => 0.3,
        SectionType::Buildup => 0.5,
        SectionType::Outro => 0.7,
        SectionType::Instrumental | SectionType::Unknown => 0.3,
    };
    let bonus = (repetition as f64 * 0.1).min(0.2);
    (base + bonus).min(1.0)
}

/// Transition into `incoming`
pub fn transition_type(incoming: &Section, climaxes: &[ClimaxPoint]) -> &'static str {
    let near_climax = climaxes
        .iter()
        .any(|c| (c.time - incoming.start).abs() <= CLIMAX_FLASH_WINDOW);
    if near_climax {
        return "flash_reveal";
    }

    match incoming.section_type {
        SectionType::Drop => "cut",
        SectionType::Chorus => "flash_reveal",
        SectionType::Buildup => "zoom_blur",
        SectionType::Breakdown => "particle_dissolve",
        SectionType::Bridge => "morph",
        SectionType::Verse => "crossfade",
        SectionType::Outro => "chromatic_split",
        _ => "crossfade",
    }
}
