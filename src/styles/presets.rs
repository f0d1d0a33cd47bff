//! Built-in style presets.

use crate::styles::traits::{Style, StyleConfig};

/// Post-processing strengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub bloom: f64,
    pub chromatic_aberration: f64,
    pub vignette: f64,
    pub grain: f64,
    pub motion_blur: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub gamma: f64,
    pub glow_radius: f64,
    pub beat_reactivity: f64,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            bloom: 0.3,
            chromatic_aberration: 0.01,
            vignette: 0.3,
            grain: 0.05,
            motion_blur: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            gamma: 0.85,
            glow_radius: 1.0,
            beat_reactivity: 1.0,
        }
    }
}

/// How sections hand over to each other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPrefs {
    pub default_type: &'static str,
    pub duration: f64,
    pub beat_sync: bool,
    pub drop_flash: f64,
}

impl Default for TransitionPrefs {
    fn default() -> Self {
        Self {
            default_type: "crossfade",
            duration: 0.5,
            beat_sync: true,
            drop_flash: 0.8,
        }
    }
}

/// A style defined entirely by its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PresetStyle {
    pub name: &'static str,
    pub description: &'static str,
    pub effects: EffectParams,
    pub transitions: TransitionPrefs,
    /// Multiplier on section clarity
    pub clarity_modifier: f64,
    pub intensity: f64,
}

impl Style for PresetStyle {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn default_config(&self) -> StyleConfig {
        let e = &self.effects;
        let t = &self.transitions;

        StyleConfig::with_intensity(self.intensity)
            .set("bloom", e.bloom)
            .set("chromatic_aberration", e.chromatic_aberration)
            .set("vignette", e.vignette)
            .set("grain", e.grain)
            .set("motion_blur", e.motion_blur)
            .set("contrast", e.contrast)
            .set("saturation", e.saturation)
            .set("gamma", e.gamma)
            .set("glow_radius", e.glow_radius)
            .set("beat_reactivity", e.beat_reactivity)
            .set("transition_type", t.default_type)
            .set("transition_duration", t.duration)
            .set("beat_sync", t.beat_sync)
            .set("drop_flash", t.drop_flash)
            .set("clarity_modifier", self.clarity_modifier)
    }

    fn default_transition(&self) -> &str {
        self.transitions.default_type
    }

    fn transition_duration(&self) -> f64 {
        self.transitions.duration
    }
}

/// Balanced style that works with any music
pub fn default_style() -> PresetStyle {
    PresetStyle {
        name: "default",
        description: "Balanced style that works with any music",
        effects: EffectParams::default(),
        transitions: TransitionPrefs::default(),
        clarity_modifier: 1.0,
        intensity: 1.0,
    }
}

pub fn neon_style() -> PresetStyle {
    PresetStyle {
        name: "neon",
        description: "Vibrant neon cyberpunk aesthetic",
        effects: EffectParams {
            bloom: 0.6,
            chromatic_aberration: 0.03,
            vignette: 0.4,
            grain: 0.02,
            motion_blur: 0.1,
            contrast: 1.3,
            saturation: 1.4,
            gamma: 0.9,
            glow_radius: 1.5,
            beat_reactivity: 1.5,
        },
        transitions: TransitionPrefs {
            default_type: "flash_reveal",
            duration: 0.3,
            beat_sync: true,
            drop_flash: 1.0,
        },
        clarity_modifier: 1.2,
        intensity: 1.3,
    }
}

pub fn ethereal_style() -> PresetStyle {
    PresetStyle {
        name: "ethereal",
        description: "Soft, dreamy and otherworldly",
        effects: EffectParams {
            bloom: 0.5,
            chromatic_aberration: 0.005,
            vignette: 0.2,
            grain: 0.08,
            motion_blur: 0.2,
            contrast: 0.9,
            saturation: 0.8,
            gamma: 0.95,
            glow_radius: 2.0,
            beat_reactivity: 0.7,
        },
        transitions: TransitionPrefs {
            default_type: "crossfade",
            duration: 1.0,
            beat_sync: false,
            drop_flash: 0.3,
        },
        clarity_modifier: 0.9,
        intensity: 0.7,
    }
}

pub fn cinematic_style() -> PresetStyle {
    PresetStyle {
        name: "cinematic",
        description: "Film-like with dramatic lighting",
        effects: EffectParams {
            bloom: 0.25,
            chromatic_aberration: 0.015,
            vignette: 0.5,
            grain: 0.1,
            motion_blur: 0.15,
            contrast: 1.15,
            saturation: 0.9,
            gamma: 0.8,
            glow_radius: 0.8,
            beat_reactivity: 0.9,
        },
        transitions: TransitionPrefs {
            default_type: "morph",
            duration: 0.8,
            beat_sync: true,
            drop_flash: 0.5,
        },
        clarity_modifier: 1.1,
        intensity: 1.0,
    }
}

/// 80s synthwave
pub fn retro_style() -> PresetStyle {
    PresetStyle {
        name: "retro",
        description: "80s synthwave aesthetic",
        effects: EffectParams {
            bloom: 0.7,
            chromatic_aberration: 0.04,
            vignette: 0.35,
            grain: 0.15,
            motion_blur: 0.05,
            contrast: 1.2,
            saturation: 1.3,
            gamma: 0.85,
            glow_radius: 1.8,
            beat_reactivity: 1.4,
        },
        transitions: TransitionPrefs {
            default_type: "chromatic_split",
            duration: 0.4,
            beat_sync: true,
            drop_flash: 0.9,
        },
        clarity_modifier: 1.1,
        intensity: 1.2,
    }
}

pub fn minimal_style() -> PresetStyle {
    PresetStyle {
        name: "minimal",
        description: "Clean and understated",
        effects: EffectParams {
            bloom: 0.1,
            chromatic_aberration: 0.0,
            vignette: 0.15,
            grain: 0.0,
            motion_blur: 0.0,
            contrast: 1.05,
            saturation: 0.3,
            gamma: 0.9,
            glow_radius: 0.5,
            beat_reactivity: 0.5,
        },
        transitions: TransitionPrefs {
            default_type: "crossfade",
            duration: 0.6,
            beat_sync: false,
            drop_flash: 0.2,
        },
        clarity_modifier: 1.0,
        intensity: 0.6,
    }
}

pub fn psychedelic_style() -> PresetStyle {
    PresetStyle {
        name: "psychedelic",
        description: "Trippy kaleidoscope visuals",
        effects: EffectParams {
            bloom: 0.8,
            chromatic_aberration: 0.05,
            vignette: 0.2,
            grain: 0.05,
            motion_blur: 0.3,
            contrast: 1.4,
            saturation: 1.6,
            gamma: 0.8,
            glow_radius: 2.5,
            beat_reactivity: 2.0,
        },
        transitions: TransitionPrefs {
            default_type: "zoom_blur",
            duration: 0.5,
            beat_sync: true,
            drop_flash: 1.0,
        },
        clarity_modifier: 0.8,
        intensity: 1.5,
    }
}

/// Black and white with dramatic shadows
pub fn noir_style() -> PresetStyle {
    PresetStyle {
        name: "noir",
        description: "Black and white with dramatic shadows",
        effects: EffectParams {
            bloom: 0.2,
            chromatic_aberration: 0.0,
            vignette: 0.6,
            grain: 0.2,
            motion_blur: 0.1,
            contrast: 1.5,
            saturation: 0.1,
            gamma: 0.75,
            glow_radius: 0.8,
            beat_reactivity: 0.8,
        },
        transitions: TransitionPrefs {
            default_type: "crossfade",
            duration: 0.7,
            beat_sync: false,
            drop_flash: 0.4,
        },
        clarity_modifier: 1.2,
        intensity: 0.9,
    }
}

/// Every built-in preset
pub fn all_presets() -> Vec<PresetStyle> {
    vec![
        default_style(),
        neon_style(),
        ethereal_style(),
        cinematic_style(),
        retro_style(),
        minimal_style(),
        psychedelic_style(),
        noir_style(),
    ]
}
