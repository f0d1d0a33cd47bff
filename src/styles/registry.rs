use std::collections::HashMap;

use crate::emotion::Emotion;
use crate::error::{Result, StyleError};
use crate::styles::presets;
use crate::styles::Style;

/// Name that defers the choice of style to the track's dominant emotion
pub const AUTO_STYLE: &str = "auto";

/// Registry for managing available visual styles
///
/// The registry provides a central place to discover and instantiate styles.
/// Styles are registered by name and can be retrieved when an artifact's
/// style block is assembled.
pub struct StyleRegistry {
    styles: HashMap<String, Box<dyn Fn() -> Box<dyn Style> + Send + Sync>>,
}

impl StyleRegistry {
    /// Create a new style registry with all built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            styles: HashMap::new(),
        };

        registry.register_builtin_styles();
        registry
    }

    fn register_builtin_styles(&mut self) {
        for preset in presets::all_presets() {
            let name = preset.name.to_string();
            self.register(name, move || Box::new(preset.clone()));
        }
    }

    /// Register a custom style
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the style
    /// * `factory` - Function that creates new instances of the style
    pub fn register<F>(&mut self, name: String, factory: F)
    where
        F: Fn() -> Box<dyn Style> + Send + Sync + 'static,
    {
        self.styles.insert(name, Box::new(factory));
    }

    /// Get a style by name
    ///
    /// Returns a new instance of the requested style, or None if the style
    /// is not registered.
    pub fn get_style(&self, name: &str) -> Option<Box<dyn Style>> {
        self.styles.get(name).map(|factory| factory())
    }

    /// Resolve a configured style name, expanding `auto` from the dominant emotion
    pub fn resolve(&self, name: &str, dominant: Emotion) -> Result<Box<dyn Style>> {
        let name = if name == AUTO_STYLE {
            style_for_emotion(dominant)
        } else {
            name
        };

        self.get_style(name)
            .ok_or_else(|| StyleError::NotFound { name: name.to_string() }.into())
    }

    /// Get all available style names, sorted
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a style is available; `auto` always is
    pub fn has_style(&self, name: &str) -> bool {
        name == AUTO_STYLE || self.styles.contains_key(name)
    }

    /// Get the number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in style that suits an emotion
pub fn style_for_emotion(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Euphoria | Emotion::Excitement => "neon",
        Emotion::Peace | Emotion::Tenderness => "ethereal",
        Emotion::Nostalgia => "retro",
        Emotion::Sadness | Emotion::Melancholy => "noir",
        Emotion::Chaos => "psychedelic",
        Emotion::Intensity | Emotion::Anger => "cinematic",
        _ => "default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StyleConfig;

    struct FlatStyle;

    impl Style for FlatStyle {
        fn name(&self) -> &str {
            "flat"
        }

        fn description(&self) -> &str {
            "No effects"
        }

        fn default_config(&self) -> StyleConfig {
            StyleConfig::with_intensity(0.0)
        }
    }

    #[test]
    fn test_builtin_styles_available() {
        let registry = StyleRegistry::new();

        for name in ["default", "neon", "ethereal", "cinematic", "retro", "minimal", "psychedelic", "noir"] {
            assert!(registry.has_style(name), "missing {}", name);
        }
        assert!(registry.has_style(AUTO_STYLE));
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_get_style() {
        let registry = StyleRegistry::new();

        let neon = registry.get_style("neon");
        assert!(neon.is_some());
        assert_eq!(neon.unwrap().name(), "neon");

        assert!(registry.get_style("vhs").is_none());
    }

    #[test]
    fn test_auto_resolves_from_emotion() {
        let registry = StyleRegistry::new();

        assert_eq!(registry.resolve(AUTO_STYLE, Emotion::Euphoria).unwrap().name(), "neon");
        assert_eq!(registry.resolve(AUTO_STYLE, Emotion::Melancholy).unwrap().name(), "noir");
        assert_eq!(registry.resolve(AUTO_STYLE, Emotion::Hope).unwrap().name(), "default");
        assert_eq!(registry.resolve("minimal", Emotion::Chaos).unwrap().name(), "minimal");
    }

    #[test]
    fn test_unknown_style_is_error() {
        let registry = StyleRegistry::new();
        let err = registry.resolve("vhs", Emotion::Neutral).err().unwrap();
        assert!(matches!(err, crate::error::SynthError::Style(StyleError::NotFound { .. })));
    }

    #[test]
    fn test_custom_style_registration() {
        let mut registry = StyleRegistry::new();
        registry.register("flat".to_string(), || Box::new(FlatStyle));

        assert!(registry.has_style("flat"));
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.available_styles().first().map(String::as_str), Some("cinematic"));
    }
}
