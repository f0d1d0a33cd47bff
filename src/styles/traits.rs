use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core trait that all visual styles implement
pub trait Style: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Parameters written into the artifact's style block
    fn default_config(&self) -> StyleConfig;

    /// Transition used between sections unless the section calls for
    /// something specific
    fn default_transition(&self) -> &str {
        "crossfade"
    }

    /// Transition length in seconds
    fn transition_duration(&self) -> f64 {
        0.5
    }
}

/// Flexible parameter set for a style
///
/// Keys are kept sorted so the encoded style block is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Overall strength of the style (0.0 = none, 1.0 = nominal)
    pub intensity: f64,

    /// Style-specific parameters
    pub parameters: BTreeMap<String, StyleValue>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            parameters: BTreeMap::new(),
        }
    }
}

impl StyleConfig {
    /// Create a new config with the given intensity
    pub fn with_intensity(intensity: f64) -> Self {
        Self {
            intensity: intensity.max(0.0),
            parameters: BTreeMap::new(),
        }
    }

    /// Set a parameter value
    pub fn set<K: Into<String>, V: Into<StyleValue>>(mut self, key: K, value: V) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.parameters.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_string())
    }

    /// Get a parameter value with a default
    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }

    /// Flatten into the parameter map stored in the artifact, with the
    /// intensity under its own key
    pub fn into_params(self) -> BTreeMap<String, StyleValue> {
        let mut params = self.parameters;
        params.insert("intensity".to_string(), StyleValue::Float(self.intensity));
        params
    }
}

/// Parameter value of any of the types a style block can carry.
///
/// Variant order matters for decoding: integers must be tried before floats
/// so that a decoded integer stays an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Float(f) => Some(*f),
            StyleValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            StyleValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StyleValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Float(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::String(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::String(value.to_string())
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Integer(value)
    }
}
