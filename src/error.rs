use thiserror::Error;

/// Main error type for the synth analyzer
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Artifact format error: {0}")]
    Format(#[from] FormatError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage} failed for '{input}': {source}")]
    Stage {
        stage: &'static str,
        input: String,
        #[source]
        source: Box<SynthError>,
    },

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors in the feature document supplied by the extraction step
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read feature file: {path} ({reason})")]
    LoadFailed { path: String, reason: String },

    #[error("Failed to parse feature file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Length mismatch in '{field}': expected {expected} samples, found {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value for '{field}': {details}")]
    InvalidValue { field: String, details: String },

    #[error("'{field}' must be sorted in ascending order")]
    NotSorted { field: String },
}

/// Errors raised while encoding or decoding a .synth artifact
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Bad magic bytes: {found:02X?}")]
    BadMagic { found: Vec<u8> },

    #[error("Truncated {block}: needed {needed} bytes, {available} available")]
    Truncated {
        block: String,
        needed: usize,
        available: usize,
    },

    #[error("Length prefix of {block} overruns the file: declared {declared} bytes, {remaining} remaining")]
    LengthOverrun {
        block: String,
        declared: usize,
        remaining: usize,
    },

    #[error("Failed to decode {block}: {reason}")]
    DecodeFailed { block: String, reason: String },

    #[error("Failed to encode {block}: {reason}")]
    EncodeFailed { block: String, reason: String },
}

/// Analysis-specific errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid analysis parameters: {details}")]
    InvalidParameters { details: String },

    #[error("Feature matrix rows have inconsistent width: row {row} has {actual}, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Style-specific errors
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Style not found: {name}")]
    NotFound { name: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SynthError
pub type Result<T> = std::result::Result<T, SynthError>;

impl SynthError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Wrap this error with the pipeline stage and the input it was processing
    pub fn at_stage<S: Into<String>>(self, stage: &'static str, input: S) -> Self {
        Self::Stage {
            stage,
            input: input.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any stage wrappers removed
    pub fn root(&self) -> &SynthError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error only affects the current track
    ///
    /// Batch runs skip tracks whose errors are recoverable and carry on with
    /// the rest of the batch.
    pub fn is_recoverable(&self) -> bool {
        match self.root() {
            Self::Input(_) => true,
            Self::Format(_) => true,
            Self::Io(_) => true,
            Self::Analysis(_) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Stage { stage, input, source } => {
                format!("{} failed for '{}': {}", stage, input, source.user_message())
            }
            Self::Input(InputError::LoadFailed { path, .. }) => {
                format!("Could not read feature file '{}'. Please check the file exists.", path)
            }
            Self::Format(FormatError::BadMagic { .. }) => {
                "Not a .synth file (unrecognized header).".to_string()
            }
            Self::Style(StyleError::NotFound { name }) => {
                format!(
                    "Style '{}' not found. Available styles: auto, default, neon, ethereal, cinematic, retro, minimal, psychedelic, noir",
                    name
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
