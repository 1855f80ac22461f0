//! Configuration faults raised at registration or first generation attempt.

use crate::fault::UnknownFaultKind;
use crate::spec::ParamType;

/// A malformed declaration or an unsatisfiable generation request.
///
/// These abort the affected case and never count as trial failures: the
/// registration path returns them to the caller, and the run path records them
/// against the case while the rest of the suite keeps going.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("input parameter at position {position} has no name")]
    MissingName { position: usize },

    #[error("duplicate input parameter name '{name}'")]
    DuplicateParam { name: String },

    #[error("invalid range for '{name}': min {min} > max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },

    #[error("input '{name}' has no generation strategy: expected a value, regular_expression, or range")]
    NoStrategy { name: String },

    #[error("unsupported input type '{ty}' for '{name}'")]
    UnsupportedType { name: String, ty: ParamType },

    #[error("regular expression on '{name}' cannot drive generation for type '{ty}': only int and float patterns are synthesized")]
    RegexNotGenerable { name: String, ty: ParamType },

    #[error("no registered target named '{name}'")]
    UnknownTarget { name: String },

    #[error("unknown fault kind '{name}'")]
    UnknownFaultKind { name: String },

    #[error("iterations must be a positive integer")]
    InvalidIterations,

    #[error("invalid case declaration: {0}")]
    Declaration(String),

    #[error("failed to build trial worker pool: {0}")]
    WorkerPool(String),
}

impl From<UnknownFaultKind> for ConfigError {
    fn from(err: UnknownFaultKind) -> Self {
        ConfigError::UnknownFaultKind { name: err.0 }
    }
}
