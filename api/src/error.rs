//! API errors

use thiserror::Error;

/// Errors raised while building a scene.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// A named object was referenced before it was declared.
    #[error("{kind} '{name}' is not defined")]
    UnknownReference { kind: &'static str, name: String },

    /// A named object was declared twice.
    #[error("{kind} '{name}' is already defined")]
    DuplicateName { kind: &'static str, name: String },

    /// A parameter value cannot be used.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The scene has nothing to render.
    #[error("scene has no shapes")]
    EmptyScene,

    /// The scene refused to take the object.
    #[error("scene rejected {0}")]
    Rejected(&'static str),
}

impl ApiError {
    /// Shorthand for `InvalidParameter`.
    ///
    /// * `name`   - Parameter name.
    /// * `reason` - What is wrong with it.
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
