//! Error types for option validation and command building

use compat_core::{ApiName, RuntimeVersion};
use thiserror::Error;

/// Result type for validators
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for command builders
pub type BuildResult<T> = Result<T, BuildError>;

/// A test record that is illegal for the runtime version it targets
///
/// Every variant names the offending field (as a dotted path into the
/// options) and the runtime version it was checked against.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required for runtime version {version}")]
    MissingField {
        field: String,
        version: RuntimeVersion,
    },

    #[error("{field} is not supported for runtime version {version}")]
    UnsupportedField {
        field: String,
        version: RuntimeVersion,
    },

    #[error("invalid value '{value}' for {field} on runtime version {version}")]
    InvalidValue {
        field: String,
        value: String,
        version: RuntimeVersion,
    },

    #[error("exactly one of {fields} must be set for runtime version {version}")]
    ExclusiveFields {
        fields: String,
        version: RuntimeVersion,
    },

    #[error("{api} API not supported for runtime version {version}")]
    UnsupportedApi {
        api: ApiName,
        version: RuntimeVersion,
    },

    #[error("input runtime version {input} does not match output runtime version {output}")]
    VersionMismatch {
        input: RuntimeVersion,
        output: RuntimeVersion,
    },
}

impl ValidationError {
    pub(crate) fn missing(field: impl Into<String>, version: RuntimeVersion) -> Self {
        ValidationError::MissingField {
            field: field.into(),
            version,
        }
    }

    pub(crate) fn unsupported(field: impl Into<String>, version: RuntimeVersion) -> Self {
        ValidationError::UnsupportedField {
            field: field.into(),
            version,
        }
    }

    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        version: RuntimeVersion,
    ) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            version,
        }
    }

    pub(crate) fn exclusive(fields: impl Into<String>, version: RuntimeVersion) -> Self {
        ValidationError::ExclusiveFields {
            fields: fields.into(),
            version,
        }
    }
}

/// Errors raised while turning options into a command
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to encode {field} as YAML: {source}")]
    Encode {
        field: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

impl BuildError {
    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            BuildError::Invalid(err) => Some(err),
            BuildError::Encode { .. } => None,
        }
    }
}
