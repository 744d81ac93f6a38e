//! Error types for the core vocabulary and the driver wire format

use crate::api::ApiName;
use crate::version::RuntimeVersion;
use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while assembling commands or (de)serializing driver traffic
#[derive(Debug, Error)]
pub enum CoreError {
    /// Runtime version string outside the supported set
    #[error("unknown runtime version '{0}'")]
    UnknownVersion(String),

    /// API name outside the supported set
    #[error("unknown API name '{0}'")]
    UnknownApiName(String),

    /// A command may only hold records targeting one runtime version
    #[error("command targets runtime version {expected} but record {api} targets {found}")]
    MixedVersions {
        api: ApiName,
        expected: RuntimeVersion,
        found: RuntimeVersion,
    },

    /// Cannot combine zero commands into one
    #[error("cannot combine an empty list of commands")]
    EmptyCommand,

    /// Failed to serialize API records for the driver
    #[error("failed to encode API records: {0}")]
    EncodeRequest(#[source] serde_yaml::Error),

    /// Failed to parse API records sent to a driver
    #[error("failed to decode API records: {0}")]
    DecodeRequest(#[source] serde_yaml::Error),

    /// A stdout line is not a valid response record
    #[error("malformed response record on stdout line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A response record parsed but names an unknown API or carries a body
    /// that does not match its declared type
    #[error("invalid response record for {api} on stdout line {line}: {reason}")]
    InvalidRecord {
        line: usize,
        api: String,
        reason: String,
    },

    /// Failed to render a response record as a JSON line
    #[error("failed to encode response record for {api}: {source}")]
    EncodeRecord {
        api: ApiName,
        #[source]
        source: serde_json::Error,
    },
}
