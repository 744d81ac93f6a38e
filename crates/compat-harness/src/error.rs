//! Harness error types
//!
//! Every variant is fatal for the test case being executed. Expected API
//! failures are not errors here; they are asserted through the expected
//! output of each record.

use crate::compare::ComparisonResult;
use compat_core::{ApiName, CoreError, RuntimeVersion};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to launch driver {path} for runtime version {version}: {source}")]
    DriverLaunch {
        version: RuntimeVersion,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("driver for runtime version {version} exited with {status}: {stderr}")]
    DriverExit {
        version: RuntimeVersion,
        status: String,
        stderr: String,
    },

    #[error("driver for runtime version {version} wrote to stderr: {stderr}")]
    DriverStderr {
        version: RuntimeVersion,
        stderr: String,
    },

    #[error("driver for runtime version {version} did not finish within {timeout:?}")]
    DriverTimeout {
        version: RuntimeVersion,
        timeout: Duration,
    },

    #[error("malformed output from driver for runtime version {version}: {source}")]
    MalformedStdout {
        version: RuntimeVersion,
        #[source]
        source: CoreError,
    },

    #[error("driver for runtime version {version} produced no response for {api}")]
    MissingResponse {
        version: RuntimeVersion,
        api: ApiName,
    },

    #[error("driver for runtime version {version} emitted {count} unexpected response(s) for {apis:?}")]
    UnexpectedResponses {
        version: RuntimeVersion,
        count: usize,
        apis: Vec<ApiName>,
    },

    #[error("request for runtime version {version} is {size} bytes, over the {limit} byte argument limit")]
    PayloadTooLarge {
        version: RuntimeVersion,
        size: usize,
        limit: usize,
    },

    #[error("{} on runtime version {} did not match expectations ({} difference(s))", .0.api, .0.version, .0.differences.len())]
    Mismatch(Box<ComparisonResult>),

    #[error("failed to prepare scratch config directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("failed to encode driver request: {0}")]
    Encode(#[source] CoreError),
}

impl HarnessError {
    /// The failed comparison, if this is a mismatch
    pub fn comparison(&self) -> Option<&ComparisonResult> {
        match self {
            HarnessError::Mismatch(result) => Some(result),
            _ => None,
        }
    }
}
