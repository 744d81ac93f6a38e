//! Shared steps of every command builder

use crate::error::{BuildError, BuildResult};
use crate::validate::{ensure_same_version, ensure_supported, Validate, Versioned};
use compat_core::{Api, ApiName, ArgumentValue, Arguments, Command, Output, RuntimeVersion};
use serde::Serialize;
use tracing::trace;

/// Validate an input/output pair and return the runtime version they share
///
/// API support is checked first, then the version match, then the options.
pub(crate) fn preflight<I, O>(api: ApiName, input: &I, output: &O) -> BuildResult<RuntimeVersion>
where
    I: Validate + Versioned,
    O: Validate + Versioned,
{
    ensure_supported(api, input.runtime_version())?;
    let version = ensure_same_version(input.runtime_version(), output.runtime_version())?;
    input.validate()?;
    output.validate()?;
    Ok(version)
}

/// Encode a structured payload as a YAML string argument
pub(crate) fn yaml_argument<T: Serialize>(
    value: &T,
    field: &'static str,
) -> BuildResult<ArgumentValue> {
    ArgumentValue::yaml(value).map_err(|source| BuildError::Encode { field, source })
}

/// Expected output of an accessor: an error, the YAML payload, or nothing
pub(crate) fn payload_output<T: Serialize>(
    payload: Option<&T>,
    error: Option<&str>,
    field: &'static str,
) -> BuildResult<Output> {
    match (error, payload) {
        (Some(error), _) => Ok(Output::failed(error)),
        (None, Some(payload)) => serde_yaml::to_string(payload)
            .map(Output::success)
            .map_err(|source| BuildError::Encode { field, source }),
        (None, None) => Ok(Output::success("")),
    }
}

/// Wrap one API record into a single-step command
pub(crate) fn single(
    name: ApiName,
    version: RuntimeVersion,
    arguments: Arguments,
    output: Output,
) -> Command {
    trace!(
        "Built {} command for {} with {} argument(s)",
        name,
        version,
        arguments.len()
    );
    Command::new(Api::new(name, version, arguments, output))
}
