//! Context APIs
//!
//! Contexts are the area where runtime generations disagree most:
//!
//! | Version | Kind field | Allowed values |
//! |---|---|---|
//! | v0.25.4 | `type` | k8s, tmc |
//! | v0.28.0 .. v1.0.2 | `target` | kubernetes, mission-control, global |
//! | latest | `target` and/or `contextType` | as above; contextType also tanzu |
//!
//! v0.11.6 predates contexts entirely.

use crate::command::{payload_output, preflight, single, yaml_argument};
use crate::discovery::validate_discovery_source;
use crate::error::{BuildResult, ValidationError, ValidationResult};
use crate::output::ErrorOutputOptions;
use crate::validate::{
    ensure_supported, field, forbid, impl_versioned, legacy_context_type, payload_or_error,
    require, require_non_empty, Validate,
};
use compat_core::types::{ContextOpts, ContextType, Target};
use compat_core::{
    ApiName, ArgumentKey, ArgumentValue, Arguments, Command, Output, RuntimeVersion,
    ValidationStrategy,
};

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_opts: ContextOpts,
    pub set_current: bool,
}

pub type SetContextOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_name: String,
}

/// Expected context returned by GetContext, GetCurrentContext or GetActiveContext
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_opts: Option<ContextOpts>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

pub type GetContextOutputOptions = ContextOutputOptions;
pub type GetCurrentContextOutputOptions = ContextOutputOptions;
pub type GetActiveContextOutputOptions = ContextOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_name: String,
}

pub type DeleteContextOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCurrentContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_name: String,
}

pub type SetCurrentContextOutputOptions = ErrorOutputOptions;

/// Selects the current context by `target` (v0.28.0+) or `contextType` (v0.25.4)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCurrentContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub target: Option<Target>,
    pub context_type: Option<ContextType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveCurrentContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub target: Option<Target>,
    pub context_type: Option<ContextType>,
}

pub type RemoveCurrentContextOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetActiveContextInputOptions {
    pub runtime_version: RuntimeVersion,
    pub context_type: Option<ContextType>,
}

impl_versioned!(
    SetContextInputOptions,
    GetContextInputOptions,
    ContextOutputOptions,
    DeleteContextInputOptions,
    SetCurrentContextInputOptions,
    GetCurrentContextInputOptions,
    RemoveCurrentContextInputOptions,
    GetActiveContextInputOptions,
);

// ============================================================================
// Validators
// ============================================================================

/// Check a context record against the shape its runtime version understands
pub(crate) fn validate_context_opts(
    context: &ContextOpts,
    version: RuntimeVersion,
    path: &str,
) -> ValidationResult<()> {
    if version == RuntimeVersion::V0116 {
        return Err(ValidationError::unsupported(path, version));
    }

    require_non_empty(&context.name, &field(path, "name"), version)?;

    match version {
        RuntimeVersion::V0254 => {
            forbid(&context.target, &field(path, "target"), version)?;
            forbid(&context.context_type, &field(path, "contextType"), version)?;
            let kind = require(&context.legacy_type, &field(path, "type"), version)?;
            legacy_context_type(*kind, &field(path, "type"), version)?;
        }
        RuntimeVersion::Latest => {
            forbid(&context.legacy_type, &field(path, "type"), version)?;
            if context.target.is_none() && context.context_type.is_none() {
                return Err(ValidationError::missing(
                    field(path, "target or contextType"),
                    version,
                ));
            }
        }
        _ => {
            forbid(&context.legacy_type, &field(path, "type"), version)?;
            forbid(&context.context_type, &field(path, "contextType"), version)?;
            require(&context.target, &field(path, "target"), version)?;
        }
    }

    match (&context.global_opts, &context.cluster_opts) {
        (Some(global), None) => {
            require_non_empty(&global.endpoint, &field(path, "globalOpts.endpoint"), version)?
        }
        (None, Some(cluster)) => {
            require_non_empty(&cluster.endpoint, &field(path, "clusterOpts.endpoint"), version)?
        }
        _ => {
            return Err(ValidationError::exclusive(
                format!(
                    "{}, {}",
                    field(path, "globalOpts"),
                    field(path, "clusterOpts")
                ),
                version,
            ))
        }
    }

    for (i, source) in context.discovery_sources.iter().enumerate() {
        validate_discovery_source(
            source,
            version,
            &field(path, &format!("discoverySources[{}]", i)),
        )?;
    }

    Ok(())
}

/// `target` on v0.28.0 and later, `contextType` on v0.25.4; never both
fn validate_context_selector(
    target: &Option<Target>,
    context_type: &Option<ContextType>,
    version: RuntimeVersion,
) -> ValidationResult<()> {
    if version == RuntimeVersion::V0254 {
        forbid(target, "target", version)?;
        let kind = require(context_type, "contextType", version)?;
        legacy_context_type(*kind, "contextType", version)
    } else {
        forbid(context_type, "contextType", version)?;
        require(target, "target", version).map(|_| ())
    }
}

impl Validate for SetContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetContext, self.runtime_version)?;
        validate_context_opts(&self.context_opts, self.runtime_version, "context")
    }
}

impl Validate for GetContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetContext, self.runtime_version)?;
        require_non_empty(&self.context_name, "contextName", self.runtime_version)
    }
}

impl Validate for ContextOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.context_opts,
            &self.error,
            "contextOpts",
            self.runtime_version,
        )?;
        match &self.context_opts {
            Some(context) => validate_context_opts(context, self.runtime_version, "contextOpts"),
            None => Ok(()),
        }
    }
}

impl Validate for DeleteContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteContext, self.runtime_version)?;
        require_non_empty(&self.context_name, "contextName", self.runtime_version)
    }
}

impl Validate for SetCurrentContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetCurrentContext, self.runtime_version)?;
        require_non_empty(&self.context_name, "contextName", self.runtime_version)
    }
}

impl Validate for GetCurrentContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetCurrentContext, self.runtime_version)?;
        validate_context_selector(&self.target, &self.context_type, self.runtime_version)
    }
}

impl Validate for RemoveCurrentContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::RemoveCurrentContext, self.runtime_version)?;
        validate_context_selector(&self.target, &self.context_type, self.runtime_version)
    }
}

impl Validate for GetActiveContextInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetActiveContext, self.runtime_version)?;
        require(&self.context_type, "contextType", self.runtime_version).map(|_| ())
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn new_set_context_command(
    input: &SetContextInputOptions,
    output: &SetContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetContext, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(
        ArgumentKey::Context,
        yaml_argument(&input.context_opts, "context")?,
    );
    arguments.insert(ArgumentKey::SetCurrent, input.set_current.into());

    Ok(single(ApiName::SetContext, version, arguments, output.expected()))
}

pub fn new_get_context_command(
    input: &GetContextInputOptions,
    output: &GetContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetContext, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::ContextName, input.context_name.as_str().into());

    Ok(single(
        ApiName::GetContext,
        version,
        arguments,
        output.expected()?,
    ))
}

pub fn new_delete_context_command(
    input: &DeleteContextInputOptions,
    output: &DeleteContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::DeleteContext, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::ContextName, input.context_name.as_str().into());

    Ok(single(ApiName::DeleteContext, version, arguments, output.expected()))
}

pub fn new_set_current_context_command(
    input: &SetCurrentContextInputOptions,
    output: &SetCurrentContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetCurrentContext, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::ContextName, input.context_name.as_str().into());

    Ok(single(
        ApiName::SetCurrentContext,
        version,
        arguments,
        output.expected(),
    ))
}

pub fn new_get_current_context_command(
    input: &GetCurrentContextInputOptions,
    output: &GetCurrentContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetCurrentContext, input, output)?;
    let arguments = selector_arguments(&input.target, &input.context_type);

    Ok(single(
        ApiName::GetCurrentContext,
        version,
        arguments,
        output.expected()?,
    ))
}

pub fn new_remove_current_context_command(
    input: &RemoveCurrentContextInputOptions,
    output: &RemoveCurrentContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::RemoveCurrentContext, input, output)?;
    let arguments = selector_arguments(&input.target, &input.context_type);

    Ok(single(
        ApiName::RemoveCurrentContext,
        version,
        arguments,
        output.expected(),
    ))
}

pub fn new_get_active_context_command(
    input: &GetActiveContextInputOptions,
    output: &GetActiveContextOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetActiveContext, input, output)?;
    let arguments = selector_arguments(&None, &input.context_type);

    Ok(single(
        ApiName::GetActiveContext,
        version,
        arguments,
        output.expected()?,
    ))
}

fn selector_arguments(target: &Option<Target>, context_type: &Option<ContextType>) -> Arguments {
    let mut arguments = Arguments::new();
    if let Some(target) = target {
        arguments.insert(ArgumentKey::Target, ArgumentValue::from(target.as_str()));
    }
    if let Some(context_type) = context_type {
        arguments.insert(
            ArgumentKey::ContextType,
            ArgumentValue::from(context_type.as_str()),
        );
    }
    arguments
}

impl ContextOutputOptions {
    fn expected(&self) -> BuildResult<Output> {
        payload_output(
            self.context_opts.as_ref(),
            self.error.as_deref(),
            "contextOpts",
        )
        .map(|output| output.with_strategy(self.validation_strategy))
    }
}
