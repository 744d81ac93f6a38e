//! Config metadata APIs (v0.28.0 and later)

use crate::command::{payload_output, preflight, single};
use crate::error::{BuildResult, ValidationError, ValidationResult};
use crate::output::{BoolOutputOptions, ErrorOutputOptions};
use crate::validate::{
    ensure_supported, impl_versioned, payload_or_error, require_non_empty, Validate,
};
use compat_core::types::MetadataOpts;
use compat_core::{
    ApiName, ArgumentKey, Arguments, Command, Output, RuntimeVersion, ValidationStrategy,
};
use std::collections::BTreeMap;

/// The only patch strategy the runtime understands
pub const REPLACE_PATCH_STRATEGY: &str = "replace";

// ============================================================================
// Patch strategies
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetConfigMetadataPatchStrategyInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
    pub value: String,
}

pub type SetConfigMetadataPatchStrategyOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetConfigMetadataPatchStrategyInputOptions {
    pub runtime_version: RuntimeVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetConfigMetadataPatchStrategyOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub patch_strategy: Option<BTreeMap<String, String>>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfigMetadataPatchStrategyInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
}

pub type DeleteConfigMetadataPatchStrategyOutputOptions = ErrorOutputOptions;

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetConfigMetadataSettingInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
    pub value: String,
}

pub type SetConfigMetadataSettingOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetConfigMetadataSettingInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
}

/// Expected setting value; compared verbatim as a string response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetConfigMetadataSettingOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub value: Option<String>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfigMetadataSettingInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
}

pub type DeleteConfigMetadataSettingOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsConfigMetadataSettingsEnabledInputOptions {
    pub runtime_version: RuntimeVersion,
    pub key: String,
}

pub type IsConfigMetadataSettingsEnabledOutputOptions = BoolOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseUnifiedConfigInputOptions {
    pub runtime_version: RuntimeVersion,
}

pub type UseUnifiedConfigOutputOptions = BoolOutputOptions;

// ============================================================================
// Whole metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMetadataInputOptions {
    pub runtime_version: RuntimeVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMetadataOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub metadata_opts: Option<MetadataOpts>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl_versioned!(
    SetConfigMetadataPatchStrategyInputOptions,
    GetConfigMetadataPatchStrategyInputOptions,
    GetConfigMetadataPatchStrategyOutputOptions,
    DeleteConfigMetadataPatchStrategyInputOptions,
    SetConfigMetadataSettingInputOptions,
    GetConfigMetadataSettingInputOptions,
    GetConfigMetadataSettingOutputOptions,
    DeleteConfigMetadataSettingInputOptions,
    IsConfigMetadataSettingsEnabledInputOptions,
    UseUnifiedConfigInputOptions,
    GetMetadataInputOptions,
    GetMetadataOutputOptions,
);

// ============================================================================
// Validators
// ============================================================================

fn validate_patch_strategy(
    key: &str,
    strategy: &str,
    path: &str,
    version: RuntimeVersion,
) -> ValidationResult<()> {
    require_non_empty(key, path, version)?;
    if strategy != REPLACE_PATCH_STRATEGY {
        return Err(ValidationError::invalid(
            format!("{}[{}]", path, key),
            strategy,
            version,
        ));
    }
    Ok(())
}

fn validate_metadata_opts(metadata: &MetadataOpts, version: RuntimeVersion) -> ValidationResult<()> {
    let Some(config_metadata) = &metadata.config_metadata else {
        return Ok(());
    };
    for (key, strategy) in &config_metadata.patch_strategy {
        validate_patch_strategy(
            key,
            strategy,
            "metadataOpts.configMetadata.patchStrategy",
            version,
        )?;
    }
    for key in config_metadata.settings.keys() {
        require_non_empty(key, "metadataOpts.configMetadata.settings", version)?;
    }
    Ok(())
}

impl Validate for SetConfigMetadataPatchStrategyInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetConfigMetadataPatchStrategy, self.runtime_version)?;
        require_non_empty(&self.key, "key", self.runtime_version)?;
        if self.value != REPLACE_PATCH_STRATEGY {
            return Err(ValidationError::invalid(
                "patchStrategy",
                &self.value,
                self.runtime_version,
            ));
        }
        Ok(())
    }
}

impl Validate for GetConfigMetadataPatchStrategyInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetConfigMetadataPatchStrategy, self.runtime_version)
    }
}

impl Validate for GetConfigMetadataPatchStrategyOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.patch_strategy,
            &self.error,
            "patchStrategy",
            self.runtime_version,
        )?;
        for (key, strategy) in self.patch_strategy.iter().flatten() {
            validate_patch_strategy(key, strategy, "patchStrategy", self.runtime_version)?;
        }
        Ok(())
    }
}

impl Validate for DeleteConfigMetadataPatchStrategyInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteConfigMetadataPatchStrategy, self.runtime_version)?;
        require_non_empty(&self.key, "key", self.runtime_version)
    }
}

impl Validate for SetConfigMetadataSettingInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetConfigMetadataSetting, self.runtime_version)?;
        require_non_empty(&self.key, "settingKey", self.runtime_version)?;
        require_non_empty(&self.value, "settingValue", self.runtime_version)
    }
}

impl Validate for GetConfigMetadataSettingInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetConfigMetadataSetting, self.runtime_version)?;
        require_non_empty(&self.key, "settingKey", self.runtime_version)
    }
}

impl Validate for GetConfigMetadataSettingOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(&self.value, &self.error, "value", self.runtime_version)
    }
}

impl Validate for DeleteConfigMetadataSettingInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteConfigMetadataSetting, self.runtime_version)?;
        require_non_empty(&self.key, "settingKey", self.runtime_version)
    }
}

impl Validate for IsConfigMetadataSettingsEnabledInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::IsConfigMetadataSettingsEnabled, self.runtime_version)?;
        require_non_empty(&self.key, "settingKey", self.runtime_version)
    }
}

impl Validate for UseUnifiedConfigInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::UseUnifiedConfig, self.runtime_version)
    }
}

impl Validate for GetMetadataInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetMetadata, self.runtime_version)
    }
}

impl Validate for GetMetadataOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.metadata_opts,
            &self.error,
            "metadataOpts",
            self.runtime_version,
        )?;
        match &self.metadata_opts {
            Some(metadata) => validate_metadata_opts(metadata, self.runtime_version),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

fn key_argument(key_name: ArgumentKey, key: &str) -> Arguments {
    let mut arguments = Arguments::new();
    arguments.insert(key_name, key.into());
    arguments
}

pub fn new_set_config_metadata_patch_strategy_command(
    input: &SetConfigMetadataPatchStrategyInputOptions,
    output: &SetConfigMetadataPatchStrategyOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::SetConfigMetadataPatchStrategy;
    let version = preflight(api, input, output)?;

    let mut arguments = key_argument(ArgumentKey::Key, &input.key);
    arguments.insert(ArgumentKey::PatchStrategy, input.value.as_str().into());

    Ok(single(api, version, arguments, output.expected()))
}

pub fn new_get_config_metadata_patch_strategy_command(
    input: &GetConfigMetadataPatchStrategyInputOptions,
    output: &GetConfigMetadataPatchStrategyOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::GetConfigMetadataPatchStrategy;
    let version = preflight(api, input, output)?;
    let expected = payload_output(
        output.patch_strategy.as_ref(),
        output.error.as_deref(),
        "patchStrategy",
    )?;

    Ok(single(
        api,
        version,
        Arguments::new(),
        expected.with_strategy(output.validation_strategy),
    ))
}

pub fn new_delete_config_metadata_patch_strategy_command(
    input: &DeleteConfigMetadataPatchStrategyInputOptions,
    output: &DeleteConfigMetadataPatchStrategyOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::DeleteConfigMetadataPatchStrategy;
    let version = preflight(api, input, output)?;

    Ok(single(
        api,
        version,
        key_argument(ArgumentKey::Key, &input.key),
        output.expected(),
    ))
}

pub fn new_set_config_metadata_setting_command(
    input: &SetConfigMetadataSettingInputOptions,
    output: &SetConfigMetadataSettingOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::SetConfigMetadataSetting;
    let version = preflight(api, input, output)?;

    let mut arguments = key_argument(ArgumentKey::SettingKey, &input.key);
    arguments.insert(ArgumentKey::SettingValue, input.value.as_str().into());

    Ok(single(api, version, arguments, output.expected()))
}

pub fn new_get_config_metadata_setting_command(
    input: &GetConfigMetadataSettingInputOptions,
    output: &GetConfigMetadataSettingOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::GetConfigMetadataSetting;
    let version = preflight(api, input, output)?;

    let expected = match (&output.error, &output.value) {
        (Some(error), _) => Output::failed(error.clone()),
        (None, value) => Output::success(value.clone().unwrap_or_default()),
    };

    Ok(single(
        api,
        version,
        key_argument(ArgumentKey::SettingKey, &input.key),
        expected.with_strategy(output.validation_strategy),
    ))
}

pub fn new_delete_config_metadata_setting_command(
    input: &DeleteConfigMetadataSettingInputOptions,
    output: &DeleteConfigMetadataSettingOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::DeleteConfigMetadataSetting;
    let version = preflight(api, input, output)?;

    Ok(single(
        api,
        version,
        key_argument(ArgumentKey::SettingKey, &input.key),
        output.expected(),
    ))
}

pub fn new_is_config_metadata_settings_enabled_command(
    input: &IsConfigMetadataSettingsEnabledInputOptions,
    output: &IsConfigMetadataSettingsEnabledOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::IsConfigMetadataSettingsEnabled;
    let version = preflight(api, input, output)?;

    Ok(single(
        api,
        version,
        key_argument(ArgumentKey::SettingKey, &input.key),
        output.expected(),
    ))
}

pub fn new_use_unified_config_command(
    input: &UseUnifiedConfigInputOptions,
    output: &UseUnifiedConfigOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::UseUnifiedConfig;
    let version = preflight(api, input, output)?;

    Ok(single(api, version, Arguments::new(), output.expected()))
}

pub fn new_get_metadata_command(
    input: &GetMetadataInputOptions,
    output: &GetMetadataOutputOptions,
) -> BuildResult<Command> {
    let api = ApiName::GetMetadata;
    let version = preflight(api, input, output)?;
    let expected = payload_output(
        output.metadata_opts.as_ref(),
        output.error.as_deref(),
        "metadataOpts",
    )?;

    Ok(single(
        api,
        version,
        Arguments::new(),
        expected.with_strategy(output.validation_strategy),
    ))
}
