use super::{DEFAULT_PATCH_STRATEGY_KEY, DEFAULT_SETTING_KEY, DEFAULT_SETTING_VALUE};
use crate::error::BuildResult;
use crate::metadata::{
    new_delete_config_metadata_patch_strategy_command,
    new_delete_config_metadata_setting_command, new_get_config_metadata_patch_strategy_command,
    new_get_config_metadata_setting_command, new_get_metadata_command,
    new_is_config_metadata_settings_enabled_command,
    new_set_config_metadata_patch_strategy_command, new_set_config_metadata_setting_command,
    new_use_unified_config_command, DeleteConfigMetadataPatchStrategyInputOptions,
    DeleteConfigMetadataSettingInputOptions, GetConfigMetadataPatchStrategyInputOptions,
    GetConfigMetadataPatchStrategyOutputOptions, GetConfigMetadataSettingInputOptions,
    GetConfigMetadataSettingOutputOptions, GetMetadataInputOptions, GetMetadataOutputOptions,
    IsConfigMetadataSettingsEnabledInputOptions, SetConfigMetadataPatchStrategyInputOptions,
    SetConfigMetadataSettingInputOptions, UseUnifiedConfigInputOptions, REPLACE_PATCH_STRATEGY,
};
use crate::output::{BoolOutputOptions, ErrorOutputOptions};
use compat_core::types::{ConfigMetadataOpts, MetadataOpts};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};
use std::collections::BTreeMap;

/// Arguments shared by the config metadata helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataArgs {
    pub runtime_version: RuntimeVersion,
    pub patch_strategy_key: String,
    pub setting_key: String,
    pub setting_value: String,
    /// Expected answer of UseUnifiedConfig and IsConfigMetadataSettingsEnabled
    pub enabled: bool,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl MetadataArgs {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            patch_strategy_key: DEFAULT_PATCH_STRATEGY_KEY.to_string(),
            setting_key: DEFAULT_SETTING_KEY.to_string(),
            setting_value: DEFAULT_SETTING_VALUE.to_string(),
            enabled: false,
            error: None,
            validation_strategy: None,
        }
    }

    pub fn with_patch_strategy_key(mut self, key: impl Into<String>) -> Self {
        self.patch_strategy_key = key.into();
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.setting_key = key.into();
        self.setting_value = value.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.enabled = false;
        self.error = Some(error.into());
        self
    }

    pub fn with_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.validation_strategy = Some(strategy);
        self
    }

    /// Patch strategies as written by the default set helper
    pub fn patch_strategies(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            self.patch_strategy_key.clone(),
            REPLACE_PATCH_STRATEGY.to_string(),
        )])
    }

    /// Metadata as written by the default set helpers
    pub fn metadata_opts(&self) -> MetadataOpts {
        MetadataOpts {
            config_metadata: Some(ConfigMetadataOpts {
                patch_strategy: self.patch_strategies(),
                settings: BTreeMap::from([(
                    self.setting_key.clone(),
                    self.setting_value.clone(),
                )]),
            }),
        }
    }

    fn error_output(&self) -> ErrorOutputOptions {
        ErrorOutputOptions {
            runtime_version: self.runtime_version,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }

    fn bool_output(&self) -> BoolOutputOptions {
        BoolOutputOptions {
            runtime_version: self.runtime_version,
            enabled: self.enabled,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }
}

pub fn default_set_config_metadata_patch_strategy_command(
    args: &MetadataArgs,
) -> BuildResult<Command> {
    let input = SetConfigMetadataPatchStrategyInputOptions {
        runtime_version: args.runtime_version,
        key: args.patch_strategy_key.clone(),
        value: REPLACE_PATCH_STRATEGY.to_string(),
    };
    new_set_config_metadata_patch_strategy_command(&input, &args.error_output())
}

pub fn default_get_config_metadata_patch_strategy_command(
    args: &MetadataArgs,
) -> BuildResult<Command> {
    let input = GetConfigMetadataPatchStrategyInputOptions {
        runtime_version: args.runtime_version,
    };
    let output = GetConfigMetadataPatchStrategyOutputOptions {
        runtime_version: args.runtime_version,
        patch_strategy: args.error.is_none().then(|| args.patch_strategies()),
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_get_config_metadata_patch_strategy_command(&input, &output)
}

pub fn default_delete_config_metadata_patch_strategy_command(
    args: &MetadataArgs,
) -> BuildResult<Command> {
    let input = DeleteConfigMetadataPatchStrategyInputOptions {
        runtime_version: args.runtime_version,
        key: args.patch_strategy_key.clone(),
    };
    new_delete_config_metadata_patch_strategy_command(&input, &args.error_output())
}

pub fn default_set_config_metadata_setting_command(args: &MetadataArgs) -> BuildResult<Command> {
    let input = SetConfigMetadataSettingInputOptions {
        runtime_version: args.runtime_version,
        key: args.setting_key.clone(),
        value: args.setting_value.clone(),
    };
    new_set_config_metadata_setting_command(&input, &args.error_output())
}

pub fn default_get_config_metadata_setting_command(args: &MetadataArgs) -> BuildResult<Command> {
    let input = GetConfigMetadataSettingInputOptions {
        runtime_version: args.runtime_version,
        key: args.setting_key.clone(),
    };
    let output = GetConfigMetadataSettingOutputOptions {
        runtime_version: args.runtime_version,
        value: args.error.is_none().then(|| args.setting_value.clone()),
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_get_config_metadata_setting_command(&input, &output)
}

pub fn default_delete_config_metadata_setting_command(
    args: &MetadataArgs,
) -> BuildResult<Command> {
    let input = DeleteConfigMetadataSettingInputOptions {
        runtime_version: args.runtime_version,
        key: args.setting_key.clone(),
    };
    new_delete_config_metadata_setting_command(&input, &args.error_output())
}

pub fn default_is_config_metadata_settings_enabled_command(
    args: &MetadataArgs,
) -> BuildResult<Command> {
    let input = IsConfigMetadataSettingsEnabledInputOptions {
        runtime_version: args.runtime_version,
        key: args.setting_key.clone(),
    };
    new_is_config_metadata_settings_enabled_command(&input, &args.bool_output())
}

pub fn default_use_unified_config_command(args: &MetadataArgs) -> BuildResult<Command> {
    let input = UseUnifiedConfigInputOptions {
        runtime_version: args.runtime_version,
    };
    new_use_unified_config_command(&input, &args.bool_output())
}

pub fn default_get_metadata_command(args: &MetadataArgs) -> BuildResult<Command> {
    let input = GetMetadataInputOptions {
        runtime_version: args.runtime_version,
    };
    let output = GetMetadataOutputOptions {
        runtime_version: args.runtime_version,
        metadata_opts: args.error.is_none().then(|| args.metadata_opts()),
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_get_metadata_command(&input, &output)
}
