use super::{DEFAULT_FEATURE_VALUE, DEFAULT_PLUGIN, DEFAULT_PLUGIN_KEY};
use crate::error::BuildResult;
use crate::feature::{
    new_delete_feature_command, new_is_feature_enabled_command, new_set_feature_command,
    DeleteFeatureInputOptions, IsFeatureEnabledInputOptions, SetFeatureInputOptions,
};
use crate::output::{BoolOutputOptions, ErrorOutputOptions};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureArgs {
    pub runtime_version: RuntimeVersion,
    pub plugin: String,
    pub key: String,
    pub value: String,
    /// Expected answer of IsFeatureEnabled
    pub enabled: bool,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl FeatureArgs {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            plugin: DEFAULT_PLUGIN.to_string(),
            key: DEFAULT_PLUGIN_KEY.to_string(),
            value: DEFAULT_FEATURE_VALUE.to_string(),
            enabled: true,
            error: None,
            validation_strategy: None,
        }
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = plugin.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Expect a failure; clears the expected flag value
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.enabled = false;
        self.error = Some(error.into());
        self
    }

    pub fn with_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.validation_strategy = Some(strategy);
        self
    }

    fn error_output(&self) -> ErrorOutputOptions {
        ErrorOutputOptions {
            runtime_version: self.runtime_version,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }
}

pub fn default_set_feature_command(args: &FeatureArgs) -> BuildResult<Command> {
    let input = SetFeatureInputOptions {
        runtime_version: args.runtime_version,
        plugin: args.plugin.clone(),
        key: args.key.clone(),
        value: args.value.clone(),
    };
    new_set_feature_command(&input, &args.error_output())
}

pub fn default_is_feature_enabled_command(args: &FeatureArgs) -> BuildResult<Command> {
    let input = IsFeatureEnabledInputOptions {
        runtime_version: args.runtime_version,
        plugin: args.plugin.clone(),
        key: args.key.clone(),
    };
    let output = BoolOutputOptions {
        runtime_version: args.runtime_version,
        enabled: args.enabled,
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_is_feature_enabled_command(&input, &output)
}

pub fn default_delete_feature_command(args: &FeatureArgs) -> BuildResult<Command> {
    let input = DeleteFeatureInputOptions {
        runtime_version: args.runtime_version,
        plugin: args.plugin.clone(),
        key: args.key.clone(),
    };
    new_delete_feature_command(&input, &args.error_output())
}
