//! Feature flag APIs

use crate::command::{preflight, single};
use crate::error::{BuildResult, ValidationResult};
use crate::output::{BoolOutputOptions, ErrorOutputOptions};
use crate::validate::{ensure_supported, impl_versioned, require_non_empty, Validate};
use compat_core::{ApiName, ArgumentKey, Arguments, Command, RuntimeVersion};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFeatureInputOptions {
    pub runtime_version: RuntimeVersion,
    pub plugin: String,
    pub key: String,
    pub value: String,
}

pub type SetFeatureOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsFeatureEnabledInputOptions {
    pub runtime_version: RuntimeVersion,
    pub plugin: String,
    pub key: String,
}

pub type IsFeatureEnabledOutputOptions = BoolOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteFeatureInputOptions {
    pub runtime_version: RuntimeVersion,
    pub plugin: String,
    pub key: String,
}

pub type DeleteFeatureOutputOptions = ErrorOutputOptions;

impl_versioned!(
    SetFeatureInputOptions,
    IsFeatureEnabledInputOptions,
    DeleteFeatureInputOptions,
);

fn validate_flag(plugin: &str, key: &str, version: RuntimeVersion) -> ValidationResult<()> {
    require_non_empty(plugin, "plugin", version)?;
    require_non_empty(key, "key", version)
}

impl Validate for SetFeatureInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetFeature, self.runtime_version)?;
        validate_flag(&self.plugin, &self.key, self.runtime_version)?;
        require_non_empty(&self.value, "value", self.runtime_version)
    }
}

impl Validate for IsFeatureEnabledInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::IsFeatureEnabled, self.runtime_version)?;
        validate_flag(&self.plugin, &self.key, self.runtime_version)
    }
}

impl Validate for DeleteFeatureInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteFeature, self.runtime_version)?;
        validate_flag(&self.plugin, &self.key, self.runtime_version)
    }
}

fn flag_arguments(plugin: &str, key: &str) -> Arguments {
    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::Plugin, plugin.into());
    arguments.insert(ArgumentKey::Key, key.into());
    arguments
}

pub fn new_set_feature_command(
    input: &SetFeatureInputOptions,
    output: &SetFeatureOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetFeature, input, output)?;

    let mut arguments = flag_arguments(&input.plugin, &input.key);
    arguments.insert(ArgumentKey::Value, input.value.as_str().into());

    Ok(single(ApiName::SetFeature, version, arguments, output.expected()))
}

pub fn new_is_feature_enabled_command(
    input: &IsFeatureEnabledInputOptions,
    output: &IsFeatureEnabledOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::IsFeatureEnabled, input, output)?;

    Ok(single(
        ApiName::IsFeatureEnabled,
        version,
        flag_arguments(&input.plugin, &input.key),
        output.expected(),
    ))
}

pub fn new_delete_feature_command(
    input: &DeleteFeatureInputOptions,
    output: &DeleteFeatureOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::DeleteFeature, input, output)?;

    Ok(single(
        ApiName::DeleteFeature,
        version,
        flag_arguments(&input.plugin, &input.key),
        output.expected(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, ValidationError};
    use compat_core::{ArgumentValue, ResultCode};

    #[test]
    fn test_set_feature_arguments_in_order() {
        let command = new_set_feature_command(
            &SetFeatureInputOptions {
                runtime_version: RuntimeVersion::V0280,
                plugin: "compatibility-tests-plugin".to_string(),
                key: "compatibility-tests-plugin-key".to_string(),
                value: "true".to_string(),
            },
            &ErrorOutputOptions::new(RuntimeVersion::V0280),
        )
        .unwrap();

        let api = &command.apis()[0];
        let keys: Vec<_> = api.arguments.keys().copied().collect();
        assert_eq!(
            keys,
            vec![ArgumentKey::Plugin, ArgumentKey::Key, ArgumentKey::Value]
        );
        assert_eq!(api.arguments[&ArgumentKey::Value], ArgumentValue::from("true"));
    }

    #[test]
    fn test_set_feature_unsupported_before_v0280() {
        for version in [RuntimeVersion::V0116, RuntimeVersion::V0254] {
            let err = new_set_feature_command(
                &SetFeatureInputOptions {
                    runtime_version: version,
                    plugin: "p".to_string(),
                    key: "k".to_string(),
                    value: "true".to_string(),
                },
                &ErrorOutputOptions::new(version),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                BuildError::Invalid(ValidationError::UnsupportedApi {
                    api: ApiName::SetFeature,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_is_feature_enabled_on_every_version() {
        for version in RuntimeVersion::ALL {
            let command = new_is_feature_enabled_command(
                &IsFeatureEnabledInputOptions {
                    runtime_version: version,
                    plugin: "compatibility-tests-plugin".to_string(),
                    key: "compatibility-tests-plugin-key".to_string(),
                },
                &BoolOutputOptions::new(version, true),
            )
            .unwrap();
            let output = &command.apis()[0].output;
            assert_eq!(output.result, ResultCode::Success);
            assert_eq!(output.content, "true");
        }
    }

    #[test]
    fn test_feature_requires_plugin_and_key() {
        let input = DeleteFeatureInputOptions {
            runtime_version: RuntimeVersion::Latest,
            plugin: String::new(),
            key: "k".to_string(),
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::MissingField { ref field, .. }) if field == "plugin"
        ));
    }
}
