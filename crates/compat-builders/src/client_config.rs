//! Whole client config APIs
//!
//! These exist on every runtime version, which makes StoreClientConfig the
//! only way to write feature flags before v0.28.0.

use crate::command::{payload_output, preflight, single, yaml_argument};
use crate::context::validate_context_opts;
use crate::discovery::validate_discovery_source;
use crate::error::{BuildResult, ValidationError, ValidationResult};
use crate::output::ErrorOutputOptions;
use crate::server::validate_server_opts;
use crate::validate::{
    ensure_supported, field, impl_versioned, legacy_context_type, payload_or_error,
    require_non_empty, Validate,
};
use compat_core::types::{ClientConfigOpts, CurrentContextKey};
use compat_core::{
    ApiName, ArgumentKey, Arguments, Command, RuntimeVersion, ValidationStrategy,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetClientConfigInputOptions {
    pub runtime_version: RuntimeVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetClientConfigOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub client_config_opts: Option<ClientConfigOpts>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreClientConfigInputOptions {
    pub runtime_version: RuntimeVersion,
    pub client_config_opts: ClientConfigOpts,
}

pub type StoreClientConfigOutputOptions = ErrorOutputOptions;

impl_versioned!(
    GetClientConfigInputOptions,
    GetClientConfigOutputOptions,
    StoreClientConfigInputOptions,
);

/// v0.25.4 keys current contexts by `k8s`/`tmc`, later versions by target
fn validate_current_context_key(
    key: CurrentContextKey,
    version: RuntimeVersion,
    path: &str,
) -> ValidationResult<()> {
    match (key, version) {
        (CurrentContextKey::Type(kind), RuntimeVersion::V0254) => {
            legacy_context_type(kind, path, version)
        }
        (CurrentContextKey::Target(_), RuntimeVersion::V0254) => {
            Err(ValidationError::invalid(path, key, version))
        }
        (CurrentContextKey::Target(_), _) => Ok(()),
        (CurrentContextKey::Type(_), _) => Err(ValidationError::invalid(path, key, version)),
    }
}

/// Check a whole client config, recursing into every nested record
pub(crate) fn validate_client_config_opts(
    config: &ClientConfigOpts,
    version: RuntimeVersion,
    path: &str,
) -> ValidationResult<()> {
    if version == RuntimeVersion::V0116 {
        if !config.known_contexts.is_empty() {
            return Err(ValidationError::unsupported(
                field(path, "knownContexts"),
                version,
            ));
        }
        if !config.current_context.is_empty() {
            return Err(ValidationError::unsupported(
                field(path, "currentContext"),
                version,
            ));
        }
    }

    for (i, server) in config.known_servers.iter().enumerate() {
        validate_server_opts(server, version, &field(path, &format!("knownServers[{}]", i)))?;
    }
    for (i, context) in config.known_contexts.iter().enumerate() {
        validate_context_opts(
            context,
            version,
            &field(path, &format!("knownContexts[{}]", i)),
        )?;
    }
    if let Some(current) = &config.current_server {
        require_non_empty(current, &field(path, "currentServer"), version)?;
    }
    for (key, name) in &config.current_context {
        let key_path = field(path, &format!("currentContext.{}", key));
        validate_current_context_key(*key, version, &key_path)?;
        require_non_empty(name, &key_path, version)?;
    }

    let Some(options) = &config.client_options else {
        return Ok(());
    };
    if let Some(cli) = &options.cli {
        for (i, source) in cli.discovery_sources.iter().enumerate() {
            validate_discovery_source(
                source,
                version,
                &field(path, &format!("clientOptions.cli.discoverySources[{}]", i)),
            )?;
        }
    }
    for (plugin, flags) in &options.features {
        let plugin_path = field(path, &format!("clientOptions.features.{}", plugin));
        require_non_empty(plugin, &plugin_path, version)?;
        for key in flags.keys() {
            require_non_empty(key, &field(&plugin_path, "key"), version)?;
        }
    }

    Ok(())
}

impl Validate for GetClientConfigInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetClientConfig, self.runtime_version)
    }
}

impl Validate for GetClientConfigOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.client_config_opts,
            &self.error,
            "clientConfigOpts",
            self.runtime_version,
        )?;
        match &self.client_config_opts {
            Some(config) => {
                validate_client_config_opts(config, self.runtime_version, "clientConfigOpts")
            }
            None => Ok(()),
        }
    }
}

impl Validate for StoreClientConfigInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::StoreClientConfig, self.runtime_version)?;
        validate_client_config_opts(&self.client_config_opts, self.runtime_version, "clientConfig")
    }
}

pub fn new_get_client_config_command(
    input: &GetClientConfigInputOptions,
    output: &GetClientConfigOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetClientConfig, input, output)?;
    let expected = payload_output(
        output.client_config_opts.as_ref(),
        output.error.as_deref(),
        "clientConfigOpts",
    )?;

    Ok(single(
        ApiName::GetClientConfig,
        version,
        Arguments::new(),
        expected.with_strategy(output.validation_strategy),
    ))
}

pub fn new_store_client_config_command(
    input: &StoreClientConfigInputOptions,
    output: &StoreClientConfigOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::StoreClientConfig, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(
        ArgumentKey::ClientConfig,
        yaml_argument(&input.client_config_opts, "clientConfig")?,
    );

    Ok(single(
        ApiName::StoreClientConfig,
        version,
        arguments,
        output.expected(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_core::types::{
        ClientOptionsOpts, ContextOpts, ContextType, FeatureMap, GlobalServerOpts, Target,
    };
    use compat_core::ResultCode;
    use std::collections::BTreeMap;

    fn features(plugin: &str, key: &str) -> ClientConfigOpts {
        ClientConfigOpts {
            client_options: Some(ClientOptionsOpts {
                cli: None,
                features: BTreeMap::from([(
                    plugin.to_string(),
                    FeatureMap::from([(key.to_string(), "true".to_string())]),
                )]),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_store_client_config_features_on_v0116() {
        let config = features("compatibility-tests-plugin", "compatibility-tests-plugin-key");
        let command = new_store_client_config_command(
            &StoreClientConfigInputOptions {
                runtime_version: RuntimeVersion::V0116,
                client_config_opts: config.clone(),
            },
            &ErrorOutputOptions::new(RuntimeVersion::V0116),
        )
        .unwrap();

        let api = &command.apis()[0];
        let stored: ClientConfigOpts = serde_yaml::from_str(
            api.arguments[&ArgumentKey::ClientConfig].as_str().unwrap(),
        )
        .unwrap();
        assert_eq!(stored, config);
    }

    #[test]
    fn test_v0116_rejects_contexts() {
        let config = ClientConfigOpts {
            current_context: BTreeMap::from([(Target::Kubernetes.into(), "ctx".to_string())]),
            ..Default::default()
        };
        let input = StoreClientConfigInputOptions {
            runtime_version: RuntimeVersion::V0116,
            client_config_opts: config.clone(),
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::UnsupportedField { ref field, .. })
                if field == "clientConfig.currentContext"
        ));

        let input = StoreClientConfigInputOptions {
            runtime_version: RuntimeVersion::V0280,
            client_config_opts: config,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_current_context_key_follows_version() {
        let by_target = ClientConfigOpts {
            current_context: BTreeMap::from([(
                Target::Kubernetes.into(),
                "compatibility-test-one".to_string(),
            )]),
            ..Default::default()
        };
        let store = |version, config: &ClientConfigOpts| {
            new_store_client_config_command(
                &StoreClientConfigInputOptions {
                    runtime_version: version,
                    client_config_opts: config.clone(),
                },
                &ErrorOutputOptions::new(version),
            )
        };

        let err = store(RuntimeVersion::V0254, &by_target).unwrap_err();
        assert!(matches!(
            err,
            crate::BuildError::Invalid(ValidationError::InvalidValue { ref field, ref value, .. })
                if field == "clientConfig.currentContext.kubernetes" && value == "kubernetes"
        ));
        assert!(store(RuntimeVersion::V0280, &by_target).is_ok());

        let by_kind = ClientConfigOpts {
            current_context: BTreeMap::from([(
                ContextType::K8s.into(),
                "compatibility-test-one".to_string(),
            )]),
            ..Default::default()
        };
        let command = store(RuntimeVersion::V0254, &by_kind).unwrap();
        let stored = command.apis()[0].arguments[&ArgumentKey::ClientConfig]
            .as_str()
            .unwrap()
            .to_string();
        assert!(stored.contains("k8s: compatibility-test-one"));
        assert!(store(RuntimeVersion::Latest, &by_kind).is_err());

        let tanzu = ClientConfigOpts {
            current_context: BTreeMap::from([(ContextType::Tanzu.into(), "ctx".to_string())]),
            ..Default::default()
        };
        assert!(matches!(
            validate_client_config_opts(&tanzu, RuntimeVersion::V0254, "clientConfig"),
            Err(ValidationError::InvalidValue { ref value, .. }) if value == "tanzu"
        ));
    }

    #[test]
    fn test_nested_contexts_are_validated() {
        let config = ClientConfigOpts {
            known_contexts: vec![ContextOpts {
                name: "ctx".to_string(),
                target: Some(Target::Kubernetes),
                global_opts: Some(GlobalServerOpts {
                    endpoint: "e".to_string(),
                    auth: None,
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(validate_client_config_opts(&config, RuntimeVersion::V090, "clientConfig").is_ok());
        assert!(matches!(
            validate_client_config_opts(&config, RuntimeVersion::V0254, "clientConfig"),
            Err(ValidationError::UnsupportedField { ref field, .. })
                if field == "clientConfig.knownContexts[0].target"
        ));
    }

    #[test]
    fn test_empty_feature_key_rejected() {
        let config = features("compatibility-tests-plugin", " ");
        assert!(matches!(
            validate_client_config_opts(&config, RuntimeVersion::Latest, "clientConfig"),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_get_client_config_expected_payload() {
        let config = features("plugin", "key");
        let command = new_get_client_config_command(
            &GetClientConfigInputOptions {
                runtime_version: RuntimeVersion::V0254,
            },
            &GetClientConfigOutputOptions {
                runtime_version: RuntimeVersion::V0254,
                client_config_opts: Some(config.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        let api = &command.apis()[0];
        assert!(api.arguments.is_empty());
        assert_eq!(api.output.result, ResultCode::Success);
        let expected: ClientConfigOpts = serde_yaml::from_str(&api.output.content).unwrap();
        assert_eq!(expected, config);
    }
}
