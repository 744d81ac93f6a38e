use super::{ContextArgs, DiscoverySourceArgs, ServerArgs};
use super::{DEFAULT_FEATURE_VALUE, DEFAULT_PLUGIN, DEFAULT_PLUGIN_KEY};
use crate::client_config::{
    new_get_client_config_command, new_store_client_config_command, GetClientConfigInputOptions,
    GetClientConfigOutputOptions, StoreClientConfigInputOptions,
};
use crate::error::BuildResult;
use crate::output::ErrorOutputOptions;
use compat_core::types::{CliOptionsOpts, ClientConfigOpts, ClientOptionsOpts, FeatureMap};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};
use std::collections::BTreeMap;

/// Arguments shared by the client config helpers
///
/// `client_config_opts` is stored by StoreClientConfig and expected back by
/// GetClientConfig; narrow it with [`ClientConfigArgs::with_client_config`]
/// to assert a subset under the partial strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfigArgs {
    pub runtime_version: RuntimeVersion,
    pub client_config_opts: ClientConfigOpts,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl ClientConfigArgs {
    /// A config with the default server, context, discovery source and
    /// feature flag, leaving out what the version cannot hold
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        let server = ServerArgs::new(runtime_version).server_opts();
        let features = BTreeMap::from([(
            DEFAULT_PLUGIN.to_string(),
            FeatureMap::from([(
                DEFAULT_PLUGIN_KEY.to_string(),
                DEFAULT_FEATURE_VALUE.to_string(),
            )]),
        )]);

        let mut config = ClientConfigOpts {
            current_server: Some(server.name.clone()),
            known_servers: vec![server],
            client_options: Some(ClientOptionsOpts {
                cli: Some(CliOptionsOpts {
                    discovery_sources: vec![
                        DiscoverySourceArgs::new(runtime_version).discovery_source_opts()
                    ],
                    edition: None,
                }),
                features,
            }),
            ..Default::default()
        };

        if runtime_version != RuntimeVersion::V0116 {
            let args = ContextArgs::new(runtime_version);
            let context = args.context_opts();
            config
                .current_context
                .insert(args.current_context_key(), context.name.clone());
            config.known_contexts.push(context);
        }

        Self {
            runtime_version,
            client_config_opts: config,
            error: None,
            validation_strategy: None,
        }
    }

    pub fn with_client_config(mut self, client_config_opts: ClientConfigOpts) -> Self {
        self.client_config_opts = client_config_opts;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.validation_strategy = Some(strategy);
        self
    }
}

pub fn default_store_client_config_command(args: &ClientConfigArgs) -> BuildResult<Command> {
    let input = StoreClientConfigInputOptions {
        runtime_version: args.runtime_version,
        client_config_opts: args.client_config_opts.clone(),
    };
    let output = ErrorOutputOptions {
        runtime_version: args.runtime_version,
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_store_client_config_command(&input, &output)
}

pub fn default_get_client_config_command(args: &ClientConfigArgs) -> BuildResult<Command> {
    let input = GetClientConfigInputOptions {
        runtime_version: args.runtime_version,
    };
    let output = GetClientConfigOutputOptions {
        runtime_version: args.runtime_version,
        client_config_opts: args.error.is_none().then(|| args.client_config_opts.clone()),
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_get_client_config_command(&input, &output)
}
