use super::{DEFAULT_DISCOVERY_SOURCE_IMAGE, DEFAULT_DISCOVERY_SOURCE_NAME};
use crate::discovery::{
    new_delete_cli_discovery_source_command, new_get_cli_discovery_source_command,
    new_set_cli_discovery_source_command, DeleteCLIDiscoverySourceInputOptions,
    GetCLIDiscoverySourceInputOptions, GetCLIDiscoverySourceOutputOptions,
    SetCLIDiscoverySourceInputOptions,
};
use crate::error::BuildResult;
use crate::output::ErrorOutputOptions;
use compat_core::types::{ContextType, PluginDiscoveryOpts};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};

/// Arguments shared by the discovery source helpers (always an OCI source)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySourceArgs {
    pub runtime_version: RuntimeVersion,
    pub name: String,
    pub image: String,
    pub context_type: Option<ContextType>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl DiscoverySourceArgs {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            name: DEFAULT_DISCOVERY_SOURCE_NAME.to_string(),
            image: DEFAULT_DISCOVERY_SOURCE_IMAGE.to_string(),
            context_type: None,
            error: None,
            validation_strategy: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_context_type(mut self, context_type: ContextType) -> Self {
        self.context_type = Some(context_type);
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

    pub fn discovery_source_opts(&self) -> PluginDiscoveryOpts {
        PluginDiscoveryOpts {
            context_type: self.context_type,
            ..PluginDiscoveryOpts::oci(&self.name, &self.image)
        }
    }

    fn error_output(&self) -> ErrorOutputOptions {
        ErrorOutputOptions {
            runtime_version: self.runtime_version,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }
}

pub fn default_set_cli_discovery_source_command(
    args: &DiscoverySourceArgs,
) -> BuildResult<Command> {
    let input = SetCLIDiscoverySourceInputOptions {
        runtime_version: args.runtime_version,
        discovery_source_opts: args.discovery_source_opts(),
    };
    new_set_cli_discovery_source_command(&input, &args.error_output())
}

pub fn default_get_cli_discovery_source_command(
    args: &DiscoverySourceArgs,
) -> BuildResult<Command> {
    let input = GetCLIDiscoverySourceInputOptions {
        runtime_version: args.runtime_version,
        name: args.name.clone(),
    };
    let output = GetCLIDiscoverySourceOutputOptions {
        runtime_version: args.runtime_version,
        discovery_source_opts: args.error.is_none().then(|| args.discovery_source_opts()),
        error: args.error.clone(),
        validation_strategy: args.validation_strategy,
    };
    new_get_cli_discovery_source_command(&input, &output)
}

pub fn default_delete_cli_discovery_source_command(
    args: &DiscoverySourceArgs,
) -> BuildResult<Command> {
    let input = DeleteCLIDiscoverySourceInputOptions {
        runtime_version: args.runtime_version,
        name: args.name.clone(),
    };
    new_delete_cli_discovery_source_command(&input, &args.error_output())
}
