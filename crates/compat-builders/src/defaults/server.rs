use super::{DEFAULT_ENDPOINT, DEFAULT_SERVER_NAME};
use crate::error::BuildResult;
use crate::output::ErrorOutputOptions;
use crate::server::{
    new_delete_server_command, new_get_current_server_command, new_get_server_command,
    new_remove_current_server_command, new_set_current_server_command, new_set_server_command,
    DeleteServerInputOptions, GetCurrentServerInputOptions, GetServerInputOptions,
    RemoveCurrentServerInputOptions, ServerOutputOptions, SetCurrentServerInputOptions,
    SetServerInputOptions,
};
use compat_core::types::{GlobalServerOpts, ManagementClusterServerOpts, ServerOpts, ServerType};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};

/// Arguments shared by the server helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerArgs {
    pub runtime_version: RuntimeVersion,
    pub name: String,
    pub server_type: ServerType,
    pub endpoint: String,
    pub set_current: bool,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl ServerArgs {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            name: DEFAULT_SERVER_NAME.to_string(),
            server_type: ServerType::Global,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            set_current: false,
            error: None,
            validation_strategy: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, server_type: ServerType) -> Self {
        self.server_type = server_type;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_set_current(mut self, set_current: bool) -> Self {
        self.set_current = set_current;
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

    /// Server record with the endpoint block matching its type
    pub fn server_opts(&self) -> ServerOpts {
        let mut server = ServerOpts {
            name: self.name.clone(),
            server_type: Some(self.server_type),
            ..Default::default()
        };
        match self.server_type {
            ServerType::Global => {
                server.global_opts = Some(GlobalServerOpts {
                    endpoint: self.endpoint.clone(),
                    auth: None,
                })
            }
            ServerType::ManagementCluster => {
                server.management_cluster_opts = Some(ManagementClusterServerOpts {
                    endpoint: self.endpoint.clone(),
                    ..Default::default()
                })
            }
        }
        server
    }

    fn error_output(&self) -> ErrorOutputOptions {
        ErrorOutputOptions {
            runtime_version: self.runtime_version,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }

    fn server_output(&self) -> ServerOutputOptions {
        ServerOutputOptions {
            runtime_version: self.runtime_version,
            server_opts: self.error.is_none().then(|| self.server_opts()),
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }
}

pub fn default_set_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = SetServerInputOptions {
        runtime_version: args.runtime_version,
        server_opts: args.server_opts(),
        set_current: args.set_current,
    };
    new_set_server_command(&input, &args.error_output())
}

pub fn default_get_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = GetServerInputOptions {
        runtime_version: args.runtime_version,
        server_name: args.name.clone(),
    };
    new_get_server_command(&input, &args.server_output())
}

pub fn default_delete_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = DeleteServerInputOptions {
        runtime_version: args.runtime_version,
        server_name: args.name.clone(),
    };
    new_delete_server_command(&input, &args.error_output())
}

pub fn default_set_current_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = SetCurrentServerInputOptions {
        runtime_version: args.runtime_version,
        server_name: args.name.clone(),
    };
    new_set_current_server_command(&input, &args.error_output())
}

pub fn default_get_current_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = GetCurrentServerInputOptions {
        runtime_version: args.runtime_version,
    };
    new_get_current_server_command(&input, &args.server_output())
}

pub fn default_remove_current_server_command(args: &ServerArgs) -> BuildResult<Command> {
    let input = RemoveCurrentServerInputOptions {
        runtime_version: args.runtime_version,
        server_name: args.name.clone(),
    };
    new_remove_current_server_command(&input, &args.error_output())
}
