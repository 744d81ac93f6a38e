//! Server APIs
//!
//! Servers keep the same shape on every runtime version: a `type` of
//! `managementcluster` or `global` plus exactly one endpoint block.

use crate::command::{payload_output, preflight, single, yaml_argument};
use crate::discovery::validate_discovery_source;
use crate::error::{BuildResult, ValidationError, ValidationResult};
use crate::output::ErrorOutputOptions;
use crate::validate::{
    ensure_supported, field, impl_versioned, payload_or_error, require, require_non_empty,
    Validate,
};
use compat_core::types::ServerOpts;
use compat_core::{
    ApiName, ArgumentKey, Arguments, Command, Output, RuntimeVersion, ValidationStrategy,
};

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetServerInputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_opts: ServerOpts,
    pub set_current: bool,
}

pub type SetServerOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetServerInputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_name: String,
}

/// Expected server returned by GetServer or GetCurrentServer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_opts: Option<ServerOpts>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

pub type GetServerOutputOptions = ServerOutputOptions;
pub type GetCurrentServerOutputOptions = ServerOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteServerInputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_name: String,
}

pub type DeleteServerOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCurrentServerInputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_name: String,
}

pub type SetCurrentServerOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCurrentServerInputOptions {
    pub runtime_version: RuntimeVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveCurrentServerInputOptions {
    pub runtime_version: RuntimeVersion,
    pub server_name: String,
}

pub type RemoveCurrentServerOutputOptions = ErrorOutputOptions;

impl_versioned!(
    SetServerInputOptions,
    GetServerInputOptions,
    ServerOutputOptions,
    DeleteServerInputOptions,
    SetCurrentServerInputOptions,
    GetCurrentServerInputOptions,
    RemoveCurrentServerInputOptions,
);

// ============================================================================
// Validators
// ============================================================================

pub(crate) fn validate_server_opts(
    server: &ServerOpts,
    version: RuntimeVersion,
    path: &str,
) -> ValidationResult<()> {
    require_non_empty(&server.name, &field(path, "name"), version)?;
    require(&server.server_type, &field(path, "type"), version)?;

    match (&server.global_opts, &server.management_cluster_opts) {
        (Some(global), None) => {
            require_non_empty(&global.endpoint, &field(path, "globalOpts.endpoint"), version)?
        }
        (None, Some(cluster)) => require_non_empty(
            &cluster.endpoint,
            &field(path, "managementClusterOpts.endpoint"),
            version,
        )?,
        _ => {
            return Err(ValidationError::exclusive(
                format!(
                    "{}, {}",
                    field(path, "globalOpts"),
                    field(path, "managementClusterOpts")
                ),
                version,
            ))
        }
    }

    for (i, source) in server.discovery_sources.iter().enumerate() {
        validate_discovery_source(
            source,
            version,
            &field(path, &format!("discoverySources[{}]", i)),
        )?;
    }

    Ok(())
}

impl Validate for SetServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetServer, self.runtime_version)?;
        validate_server_opts(&self.server_opts, self.runtime_version, "server")
    }
}

impl Validate for GetServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetServer, self.runtime_version)?;
        require_non_empty(&self.server_name, "serverName", self.runtime_version)
    }
}

impl Validate for ServerOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.server_opts,
            &self.error,
            "serverOpts",
            self.runtime_version,
        )?;
        match &self.server_opts {
            Some(server) => validate_server_opts(server, self.runtime_version, "serverOpts"),
            None => Ok(()),
        }
    }
}

impl Validate for DeleteServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteServer, self.runtime_version)?;
        require_non_empty(&self.server_name, "serverName", self.runtime_version)
    }
}

impl Validate for SetCurrentServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetCurrentServer, self.runtime_version)?;
        require_non_empty(&self.server_name, "serverName", self.runtime_version)
    }
}

impl Validate for GetCurrentServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetCurrentServer, self.runtime_version)
    }
}

impl Validate for RemoveCurrentServerInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::RemoveCurrentServer, self.runtime_version)?;
        require_non_empty(&self.server_name, "serverName", self.runtime_version)
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn new_set_server_command(
    input: &SetServerInputOptions,
    output: &SetServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetServer, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::Server, yaml_argument(&input.server_opts, "server")?);
    arguments.insert(ArgumentKey::SetCurrent, input.set_current.into());

    Ok(single(ApiName::SetServer, version, arguments, output.expected()))
}

pub fn new_get_server_command(
    input: &GetServerInputOptions,
    output: &GetServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetServer, input, output)?;
    let arguments = server_name_argument(&input.server_name);

    Ok(single(ApiName::GetServer, version, arguments, output.expected()?))
}

pub fn new_delete_server_command(
    input: &DeleteServerInputOptions,
    output: &DeleteServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::DeleteServer, input, output)?;
    let arguments = server_name_argument(&input.server_name);

    Ok(single(ApiName::DeleteServer, version, arguments, output.expected()))
}

pub fn new_set_current_server_command(
    input: &SetCurrentServerInputOptions,
    output: &SetCurrentServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetCurrentServer, input, output)?;
    let arguments = server_name_argument(&input.server_name);

    Ok(single(
        ApiName::SetCurrentServer,
        version,
        arguments,
        output.expected(),
    ))
}

pub fn new_get_current_server_command(
    input: &GetCurrentServerInputOptions,
    output: &GetCurrentServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetCurrentServer, input, output)?;

    Ok(single(
        ApiName::GetCurrentServer,
        version,
        Arguments::new(),
        output.expected()?,
    ))
}

pub fn new_remove_current_server_command(
    input: &RemoveCurrentServerInputOptions,
    output: &RemoveCurrentServerOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::RemoveCurrentServer, input, output)?;
    let arguments = server_name_argument(&input.server_name);

    Ok(single(
        ApiName::RemoveCurrentServer,
        version,
        arguments,
        output.expected(),
    ))
}

fn server_name_argument(name: &str) -> Arguments {
    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::ServerName, name.into());
    arguments
}

impl ServerOutputOptions {
    fn expected(&self) -> BuildResult<Output> {
        payload_output(self.server_opts.as_ref(), self.error.as_deref(), "serverOpts")
            .map(|output| output.with_strategy(self.validation_strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use compat_core::types::{
        GlobalServerOpts, ManagementClusterServerOpts, PluginDiscoveryOpts, ServerType,
    };
    use compat_core::{ArgumentValue, ResultCode};

    fn global_server() -> ServerOpts {
        ServerOpts {
            name: "compatibility-test-server".to_string(),
            server_type: Some(ServerType::Global),
            global_opts: Some(GlobalServerOpts {
                endpoint: "default-compatibility-test-endpoint".to_string(),
                auth: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_server_on_every_version() {
        for version in RuntimeVersion::ALL {
            let input = SetServerInputOptions {
                runtime_version: version,
                server_opts: global_server(),
                set_current: false,
            };
            let command =
                new_set_server_command(&input, &ErrorOutputOptions::new(version)).unwrap();
            let api = &command.apis()[0];
            assert_eq!(api.name, ApiName::SetServer);
            assert_eq!(api.version, version);
            assert_eq!(api.arguments[&ArgumentKey::SetCurrent], ArgumentValue::Bool(false));

            let server: ServerOpts =
                serde_yaml::from_str(api.arguments[&ArgumentKey::Server].as_str().unwrap())
                    .unwrap();
            assert_eq!(server, global_server());
        }
    }

    #[test]
    fn test_server_requires_exactly_one_endpoint_block() {
        let both = ServerOpts {
            management_cluster_opts: Some(ManagementClusterServerOpts {
                endpoint: "https://mgmt".to_string(),
                ..Default::default()
            }),
            ..global_server()
        };
        let input = SetServerInputOptions {
            runtime_version: RuntimeVersion::V0116,
            server_opts: both,
            set_current: false,
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::ExclusiveFields { ref fields, .. })
                if fields == "server.globalOpts, server.managementClusterOpts"
        ));
    }

    #[test]
    fn test_server_requires_type() {
        let input = SetServerInputOptions {
            runtime_version: RuntimeVersion::V0254,
            server_opts: ServerOpts {
                server_type: None,
                ..global_server()
            },
            set_current: true,
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::MissingField { ref field, .. }) if field == "server.type"
        ));
    }

    #[test]
    fn test_server_discovery_sources_follow_version_rules() {
        let mut source = PluginDiscoveryOpts::oci("default", "image");
        source.context_type = Some(compat_core::types::ContextType::K8s);
        let server = ServerOpts {
            discovery_sources: vec![source],
            ..global_server()
        };

        assert!(validate_server_opts(&server, RuntimeVersion::V0254, "server").is_ok());
        assert!(matches!(
            validate_server_opts(&server, RuntimeVersion::V0280, "server"),
            Err(ValidationError::UnsupportedField { ref field, .. })
                if field == "server.discoverySources[0].contextType"
        ));
    }

    #[test]
    fn test_get_current_server_has_no_arguments() {
        let command = new_get_current_server_command(
            &GetCurrentServerInputOptions {
                runtime_version: RuntimeVersion::V0116,
            },
            &GetCurrentServerOutputOptions {
                runtime_version: RuntimeVersion::V0116,
                server_opts: Some(global_server()),
                ..Default::default()
            },
        )
        .unwrap();
        let api = &command.apis()[0];
        assert!(api.arguments.is_empty());
        assert_eq!(api.output.result, ResultCode::Success);
        let expected: ServerOpts = serde_yaml::from_str(&api.output.content).unwrap();
        assert_eq!(expected, global_server());
    }

    #[test]
    fn test_remove_current_server_unsupported_on_v0116() {
        let err = new_remove_current_server_command(
            &RemoveCurrentServerInputOptions {
                runtime_version: RuntimeVersion::V0116,
                server_name: "compatibility-test-server".to_string(),
            },
            &ErrorOutputOptions::new(RuntimeVersion::V0116),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Invalid(ValidationError::UnsupportedApi {
                api: ApiName::RemoveCurrentServer,
                version: RuntimeVersion::V0116,
            })
        ));
    }

    #[test]
    fn test_get_server_expected_error() {
        let command = new_get_server_command(
            &GetServerInputOptions {
                runtime_version: RuntimeVersion::V0254,
                server_name: "missing".to_string(),
            },
            &GetServerOutputOptions {
                runtime_version: RuntimeVersion::V0254,
                error: Some("could not find server \"missing\"".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let api = &command.apis()[0];
        assert_eq!(api.arguments[&ArgumentKey::ServerName], ArgumentValue::from("missing"));
        assert_eq!(api.output.result, ResultCode::Failed);
    }
}
