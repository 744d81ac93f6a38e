//! CLI discovery source APIs

use crate::command::{payload_output, preflight, single, yaml_argument};
use crate::error::{BuildResult, ValidationError, ValidationResult};
use crate::output::ErrorOutputOptions;
use crate::validate::{
    ensure_supported, field, impl_versioned, legacy_context_type, payload_or_error,
    require_non_empty, Validate,
};
use compat_core::types::PluginDiscoveryOpts;
use compat_core::{
    ApiName, ArgumentKey, Arguments, Command, Output, RuntimeVersion, ValidationStrategy,
};

const SOURCE_KINDS: [&str; 5] = ["gcp", "oci", "rest", "kubernetes", "local"];

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCLIDiscoverySourceInputOptions {
    pub runtime_version: RuntimeVersion,
    pub discovery_source_opts: PluginDiscoveryOpts,
}

pub type SetCLIDiscoverySourceOutputOptions = ErrorOutputOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCLIDiscoverySourceInputOptions {
    pub runtime_version: RuntimeVersion,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCLIDiscoverySourceOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub discovery_source_opts: Option<PluginDiscoveryOpts>,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteCLIDiscoverySourceInputOptions {
    pub runtime_version: RuntimeVersion,
    pub name: String,
}

pub type DeleteCLIDiscoverySourceOutputOptions = ErrorOutputOptions;

impl_versioned!(
    SetCLIDiscoverySourceInputOptions,
    GetCLIDiscoverySourceInputOptions,
    GetCLIDiscoverySourceOutputOptions,
    DeleteCLIDiscoverySourceInputOptions,
);

// ============================================================================
// Validators
// ============================================================================

/// Check one discovery source record found at `path`
///
/// Used for standalone sources as well as the lists nested in contexts,
/// servers and the client config.
pub(crate) fn validate_discovery_source(
    source: &PluginDiscoveryOpts,
    version: RuntimeVersion,
    path: &str,
) -> ValidationResult<()> {
    if source.configured_count() != 1 {
        let fields: Vec<String> = SOURCE_KINDS.iter().map(|kind| field(path, kind)).collect();
        return Err(ValidationError::exclusive(fields.join(", "), version));
    }

    if let Some(gcp) = &source.gcp {
        require_non_empty(&gcp.name, &field(path, "gcp.name"), version)?;
    }
    if let Some(oci) = &source.oci {
        require_non_empty(&oci.name, &field(path, "oci.name"), version)?;
        require_non_empty(&oci.image, &field(path, "oci.image"), version)?;
    }
    if let Some(rest) = &source.rest {
        require_non_empty(&rest.name, &field(path, "rest.name"), version)?;
    }
    if let Some(kubernetes) = &source.kubernetes {
        require_non_empty(&kubernetes.name, &field(path, "kubernetes.name"), version)?;
    }
    if let Some(local) = &source.local {
        require_non_empty(&local.name, &field(path, "local.name"), version)?;
    }

    if let Some(context_type) = source.context_type {
        let context_type_field = field(path, "contextType");
        if version != RuntimeVersion::V0254 {
            return Err(ValidationError::unsupported(context_type_field, version));
        }
        legacy_context_type(context_type, &context_type_field, version)?;
    }

    Ok(())
}

impl Validate for SetCLIDiscoverySourceInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::SetCLIDiscoverySource, self.runtime_version)?;
        validate_discovery_source(
            &self.discovery_source_opts,
            self.runtime_version,
            "discoverySource",
        )
    }
}

impl Validate for GetCLIDiscoverySourceInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::GetCLIDiscoverySource, self.runtime_version)?;
        require_non_empty(&self.name, "name", self.runtime_version)
    }
}

impl Validate for GetCLIDiscoverySourceOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        payload_or_error(
            &self.discovery_source_opts,
            &self.error,
            "discoverySourceOpts",
            self.runtime_version,
        )?;
        match &self.discovery_source_opts {
            Some(source) => {
                validate_discovery_source(source, self.runtime_version, "discoverySourceOpts")
            }
            None => Ok(()),
        }
    }
}

impl Validate for DeleteCLIDiscoverySourceInputOptions {
    fn validate(&self) -> ValidationResult<()> {
        ensure_supported(ApiName::DeleteCLIDiscoverySource, self.runtime_version)?;
        require_non_empty(&self.name, "name", self.runtime_version)
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn new_set_cli_discovery_source_command(
    input: &SetCLIDiscoverySourceInputOptions,
    output: &SetCLIDiscoverySourceOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::SetCLIDiscoverySource, input, output)?;

    let mut arguments = Arguments::new();
    arguments.insert(
        ArgumentKey::DiscoverySource,
        yaml_argument(&input.discovery_source_opts, "discoverySource")?,
    );

    Ok(single(
        ApiName::SetCLIDiscoverySource,
        version,
        arguments,
        output.expected(),
    ))
}

pub fn new_get_cli_discovery_source_command(
    input: &GetCLIDiscoverySourceInputOptions,
    output: &GetCLIDiscoverySourceOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::GetCLIDiscoverySource, input, output)?;

    Ok(single(
        ApiName::GetCLIDiscoverySource,
        version,
        name_argument(&input.name),
        output.expected()?,
    ))
}

pub fn new_delete_cli_discovery_source_command(
    input: &DeleteCLIDiscoverySourceInputOptions,
    output: &DeleteCLIDiscoverySourceOutputOptions,
) -> BuildResult<Command> {
    let version = preflight(ApiName::DeleteCLIDiscoverySource, input, output)?;

    Ok(single(
        ApiName::DeleteCLIDiscoverySource,
        version,
        name_argument(&input.name),
        output.expected(),
    ))
}

fn name_argument(name: &str) -> Arguments {
    let mut arguments = Arguments::new();
    arguments.insert(ArgumentKey::Name, name.into());
    arguments
}

impl GetCLIDiscoverySourceOutputOptions {
    fn expected(&self) -> BuildResult<Output> {
        payload_output(
            self.discovery_source_opts.as_ref(),
            self.error.as_deref(),
            "discoverySourceOpts",
        )
        .map(|output| output.with_strategy(self.validation_strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use compat_core::types::{ContextType, LocalDiscoveryOpts, OciDiscoveryOpts};
    use compat_core::{ArgumentValue, ResultCode};

    fn source() -> PluginDiscoveryOpts {
        PluginDiscoveryOpts::oci(
            "compatibility-tests-source-name",
            "compatibility-tests-source-image",
        )
    }

    #[test]
    fn test_set_discovery_source_argument() {
        let command = new_set_cli_discovery_source_command(
            &SetCLIDiscoverySourceInputOptions {
                runtime_version: RuntimeVersion::V0280,
                discovery_source_opts: source(),
            },
            &ErrorOutputOptions::new(RuntimeVersion::V0280),
        )
        .unwrap();
        let api = &command.apis()[0];
        assert_eq!(api.name, ApiName::SetCLIDiscoverySource);
        assert_eq!(
            api.arguments[&ArgumentKey::DiscoverySource],
            ArgumentValue::from(
                "oci:\n  name: compatibility-tests-source-name\n  image: compatibility-tests-source-image\n"
            )
        );
    }

    #[test]
    fn test_context_type_only_on_v0254() {
        let mut with_type = source();
        with_type.context_type = Some(ContextType::Tmc);

        assert!(
            validate_discovery_source(&with_type, RuntimeVersion::V0254, "discoverySource").is_ok()
        );
        for version in [RuntimeVersion::V0280, RuntimeVersion::V102, RuntimeVersion::Latest] {
            assert!(matches!(
                validate_discovery_source(&with_type, version, "discoverySource"),
                Err(ValidationError::UnsupportedField { ref field, .. })
                    if field == "discoverySource.contextType"
            ));
        }

        with_type.context_type = Some(ContextType::Tanzu);
        assert!(matches!(
            validate_discovery_source(&with_type, RuntimeVersion::V0254, "discoverySource"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_exactly_one_sub_config() {
        let empty = PluginDiscoveryOpts::default();
        assert!(matches!(
            validate_discovery_source(&empty, RuntimeVersion::V0280, ""),
            Err(ValidationError::ExclusiveFields { ref fields, .. })
                if fields == "gcp, oci, rest, kubernetes, local"
        ));

        let two = PluginDiscoveryOpts {
            local: Some(LocalDiscoveryOpts {
                name: "local".to_string(),
                path: "/tmp/plugins".to_string(),
            }),
            ..source()
        };
        assert!(validate_discovery_source(&two, RuntimeVersion::V0280, "").is_err());
    }

    #[test]
    fn test_oci_requires_image() {
        let source = PluginDiscoveryOpts {
            oci: Some(OciDiscoveryOpts {
                name: "default".to_string(),
                image: String::new(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            validate_discovery_source(&source, RuntimeVersion::Latest, "discoverySource"),
            Err(ValidationError::MissingField { ref field, .. })
                if field == "discoverySource.oci.image"
        ));
    }

    #[test]
    fn test_get_discovery_source_expected_payload() {
        let command = new_get_cli_discovery_source_command(
            &GetCLIDiscoverySourceInputOptions {
                runtime_version: RuntimeVersion::V090,
                name: "compatibility-tests-source-name".to_string(),
            },
            &GetCLIDiscoverySourceOutputOptions {
                runtime_version: RuntimeVersion::V090,
                discovery_source_opts: Some(source()),
                ..Default::default()
            },
        )
        .unwrap();
        let api = &command.apis()[0];
        assert_eq!(
            api.arguments[&ArgumentKey::Name],
            ArgumentValue::from("compatibility-tests-source-name")
        );
        assert_eq!(api.output.result, ResultCode::Success);
        let expected: PluginDiscoveryOpts = serde_yaml::from_str(&api.output.content).unwrap();
        assert_eq!(expected, source());
    }

    #[test]
    fn test_discovery_apis_unsupported_on_v0116() {
        let err = new_delete_cli_discovery_source_command(
            &DeleteCLIDiscoverySourceInputOptions {
                runtime_version: RuntimeVersion::V0116,
                name: "default".to_string(),
            },
            &ErrorOutputOptions::new(RuntimeVersion::V0116),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Invalid(ValidationError::UnsupportedApi { .. })
        ));
    }
}
