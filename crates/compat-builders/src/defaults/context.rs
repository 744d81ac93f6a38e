use super::{DEFAULT_CONTEXT_NAME, DEFAULT_ENDPOINT};
use crate::context::{
    new_delete_context_command, new_get_active_context_command, new_get_context_command,
    new_get_current_context_command, new_remove_current_context_command,
    new_set_context_command, new_set_current_context_command, ContextOutputOptions,
    DeleteContextInputOptions, GetActiveContextInputOptions, GetContextInputOptions,
    GetCurrentContextInputOptions, RemoveCurrentContextInputOptions, SetContextInputOptions,
    SetCurrentContextInputOptions,
};
use crate::error::BuildResult;
use crate::output::ErrorOutputOptions;
use compat_core::types::{ContextOpts, ContextType, CurrentContextKey, GlobalServerOpts, Target};
use compat_core::{Command, RuntimeVersion, ValidationStrategy};

/// Arguments shared by the context helpers
///
/// The context record takes the shape its version expects: legacy `type`
/// on v0.25.4, `target` everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextArgs {
    pub runtime_version: RuntimeVersion,
    pub name: String,
    pub target: Target,
    pub context_type: Option<ContextType>,
    pub endpoint: String,
    pub set_current: bool,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl ContextArgs {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            name: DEFAULT_CONTEXT_NAME.to_string(),
            target: Target::Kubernetes,
            context_type: None,
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

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Only meaningful on latest, which accepts `contextType` next to `target`
    pub fn with_context_type(mut self, context_type: ContextType) -> Self {
        self.context_type = Some(context_type);
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

    /// Context record in the shape this version reads and writes
    pub fn context_opts(&self) -> ContextOpts {
        let mut context = ContextOpts {
            name: self.name.clone(),
            global_opts: Some(GlobalServerOpts {
                endpoint: self.endpoint.clone(),
                auth: None,
            }),
            ..Default::default()
        };

        if self.runtime_version == RuntimeVersion::V0254 {
            context.legacy_type = Some(legacy_type(self.target));
        } else {
            context.target = Some(self.target);
            if self.runtime_version == RuntimeVersion::Latest {
                context.context_type = self.context_type;
            }
        }
        context
    }

    fn selector(&self) -> (Option<Target>, Option<ContextType>) {
        if self.runtime_version == RuntimeVersion::V0254 {
            (None, Some(legacy_type(self.target)))
        } else {
            (Some(self.target), None)
        }
    }

    /// Key this context is current under in a client config
    pub(super) fn current_context_key(&self) -> CurrentContextKey {
        match self.selector() {
            (_, Some(kind)) => kind.into(),
            _ => self.target.into(),
        }
    }

    fn error_output(&self) -> ErrorOutputOptions {
        ErrorOutputOptions {
            runtime_version: self.runtime_version,
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }

    fn context_output(&self) -> ContextOutputOptions {
        ContextOutputOptions {
            runtime_version: self.runtime_version,
            context_opts: self.error.is_none().then(|| self.context_opts()),
            error: self.error.clone(),
            validation_strategy: self.validation_strategy,
        }
    }
}

fn legacy_type(target: Target) -> ContextType {
    match target {
        Target::Kubernetes => ContextType::K8s,
        Target::MissionControl => ContextType::Tmc,
        Target::Global => ContextType::Tanzu,
    }
}

pub fn default_set_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let input = SetContextInputOptions {
        runtime_version: args.runtime_version,
        context_opts: args.context_opts(),
        set_current: args.set_current,
    };
    new_set_context_command(&input, &args.error_output())
}

pub fn default_get_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let input = GetContextInputOptions {
        runtime_version: args.runtime_version,
        context_name: args.name.clone(),
    };
    new_get_context_command(&input, &args.context_output())
}

pub fn default_delete_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let input = DeleteContextInputOptions {
        runtime_version: args.runtime_version,
        context_name: args.name.clone(),
    };
    new_delete_context_command(&input, &args.error_output())
}

pub fn default_set_current_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let input = SetCurrentContextInputOptions {
        runtime_version: args.runtime_version,
        context_name: args.name.clone(),
    };
    new_set_current_context_command(&input, &args.error_output())
}

pub fn default_get_current_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let (target, context_type) = args.selector();
    let input = GetCurrentContextInputOptions {
        runtime_version: args.runtime_version,
        target,
        context_type,
    };
    new_get_current_context_command(&input, &args.context_output())
}

pub fn default_remove_current_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let (target, context_type) = args.selector();
    let input = RemoveCurrentContextInputOptions {
        runtime_version: args.runtime_version,
        target,
        context_type,
    };
    new_remove_current_context_command(&input, &args.error_output())
}

pub fn default_get_active_context_command(args: &ContextArgs) -> BuildResult<Command> {
    let input = GetActiveContextInputOptions {
        runtime_version: args.runtime_version,
        context_type: Some(args.context_type.unwrap_or(ContextType::K8s)),
    };
    new_get_active_context_command(&input, &args.context_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_core::{ApiName, ArgumentKey, ArgumentValue};

    #[test]
    fn test_context_shape_follows_version() {
        let legacy = ContextArgs::new(RuntimeVersion::V0254).context_opts();
        assert_eq!(legacy.legacy_type, Some(ContextType::K8s));
        assert_eq!(legacy.target, None);

        let current = ContextArgs::new(RuntimeVersion::Latest).context_opts();
        assert_eq!(current.target, Some(Target::Kubernetes));
        assert_eq!(current.legacy_type, None);
        assert_eq!(current.name, DEFAULT_CONTEXT_NAME);
    }

    #[test]
    fn test_default_helpers_build_on_supported_versions() {
        for version in [
            RuntimeVersion::V0254,
            RuntimeVersion::V0280,
            RuntimeVersion::V090,
            RuntimeVersion::V102,
            RuntimeVersion::Latest,
        ] {
            let args = ContextArgs::new(version);
            default_set_context_command(&args).unwrap();
            default_get_context_command(&args).unwrap();
            default_delete_context_command(&args).unwrap();
            default_set_current_context_command(&args).unwrap();
            default_get_current_context_command(&args).unwrap();
            default_remove_current_context_command(&args).unwrap();
        }
    }

    #[test]
    fn test_selector_argument_per_version() {
        let command = default_get_current_context_command(&ContextArgs::new(RuntimeVersion::V0254))
            .unwrap();
        assert_eq!(
            command.apis()[0].arguments[&ArgumentKey::ContextType],
            ArgumentValue::from("k8s")
        );

        let command = default_remove_current_context_command(&ContextArgs::new(RuntimeVersion::V102))
            .unwrap();
        assert_eq!(
            command.apis()[0].arguments[&ArgumentKey::Target],
            ArgumentValue::from("kubernetes")
        );
    }

    #[test]
    fn test_error_replaces_payload() {
        let command = default_get_context_command(
            &ContextArgs::new(RuntimeVersion::V0280)
                .with_error("context compatibility-test-one not found"),
        )
        .unwrap();
        let api = &command.apis()[0];
        assert_eq!(api.name, ApiName::GetContext);
        assert_eq!(api.output.content, "context compatibility-test-one not found");
    }

    #[test]
    fn test_active_context_only_on_latest() {
        assert!(default_get_active_context_command(&ContextArgs::new(RuntimeVersion::Latest)).is_ok());
        assert!(default_get_active_context_command(&ContextArgs::new(RuntimeVersion::V102)).is_err());
    }
}
