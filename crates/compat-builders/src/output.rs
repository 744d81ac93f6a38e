//! Output options shared by several APIs

use crate::error::{ValidationError, ValidationResult};
use crate::validate::{impl_versioned, require_non_empty, Validate};
use compat_core::{Output, RuntimeVersion, ValidationStrategy};

/// Expected output of an API that returns nothing on success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorOutputOptions {
    pub runtime_version: RuntimeVersion,
    /// Expected error text (a substring unless the strategy is strict)
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl ErrorOutputOptions {
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        Self {
            runtime_version,
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.validation_strategy = Some(strategy);
        self
    }

    pub(crate) fn expected(&self) -> Output {
        match &self.error {
            Some(error) => Output::failed(error.clone()),
            None => Output::success(""),
        }
        .with_strategy(self.validation_strategy)
    }
}

impl Validate for ErrorOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        match &self.error {
            Some(error) => require_non_empty(error, "error", self.runtime_version),
            None => Ok(()),
        }
    }
}

/// Expected output of an API answering with a boolean
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolOutputOptions {
    pub runtime_version: RuntimeVersion,
    pub enabled: bool,
    pub error: Option<String>,
    pub validation_strategy: Option<ValidationStrategy>,
}

impl BoolOutputOptions {
    pub fn new(runtime_version: RuntimeVersion, enabled: bool) -> Self {
        Self {
            runtime_version,
            enabled,
            ..Default::default()
        }
    }

    pub fn failed(runtime_version: RuntimeVersion, error: impl Into<String>) -> Self {
        Self {
            runtime_version,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub(crate) fn expected(&self) -> Output {
        match &self.error {
            Some(error) => Output::failed(error.clone()),
            None => Output::success(self.enabled.to_string()),
        }
        .with_strategy(self.validation_strategy)
    }
}

impl Validate for BoolOutputOptions {
    fn validate(&self) -> ValidationResult<()> {
        match &self.error {
            Some(_) if self.enabled => Err(ValidationError::exclusive(
                "enabled, error",
                self.runtime_version,
            )),
            Some(error) => require_non_empty(error, "error", self.runtime_version),
            None => Ok(()),
        }
    }
}

impl_versioned!(ErrorOutputOptions, BoolOutputOptions);

#[cfg(test)]
mod tests {
    use super::*;
    use compat_core::ResultCode;

    #[test]
    fn test_error_output_success_is_empty() {
        let output = ErrorOutputOptions::new(RuntimeVersion::V0280).expected();
        assert_eq!(output.result, ResultCode::Success);
        assert!(output.content.is_empty());
    }

    #[test]
    fn test_error_output_failed_keeps_strategy() {
        let output = ErrorOutputOptions::new(RuntimeVersion::V0254)
            .with_error("not found")
            .with_strategy(ValidationStrategy::Strict)
            .expected();
        assert_eq!(output.result, ResultCode::Failed);
        assert_eq!(output.content, "not found");
        assert_eq!(output.validation_strategy, Some(ValidationStrategy::Strict));
    }

    #[test]
    fn test_bool_output_renders_text() {
        assert_eq!(
            BoolOutputOptions::new(RuntimeVersion::V0116, true).expected().content,
            "true"
        );
        assert_eq!(
            BoolOutputOptions::new(RuntimeVersion::V0116, false).expected().content,
            "false"
        );
    }

    #[test]
    fn test_bool_output_rejects_enabled_with_error() {
        let options = BoolOutputOptions {
            enabled: true,
            ..BoolOutputOptions::failed(RuntimeVersion::Latest, "not found")
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::ExclusiveFields { .. })
        ));
    }

    #[test]
    fn test_empty_error_rejected() {
        let options = ErrorOutputOptions::new(RuntimeVersion::Latest).with_error("");
        assert!(matches!(
            options.validate(),
            Err(ValidationError::MissingField { .. })
        ));
    }
}
