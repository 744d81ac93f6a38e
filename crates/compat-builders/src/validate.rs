//! Validation traits and field-level checks shared by every API

use crate::error::{ValidationError, ValidationResult};
use compat_core::types::ContextType;
use compat_core::{ApiName, RuntimeVersion};

/// Options that can decide whether they are legal for their runtime version
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Options that target exactly one runtime version
pub trait Versioned {
    fn runtime_version(&self) -> RuntimeVersion;
}

/// Implement [`Versioned`] for option structs with a `runtime_version` field
macro_rules! impl_versioned {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::validate::Versioned for $ty {
                fn runtime_version(&self) -> compat_core::RuntimeVersion {
                    self.runtime_version
                }
            }
        )+
    };
}
pub(crate) use impl_versioned;

/// Reject APIs the runtime version does not expose
pub(crate) fn ensure_supported(api: ApiName, version: RuntimeVersion) -> ValidationResult<()> {
    if version.supports(api) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedApi { api, version })
    }
}

/// Input and output of one record must agree on the runtime version
pub(crate) fn ensure_same_version(
    input: RuntimeVersion,
    output: RuntimeVersion,
) -> ValidationResult<RuntimeVersion> {
    if input == output {
        Ok(input)
    } else {
        Err(ValidationError::VersionMismatch { input, output })
    }
}

pub(crate) fn require_non_empty(
    value: &str,
    field: &str,
    version: RuntimeVersion,
) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field, version))
    } else {
        Ok(())
    }
}

pub(crate) fn require<'a, T>(
    value: &'a Option<T>,
    field: &str,
    version: RuntimeVersion,
) -> ValidationResult<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ValidationError::missing(field, version))
}

pub(crate) fn forbid<T>(value: &Option<T>, field: &str, version: RuntimeVersion) -> ValidationResult<()> {
    match value {
        Some(_) => Err(ValidationError::unsupported(field, version)),
        None => Ok(()),
    }
}

/// v0.25.4 only knows the `k8s` and `tmc` context kinds
pub(crate) fn legacy_context_type(
    value: ContextType,
    field: &str,
    version: RuntimeVersion,
) -> ValidationResult<()> {
    match value {
        ContextType::K8s | ContextType::Tmc => Ok(()),
        ContextType::Tanzu => Err(ValidationError::invalid(field, value, version)),
    }
}

/// An accessor output may expect a payload or an error, not both
pub(crate) fn payload_or_error<T>(
    payload: &Option<T>,
    error: &Option<String>,
    payload_field: &str,
    version: RuntimeVersion,
) -> ValidationResult<()> {
    if payload.is_some() && error.is_some() {
        return Err(ValidationError::exclusive(
            format!("{}, error", payload_field),
            version,
        ));
    }
    if let Some(error) = error {
        require_non_empty(error, "error", version)?;
    }
    Ok(())
}

/// Join a parent path and a field name
pub(crate) fn field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path() {
        assert_eq!(field("", "name"), "name");
        assert_eq!(field("context", "globalOpts"), "context.globalOpts");
    }

    #[test]
    fn test_require_non_empty_rejects_whitespace() {
        let err = require_non_empty("  ", "contextName", RuntimeVersion::V0280).unwrap_err();
        assert_eq!(
            err.to_string(),
            "contextName is required for runtime version v0.28.0"
        );
    }

    #[test]
    fn test_ensure_supported() {
        assert!(ensure_supported(ApiName::SetFeature, RuntimeVersion::V0280).is_ok());
        let err = ensure_supported(ApiName::SetFeature, RuntimeVersion::V0254).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SetFeature API not supported for runtime version v0.25.4"
        );
    }

    #[test]
    fn test_payload_or_error_exclusive() {
        let err = payload_or_error(
            &Some(1),
            &Some("not found".to_string()),
            "contextOpts",
            RuntimeVersion::Latest,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::ExclusiveFields { .. }));
    }

    #[test]
    fn test_legacy_context_type_rejects_tanzu() {
        assert!(legacy_context_type(ContextType::Tmc, "type", RuntimeVersion::V0254).is_ok());
        let err =
            legacy_context_type(ContextType::Tanzu, "type", RuntimeVersion::V0254).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 'tanzu' for type on runtime version v0.25.4"
        );
    }
}
