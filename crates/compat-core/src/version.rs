//! Supported plugin runtime versions

use crate::api::ApiName;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A generation of the plugin runtime library whose API surface a driver binds to
///
/// Ordering follows release order; it exists so versions can key sorted maps
/// and is not used to decide API support (see [`RuntimeVersion::supports`]).
/// The default is the newest runtime.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum RuntimeVersion {
    V0116,
    V0254,
    V0280,
    V090,
    V102,
    #[default]
    Latest,
}

impl RuntimeVersion {
    /// Every supported version, oldest first
    pub const ALL: [RuntimeVersion; 6] = [
        RuntimeVersion::V0116,
        RuntimeVersion::V0254,
        RuntimeVersion::V0280,
        RuntimeVersion::V090,
        RuntimeVersion::V102,
        RuntimeVersion::Latest,
    ];

    /// Wire representation used in API records
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeVersion::V0116 => "v0.11.6",
            RuntimeVersion::V0254 => "v0.25.4",
            RuntimeVersion::V0280 => "v0.28.0",
            RuntimeVersion::V090 => "v0.90.0",
            RuntimeVersion::V102 => "v1.0.2",
            RuntimeVersion::Latest => "latest",
        }
    }

    /// File name of the driver binary built against this version
    pub fn driver_binary_name(self) -> String {
        let suffix = match self {
            RuntimeVersion::Latest => "latest".to_string(),
            other => other.as_str().replace('.', "_"),
        };
        format!("runtime-test-plugin-{}", suffix)
    }

    /// Whether the runtime at this version exposes `api` at all
    pub fn supports(self, api: ApiName) -> bool {
        use ApiName::*;

        match api {
            SetServer | GetServer | DeleteServer | SetCurrentServer | GetCurrentServer
            | IsFeatureEnabled | GetClientConfig | StoreClientConfig => true,

            SetContext | GetContext | DeleteContext | SetCurrentContext | GetCurrentContext
            | RemoveCurrentContext | RemoveCurrentServer | SetCLIDiscoverySource
            | GetCLIDiscoverySource | DeleteCLIDiscoverySource => self != RuntimeVersion::V0116,

            // Feature writes before v0.28.0 only happen through StoreClientConfig
            SetFeature
            | DeleteFeature
            | SetConfigMetadataPatchStrategy
            | GetConfigMetadataPatchStrategy
            | DeleteConfigMetadataPatchStrategy
            | SetConfigMetadataSetting
            | GetConfigMetadataSetting
            | DeleteConfigMetadataSetting
            | UseUnifiedConfig
            | IsConfigMetadataSettingsEnabled
            | GetMetadata => !matches!(self, RuntimeVersion::V0116 | RuntimeVersion::V0254),

            GetActiveContext => self == RuntimeVersion::Latest,
        }
    }

    /// Versions whose context records carry `target` rather than legacy `type`
    pub fn uses_context_target(self) -> bool {
        matches!(
            self,
            RuntimeVersion::V0280
                | RuntimeVersion::V090
                | RuntimeVersion::V102
                | RuntimeVersion::Latest
        )
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuntimeVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVersion(s.to_string()))
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RuntimeVersion> for String {
    fn from(version: RuntimeVersion) -> String {
        version.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for version in RuntimeVersion::ALL {
            assert_eq!(version.as_str().parse::<RuntimeVersion>().unwrap(), version);
        }
    }

    #[test]
    fn test_unknown_version() {
        let err = "v9.9.9".parse::<RuntimeVersion>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownVersion(ref v) if v == "v9.9.9"));
    }

    #[test]
    fn test_driver_binary_name() {
        assert_eq!(
            RuntimeVersion::V0254.driver_binary_name(),
            "runtime-test-plugin-v0_25_4"
        );
        assert_eq!(
            RuntimeVersion::Latest.driver_binary_name(),
            "runtime-test-plugin-latest"
        );
    }

    #[test]
    fn test_feature_writes_not_supported_on_old_versions() {
        for version in [RuntimeVersion::V0116, RuntimeVersion::V0254] {
            assert!(!version.supports(ApiName::SetFeature));
            assert!(!version.supports(ApiName::DeleteFeature));
            assert!(version.supports(ApiName::IsFeatureEnabled));
        }
        assert!(RuntimeVersion::V0280.supports(ApiName::SetFeature));
    }

    #[test]
    fn test_context_apis_need_v0254() {
        assert!(!RuntimeVersion::V0116.supports(ApiName::SetContext));
        assert!(RuntimeVersion::V0254.supports(ApiName::SetContext));
        assert!(RuntimeVersion::Latest.supports(ApiName::GetActiveContext));
        assert!(!RuntimeVersion::V102.supports(ApiName::GetActiveContext));
    }

    #[test]
    fn test_serde_uses_wire_string() {
        let yaml = serde_yaml::to_string(&RuntimeVersion::V102).unwrap();
        assert_eq!(yaml.trim(), "v1.0.2");
        let parsed: RuntimeVersion = serde_yaml::from_str("latest").unwrap();
        assert_eq!(parsed, RuntimeVersion::Latest);
    }
}
