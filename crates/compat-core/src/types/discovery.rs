//! Plugin discovery source records

use super::ContextType;
use serde::{Deserialize, Serialize};

/// Where plugins are discovered from
///
/// Exactly one of the sub-configurations is expected to be populated; the type
/// itself does not enforce that so that illegal shapes can be expressed and
/// rejected by validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDiscoveryOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpDiscoveryOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci: Option<OciDiscoveryOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<RestDiscoveryOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesDiscoveryOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalDiscoveryOpts>,

    /// Context kind the source belongs to (v0.25.4 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_type: Option<ContextType>,
}

impl PluginDiscoveryOpts {
    /// Convenience constructor for an OCI source
    pub fn oci(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            oci: Some(OciDiscoveryOpts {
                name: name.into(),
                image: image.into(),
            }),
            ..Default::default()
        }
    }

    /// Number of populated sub-configurations
    pub fn configured_count(&self) -> usize {
        [
            self.gcp.is_some(),
            self.oci.is_some(),
            self.rest.is_some(),
            self.kubernetes.is_some(),
            self.local.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Name of the first populated sub-configuration
    pub fn name(&self) -> Option<&str> {
        self.gcp
            .as_ref()
            .map(|s| s.name.as_str())
            .or_else(|| self.oci.as_ref().map(|s| s.name.as_str()))
            .or_else(|| self.rest.as_ref().map(|s| s.name.as_str()))
            .or_else(|| self.kubernetes.as_ref().map(|s| s.name.as_str()))
            .or_else(|| self.local.as_ref().map(|s| s.name.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpDiscoveryOpts {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manifest_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciDiscoveryOpts {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestDiscoveryOpts {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesDiscoveryOpts {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDiscoveryOpts {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oci_source_yaml() {
        let source = PluginDiscoveryOpts::oci(
            "compatibility-tests-source-name",
            "compatibility-tests-source-image",
        );
        let yaml = serde_yaml::to_string(&source).unwrap();
        assert_eq!(
            yaml,
            "oci:\n  name: compatibility-tests-source-name\n  image: compatibility-tests-source-image\n"
        );
        assert_eq!(source.configured_count(), 1);
        assert_eq!(source.name(), Some("compatibility-tests-source-name"));
    }

    #[test]
    fn test_configured_count_with_two_sources() {
        let source = PluginDiscoveryOpts {
            local: Some(LocalDiscoveryOpts {
                name: "local".to_string(),
                path: "/tmp/plugins".to_string(),
            }),
            ..PluginDiscoveryOpts::oci("oci", "image")
        };
        assert_eq!(source.configured_count(), 2);
        assert_eq!(source.name(), Some("oci"));
    }
}
