//! Context records

use super::discovery::PluginDiscoveryOpts;
use super::is_false;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target a context points at (v0.28.0 and later)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "kubernetes")]
    Kubernetes,
    #[serde(rename = "mission-control")]
    MissionControl,
    #[serde(rename = "global")]
    Global,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Kubernetes => "kubernetes",
            Target::MissionControl => "mission-control",
            Target::Global => "global",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context kind: the legacy `type` field on v0.25.4 and `contextType` on latest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    K8s,
    Tmc,
    Tanzu,
}

impl ContextType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::K8s => "k8s",
            ContextType::Tmc => "tmc",
            ContextType::Tanzu => "tanzu",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CLI context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    /// Legacy context kind (v0.25.4)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<ContextType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_type: Option<ContextType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_opts: Option<GlobalServerOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_opts: Option<ClusterServerOpts>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovery_sources: Vec<PluginDiscoveryOpts>,
}

impl ContextOpts {
    /// Endpoint of whichever server block is populated
    pub fn endpoint(&self) -> Option<&str> {
        self.global_opts
            .as_ref()
            .map(|g| g.endpoint.as_str())
            .or_else(|| self.cluster_opts.as_ref().map(|c| c.endpoint.as_str()))
    }
}

/// Endpoint of a global (SaaS) server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalServerOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<GlobalServerAuthOpts>,
}

/// Authentication state cached for a global server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalServerAuthOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(rename = "IDToken", default, skip_serializing_if = "String::is_empty")]
    pub id_token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub auth_type: String,
}

/// Endpoint of a Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServerOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,

    /// Kubeconfig path
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    /// Kubeconfig context
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_management_cluster: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_legacy_context_yaml_shape() {
        let context = ContextOpts {
            name: "compatibility-test-one".to_string(),
            legacy_type: Some(ContextType::K8s),
            global_opts: Some(GlobalServerOpts {
                endpoint: "default-compatibility-test-endpoint".to_string(),
                auth: None,
            }),
            ..Default::default()
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(&serde_yaml::to_string(&context).unwrap()).unwrap();
        assert_eq!(value["type"], serde_yaml::Value::from("k8s"));
        assert_eq!(
            value["globalOpts"]["endpoint"],
            serde_yaml::Value::from("default-compatibility-test-endpoint")
        );
        assert!(value.get("target").is_none());
        assert!(value.get("contextType").is_none());
    }

    #[test]
    fn test_context_round_trip_with_auth() {
        let context = ContextOpts {
            name: "tmc-context".to_string(),
            target: Some(Target::MissionControl),
            context_type: Some(ContextType::Tmc),
            global_opts: Some(GlobalServerOpts {
                endpoint: "tmc.example.com:443".to_string(),
                auth: Some(GlobalServerAuthOpts {
                    issuer: "https://issuer".to_string(),
                    user_name: "operator".to_string(),
                    permissions: vec!["read".to_string(), "write".to_string()],
                    id_token: "id".to_string(),
                    access_token: "access".to_string(),
                    refresh_token: "refresh".to_string(),
                    expiration: Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()),
                    auth_type: "client".to_string(),
                }),
            }),
            ..Default::default()
        };

        let yaml = serde_yaml::to_string(&context).unwrap();
        assert!(yaml.contains("IDToken: id"));
        assert!(yaml.contains("target: mission-control"));
        let parsed: ContextOpts = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, context);
    }

    #[test]
    fn test_cluster_endpoint_fallback() {
        let context = ContextOpts {
            cluster_opts: Some(ClusterServerOpts {
                endpoint: "https://cluster:6443".to_string(),
                is_management_cluster: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(context.endpoint(), Some("https://cluster:6443"));
    }
}
