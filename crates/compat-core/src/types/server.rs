//! Server records

use super::discovery::PluginDiscoveryOpts;
use super::GlobalServerOpts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of server a CLI is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    ManagementCluster,
    Global,
}

impl ServerType {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerType::ManagementCluster => "managementcluster",
            ServerType::Global => "global",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<ServerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_opts: Option<GlobalServerOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cluster_opts: Option<ManagementClusterServerOpts>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovery_sources: Vec<PluginDiscoveryOpts>,
}

/// Management cluster endpoint and kubeconfig location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementClusterServerOpts {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
}
