//! Whole client configuration records

use super::{ContextOpts, ContextType, PluginDiscoveryOpts, ServerOpts, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Feature flags of one plugin, keyed by flag name
pub type FeatureMap = BTreeMap<String, String>;

/// Key of the `currentContext` map
///
/// v0.25.4 keys current contexts by the legacy context kind, v0.28.0 and
/// later by target. Both spellings are disjoint, so the key serializes as
/// the bare string of whichever it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentContextKey {
    Target(Target),
    Type(ContextType),
}

impl From<Target> for CurrentContextKey {
    fn from(target: Target) -> Self {
        CurrentContextKey::Target(target)
    }
}

impl From<ContextType> for CurrentContextKey {
    fn from(context_type: ContextType) -> Self {
        CurrentContextKey::Type(context_type)
    }
}

impl fmt::Display for CurrentContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrentContextKey::Target(target) => target.fmt(f),
            CurrentContextKey::Type(context_type) => context_type.fmt(f),
        }
    }
}

/// The full client configuration as read by GetClientConfig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigOpts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_servers: Vec<ServerOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_server: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_contexts: Vec<ContextOpts>,

    /// Current context name per target, or per kind on v0.25.4
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub current_context: BTreeMap<CurrentContextKey, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_options: Option<ClientOptionsOpts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptionsOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli: Option<CliOptionsOpts>,

    /// Feature flags keyed by plugin name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, FeatureMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliOptionsOpts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovery_sources: Vec<PluginDiscoveryOpts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
}
