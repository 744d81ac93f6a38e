//! Config metadata records (v0.28.0 and later)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_metadata: Option<ConfigMetadataOpts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMetadataOpts {
    /// Patch strategy per config key path (e.g. `contexts.target: replace`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub patch_strategy: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}
