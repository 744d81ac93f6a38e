//! API records: names, arguments and expected outputs

use crate::error::CoreError;
use crate::version::RuntimeVersion;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical runtime operation the harness can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiName {
    // Contexts
    SetContext,
    GetContext,
    DeleteContext,
    SetCurrentContext,
    GetCurrentContext,
    RemoveCurrentContext,
    GetActiveContext,
    // Servers
    SetServer,
    GetServer,
    DeleteServer,
    SetCurrentServer,
    GetCurrentServer,
    RemoveCurrentServer,
    // Feature flags
    SetFeature,
    IsFeatureEnabled,
    DeleteFeature,
    // Discovery sources
    SetCLIDiscoverySource,
    GetCLIDiscoverySource,
    DeleteCLIDiscoverySource,
    // Whole client config
    GetClientConfig,
    StoreClientConfig,
    // Config metadata
    SetConfigMetadataPatchStrategy,
    GetConfigMetadataPatchStrategy,
    DeleteConfigMetadataPatchStrategy,
    SetConfigMetadataSetting,
    GetConfigMetadataSetting,
    DeleteConfigMetadataSetting,
    UseUnifiedConfig,
    IsConfigMetadataSettingsEnabled,
    GetMetadata,
}

impl ApiName {
    pub const ALL: [ApiName; 30] = [
        ApiName::SetContext,
        ApiName::GetContext,
        ApiName::DeleteContext,
        ApiName::SetCurrentContext,
        ApiName::GetCurrentContext,
        ApiName::RemoveCurrentContext,
        ApiName::GetActiveContext,
        ApiName::SetServer,
        ApiName::GetServer,
        ApiName::DeleteServer,
        ApiName::SetCurrentServer,
        ApiName::GetCurrentServer,
        ApiName::RemoveCurrentServer,
        ApiName::SetFeature,
        ApiName::IsFeatureEnabled,
        ApiName::DeleteFeature,
        ApiName::SetCLIDiscoverySource,
        ApiName::GetCLIDiscoverySource,
        ApiName::DeleteCLIDiscoverySource,
        ApiName::GetClientConfig,
        ApiName::StoreClientConfig,
        ApiName::SetConfigMetadataPatchStrategy,
        ApiName::GetConfigMetadataPatchStrategy,
        ApiName::DeleteConfigMetadataPatchStrategy,
        ApiName::SetConfigMetadataSetting,
        ApiName::GetConfigMetadataSetting,
        ApiName::DeleteConfigMetadataSetting,
        ApiName::UseUnifiedConfig,
        ApiName::IsConfigMetadataSettingsEnabled,
        ApiName::GetMetadata,
    ];

    /// Wire name, identical to the runtime's function name
    pub fn as_str(self) -> &'static str {
        match self {
            ApiName::SetContext => "SetContext",
            ApiName::GetContext => "GetContext",
            ApiName::DeleteContext => "DeleteContext",
            ApiName::SetCurrentContext => "SetCurrentContext",
            ApiName::GetCurrentContext => "GetCurrentContext",
            ApiName::RemoveCurrentContext => "RemoveCurrentContext",
            ApiName::GetActiveContext => "GetActiveContext",
            ApiName::SetServer => "SetServer",
            ApiName::GetServer => "GetServer",
            ApiName::DeleteServer => "DeleteServer",
            ApiName::SetCurrentServer => "SetCurrentServer",
            ApiName::GetCurrentServer => "GetCurrentServer",
            ApiName::RemoveCurrentServer => "RemoveCurrentServer",
            ApiName::SetFeature => "SetFeature",
            ApiName::IsFeatureEnabled => "IsFeatureEnabled",
            ApiName::DeleteFeature => "DeleteFeature",
            ApiName::SetCLIDiscoverySource => "SetCLIDiscoverySource",
            ApiName::GetCLIDiscoverySource => "GetCLIDiscoverySource",
            ApiName::DeleteCLIDiscoverySource => "DeleteCLIDiscoverySource",
            ApiName::GetClientConfig => "GetClientConfig",
            ApiName::StoreClientConfig => "StoreClientConfig",
            ApiName::SetConfigMetadataPatchStrategy => "SetConfigMetadataPatchStrategy",
            ApiName::GetConfigMetadataPatchStrategy => "GetConfigMetadataPatchStrategy",
            ApiName::DeleteConfigMetadataPatchStrategy => "DeleteConfigMetadataPatchStrategy",
            ApiName::SetConfigMetadataSetting => "SetConfigMetadataSetting",
            ApiName::GetConfigMetadataSetting => "GetConfigMetadataSetting",
            ApiName::DeleteConfigMetadataSetting => "DeleteConfigMetadataSetting",
            ApiName::UseUnifiedConfig => "UseUnifiedConfig",
            ApiName::IsConfigMetadataSettingsEnabled => "IsConfigMetadataSettingsEnabled",
            ApiName::GetMetadata => "GetMetadata",
        }
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CoreError::UnknownApiName(s.to_string()))
    }
}

impl TryFrom<String> for ApiName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApiName> for String {
    fn from(name: ApiName) -> String {
        name.as_str().to_string()
    }
}

/// Canonical argument names shared with the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentKey {
    Context,
    ContextName,
    Server,
    ServerName,
    Target,
    ContextType,
    Name,
    DiscoverySource,
    Plugin,
    Key,
    Value,
    ClientConfig,
    SetCurrent,
    PatchStrategy,
    SettingKey,
    SettingValue,
}

impl ArgumentKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ArgumentKey::Context => "context",
            ArgumentKey::ContextName => "contextName",
            ArgumentKey::Server => "server",
            ArgumentKey::ServerName => "serverName",
            ArgumentKey::Target => "target",
            ArgumentKey::ContextType => "contextType",
            ArgumentKey::Name => "name",
            ArgumentKey::DiscoverySource => "discoverySource",
            ArgumentKey::Plugin => "plugin",
            ArgumentKey::Key => "key",
            ArgumentKey::Value => "value",
            ArgumentKey::ClientConfig => "clientConfig",
            ArgumentKey::SetCurrent => "setCurrent",
            ArgumentKey::PatchStrategy => "patchStrategy",
            ArgumentKey::SettingKey => "settingKey",
            ArgumentKey::SettingValue => "settingValue",
        }
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a single API argument
///
/// Structured payloads travel as YAML text inside the `String` variant; the
/// driver decodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Bool(bool),
    String(String),
}

impl ArgumentValue {
    /// Encode a structured payload as a YAML string argument
    pub fn yaml<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::to_string(value).map(ArgumentValue::String)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) => Some(s),
            ArgumentValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgumentValue::Bool(b) => Some(*b),
            ArgumentValue::String(_) => None,
        }
    }
}

impl From<bool> for ArgumentValue {
    fn from(b: bool) -> Self {
        ArgumentValue::Bool(b)
    }
}

impl From<String> for ArgumentValue {
    fn from(s: String) -> Self {
        ArgumentValue::String(s)
    }
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        ArgumentValue::String(s.to_string())
    }
}

/// Insertion-ordered argument map of one API record
pub type Arguments = IndexMap<ArgumentKey, ArgumentValue>;

/// Outcome an API step is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCode {
    Success,
    Failed,
}

/// How an expected output is compared with the driver's response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStrategy {
    /// Expected mapping must be a sub-map of the actual one; errors match by substring
    #[default]
    Partial,
    /// Deep equality
    Strict,
}

/// Expected result of one API step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub result: ResultCode,

    /// YAML body on success, error text on failure
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_strategy: Option<ValidationStrategy>,
}

impl Output {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Success,
            content: content.into(),
            validation_strategy: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Failed,
            content: error.into(),
            validation_strategy: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Option<ValidationStrategy>) -> Self {
        self.validation_strategy = strategy;
        self
    }

    /// Strategy to apply when none was requested explicitly
    pub fn effective_strategy(&self) -> ValidationStrategy {
        self.validation_strategy.unwrap_or_default()
    }
}

/// One logical call: name, target version, arguments and expected output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    pub name: ApiName,
    pub version: RuntimeVersion,
    #[serde(default)]
    pub arguments: Arguments,
    pub output: Output,
}

impl Api {
    pub fn new(name: ApiName, version: RuntimeVersion, arguments: Arguments, output: Output) -> Self {
        Self {
            name,
            version,
            arguments,
            output,
        }
    }

    /// Look up a single argument
    pub fn argument(&self, key: ArgumentKey) -> Option<&ArgumentValue> {
        self.arguments.get(&key)
    }
}
