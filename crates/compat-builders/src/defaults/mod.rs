//! Canonical fixtures and one-line command helpers for test authors
//!
//! Each `XxxArgs::new(version)` starts from records shaped for that runtime
//! version and the `default_*_command` functions forward to the real
//! builders, so every rule enforced there still applies here.

mod client_config;
mod context;
mod discovery;
mod feature;
mod metadata;
mod server;

pub use client_config::{
    default_get_client_config_command, default_store_client_config_command, ClientConfigArgs,
};
pub use context::{
    default_delete_context_command, default_get_active_context_command,
    default_get_context_command, default_get_current_context_command,
    default_remove_current_context_command, default_set_context_command,
    default_set_current_context_command, ContextArgs,
};
pub use discovery::{
    default_delete_cli_discovery_source_command, default_get_cli_discovery_source_command,
    default_set_cli_discovery_source_command, DiscoverySourceArgs,
};
pub use feature::{
    default_delete_feature_command, default_is_feature_enabled_command,
    default_set_feature_command, FeatureArgs,
};
pub use metadata::{
    default_delete_config_metadata_patch_strategy_command,
    default_delete_config_metadata_setting_command,
    default_get_config_metadata_patch_strategy_command,
    default_get_config_metadata_setting_command, default_get_metadata_command,
    default_is_config_metadata_settings_enabled_command,
    default_set_config_metadata_patch_strategy_command,
    default_set_config_metadata_setting_command, default_use_unified_config_command,
    MetadataArgs,
};
pub use server::{
    default_delete_server_command, default_get_current_server_command,
    default_get_server_command, default_remove_current_server_command,
    default_set_current_server_command, default_set_server_command, ServerArgs,
};

pub const DEFAULT_CONTEXT_NAME: &str = "compatibility-test-one";
pub const DEFAULT_ENDPOINT: &str = "default-compatibility-test-endpoint";
pub const DEFAULT_SERVER_NAME: &str = "compatibility-test-server";
pub const DEFAULT_DISCOVERY_SOURCE_NAME: &str = "compatibility-tests-source-name";
pub const DEFAULT_DISCOVERY_SOURCE_IMAGE: &str = "compatibility-tests-source-image";
pub const DEFAULT_PLUGIN: &str = "compatibility-tests-plugin";
pub const DEFAULT_PLUGIN_KEY: &str = "compatibility-tests-plugin-key";
pub const DEFAULT_FEATURE_VALUE: &str = "true";
pub const DEFAULT_PATCH_STRATEGY_KEY: &str = "contexts.target";
pub const DEFAULT_SETTING_KEY: &str = "compatibility-tests-setting-key";
pub const DEFAULT_SETTING_VALUE: &str = "compatibility-tests-setting-value";
