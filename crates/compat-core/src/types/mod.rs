//! YAML-serializable domain records exchanged with the runtime
//!
//! Each record carries the union of the fields known to any supported runtime
//! version. Which fields a given version accepts is decided by the validators
//! in `compat-builders`, never by these types.

mod client_config;
mod context;
mod discovery;
mod metadata;
mod server;

pub use client_config::{
    CliOptionsOpts, ClientConfigOpts, ClientOptionsOpts, CurrentContextKey, FeatureMap,
};
pub use context::{
    ClusterServerOpts, ContextOpts, ContextType, GlobalServerAuthOpts, GlobalServerOpts, Target,
};
pub use discovery::{
    GcpDiscoveryOpts, KubernetesDiscoveryOpts, LocalDiscoveryOpts, OciDiscoveryOpts,
    PluginDiscoveryOpts, RestDiscoveryOpts,
};
pub use metadata::{ConfigMetadataOpts, MetadataOpts};
pub use server::{ManagementClusterServerOpts, ServerOpts, ServerType};

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
