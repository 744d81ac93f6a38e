//! Shared helpers for harness integration tests

#![allow(dead_code)]

use compat_builders::defaults::{
    default_delete_context_command, default_delete_feature_command,
    default_get_cli_discovery_source_command, default_get_client_config_command,
    default_get_context_command, default_is_feature_enabled_command,
    default_set_cli_discovery_source_command, default_set_context_command,
    default_set_current_context_command, default_set_feature_command,
    default_store_client_config_command, ClientConfigArgs, ContextArgs, DiscoverySourceArgs,
    FeatureArgs,
};
use compat_core::types::ClientConfigOpts;
use compat_core::{RuntimeVersion, TestCase, ValidationStrategy};
use compat_harness::HarnessConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const CONTEXT_NOT_FOUND: &str = "context compatibility-test-one not found";
pub const LEGACY_CONTEXT_NOT_FOUND: &str = "could not find context \"compatibility-test-one\"";

/// Every version with a feature flag API, newest first
pub const FEATURE_VERSIONS: [RuntimeVersion; 5] = [
    RuntimeVersion::Latest,
    RuntimeVersion::V090,
    RuntimeVersion::V0280,
    RuntimeVersion::V0254,
    RuntimeVersion::V0116,
];

/// Route harness logs to the test output, honouring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing every runtime version at the scripted driver
pub fn scripted_config(scratch_root: &Path) -> HarnessConfig {
    HarnessConfig::from_env()
        .with_all_drivers(env!("CARGO_BIN_EXE_scripted-driver"))
        .with_scratch_root(scratch_root)
}

/// Set a context on `writer` and read it back strictly on `reader`
pub fn context_round_trip(writer: RuntimeVersion, reader: RuntimeVersion) -> TestCase {
    let reader = ContextArgs::new(reader).with_strategy(ValidationStrategy::Strict);
    TestCase::new()
        .add(default_set_context_command(&ContextArgs::new(writer)).unwrap())
        .add(default_get_context_command(&reader).unwrap())
}

/// Context written and made current on latest, read in the v0.25.4 shape
pub fn context_written_on_latest_read_on_legacy() -> TestCase {
    let latest = ContextArgs::new(RuntimeVersion::Latest);
    let legacy = ContextArgs::new(RuntimeVersion::V0254).with_strategy(ValidationStrategy::Strict);

    TestCase::new()
        .add(default_set_context_command(&latest).unwrap())
        .add(default_set_current_context_command(&latest).unwrap())
        .add(default_get_context_command(&legacy).unwrap())
}

/// Context deleted on v0.28.0 is gone for latest, v0.28.0 and v0.25.4
pub fn delete_invalidates_context() -> TestCase {
    let writer = ContextArgs::new(RuntimeVersion::V0280);
    let mut test_case = TestCase::new()
        .add(default_set_context_command(&writer).unwrap())
        .add(default_delete_context_command(&writer).unwrap());
    for (version, error) in [
        (RuntimeVersion::Latest, CONTEXT_NOT_FOUND),
        (RuntimeVersion::V0280, CONTEXT_NOT_FOUND),
        (RuntimeVersion::V0254, LEGACY_CONTEXT_NOT_FOUND),
    ] {
        test_case.push(
            default_get_context_command(&ContextArgs::new(version).with_error(error)).unwrap(),
        );
    }
    test_case
}

/// OCI source set on latest is visible to next-gen readers only
pub fn oci_discovery_source_round_trip() -> TestCase {
    let mut test_case = TestCase::new().add(
        default_set_cli_discovery_source_command(&DiscoverySourceArgs::new(RuntimeVersion::Latest))
            .unwrap(),
    );
    for version in [RuntimeVersion::Latest, RuntimeVersion::V102, RuntimeVersion::V090] {
        test_case.push(
            default_get_cli_discovery_source_command(
                &DiscoverySourceArgs::new(version).with_strategy(ValidationStrategy::Strict),
            )
            .unwrap(),
        );
    }
    test_case.push(
        default_get_cli_discovery_source_command(
            &DiscoverySourceArgs::new(RuntimeVersion::V0280)
                .with_error("cli discovery source not found"),
        )
        .unwrap(),
    );
    test_case
}

/// Flag set on latest is read everywhere, then deleted on v0.28.0
pub fn feature_flag_lifecycle() -> TestCase {
    let mut test_case = TestCase::new()
        .add(default_set_feature_command(&FeatureArgs::new(RuntimeVersion::Latest)).unwrap());
    test_case.extend(
        FEATURE_VERSIONS
            .iter()
            .map(|v| default_is_feature_enabled_command(&FeatureArgs::new(*v)).unwrap()),
    );
    test_case.push(
        default_delete_feature_command(&FeatureArgs::new(RuntimeVersion::V0280)).unwrap(),
    );
    test_case.extend(FEATURE_VERSIONS.iter().map(|v| {
        default_is_feature_enabled_command(&FeatureArgs::new(*v).with_error("not found")).unwrap()
    }));
    test_case
}

/// Client config stored on v0.28.0, then read on latest asserting only the
/// known server, once partially and once strictly
pub fn client_config_partial_and_strict() -> (TestCase, TestCase) {
    let stored = ClientConfigArgs::new(RuntimeVersion::V0280);
    let subset = ClientConfigOpts {
        known_servers: stored.client_config_opts.known_servers.clone(),
        ..Default::default()
    };
    let partial = ClientConfigArgs::new(RuntimeVersion::Latest).with_client_config(subset);
    let strict = partial.clone().with_strategy(ValidationStrategy::Strict);

    let store = default_store_client_config_command(&stored).unwrap();
    (
        TestCase::new()
            .add(store.clone())
            .add(default_get_client_config_command(&partial).unwrap()),
        TestCase::new()
            .add(store)
            .add(default_get_client_config_command(&strict).unwrap()),
    )
}
