//! Harness configuration

use compat_core::RuntimeVersion;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Directory holding the per-version driver binaries
pub const DRIVER_DIR_ENV: &str = "COMPAT_DRIVER_DIR";
/// Upper bound, in seconds, on a single driver invocation
pub const DRIVER_TIMEOUT_ENV: &str = "COMPAT_DRIVER_TIMEOUT_SECS";
/// Parent directory for scratch config directories
pub const SCRATCH_ROOT_ENV: &str = "COMPAT_SCRATCH_ROOT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Where drivers live and how they are run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory searched for `runtime-test-plugin-<version>` binaries
    pub driver_dir: PathBuf,
    /// Explicit binary per version, taking precedence over `driver_dir`
    pub driver_overrides: BTreeMap<RuntimeVersion, PathBuf>,
    pub timeout: Duration,
    /// Parent of scratch directories (system temp dir when unset)
    pub scratch_root: Option<PathBuf>,
    /// Extra environment passed to every driver
    pub extra_env: BTreeMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let driver_dir = env::var(DRIVER_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_driver_dir());

        let timeout = env::var(DRIVER_TIMEOUT_ENV)
            .ok()
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            driver_dir,
            driver_overrides: BTreeMap::new(),
            timeout,
            scratch_root: env::var(SCRATCH_ROOT_ENV).ok().map(PathBuf::from),
            extra_env: BTreeMap::new(),
        }
    }

    /// Use `path` as the driver binary for `version`
    pub fn with_driver(mut self, version: RuntimeVersion, path: impl Into<PathBuf>) -> Self {
        self.driver_overrides.insert(version, path.into());
        self
    }

    /// Use the same binary for every version
    pub fn with_all_drivers(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        for version in RuntimeVersion::ALL {
            self.driver_overrides.insert(version, path.clone());
        }
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Binary to launch for `version`
    pub fn driver_path(&self, version: RuntimeVersion) -> PathBuf {
        self.driver_overrides
            .get(&version)
            .cloned()
            .unwrap_or_else(|| self.driver_dir.join(version.driver_binary_name()))
    }
}

fn default_driver_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.join("testplugins").join("bin"))
        .unwrap_or_else(|| manifest_dir.join("testplugins").join("bin"))
}
