//! Per-test-case scratch config directories
//!
//! Drivers never touch the user's real configuration: every test case gets
//! a fresh directory holding the three config files, and drivers find them
//! through environment variables.

use crate::error::{HarnessError, HarnessResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

pub const CONFIG_ENV: &str = "TANZU_CONFIG";
pub const CONFIG_NEXT_GEN_ENV: &str = "TANZU_CONFIG_NEXT_GEN";
pub const CONFIG_METADATA_ENV: &str = "TANZU_CONFIG_METADATA";

const CONFIG_FILE: &str = "config.yaml";
const CONFIG_NEXT_GEN_FILE: &str = "config-ng.yaml";
const CONFIG_METADATA_FILE: &str = ".config-metadata.yaml";

/// A temporary directory with empty config files, removed on drop
#[derive(Debug)]
pub struct ScratchConfig {
    dir: TempDir,
}

impl ScratchConfig {
    /// Create the directory under `root`, or the system temp dir
    pub fn create(root: Option<&Path>) -> HarnessResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("compat-config-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(HarnessError::Scratch)?;

        for file in [CONFIG_FILE, CONFIG_NEXT_GEN_FILE, CONFIG_METADATA_FILE] {
            fs::write(dir.path().join(file), "").map_err(HarnessError::Scratch)?;
        }

        debug!("Created scratch config directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_file(&self) -> PathBuf {
        self.path().join(CONFIG_FILE)
    }

    pub fn config_next_gen_file(&self) -> PathBuf {
        self.path().join(CONFIG_NEXT_GEN_FILE)
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.path().join(CONFIG_METADATA_FILE)
    }

    /// Environment pointing a driver at this directory's files
    pub fn env_vars(&self) -> Vec<(String, String)> {
        [
            (CONFIG_ENV, self.config_file()),
            (CONFIG_NEXT_GEN_ENV, self.config_next_gen_file()),
            (CONFIG_METADATA_ENV, self.metadata_file()),
        ]
        .into_iter()
        .map(|(key, path)| (key.to_string(), path.to_string_lossy().into_owned()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_files_exist_and_are_empty() {
        let scratch = ScratchConfig::create(None).unwrap();
        for file in [
            scratch.config_file(),
            scratch.config_next_gen_file(),
            scratch.metadata_file(),
        ] {
            assert_eq!(fs::read_to_string(file).unwrap(), "");
        }
    }

    #[test]
    fn test_env_vars_point_into_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchConfig::create(Some(root.path())).unwrap();
        let env = scratch.env_vars();

        assert_eq!(env.len(), 3);
        assert_eq!(env[0].0, CONFIG_ENV);
        assert!(env.iter().all(|(_, path)| Path::new(path).starts_with(root.path())));
        assert!(env[2].1.ends_with(".config-metadata.yaml"));
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let scratch = ScratchConfig::create(None).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }
}
