//! Launching runtime driver processes

use crate::error::{HarnessError, HarnessResult};
use async_trait::async_trait;
use compat_core::wire::{APIS_FLAG, DRIVER_SUBCOMMAND};
use compat_core::RuntimeVersion;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Everything needed to run one command against one driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInvocation {
    pub version: RuntimeVersion,
    pub program: PathBuf,
    /// Serialized API records passed after `--apis`
    pub payload: String,
    pub env: Vec<(String, String)>,
}

/// What a driver left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl DriverOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executes driver invocations
#[async_trait]
pub trait Driver: Send + Sync {
    async fn invoke(&self, invocation: DriverInvocation) -> HarnessResult<DriverOutput>;
}

/// Largest payload a single argv entry can carry on Linux (`MAX_ARG_STRLEN`)
///
/// Past this `execve` fails with `E2BIG`. Drivers only read their request
/// from `--apis`, so oversized requests are refused before spawning.
pub const MAX_PAYLOAD_BYTES: usize = 128 * 1024;

/// Runs drivers as child processes
#[derive(Debug, Clone)]
pub struct ProcessDriver {
    timeout: Duration,
}

impl ProcessDriver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Driver for ProcessDriver {
    async fn invoke(&self, invocation: DriverInvocation) -> HarnessResult<DriverOutput> {
        // The limit counts the terminating NUL
        if invocation.payload.len() >= MAX_PAYLOAD_BYTES {
            return Err(HarnessError::PayloadTooLarge {
                version: invocation.version,
                size: invocation.payload.len(),
                limit: MAX_PAYLOAD_BYTES,
            });
        }

        debug!(
            "Launching {} for runtime version {}",
            invocation.program.display(),
            invocation.version
        );

        let mut command = Command::new(&invocation.program);
        command
            .arg(DRIVER_SUBCOMMAND)
            .arg(APIS_FLAG)
            .arg(&invocation.payload)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| HarnessError::DriverLaunch {
            version: invocation.version,
            path: invocation.program.clone(),
            source,
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| HarnessError::DriverLaunch {
                version: invocation.version,
                path: invocation.program.clone(),
                source,
            })?,
            Err(_) => {
                return Err(HarnessError::DriverTimeout {
                    version: invocation.version,
                    timeout: self.timeout,
                })
            }
        };

        Ok(DriverOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
