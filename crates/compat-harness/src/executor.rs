//! Running test cases against driver binaries

use crate::compare::{validate_response, ComparisonResult};
use crate::config::HarnessConfig;
use crate::driver::{Driver, DriverInvocation, ProcessDriver};
use crate::error::{HarnessError, HarnessResult};
use crate::scratch::ScratchConfig;
use compat_core::{wire, Command, RuntimeVersion, TestCase};
use tracing::{debug, info};

/// Executes test cases one command at a time, one driver process per command
pub struct Executor {
    config: HarnessConfig,
    driver: Box<dyn Driver>,
}

impl Executor {
    /// Executor launching real driver processes
    pub fn new(config: HarnessConfig) -> Self {
        let driver = ProcessDriver::new(config.timeout);
        Self::with_driver(config, driver)
    }

    pub fn with_driver(config: HarnessConfig, driver: impl Driver + 'static) -> Self {
        Self {
            config,
            driver: Box::new(driver),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `test_case` in a fresh scratch config directory
    ///
    /// The directory is removed when this returns, whatever the outcome.
    pub async fn run(&self, test_case: &TestCase) -> HarnessResult<ExecutionReport> {
        let scratch = ScratchConfig::create(self.config.scratch_root.as_deref())?;
        self.run_in(&scratch, test_case).await
    }

    /// Run `test_case` against a caller-owned scratch directory
    ///
    /// Stops at the first command that fails to execute or whose responses
    /// do not match.
    pub async fn run_in(
        &self,
        scratch: &ScratchConfig,
        test_case: &TestCase,
    ) -> HarnessResult<ExecutionReport> {
        let mut report = ExecutionReport::default();

        for (index, command) in test_case.commands().iter().enumerate() {
            debug!(
                "Running command {}/{} ({} API(s) on {})",
                index + 1,
                test_case.len(),
                command.apis().len(),
                command.version()
            );
            let results = self.run_command(scratch, command).await?;
            report.commands += 1;
            report.results.extend(results);
        }

        Ok(report)
    }

    async fn run_command(
        &self,
        scratch: &ScratchConfig,
        command: &Command,
    ) -> HarnessResult<Vec<ComparisonResult>> {
        let version = command.version();
        let invocation = self.invocation(scratch, command, version)?;
        let output = self.driver.invoke(invocation).await?;

        if !output.success() {
            return Err(HarnessError::DriverExit {
                version,
                status: output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |code| format!("status {}", code)),
                stderr: output.stderr.trim().to_string(),
            });
        }
        if !output.stderr.trim().is_empty() {
            return Err(HarnessError::DriverStderr {
                version,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let mut responses = wire::parse_stdout(&output.stdout)
            .map_err(|source| HarnessError::MalformedStdout { version, source })?;

        let mut results = Vec::with_capacity(command.apis().len());
        for api in command.apis() {
            let record = responses
                .take(api.name)
                .ok_or(HarnessError::MissingResponse {
                    version,
                    api: api.name,
                })?;

            let result = validate_response(api, &record);
            result.log_summary();
            if !result.passed {
                return Err(HarnessError::Mismatch(Box::new(result)));
            }
            results.push(result);
        }

        // Every record gets exactly one response
        if !responses.is_empty() {
            return Err(HarnessError::UnexpectedResponses {
                version,
                count: responses.len(),
                apis: responses.remaining(),
            });
        }

        Ok(results)
    }

    fn invocation(
        &self,
        scratch: &ScratchConfig,
        command: &Command,
        version: RuntimeVersion,
    ) -> HarnessResult<DriverInvocation> {
        let payload = wire::encode_apis(command.apis()).map_err(HarnessError::Encode)?;

        let mut env = scratch.env_vars();
        env.extend(
            self.config
                .extra_env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(DriverInvocation {
            version,
            program: self.config.driver_path(version),
            payload,
            env,
        })
    }
}

/// Comparisons gathered while running a test case
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Commands executed
    pub commands: usize,
    /// One entry per API record, in execution order
    pub results: Vec<ComparisonResult>,
}

impl ExecutionReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn log_summary(&self) {
        info!("=== Compatibility Test Summary ===");
        for result in &self.results {
            result.log_summary();
        }
        info!(
            "{}/{} API checks passed across {} command(s)",
            self.passed(),
            self.results.len(),
            self.commands
        );
    }
}
