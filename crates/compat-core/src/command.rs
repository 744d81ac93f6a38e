//! Commands and test cases

use crate::api::Api;
use crate::error::{CoreError, CoreResult};
use crate::version::RuntimeVersion;

/// One test step, executed by a single driver invocation
///
/// A command always holds at least one API record and all of its records
/// target the same runtime version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    apis: Vec<Api>,
}

impl Command {
    /// Create a single-step command
    pub fn new(api: Api) -> Self {
        Self { apis: vec![api] }
    }

    /// Append another record to be run in the same driver invocation
    pub fn push(&mut self, api: Api) -> CoreResult<()> {
        let expected = self.version();
        if api.version != expected {
            return Err(CoreError::MixedVersions {
                api: api.name,
                expected,
                found: api.version,
            });
        }
        self.apis.push(api);
        Ok(())
    }

    /// Merge several commands into one driver invocation, keeping record order
    pub fn combine(commands: impl IntoIterator<Item = Command>) -> CoreResult<Self> {
        let mut apis = commands.into_iter().flat_map(|c| c.apis);
        let mut combined = Command::new(apis.next().ok_or(CoreError::EmptyCommand)?);
        for api in apis {
            combined.push(api)?;
        }
        Ok(combined)
    }

    /// Runtime version shared by every record
    pub fn version(&self) -> RuntimeVersion {
        self.apis[0].version
    }

    pub fn apis(&self) -> &[Api] {
        &self.apis
    }

    pub fn into_apis(self) -> Vec<Api> {
        self.apis
    }
}

/// An ordered scenario of commands against shared on-disk state
///
/// Later commands observe whatever earlier commands wrote. Identical commands
/// added twice are kept as two distinct assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    commands: Vec<Command>,
}

impl TestCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command, returning the extended test case
    pub fn add(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Extend<Command> for TestCase {
    fn extend<T: IntoIterator<Item = Command>>(&mut self, iter: T) {
        self.commands.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiName, Arguments, Output};

    fn api(name: ApiName, version: RuntimeVersion) -> Api {
        Api::new(name, version, Arguments::new(), Output::success(""))
    }

    #[test]
    fn test_push_rejects_mixed_versions() {
        let mut command = Command::new(api(ApiName::GetServer, RuntimeVersion::V0254));
        let err = command
            .push(api(ApiName::GetCurrentServer, RuntimeVersion::Latest))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::MixedVersions {
                expected: RuntimeVersion::V0254,
                found: RuntimeVersion::Latest,
                ..
            }
        ));
        assert_eq!(command.apis().len(), 1);
    }

    #[test]
    fn test_combine_keeps_order() {
        let combined = Command::combine([
            Command::new(api(ApiName::SetServer, RuntimeVersion::V0280)),
            Command::new(api(ApiName::GetServer, RuntimeVersion::V0280)),
        ])
        .unwrap();

        let names: Vec<_> = combined.apis().iter().map(|a| a.name).collect();
        assert_eq!(names, vec![ApiName::SetServer, ApiName::GetServer]);
        assert_eq!(combined.version(), RuntimeVersion::V0280);
    }

    #[test]
    fn test_combine_empty() {
        assert!(matches!(
            Command::combine(Vec::new()),
            Err(CoreError::EmptyCommand)
        ));
    }

    #[test]
    fn test_test_case_keeps_duplicates_in_order() {
        let check = Command::new(api(ApiName::IsFeatureEnabled, RuntimeVersion::V090));
        let test_case = TestCase::new()
            .add(Command::new(api(ApiName::SetFeature, RuntimeVersion::Latest)))
            .add(check.clone())
            .add(check);

        assert_eq!(test_case.len(), 3);
        assert_eq!(test_case.commands()[1], test_case.commands()[2]);
        assert_eq!(test_case.commands()[0].version(), RuntimeVersion::Latest);
    }
}
