//! Cross-version compatibility test execution
//!
//! Runs [`TestCase`](compat_core::TestCase)s against one driver binary per
//! runtime version. All commands of a test case share a scratch config
//! directory, so state written by one runtime generation is read back by
//! another.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────┐
//!                 │     Executor     │
//!                 └────────┬─────────┘
//!                          │ one process per command
//!        ┌─────────────────┼─────────────────┐
//!        ▼                 ▼                 ▼
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ v0.11.6     │   │ v0.90.0     │   │ latest      │
//! │ driver      │   │ driver      │   │ driver      │
//! └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!        └─────────────────┼─────────────────┘
//!                   ┌──────▼──────┐
//!                   │   scratch   │  TANZU_CONFIG*
//!                   │   configs   │
//!                   └─────────────┘
//! ```

pub mod compare;
pub mod config;
pub mod driver;
mod error;
pub mod executor;
pub mod scratch;

pub use compare::{compare_values, validate_response, ComparisonResult, DiffCategory, Difference};
pub use config::HarnessConfig;
pub use driver::{Driver, DriverInvocation, DriverOutput, ProcessDriver};
pub use error::{HarnessError, HarnessResult};
pub use executor::{ExecutionReport, Executor};
pub use scratch::ScratchConfig;
