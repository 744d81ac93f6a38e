//! Core vocabulary for cross-version plugin runtime compatibility tests
//!
//! This crate defines what a compatibility test is made of, independent of
//! how it is built or executed:
//!
//! - [`RuntimeVersion`] - the runtime generations a driver can bind to
//! - [`Api`] - one call (name, version, arguments, expected [`Output`])
//! - [`Command`] - one driver invocation, one or more records of one version
//! - [`TestCase`] - an ordered list of commands sharing on-disk state
//! - [`types`] - YAML records (contexts, servers, discovery sources, ...)
//! - [`wire`] - the request/response format spoken with driver processes
//!
//! ```text
//! builders ──► Command ──► TestCase ──► executor ──► driver (per version)
//!                                          ▲               │
//!                                          └── stdout ◄────┘
//! ```

mod api;
mod command;
mod error;
pub mod types;
mod version;
pub mod wire;

pub use api::{
    Api, ApiName, ArgumentKey, ArgumentValue, Arguments, Output, ResultCode, ValidationStrategy,
};
pub use command::{Command, TestCase};
pub use error::{CoreError, CoreResult};
pub use version::RuntimeVersion;
