//! Option types, validators and command builders for compatibility tests
//!
//! Every runtime API has an input options struct, an output options struct
//! and a `new_<api>_command` builder. Builders refuse anything the target
//! runtime version could not express:
//!
//! - the API must exist on that version ([`RuntimeVersion::supports`])
//! - input and output must name the same version
//! - records must use the fields that version understands (for example
//!   legacy `type` on v0.25.4 contexts, `target` from v0.28.0 on)
//!
//! ```ignore
//! use compat_builders::context::{new_set_context_command, SetContextInputOptions};
//! use compat_builders::ErrorOutputOptions;
//!
//! let command = new_set_context_command(&input, &ErrorOutputOptions::new(version))?;
//! ```
//!
//! The [`defaults`] module wraps the builders with canonical fixture values.
//!
//! [`RuntimeVersion::supports`]: compat_core::RuntimeVersion::supports

pub mod client_config;
mod command;
pub mod context;
pub mod defaults;
pub mod discovery;
mod error;
pub mod feature;
pub mod metadata;
mod output;
pub mod server;
mod validate;

pub use error::{BuildError, BuildResult, ValidationError, ValidationResult};
pub use output::{BoolOutputOptions, ErrorOutputOptions};
pub use validate::{Validate, Versioned};
