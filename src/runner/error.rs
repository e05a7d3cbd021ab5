//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly. The `unused_assignments` lint fires in some Rust versions due to
//! thiserror/miette derive macro expansion.

// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

use crate::error::LoadError;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// Strict mode was requested and some translation files failed to load.
    #[error("{count} translation file(s) failed to load")]
    #[diagnostic(
        code(keyglot::runner::load_failed),
        help("fix the files listed below or drop --strict")
    )]
    LoadFailed {
        /// Number of failures.
        count: usize,
        /// The individual failures.
        #[related]
        failures: Vec<LoadError>,
    },

    /// No locale of the chain has any translations.
    #[error("no locale in [{chain}] has translations")]
    #[diagnostic(code(keyglot::runner::no_acceptable_locale))]
    NoAcceptableLocale {
        /// The chain that was checked.
        chain: String,
    },

    /// A `--arg` name walks through a value that is not an object.
    #[error("argument '{name}' conflicts with an earlier argument")]
    #[diagnostic(code(keyglot::runner::argument_conflict))]
    ArgumentConflict {
        /// The offending dotted name.
        name: String,
    },
}
