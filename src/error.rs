//! Error types shared across the translation engine.
//!
//! Every enum derives both [`thiserror::Error`] and [`miette::Diagnostic`] so
//! the command-line front end can render stable diagnostic codes and hints,
//! while library callers match on variants directly.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::plural::PluralCategory;

/// Failures raised by [`TranslationStore`](crate::store::TranslationStore).
///
/// A missing segment is never an error: navigation reports it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum StoreError {
    /// The dotted path was empty or contained an empty segment.
    #[error("malformed translation path '{path}'")]
    #[diagnostic(
        code(keyglot::store::malformed_path),
        help("paths are dot-separated segments such as `en.users.show.title`")
    )]
    MalformedPath {
        /// The offending path as supplied.
        path: String,
    },

    /// A write tried to descend through a segment holding a leaf value.
    #[error("cannot write '{path}': segment '{segment}' already holds a leaf value")]
    #[diagnostic(code(keyglot::store::path_conflict))]
    PathConflict {
        /// The full path being written.
        path: String,
        /// The intermediate segment that is not a branch.
        segment: String,
    },
}

/// Failures raised while looking a key up through a locale chain.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LookupError {
    /// No locale in the chain yielded a leaf for the key.
    #[error(
        "TranslationNotFound: Could not find key '{key}'.  Attempted: {}",
        quote_attempts(attempted)
    )]
    #[diagnostic(
        code(keyglot::lookup::not_found),
        help("add the key to one of the attempted paths, or run in production mode to fall back to the raw key")
    )]
    NotFound {
        /// The key that was requested.
        key: String,
        /// Every dotted path tried, in order.
        attempted: Vec<String>,
    },

    /// The key or scope produced a path the store rejects.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

fn quote_attempts(attempted: &[String]) -> String {
    if attempted.is_empty() {
        return "<none>".to_owned();
    }
    attempted
        .iter()
        .map(|path| format!("'{path}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures surfaced by [`Translator::translate`](crate::translator::Translator::translate).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TranslateError {
    /// Lookup failed and the operating mode does not degrade to the key.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),

    /// The key resolved to plural variants but no count was supplied.
    #[error("key '{key}' has plural forms; a count is required")]
    #[diagnostic(code(keyglot::translate::count_required))]
    CountRequired {
        /// The requested key.
        key: String,
    },

    /// Neither the selected category nor `other` exists in the variants.
    #[error("key '{key}' has no '{category}' form (and no 'other' fallback) for locale '{locale}'")]
    #[diagnostic(code(keyglot::translate::missing_plural_form))]
    MissingPluralForm {
        /// The requested key.
        key: String,
        /// Locale whose rule selected the category.
        locale: String,
        /// Category chosen by the plural policy.
        category: PluralCategory,
    },

    /// The resolved value cannot be rendered as text.
    #[error("key '{key}' resolved to a {kind}, which cannot be rendered")]
    #[diagnostic(
        code(keyglot::translate::invalid_leaf),
        help("translation leaves must be strings, numbers, or maps of plural categories to strings")
    )]
    InvalidLeaf {
        /// The requested key.
        key: String,
        /// JSON kind of the offending value.
        kind: &'static str,
    },
}

/// Failures raised while loading translation files from disk.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// A load path could not be opened or traversed.
    #[error("failed to walk translation directory '{root}'")]
    #[diagnostic(code(keyglot::load::walk))]
    Walk {
        /// Directory being traversed.
        root: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read translation file '{path}'")]
    #[diagnostic(code(keyglot::load::read))]
    ReadFile {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be parsed.
    #[error("failed to parse translation file '{path}': {detail}")]
    #[diagnostic(code(keyglot::load::parse))]
    Parse {
        /// File being parsed.
        path: Utf8PathBuf,
        /// Parser message.
        detail: String,
    },

    /// A file parsed, but its document root is not a mapping.
    #[error("translation file '{path}' must contain a mapping at its root")]
    #[diagnostic(code(keyglot::load::not_an_object))]
    NotAnObject {
        /// File being loaded.
        path: Utf8PathBuf,
    },

    /// The file's contents could not be merged into the store.
    #[error("failed to merge '{path}' into the translation store")]
    #[diagnostic(code(keyglot::load::merge))]
    Store {
        /// File being merged.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        #[diagnostic_source]
        source: StoreError,
    },
}
