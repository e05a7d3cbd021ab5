//! Scoped key lookup across a locale chain.
//!
//! For each locale the engine tries `locale.scope….key`, then drops scope
//! segments from the front until only `locale.key` is left, before moving on
//! to the next locale. Every tried path is recorded so a miss can report the
//! full search.
//!
//! # Invariants
//!
//! 1. **Chain order is final**: locales are tried exactly in chain order and
//!    the first leaf found wins.
//! 2. **Locale and key are never stripped**: only scope segments are dropped.
//! 3. **Pseudo-locales short-circuit**: when the chain starts with
//!    [`KEY_ECHO_LOCALE`] or [`PATH_ECHO_LOCALE`] the store is not consulted.

use std::iter;

use serde_json::Value;

use crate::error::LookupError;
use crate::locale::LocaleChain;
use crate::store::TranslationStore;

/// Reserved first-chain locale that renders `[key]` instead of a translation.
pub const KEY_ECHO_LOCALE: &str = "ke";

/// Reserved first-chain locale that renders `[scope.key]` instead of a
/// translation.
pub const PATH_ECHO_LOCALE: &str = "zz";

/// View scope segments with relative components resolved.
///
/// `.` and empty segments are ignored and `..` removes the previous segment,
/// the same way a filesystem path is cleaned.
///
/// # Examples
///
/// ```
/// use keyglot::lookup::ScopePath;
///
/// let scope = ScopePath::new(["users", ".", "admin", "..", "", "show"]);
/// assert_eq!(scope.as_slice(), ["users", "show"]);
/// assert_eq!(ScopePath::from_slash_path("users//show").as_slice(), ["users", "show"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
    /// Clean and collect `segments`.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned = Vec::new();
        for segment in segments {
            match segment.as_ref() {
                ".." => {
                    cleaned.pop();
                }
                "." | "" => {}
                other => cleaned.push(other.to_owned()),
            }
        }
        Self(cleaned)
    }

    /// Split a `/`-separated path into a scope.
    #[must_use]
    pub fn from_slash_path(path: &str) -> Self {
        Self::new(path.split('/'))
    }

    /// The cleaned segments.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether the scope has no segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ScopePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A leaf located in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<'s> {
    /// Chain entry the leaf was found under.
    pub locale: String,
    /// Dotted path that matched.
    pub path: String,
    /// The leaf value.
    pub value: &'s Value,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'s> {
    /// A value stored in the translation tree.
    Leaf(Found<'s>),
    /// Diagnostic text produced by a pseudo-locale.
    Echo(String),
}

/// Find `key` under `scope` for the first locale in `chain` that has it.
///
/// # Errors
///
/// Returns [`LookupError::NotFound`] with every attempted path when no locale
/// yields a leaf, and [`LookupError::Store`] when the key produces a
/// malformed path.
///
/// # Examples
///
/// ```
/// use keyglot::locale::LocaleChain;
/// use keyglot::lookup::{Resolution, ScopePath, lookup};
/// use keyglot::store::TranslationStore;
/// use serde_json::json;
///
/// let mut store = TranslationStore::new();
/// store.put_at_path("en.title", json!("Home")).expect("write");
///
/// let chain = LocaleChain::build(["en"], None);
/// let scope = ScopePath::new(["users", "show"]);
/// let Resolution::Leaf(found) = lookup(&store, &chain, &scope, "title").expect("found") else {
///     panic!("expected a stored leaf");
/// };
/// assert_eq!(found.path, "en.title");
/// assert_eq!(found.value, &json!("Home"));
/// ```
pub fn lookup<'s>(
    store: &'s TranslationStore,
    chain: &LocaleChain,
    scope: &ScopePath,
    key: &str,
) -> Result<Resolution<'s>, LookupError> {
    match chain.first() {
        Some(KEY_ECHO_LOCALE) => return Ok(Resolution::Echo(format!("[{key}]"))),
        Some(PATH_ECHO_LOCALE) => {
            let joined = scope.iter().chain(iter::once(key)).collect::<Vec<_>>().join(".");
            return Ok(Resolution::Echo(format!("[{joined}]")));
        }
        _ => {}
    }

    let mut attempted = Vec::new();
    for locale in chain.iter() {
        let mut context: Vec<&str> = iter::once(locale)
            .chain(scope.iter())
            .chain(iter::once(key))
            .collect();
        while context.len() > 1 {
            let path = context.join(".");
            if let Some(value) = store.navigate(&path)? {
                tracing::debug!(%key, %path, "translation resolved");
                return Ok(Resolution::Leaf(Found {
                    locale: locale.to_owned(),
                    path,
                    value,
                }));
            }
            attempted.push(path);
            context.remove(1);
        }
    }

    tracing::debug!(%key, %chain, attempts = attempted.len(), "translation not found");
    Err(LookupError::NotFound {
        key: key.to_owned(),
        attempted,
    })
}
