//! In-memory translation tree.
//!
//! The store maps locale → nested path segments → leaf, where every branch is
//! a JSON object and leaves are strings or plural variant maps. It is filled
//! through [`TranslationStore::merge_at_path`] while loading and read through
//! [`TranslationStore::navigate`] afterwards.
//!
//! # Invariants
//!
//! 1. **Merges preserve siblings**: `merge_at_path` only replaces children that
//!    share a name with the incoming subtree's direct children.
//! 2. **Writes are exact**: `put_at_path` replaces only the addressed leaf.
//! 3. **Misses are values**: navigation reports an absent path as `Ok(None)`;
//!    falsy leaves such as `""` or `0` are still `Some`.

use serde_json::{Map, Value};

use crate::error::StoreError;

/// Nested object used for branches of the translation tree.
pub type TranslationTree = Map<String, Value>;

/// Process-wide translation data, owned by a single
/// [`Translator`](crate::translator::Translator).
///
/// # Examples
///
/// ```
/// use keyglot::store::TranslationStore;
/// use serde_json::json;
///
/// let mut store = TranslationStore::new();
/// store.put_at_path("en.greeting", json!("Hello")).expect("write");
/// assert_eq!(
///     store.navigate("en.greeting").expect("valid path"),
///     Some(&json!("Hello"))
/// );
/// assert_eq!(store.navigate("en.missing").expect("valid path"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStore {
    translations: TranslationTree,
}

impl TranslationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around an already parsed tree.
    #[must_use]
    pub const fn from_tree(translations: TranslationTree) -> Self {
        Self { translations }
    }

    /// Drop every translation, leaving an empty tree.
    ///
    /// The tree is replaced wholesale so nothing from a previous load leaks
    /// into the next one.
    pub fn reset(&mut self) {
        self.translations = TranslationTree::new();
    }

    /// Borrow the root of the tree.
    #[must_use]
    pub const fn tree(&self) -> &TranslationTree {
        &self.translations
    }

    /// Whether no locale has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Locales with a top-level entry, in insertion order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    /// Walk `path` and return the value found there.
    ///
    /// Walking into a missing segment, through a non-object, or onto `null`
    /// yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedPath`] when `path` is empty or has an
    /// empty segment.
    pub fn navigate(&self, path: &str) -> Result<Option<&Value>, StoreError> {
        let segments = split_path(path)?;
        let Some((first, rest)) = segments.split_first() else {
            return Ok(None);
        };
        let mut node = self.translations.get(*first);
        for segment in rest {
            node = node.and_then(Value::as_object).and_then(|map| map.get(*segment));
        }
        Ok(node.filter(|value| !value.is_null()))
    }

    /// Set the value at `path`, creating intermediate branches as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedPath`] for malformed paths and
    /// [`StoreError::PathConflict`] when an intermediate segment holds a leaf.
    pub fn put_at_path(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(malformed(path));
        };
        let branch = descend(&mut self.translations, parents, path)?;
        branch.insert((*leaf).to_owned(), value);
        Ok(())
    }

    /// Merge the direct children of `subtree` into the branch at `path`.
    ///
    /// Children with the same name are overwritten; every other child of the
    /// target branch is kept. Merging the same subtree twice leaves the store
    /// unchanged the second time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedPath`] for malformed paths and
    /// [`StoreError::PathConflict`] when any segment of `path` holds a leaf.
    pub fn merge_at_path(&mut self, path: &str, subtree: TranslationTree) -> Result<(), StoreError> {
        let segments = split_path(path)?;
        let branch = descend(&mut self.translations, &segments, path)?;
        for (name, child) in subtree {
            branch.insert(name, child);
        }
        Ok(())
    }

    /// Return the first locale in `chain` with any top-level entry.
    #[must_use]
    pub fn acceptable<'c, S>(&self, chain: &'c [S]) -> Option<&'c str>
    where
        S: AsRef<str>,
    {
        chain.iter().map(AsRef::as_ref).find(|locale| {
            self.translations
                .get(*locale)
                .is_some_and(|entry| !entry.is_null())
        })
    }
}

impl From<TranslationTree> for TranslationStore {
    fn from(translations: TranslationTree) -> Self {
        Self::from_tree(translations)
    }
}

fn malformed(path: &str) -> StoreError {
    StoreError::MalformedPath {
        path: path.to_owned(),
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, StoreError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(malformed(path));
    }
    Ok(segments)
}

/// Follow `segments` from `root`, creating empty branches for absent or
/// `null` children.
fn descend<'t>(
    root: &'t mut TranslationTree,
    segments: &[&str],
    path: &str,
) -> Result<&'t mut TranslationTree, StoreError> {
    let mut branch = root;
    for segment in segments {
        let child = branch
            .entry((*segment).to_owned())
            .or_insert_with(|| Value::Object(TranslationTree::new()));
        if child.is_null() {
            *child = Value::Object(TranslationTree::new());
        }
        branch = child.as_object_mut().ok_or_else(|| StoreError::PathConflict {
            path: path.to_owned(),
            segment: (*segment).to_owned(),
        })?;
    }
    Ok(branch)
}
