//! Load translation files from disk into a [`TranslationStore`].
//!
//! Each load path is walked recursively. A file's location decides where its
//! contents are mounted: `users/show_en.json` under a plain load path lands at
//! `en.users.show`, and under a path registered for the `admin` namespace at
//! `en.admin.users.show`. Files are merged, so several files may contribute
//! keys to the same branch.
//!
//! Symlinked files and directories are followed, including links that point
//! outside the load path.
//!
//! Loading is best-effort: unreadable or malformed files are logged and
//! reported, and the remaining files still load.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::LoadError;
use crate::store::TranslationStore;

/// A configured source of translation files.
///
/// Deserialises from a plain directory string or from a map of namespace to
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadPath {
    /// Files are mounted directly under their locale.
    Plain(Utf8PathBuf),
    /// Files from each directory are mounted under `locale.namespace`.
    Namespaced(IndexMap<String, Utf8PathBuf>),
}

/// A single directory to walk, with its optional namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRoot {
    /// Directory to walk.
    pub dir: Utf8PathBuf,
    /// Namespace inserted after the locale segment.
    pub namespace: Option<String>,
}

/// Flatten configured load paths into the directories to walk, in order.
#[must_use]
pub fn load_roots(paths: &[LoadPath]) -> Vec<LoadRoot> {
    paths
        .iter()
        .flat_map(|path| match path {
            LoadPath::Plain(dir) => vec![LoadRoot {
                dir: dir.clone(),
                namespace: None,
            }],
            LoadPath::Namespaced(entries) => entries
                .iter()
                .map(|(namespace, dir)| LoadRoot {
                    dir: dir.clone(),
                    namespace: Some(namespace.clone()),
                })
                .collect(),
        })
        .collect()
}

/// A file merged into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// File on disk.
    pub path: Utf8PathBuf,
    /// Dotted store path the contents were merged at.
    pub mount: String,
    /// Number of top-level keys the file contributed.
    pub keys: usize,
}

/// Summary of a load pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files merged into the store, in load order.
    pub loaded: Vec<LoadedFile>,
    /// Files ignored because their name carries no `_<locale>` suffix.
    pub skipped: Vec<Utf8PathBuf>,
    /// Files or directories that failed to load.
    pub failures: Vec<LoadError>,
}

impl LoadReport {
    /// Whether every file loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()? {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, text: &str) -> Result<Value, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|err| err.to_string()),
            Self::Yaml => serde_saphyr::from_str(text).map_err(|err| err.to_string()),
        }
    }
}

/// Compute the store path for a file relative to its load root.
///
/// The file stem must end in `_<locale>`; the locale is lower-cased so it
/// matches resolved locale chains.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use keyglot::loader::mount_path;
///
/// assert_eq!(
///     mount_path(Utf8Path::new("users/show_pt-BR.json"), None).as_deref(),
///     Some("pt-br.users.show")
/// );
/// assert_eq!(
///     mount_path(Utf8Path::new("home_en.yml"), Some("admin")).as_deref(),
///     Some("en.admin.home")
/// );
/// assert_eq!(mount_path(Utf8Path::new("README.json"), None), None);
/// ```
#[must_use]
pub fn mount_path(relative: &Utf8Path, namespace: Option<&str>) -> Option<String> {
    let stem = relative.file_stem()?;
    let (name, locale) = stem.rsplit_once('_')?;
    if name.is_empty() || locale.is_empty() {
        return None;
    }
    let locale_tag = locale.to_lowercase();
    let parents = relative
        .parent()
        .into_iter()
        .flat_map(Utf8Path::components)
        .map(|component| component.as_str());
    let segments: Vec<&str> = std::iter::once(locale_tag.as_str())
        .chain(namespace)
        .chain(parents)
        .chain(std::iter::once(name))
        .collect();
    Some(segments.join("."))
}

/// Walk every load path and merge the files found into `store`.
pub fn load_into(store: &mut TranslationStore, paths: &[LoadPath]) -> LoadReport {
    let mut report = LoadReport::default();
    for root in load_roots(paths) {
        load_root(store, &root, &mut report);
    }
    tracing::info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "finished loading translations"
    );
    report
}

fn load_root(store: &mut TranslationStore, root: &LoadRoot, report: &mut LoadReport) {
    let walker = WalkDir::new(root.dir.as_std_path())
        .follow_links(true)
        .sort_by_file_name();
    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                record_failure(
                    report,
                    LoadError::Walk {
                        root: root.dir.clone(),
                        source: err.into(),
                    },
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = entry
            .path()
            .strip_prefix(root.dir.as_std_path())
            .ok()
            .and_then(Utf8Path::from_path)
        else {
            tracing::warn!(path = ?entry.path(), "skipping non UTF-8 translation path");
            continue;
        };
        let Some(format) = Format::from_path(relative) else {
            continue;
        };
        let path = root.dir.join(relative);
        let Some(mount) = mount_path(relative, root.namespace.as_deref()) else {
            tracing::warn!(%path, "translation file name has no _<locale> suffix; skipping");
            report.skipped.push(path);
            continue;
        };
        match load_file(store, format, &path, &mount) {
            Ok(keys) => {
                tracing::debug!(%path, %mount, keys, "loaded translation file");
                report.loaded.push(LoadedFile { path, mount, keys });
            }
            Err(err) => record_failure(report, err),
        }
    }
}

/// Read a walked file through the directory it really lives in.
///
/// Symlinks are resolved first, so a linked file or directory that points
/// outside the load root still reads as a plain file name.
fn read_translation(path: &Utf8Path) -> io::Result<String> {
    let resolved = path.canonicalize_utf8()?;
    let (Some(parent), Some(name)) = (resolved.parent(), resolved.file_name()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{resolved} does not name a file"),
        ));
    };
    Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(name)
}

fn load_file(
    store: &mut TranslationStore,
    format: Format,
    path: &Utf8Path,
    mount: &str,
) -> Result<usize, LoadError> {
    let text = read_translation(path).map_err(|source| LoadError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    let Value::Object(contents) = format.parse(&text).map_err(|detail| LoadError::Parse {
        path: path.to_owned(),
        detail,
    })?
    else {
        return Err(LoadError::NotAnObject {
            path: path.to_owned(),
        });
    };
    let keys = contents.len();
    store
        .merge_at_path(mount, contents)
        .map_err(|source| LoadError::Store {
            path: path.to_owned(),
            source,
        })?;
    Ok(keys)
}

fn record_failure(report: &mut LoadReport, err: LoadError) {
    tracing::warn!(error = %err, "problem loading translations");
    report.failures.push(err);
}
