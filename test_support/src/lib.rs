//! Test utilities for translation fixtures.
//!
//! [`TranslationDir`] lays out translation files in a temporary directory so
//! loader, runner and CLI tests can point at real files on disk.

pub mod locale_stubs;

pub use locale_stubs::{StubEnv, StubSystemLocale};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use keyglot::loader::LoadPath;
use tempfile::TempDir;

/// Temporary directory populated with translation files.
///
/// The directory is removed when the value is dropped.
#[derive(Debug)]
pub struct TranslationDir {
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl TranslationDir {
    /// Create an empty directory.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create translation temp dir")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("temp dir {} is not UTF-8", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            _temp: temp,
            root,
            dir,
        })
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn with_file(self, relative: &str, contents: &str) -> Result<Self> {
        self.write(relative, contents)?;
        Ok(self)
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = Utf8Path::new(relative);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.dir
            .write(path, contents)
            .with_context(|| format!("write {relative}"))
    }

    /// Absolute path of the directory.
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` inside the directory.
    pub fn join(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// The directory as a plain load path.
    pub fn load_path(&self) -> LoadPath {
        LoadPath::Plain(self.root.clone())
    }
}
