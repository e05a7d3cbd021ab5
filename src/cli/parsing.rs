//! CLI parsing helpers for clap value parsers.

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde_json::Number;

use crate::loader::LoadPath;
use crate::locale_resolution::normalize_locale_tag;

/// Parse `DIR` or `NS=DIR` into a load path.
pub(super) fn parse_load_path(s: &str) -> Result<LoadPath, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("translation directory must not be empty".to_owned());
    }
    match trimmed.split_once('=') {
        None => Ok(LoadPath::Plain(Utf8PathBuf::from(trimmed))),
        Some((raw_namespace, raw_dir)) => {
            let namespace = raw_namespace.trim();
            let dir = raw_dir.trim();
            if namespace.is_empty() || namespace.contains('.') {
                return Err(format!("invalid namespace in '{s}'"));
            }
            if dir.is_empty() {
                return Err(format!("missing directory in '{s}'"));
            }
            let mut entries = IndexMap::new();
            entries.insert(namespace.to_owned(), Utf8PathBuf::from(dir));
            Ok(LoadPath::Namespaced(entries))
        }
    }
}

/// Normalize a locale given on the command line.
pub(super) fn parse_locale(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("locale must not be empty".to_owned());
    }
    normalize_locale_tag(trimmed).ok_or_else(|| format!("invalid locale '{s}'"))
}

/// Parse a plural count.
pub(super) fn parse_count(s: &str) -> Result<Number, String> {
    s.trim()
        .parse::<Number>()
        .map_err(|_| format!("{s} is not a valid number"))
}

/// Parse `NAME=VALUE`; `NAME` may be dotted but must not contain empty
/// segments.
pub(super) fn parse_arg(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("argument '{s}' must have the form NAME=VALUE"))?;
    if name.split('.').any(str::is_empty) {
        return Err(format!("invalid argument name in '{s}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
