//! Host locale discovery for the command-line tool.
//!
//! When neither the command line nor the configuration names a session
//! locale, the tool falls back to `KEYGLOT_LOCALE` and then to the operating
//! system locale. Raw values such as `en_US.UTF-8` are normalized to language
//! tags before they join a locale chain.

use std::str::FromStr;

use unic_langid::LanguageIdentifier;

/// Environment variable name used to override the session locale.
pub const KEYGLOT_LOCALE_ENV: &str = "KEYGLOT_LOCALE";

/// Read-only environment access used for locale resolution.
pub trait EnvProvider {
    /// Fetch the environment variable value for `key`.
    fn var(&self, key: &str) -> Option<String>;
}

/// Environment provider backed by the process environment.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// System locale provider for the current host.
pub trait SystemLocale {
    /// Return the system locale string when available.
    fn system_locale(&self) -> Option<String>;
}

/// System locale provider backed by `sys-locale`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SysLocale;

impl SystemLocale for SysLocale {
    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// Normalize a raw locale string into a language tag.
///
/// This strips encoding suffixes (for example `.UTF-8`), removes modifier
/// sections (for example `@latin`), replaces underscores with hyphens, and
/// validates the result using `LanguageIdentifier`.
///
/// # Examples
///
/// ```rust
/// use keyglot::locale_resolution::normalize_locale_tag;
///
/// assert_eq!(normalize_locale_tag("en_US.UTF-8"), Some("en-US".to_string()));
/// assert_eq!(normalize_locale_tag("es-ES"), Some("es-ES".to_string()));
/// assert_eq!(normalize_locale_tag("not a locale"), None);
/// ```
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() {
        return None;
    }
    let candidate = stripped.replace('_', "-");
    LanguageIdentifier::from_str(&candidate)
        .ok()
        .map(|lang| lang.to_string())
}

fn select_locale<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    for raw in candidates.into_iter().flatten() {
        if let Some(normalized) = normalize_locale_tag(raw) {
            return Some(normalized);
        }
        tracing::debug!(raw, "ignoring unusable locale value");
    }
    None
}

/// Resolve the session locale for the command-line tool.
///
/// Precedence is `KEYGLOT_LOCALE` followed by the system default. Values
/// that do not normalize are skipped; `None` means the configured default
/// locale is used on its own.
///
/// # Examples
///
/// ```rust
/// use keyglot::locale_resolution::{EnvProvider, SystemLocale, resolve_session_locale};
///
/// struct StubEnv(Option<String>);
/// impl EnvProvider for StubEnv {
///     fn var(&self, key: &str) -> Option<String> {
///         (key == "KEYGLOT_LOCALE").then(|| self.0.clone()).flatten()
///     }
/// }
///
/// struct StubSystem(Option<String>);
/// impl SystemLocale for StubSystem {
///     fn system_locale(&self) -> Option<String> {
///         self.0.clone()
///     }
/// }
///
/// let locale = resolve_session_locale(
///     &StubEnv(Some("pt_BR.UTF-8".into())),
///     &StubSystem(Some("en_US".into())),
/// );
/// assert_eq!(locale.as_deref(), Some("pt-BR"));
/// ```
#[must_use]
pub fn resolve_session_locale(env: &impl EnvProvider, system: &impl SystemLocale) -> Option<String> {
    let env_locale = env.var(KEYGLOT_LOCALE_ENV);
    let system_locale = system.system_locale();
    select_locale([env_locale.as_deref(), system_locale.as_deref()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("zh-hant-tw", Some("zh-Hant-TW"))]
    #[case("es-419", Some("es-419"))]
    #[case("sl-rozaj", Some("sl-rozaj"))]
    #[case("EN", Some("en"))]
    #[case("en-US-US", None)]
    #[case("en--US", None)]
    #[case("e", None)]
    fn canonicalizes_subtags(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_locale_tag(raw).as_deref(), expected);
    }
}
