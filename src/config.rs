//! Translator configuration.
//!
//! [`I18nConfig`] is read from a JSON or YAML file and then adjusted by the
//! command line. The operating mode follows the same precedence as the
//! rest of the configuration: an explicit setting wins, then the
//! `KEYGLOT_ENV` environment variable, then the development default.

use std::env;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::loader::LoadPath;
use crate::locale::{DEFAULT_LOCALE, LocaleRequest, LocaleSettings};

/// Environment variable selecting the operating mode.
pub const KEYGLOT_ENV: &str = "KEYGLOT_ENV";

/// How the translator reacts to a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Missing keys are errors.
    #[default]
    Development,
    /// Missing keys are logged and the raw key is rendered instead.
    Production,
}

impl OperatingMode {
    /// Return `true` for [`Production`](OperatingMode::Production).
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Resolve the mode from explicit configuration and the process
    /// environment.
    #[must_use]
    pub fn resolve(explicit: Option<Self>) -> Self {
        Self::resolve_with(explicit, |key| env::var(key).ok())
    }

    /// Testable variant that accepts an environment lookup function.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyglot::config::OperatingMode;
    ///
    /// let mode = OperatingMode::resolve_with(None, |key| match key {
    ///     "KEYGLOT_ENV" => Some(String::from("Production")),
    ///     _ => None,
    /// });
    /// assert_eq!(mode, OperatingMode::Production);
    /// assert_eq!(
    ///     OperatingMode::resolve_with(Some(OperatingMode::Development), |_| None),
    ///     OperatingMode::Development
    /// );
    /// ```
    #[must_use]
    pub fn resolve_with<F>(explicit: Option<Self>, read_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = explicit {
            return mode;
        }
        match read_env(KEYGLOT_ENV) {
            Some(value) if value.trim().eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// File-backed configuration for a [`Translator`](crate::translator::Translator).
///
/// # Examples
///
/// ```
/// use keyglot::config::{I18nConfig, OperatingMode};
///
/// let config: I18nConfig = serde_json::from_str(
///     r#"{ "default_locale": "pt-BR", "mode": "production",
///          "load_paths": ["locales", { "admin": "admin/locales" }] }"#,
/// )
/// .expect("valid config");
/// assert_eq!(config.default_locale.as_deref(), Some("pt-BR"));
/// assert_eq!(config.mode, Some(OperatingMode::Production));
/// assert_eq!(config.load_paths.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// Locale appended to every chain.
    pub default_locale: Option<String>,
    /// Session locale; follows the default when absent.
    pub locale: Option<LocaleRequest>,
    /// Explicit operating mode; resolved from the environment when absent.
    pub mode: Option<OperatingMode>,
    /// Directories to load translation files from.
    pub load_paths: Vec<LoadPath>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: Some(DEFAULT_LOCALE.to_owned()),
            locale: None,
            mode: None,
            load_paths: Vec::new(),
        }
    }
}

impl I18nConfig {
    /// Read a configuration file. `.json` files are parsed as JSON and
    /// `.yml`/`.yaml` files as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, has an unsupported
    /// extension, or does not describe a valid configuration.
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read configuration file {path}"))?;
        match path.extension() {
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("parse JSON configuration {path}")),
            Some("yml" | "yaml") => serde_saphyr::from_str(&text)
                .with_context(|| format!("parse YAML configuration {path}")),
            _ => bail!("configuration file {path} must end in .json, .yml or .yaml"),
        }
    }

    /// Locale settings described by this configuration.
    #[must_use]
    pub fn locale_settings(&self) -> LocaleSettings {
        let mut settings = LocaleSettings::new(self.default_locale.as_deref());
        if let Some(locale) = &self.locale {
            settings.set_locale(locale.clone());
        }
        settings
    }

    /// Operating mode after consulting the environment.
    #[must_use]
    pub fn operating_mode(&self) -> OperatingMode {
        OperatingMode::resolve(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn fake_env(value: Option<&str>) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| (key == KEYGLOT_ENV).then(|| value.map(String::from)).flatten()
    }

    #[rstest]
    #[case::explicit_production_wins(Some(OperatingMode::Production), None, OperatingMode::Production)]
    #[case::explicit_development_beats_env(
        Some(OperatingMode::Development),
        Some("production"),
        OperatingMode::Development
    )]
    #[case::env_production(None, Some("production"), OperatingMode::Production)]
    #[case::env_is_case_insensitive(None, Some(" PRODUCTION "), OperatingMode::Production)]
    #[case::other_env_values_stay_development(None, Some("staging"), OperatingMode::Development)]
    #[case::no_env_defaults_to_development(None, None, OperatingMode::Development)]
    fn resolve_operating_mode(
        #[case] explicit: Option<OperatingMode>,
        #[case] env_value: Option<&str>,
        #[case] expected: OperatingMode,
    ) {
        assert_eq!(OperatingMode::resolve_with(explicit, fake_env(env_value)), expected);
    }

    #[rstest]
    fn default_config_uses_english() {
        let settings = I18nConfig::default().locale_settings();
        assert_eq!(settings.default_locale(), Some("en"));
        assert_eq!(settings.locale(), LocaleRequest::from("en"));
    }

    #[rstest]
    fn session_locale_is_carried_into_settings() {
        let config = I18nConfig {
            locale: Some(LocaleRequest::from(["es", "en"])),
            ..I18nConfig::default()
        };
        assert_eq!(
            config.locale_settings().locale(),
            LocaleRequest::from(["es", "en"])
        );
    }

    #[rstest]
    fn yaml_configuration_is_accepted() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = Utf8PathBuf::from_path_buf(dir.path().join("keyglot.yml"))
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path {path:?}"))?;
        fs::write(
            &path,
            "default_locale: de\nlocale: [es, en]\nload_paths:\n  - locales\n",
        )?;
        let config = I18nConfig::from_file(&path)?;
        anyhow::ensure!(
            config.default_locale.as_deref() == Some("de"),
            "unexpected default locale {:?}",
            config.default_locale
        );
        anyhow::ensure!(
            config.load_paths == [LoadPath::Plain(Utf8PathBuf::from("locales"))],
            "unexpected load paths {:?}",
            config.load_paths
        );
        Ok(())
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<I18nConfig>(r#"{ "default_locale": "en", "colour": 1 }"#);
        assert!(parsed.is_err());
    }

    #[rstest]
    fn unsupported_extensions_are_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = Utf8PathBuf::from_path_buf(dir.path().join("keyglot.toml"))
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path {path:?}"))?;
        fs::write(&path, "default_locale = 'en'")?;
        anyhow::ensure!(I18nConfig::from_file(&path).is_err(), "toml should be rejected");
        Ok(())
    }
}
