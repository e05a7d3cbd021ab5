//! Locale preference chains.
//!
//! [`LocaleSettings`] holds the configured default locale and the optional
//! session locale; [`LocaleChain::resolve`] turns those plus a per-call
//! request into the ordered list of locales that lookup walks.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Default locale used when configuration does not name one.
pub const DEFAULT_LOCALE: &str = "en";

/// A locale preference as supplied by a caller: one tag or an ordered list.
///
/// Deserialises from either a JSON string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleRequest {
    /// A single locale tag.
    One(String),
    /// Tags in preference order.
    Many(Vec<String>),
}

impl LocaleRequest {
    /// Tags in preference order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        let tags: &[String] = match self {
            Self::One(tag) => std::slice::from_ref(tag),
            Self::Many(tags) => tags,
        };
        tags.iter().map(String::as_str)
    }

    /// Whether the request names no usable tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags().all(|tag| tag.trim().is_empty())
    }
}

impl From<&str> for LocaleRequest {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for LocaleRequest {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for LocaleRequest {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<&[&str]> for LocaleRequest {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|tag| (*tag).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LocaleRequest {
    fn from(value: [&str; N]) -> Self {
        Self::from(value.as_slice())
    }
}

/// Default and session locale state.
///
/// The session locale falls back to the default until it is set explicitly,
/// so changing the default is visible to every caller that never picked a
/// locale of its own.
///
/// # Examples
///
/// ```
/// use keyglot::locale::{LocaleRequest, LocaleSettings};
///
/// let mut settings = LocaleSettings::default();
/// assert_eq!(settings.locale(), LocaleRequest::from("en"));
///
/// settings.set_default_locale("DE");
/// assert_eq!(settings.default_locale(), Some("de"));
/// assert_eq!(settings.locale(), LocaleRequest::from("de"));
///
/// settings.set_locale(["es", "zh"]);
/// assert_eq!(settings.locale(), LocaleRequest::from(["es", "zh"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    default_locale: Option<String>,
    locale: Option<LocaleRequest>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self::new(Some(DEFAULT_LOCALE))
    }
}

impl LocaleSettings {
    /// Create settings with `default_locale` and no session locale.
    #[must_use]
    pub fn new(default_locale: Option<&str>) -> Self {
        Self {
            default_locale: default_locale.map(str::to_lowercase),
            locale: None,
        }
    }

    /// The configured default locale, lower-cased.
    #[must_use]
    pub fn default_locale(&self) -> Option<&str> {
        self.default_locale.as_deref()
    }

    /// Replace the default locale. The tag is stored lower-cased.
    pub fn set_default_locale(&mut self, locale: impl AsRef<str>) {
        self.default_locale = Some(locale.as_ref().to_lowercase());
    }

    /// Remove the default locale; chains then end with the requested tags.
    pub fn clear_default_locale(&mut self) {
        self.default_locale = None;
    }

    /// The session locale, or the default locale when none was set.
    #[must_use]
    pub fn locale(&self) -> LocaleRequest {
        match (&self.locale, &self.default_locale) {
            (Some(locale), _) => locale.clone(),
            (None, Some(default)) => LocaleRequest::One(default.clone()),
            (None, None) => LocaleRequest::Many(Vec::new()),
        }
    }

    /// Set the session locale.
    pub fn set_locale(&mut self, locale: impl Into<LocaleRequest>) {
        self.locale = Some(locale.into());
    }

    /// Forget the session locale so it follows the default again.
    pub fn clear_locale(&mut self) {
        self.locale = None;
    }
}

/// Ordered, duplicate-free locale preferences for one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleChain(Vec<String>);

impl LocaleChain {
    /// Resolve the chain for a call.
    ///
    /// The explicit request wins when it names at least one tag; otherwise the
    /// session locale from `settings` is used. The default locale is then
    /// appended, each tag longer than two characters is followed by its
    /// two-letter language prefix, and duplicates are dropped keeping the
    /// first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyglot::locale::{LocaleChain, LocaleRequest, LocaleSettings};
    ///
    /// let settings = LocaleSettings::new(Some("de"));
    /// let request = LocaleRequest::from(["pt-BR", "en"]);
    /// let chain = LocaleChain::resolve(Some(&request), &settings);
    /// assert_eq!(chain.as_slice(), ["pt-br", "pt", "en", "de"]);
    /// ```
    #[must_use]
    pub fn resolve(explicit: Option<&LocaleRequest>, settings: &LocaleSettings) -> Self {
        let session;
        let requested = match explicit {
            Some(request) if !request.is_empty() => request,
            _ => {
                session = settings.locale();
                &session
            }
        };
        Self::build(requested.tags(), settings.default_locale())
    }

    /// Build a chain from raw tags and an optional default.
    #[must_use]
    pub fn build<'a>(
        requested: impl IntoIterator<Item = &'a str>,
        default_locale: Option<&str>,
    ) -> Self {
        let normalise = |tag: &str| tag.trim().to_lowercase();
        let lowered = requested
            .into_iter()
            .map(normalise)
            .chain(default_locale.map(normalise))
            .filter(|tag| !tag.is_empty());
        let mut unique = IndexSet::new();
        for tag in lowered {
            let prefix = (tag.chars().count() > 2).then(|| tag.chars().take(2).collect::<String>());
            unique.insert(tag);
            if let Some(language) = prefix {
                unique.insert(language);
            }
        }
        Self(unique.into_iter().collect())
    }

    /// The chain as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The most preferred locale.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterate over the locales in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of locales.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take ownership of the tags.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl AsRef<[String]> for LocaleChain {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for LocaleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chain(explicit: Option<LocaleRequest>, settings: &LocaleSettings) -> Vec<String> {
        LocaleChain::resolve(explicit.as_ref(), settings).into_vec()
    }

    #[rstest]
    fn default_settings_resolve_to_english() {
        assert_eq!(chain(None, &LocaleSettings::default()), ["en"]);
    }

    #[rstest]
    fn tags_are_lowercased_and_deduplicated() {
        let settings = LocaleSettings::new(None);
        let request = LocaleRequest::from(["en-US", "en", "en-us"]);
        assert_eq!(chain(Some(request), &settings), ["en-us", "en"]);
    }

    #[rstest]
    fn region_tags_are_followed_by_their_language() {
        let settings = LocaleSettings::new(Some("pt-BR"));
        assert_eq!(chain(None, &settings), ["pt-br", "pt"]);
    }

    #[rstest]
    fn default_is_appended_after_session_locales() {
        let mut settings = LocaleSettings::new(Some("DE"));
        settings.set_locale(["es", "zh"]);
        assert_eq!(chain(None, &settings), ["es", "zh", "de"]);
    }

    #[rstest]
    fn explicit_request_beats_session_locale() {
        let mut settings = LocaleSettings::new(Some("de"));
        settings.set_locale("en");
        assert_eq!(
            chain(Some(LocaleRequest::from(["pt", "es"])), &settings),
            ["pt", "es", "de"]
        );
    }

    #[rstest]
    #[case(LocaleRequest::Many(Vec::new()))]
    #[case(LocaleRequest::from(""))]
    #[case(LocaleRequest::from(["", "  "]))]
    fn empty_requests_fall_through_to_session(#[case] request: LocaleRequest) {
        let mut settings = LocaleSettings::new(Some("de"));
        settings.set_locale("fr-CA");
        assert_eq!(chain(Some(request), &settings), ["fr-ca", "fr", "de"]);
    }

    #[rstest]
    fn long_preference_lists_keep_first_seen_order() {
        let mut settings = LocaleSettings::new(Some("DE"));
        settings.set_locale([
            "pt-PT", "pt", "en-US", "en", "es-ES", "ES", "en-gb", "en-us", "pt-br",
        ]);
        assert_eq!(
            chain(None, &settings),
            ["pt-pt", "pt", "en-us", "en", "es-es", "es", "en-gb", "pt-br", "de"]
        );
    }

    #[rstest]
    fn no_default_and_no_session_yields_empty_chain() {
        let mut settings = LocaleSettings::default();
        settings.clear_default_locale();
        assert!(LocaleChain::resolve(None, &settings).is_empty());
    }

    #[rstest]
    fn clearing_session_locale_follows_default_again() {
        let mut settings = LocaleSettings::default();
        settings.set_locale("es");
        settings.clear_locale();
        settings.set_default_locale("it");
        assert_eq!(settings.locale(), LocaleRequest::from("it"));
    }

    #[rstest]
    fn requests_deserialise_from_string_or_list() {
        let one: LocaleRequest = serde_json::from_str("\"es-MX\"").expect("string");
        let many: LocaleRequest = serde_json::from_str("[\"es\",\"en\"]").expect("list");
        assert_eq!(one, LocaleRequest::from("es-MX"));
        assert_eq!(many, LocaleRequest::from(["es", "en"]));
    }
}
