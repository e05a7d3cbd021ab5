//! The `translate(key, options)` entry point.
//!
//! A [`Translator`] owns the translation store, the locale settings, the
//! operating mode and the plural policy. A call resolves the locale chain,
//! looks the key up under the requested view scope, selects a plural variant
//! when the leaf has several, and interpolates the result.
//!
//! Once loading has finished the translator is only read, so it can be
//! shared across threads behind an [`Arc`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::config::{I18nConfig, OperatingMode};
use crate::error::{LookupError, TranslateError};
use crate::interpolate::{interpolate, render_number};
use crate::loader::{self, LoadPath, LoadReport};
use crate::locale::{LocaleChain, LocaleRequest, LocaleSettings};
use crate::lookup::{self, Found, Resolution, ScopePath};
use crate::plural::{CldrPlurals, PluralCount, PluralPolicy};
use crate::store::TranslationStore;

/// Per-call options.
///
/// Every field other than `locale`, `view_path` and `count` is an
/// interpolation argument; `count` is also available to placeholders as
/// `%{count}`.
///
/// # Examples
///
/// ```
/// use keyglot::translator::TranslateOptions;
/// use serde_json::json;
///
/// let options = TranslateOptions::from_value(json!({
///     "locale": ["es", "en"],
///     "count": 3,
///     "name": { "first": "Ada" }
/// }))
/// .expect("valid options");
/// assert_eq!(options.count, Some(3.into()));
/// assert_eq!(
///     options.interpolation_args(),
///     json!({ "name": { "first": "Ada" }, "count": 3 })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    /// Locale preference for this call; overrides the session locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleRequest>,
    /// View scope the key is requested from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_path: Option<Vec<String>>,
    /// Count used to pick a plural variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Number>,
    /// Interpolation arguments.
    #[serde(flatten)]
    pub args: Map<String, Value>,
}

impl TranslateOptions {
    /// Options with no locale, scope, count or arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not an object or a reserved field has
    /// the wrong type.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Set the locale preference.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<LocaleRequest>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the view scope.
    #[must_use]
    pub fn with_view_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_path = Some(segments.into_iter().map(Into::into).collect());
        self
    }

    /// Set the plural count.
    #[must_use]
    pub fn with_count(mut self, count: impl Into<Number>) -> Self {
        self.count = Some(count.into());
        self
    }

    /// Add an interpolation argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// The cleaned view scope.
    #[must_use]
    pub fn scope(&self) -> ScopePath {
        self.view_path
            .as_deref()
            .map(ScopePath::new)
            .unwrap_or_default()
    }

    /// Object that placeholders are resolved against.
    #[must_use]
    pub fn interpolation_args(&self) -> Value {
        let mut args = self.args.clone();
        if let Some(count) = &self.count {
            args.insert("count".to_owned(), Value::Number(count.clone()));
        }
        Value::Object(args)
    }
}

/// Resolves keys against a loaded [`TranslationStore`].
///
/// # Examples
///
/// ```
/// use keyglot::translator::{TranslateOptions, Translator};
/// use serde_json::json;
///
/// let mut translator = Translator::default();
/// translator
///     .store_mut()
///     .put_at_path("en.message_count", json!({ "one": "1 message", "other": "%{count} messages" }))
///     .expect("seed");
///
/// let text = translator
///     .translate("message_count", &TranslateOptions::new().with_count(2))
///     .expect("translated");
/// assert_eq!(text, "2 messages");
/// ```
#[derive(Clone)]
pub struct Translator {
    store: TranslationStore,
    settings: LocaleSettings,
    mode: OperatingMode,
    plurals: Arc<dyn PluralPolicy>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("locales", &self.store.locales().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(LocaleSettings::default(), OperatingMode::default())
    }
}

impl Translator {
    /// Create a translator with an empty store.
    #[must_use]
    pub fn new(settings: LocaleSettings, mode: OperatingMode) -> Self {
        Self {
            store: TranslationStore::new(),
            settings,
            mode,
            plurals: Arc::new(CldrPlurals::default()),
        }
    }

    /// Create a translator from configuration and load its paths.
    #[must_use]
    pub fn from_config(config: &I18nConfig) -> (Self, LoadReport) {
        let mut translator = Self::new(config.locale_settings(), config.operating_mode());
        let report = translator.load(&config.load_paths);
        (translator, report)
    }

    /// Replace the plural policy.
    #[must_use]
    pub fn with_plural_policy(mut self, policy: impl PluralPolicy + 'static) -> Self {
        self.plurals = Arc::new(policy);
        self
    }

    /// The translation store.
    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Mutable access to the store, for loading and seeding.
    pub const fn store_mut(&mut self) -> &mut TranslationStore {
        &mut self.store
    }

    /// Locale settings.
    #[must_use]
    pub const fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    /// Mutable locale settings.
    pub const fn settings_mut(&mut self) -> &mut LocaleSettings {
        &mut self.settings
    }

    /// Current operating mode.
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Change the operating mode.
    pub const fn set_mode(&mut self, mode: OperatingMode) {
        self.mode = mode;
    }

    /// Drop every loaded translation.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Load translation files into the store, merging with what is there.
    pub fn load(&mut self, paths: &[LoadPath]) -> LoadReport {
        loader::load_into(&mut self.store, paths)
    }

    /// Locale chain for a call with `options`.
    #[must_use]
    pub fn effective_locale(&self, options: &TranslateOptions) -> LocaleChain {
        LocaleChain::resolve(options.locale.as_ref(), &self.settings)
    }

    /// Look `key` up under `scope` along `chain`.
    ///
    /// # Errors
    ///
    /// See [`lookup::lookup`].
    pub fn lookup(
        &self,
        chain: &LocaleChain,
        scope: &ScopePath,
        key: &str,
    ) -> Result<Resolution<'_>, LookupError> {
        lookup::lookup(&self.store, chain, scope, key)
    }

    /// First locale of the session chain that has any translations.
    #[must_use]
    pub fn acceptable(&self) -> Option<String> {
        self.acceptable_for(&TranslateOptions::default())
    }

    /// First locale of the chain for `options` that has any translations.
    #[must_use]
    pub fn acceptable_for(&self, options: &TranslateOptions) -> Option<String> {
        let chain = self.effective_locale(options);
        self.store.acceptable(chain.as_slice()).map(str::to_owned)
    }

    /// Translate `key`.
    ///
    /// In [`OperatingMode::Production`] a missing key is logged and the key
    /// itself is used as the template.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Lookup`] when the key is missing in
    /// development mode or the key forms a malformed path, and the other
    /// [`TranslateError`] variants when the leaf cannot be rendered.
    pub fn translate(&self, key: &str, options: &TranslateOptions) -> Result<String, TranslateError> {
        let chain = self.effective_locale(options);
        let template = match self.lookup(&chain, &options.scope(), key) {
            Ok(Resolution::Echo(text)) => return Ok(text),
            Ok(Resolution::Leaf(found)) => self.select_variant(key, &found, options.count.as_ref())?,
            Err(err @ LookupError::NotFound { .. }) if self.mode.is_production() => {
                tracing::warn!(%key, %chain, error = %err, "translation missing; rendering key");
                Cow::Borrowed(key)
            }
            Err(err) => return Err(err.into()),
        };
        Ok(interpolate(&template, &options.interpolation_args()))
    }

    fn select_variant<'v>(
        &self,
        key: &str,
        found: &Found<'v>,
        count: Option<&Number>,
    ) -> Result<Cow<'v, str>, TranslateError> {
        let variants = match found.value {
            Value::Object(variants) => variants,
            other => return render_scalar(key, other),
        };
        let Some(count) = count else {
            return Err(TranslateError::CountRequired {
                key: key.to_owned(),
            });
        };
        let category = self
            .plurals
            .category(&found.locale, PluralCount::from_number(count));
        let variant = variants
            .get(category.as_str())
            .or_else(|| variants.get("other"))
            .ok_or_else(|| TranslateError::MissingPluralForm {
                key: key.to_owned(),
                locale: found.locale.clone(),
                category,
            })?;
        render_scalar(key, variant)
    }
}

fn render_scalar<'v>(key: &str, value: &'v Value) -> Result<Cow<'v, str>, TranslateError> {
    let invalid = |kind| TranslateError::InvalidLeaf {
        key: key.to_owned(),
        kind,
    };
    match value {
        Value::String(text) => Ok(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Ok(Cow::Owned(render_number(number))),
        Value::Bool(flag) => Ok(Cow::Owned(flag.to_string())),
        Value::Null => Err(invalid("null")),
        Value::Array(_) => Err(invalid("list")),
        Value::Object(_) => Err(invalid("nested map")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{KEY_ECHO_LOCALE, PATH_ECHO_LOCALE};
    use crate::plural::{PluralCategory, PluralRule};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn translator() -> Translator {
        let mut translator = Translator::default();
        let store = translator.store_mut();
        for (path, value) in [
            ("en.everything", json!("I am a translated string for locale: en")),
            ("en.hello", json!("Hello, %{name.first}")),
            ("en.message_count", json!({ "one": "1 message", "other": "%{count} messages" })),
            ("en.only_other", json!({ "other": "%{count} things" })),
            ("en.only_one", json!({ "one": "just one" })),
            ("en.broken", json!({ "one": ["not", "text"] })),
            ("en.list", json!(["a", "b"])),
            ("en.users.show.title", json!("Profile of %{name}")),
            ("ru.files", json!({ "one": "%{count} файл", "few": "%{count} файла", "many": "%{count} файлов" })),
        ] {
            store.put_at_path(path, value).expect("seed");
        }
        translator
    }

    #[rstest]
    #[case(0, "0 messages")]
    #[case(1, "1 message")]
    #[case(2, "2 messages")]
    fn selects_english_plural_forms(translator: Translator, #[case] count: u64, #[case] expected: &str) {
        let options = TranslateOptions::new().with_count(count);
        assert_eq!(translator.translate("message_count", &options).expect("ok"), expected);
    }

    #[rstest]
    #[case(1, "1 файл")]
    #[case(3, "3 файла")]
    #[case(11, "11 файлов")]
    fn plural_rule_follows_locale_where_leaf_was_found(
        translator: Translator,
        #[case] count: u64,
        #[case] expected: &str,
    ) {
        let options = TranslateOptions::new().with_locale("ru").with_count(count);
        assert_eq!(translator.translate("files", &options).expect("ok"), expected);
    }

    #[rstest]
    fn missing_category_falls_back_to_other(translator: Translator) {
        let options = TranslateOptions::new().with_count(1);
        assert_eq!(translator.translate("only_other", &options).expect("ok"), "1 things");
    }

    #[rstest]
    #[case(2.0, "message_count", "2 messages")]
    #[case(1.0, "only_other", "1 things")]
    #[case(2.5, "only_other", "2.5 things")]
    fn float_counts_render_like_integers_when_whole(
        translator: Translator,
        #[case] count: f64,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        let number = Number::from_f64(count).expect("finite count");
        let options = TranslateOptions::new().with_count(number);
        assert_eq!(translator.translate(key, &options).expect("ok"), expected);
    }

    #[rstest]
    fn missing_category_and_other_is_an_error(translator: Translator) {
        let options = TranslateOptions::new().with_count(5);
        assert_eq!(
            translator.translate("only_one", &options),
            Err(TranslateError::MissingPluralForm {
                key: "only_one".to_owned(),
                locale: "en".to_owned(),
                category: PluralCategory::Other,
            })
        );
    }

    #[rstest]
    fn plural_leaf_without_count_is_an_error(translator: Translator) {
        assert_eq!(
            translator.translate("message_count", &TranslateOptions::new()),
            Err(TranslateError::CountRequired {
                key: "message_count".to_owned()
            })
        );
    }

    #[rstest]
    #[case("broken", 1, "list")]
    #[case("list", 1, "list")]
    fn non_text_leaves_are_rejected(
        translator: Translator,
        #[case] key: &str,
        #[case] count: u64,
        #[case] kind: &'static str,
    ) {
        let options = TranslateOptions::new().with_count(count);
        assert_eq!(
            translator.translate(key, &options),
            Err(TranslateError::InvalidLeaf {
                key: key.to_owned(),
                kind,
            })
        );
    }

    #[rstest]
    fn string_leaf_ignores_count(translator: Translator) {
        let options = TranslateOptions::new().with_count(7);
        assert_eq!(
            translator.translate("everything", &options).expect("ok"),
            "I am a translated string for locale: en"
        );
    }

    #[rstest]
    fn nested_arguments_are_interpolated(translator: Translator) {
        let options = TranslateOptions::new()
            .with_arg("name", json!({ "first": "Johnny", "last": "Smith" }));
        assert_eq!(translator.translate("hello", &options).expect("ok"), "Hello, Johnny");
    }

    #[rstest]
    fn view_scope_is_honoured(translator: Translator) {
        let options = TranslateOptions::new()
            .with_view_path(["users", "show"])
            .with_arg("name", "Ada");
        assert_eq!(translator.translate("title", &options).expect("ok"), "Profile of Ada");
    }

    #[rstest]
    fn development_mode_surfaces_missing_keys(translator: Translator) {
        let err = translator
            .translate("nothing_here", &TranslateOptions::new())
            .expect_err("missing");
        assert_eq!(
            err,
            TranslateError::Lookup(LookupError::NotFound {
                key: "nothing_here".to_owned(),
                attempted: vec!["en.nothing_here".to_owned()],
            })
        );
    }

    #[rstest]
    fn production_mode_renders_the_key(mut translator: Translator) {
        translator.set_mode(OperatingMode::Production);
        let options = TranslateOptions::new().with_arg("x", "y");
        assert_eq!(
            translator.translate("nothing_here", &options).expect("degraded"),
            "nothing_here"
        );
    }

    #[rstest]
    fn production_mode_still_reports_malformed_keys(mut translator: Translator) {
        translator.set_mode(OperatingMode::Production);
        assert!(matches!(
            translator.translate("", &TranslateOptions::new()),
            Err(TranslateError::Lookup(LookupError::Store(_)))
        ));
    }

    #[rstest]
    #[case(KEY_ECHO_LOCALE, "[title]")]
    #[case(PATH_ECHO_LOCALE, "[users.show.title]")]
    fn pseudo_locales_echo(translator: Translator, #[case] marker: &str, #[case] expected: &str) {
        let options = TranslateOptions::new()
            .with_locale(marker)
            .with_view_path(["users", "show"]);
        assert_eq!(translator.translate("title", &options).expect("echo"), expected);
    }

    #[rstest]
    fn custom_plural_policy_is_used(translator: Translator) {
        let mut plurals = CldrPlurals::default();
        plurals.set_rule("en", PluralRule::NoPlural);
        let custom = translator.with_plural_policy(plurals);
        let options = TranslateOptions::new().with_count(1);
        assert_eq!(custom.translate("message_count", &options).expect("ok"), "1 messages");
    }

    #[rstest]
    fn acceptable_uses_the_session_chain(mut translator: Translator) {
        translator.settings_mut().set_locale(["fr", "ru"]);
        assert_eq!(translator.acceptable().as_deref(), Some("ru"));
        translator.reset();
        assert_eq!(translator.acceptable(), None);
    }

    #[rstest]
    fn translator_is_shareable_across_threads(translator: Translator) {
        let shared = Arc::new(translator);
        let handles: Vec<_> = (0..4_u64)
            .map(|count| {
                let worker = Arc::clone(&shared);
                std::thread::spawn(move || {
                    worker.translate("message_count", &TranslateOptions::new().with_count(count))
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().expect("thread").is_ok());
        }
    }
}
