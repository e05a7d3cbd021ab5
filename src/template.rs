//! `MiniJinja` integration.
//!
//! [`register`] installs a `t` function (also available as `i18n`) that
//! translates a key with the rendering template's view scope. Keyword
//! arguments become translation options: `locale`, `view_path` and `count`
//! are reserved and everything else is an interpolation argument. When a
//! call gives no `locale`, a `locale` variable in the render context is used
//! instead.
//!
//! ```
//! use std::sync::Arc;
//!
//! use keyglot::template;
//! use keyglot::translator::Translator;
//! use minijinja::{Environment, context};
//! use serde_json::json;
//!
//! let mut translator = Translator::default();
//! translator
//!     .store_mut()
//!     .put_at_path("en.users.show.greeting", json!("Hi %{name}"))
//!     .expect("seed");
//!
//! let mut env = Environment::new();
//! template::register(&mut env, Arc::new(translator), None);
//! env.add_template("users/show.html", "{{ t('greeting', name=who) }}")
//!     .expect("template");
//! let rendered = env
//!     .get_template("users/show.html")
//!     .and_then(|tmpl| tmpl.render(context! { who => "Ada" }))
//!     .expect("render");
//! assert_eq!(rendered, "Hi Ada");
//! ```

use std::sync::Arc;

use minijinja::value::{Kwargs, Value};
use minijinja::{Environment, Error, ErrorKind, State};
use serde_json::Map;

use crate::lookup::ScopePath;
use crate::translator::{TranslateOptions, Translator};

/// View scope for a template name.
///
/// The final extension is dropped and the remainder is split on `/`. With an
/// application name the scope is prefixed by it.
///
/// # Examples
///
/// ```
/// use keyglot::template::view_path_for_template;
///
/// assert_eq!(
///     view_path_for_template("users/show.html", None).as_slice(),
///     ["users", "show"]
/// );
/// assert_eq!(
///     view_path_for_template("users/show.html.j2", Some("shop")).as_slice(),
///     ["shop", "users", "show.html"]
/// );
/// ```
#[must_use]
pub fn view_path_for_template(name: &str, app_name: Option<&str>) -> ScopePath {
    let (dir, file) = name.rsplit_once('/').unwrap_or(("", name));
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    app_name
        .into_iter()
        .chain(dir.split('/'))
        .chain(std::iter::once(stem))
        .collect()
}

/// Install the translation helpers into `env`.
///
/// Registers the `t` and `i18n` functions and an `accepted_language` global
/// holding the first session locale that has translations.
pub fn register(env: &mut Environment<'_>, translator: Arc<Translator>, app_name: Option<String>) {
    env.add_global(
        "accepted_language",
        Value::from_serialize(translator.acceptable()),
    );

    let app = app_name.map(Arc::<str>::from);
    for name in ["t", "i18n"] {
        let shared = Arc::clone(&translator);
        let app_prefix = app.clone();
        env.add_function(name, move |state: &State, key: String, kwargs: Kwargs| {
            translate_in_template(&shared, app_prefix.as_deref(), state, &key, &kwargs)
        });
    }
}

fn translate_in_template(
    translator: &Translator,
    app_name: Option<&str>,
    state: &State,
    key: &str,
    kwargs: &Kwargs,
) -> Result<String, Error> {
    let options = template_options(app_name, state, kwargs)?;
    translator.translate(key, &options).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("could not translate '{key}' in template '{}'", state.name()),
        )
        .with_source(err)
    })
}

fn template_options(
    app_name: Option<&str>,
    state: &State,
    kwargs: &Kwargs,
) -> Result<TranslateOptions, Error> {
    let mut fields = Map::new();
    for name in kwargs.args() {
        let value: Value = kwargs.get(name)?;
        fields.insert(name.to_owned(), to_json(name, &value)?);
    }
    kwargs.assert_all_used()?;

    if !fields.contains_key("view_path") {
        let scope = view_path_for_template(state.name(), app_name);
        fields.insert("view_path".to_owned(), scope.as_slice().into());
    }
    if !fields.contains_key("locale")
        && let Some(locale) = state
            .lookup("locale")
            .filter(|value| !value.is_none() && !value.is_undefined())
    {
        fields.insert("locale".to_owned(), to_json("locale", &locale)?);
    }

    TranslateOptions::from_value(serde_json::Value::Object(fields)).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "invalid translation options").with_source(err)
    })
}

fn to_json(name: &str, value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("argument '{name}' cannot be used for translation"),
        )
        .with_source(err)
    })
}
