//! Keyglot core library.
//!
//! Translations live in one JSON tree keyed by locale, loaded from JSON and
//! YAML files. A key is resolved along a locale fallback chain and up a view
//! scope, then a plural variant is selected and `%{placeholders}` are
//! interpolated. The [`translator::Translator`] ties these steps together;
//! [`template`] exposes it to `MiniJinja` templates.
//!
//! ```
//! use keyglot::translator::{TranslateOptions, Translator};
//! use serde_json::json;
//!
//! let mut translator = Translator::default();
//! translator
//!     .store_mut()
//!     .put_at_path("de.greeting", json!("Hallo, %{name}"))
//!     .expect("seed");
//! let options = TranslateOptions::new()
//!     .with_locale("de-AT")
//!     .with_arg("name", "Ada");
//! assert_eq!(translator.translate("greeting", &options).expect("ok"), "Hallo, Ada");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod locale;
pub mod locale_resolution;
pub mod lookup;
pub mod plural;
pub mod runner;
pub mod store;
pub mod template;
pub mod translator;
