//! Shared helpers for integration tests.
//!
//! Integration tests under `tests/` compile as independent crates. This module
//! is included via `mod common;` in individual test files to share fixtures and
//! helpers while keeping test modules small and avoiding duplication.

use anyhow::Result;
use rstest::fixture;
use test_support::TranslationDir;

/// Fixture: a translation tree spread over several files and formats.
///
/// ```text
/// strings_en.json       -> en.strings
/// users/show_en.yml     -> en.users.show
/// users/show_es.json    -> es.users.show
/// common_de.yaml        -> de.common
/// README.json           -> skipped, no locale suffix
/// notes_en.txt          -> ignored, not JSON or YAML
/// ```
#[fixture]
pub fn locales() -> Result<TranslationDir> {
    TranslationDir::new()?
        .with_file(
            "strings_en.json",
            r#"{
                "everything": "I am a translated string for locale: en",
                "hello": "Hello, %{name.first}",
                "message_count": { "one": "1 message", "other": "%{count} messages" }
            }"#,
        )?
        .with_file(
            "users/show_en.yml",
            "title: Profile of %{name}\nfollowers:\n  one: 1 follower\n  other: \"%{count} followers\"\n",
        )?
        .with_file("users/show_es.json", r#"{ "title": "Perfil de %{name}" }"#)?
        .with_file("common_de.yaml", "greeting: Hallo\n")?
        .with_file("README.json", r#"{ "ignored": true }"#)?
        .with_file("notes_en.txt", "not a translation file")
}
