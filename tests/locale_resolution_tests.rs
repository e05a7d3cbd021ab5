//! Unit tests for locale resolution helpers.

use anyhow::{Result, ensure};
use keyglot::locale_resolution::{normalize_locale_tag, resolve_session_locale};
use rstest::rstest;
use test_support::{StubEnv, StubSystemLocale};

#[rstest]
#[case("en_US.UTF-8", Some("en-US"))]
#[case("es_ES", Some("es-ES"))]
#[case("pt_BR@latin", Some("pt-BR"))]
#[case("  en-GB  ", Some("en-GB"))]
#[case("sr_Latn_RS", Some("sr-Latn-RS"))]
#[case("C", None)]
#[case("en US", None)]
#[case("", None)]
fn normalize_locale_tag_handles_common_formats(
    #[case] raw: &str,
    #[case] expected: Option<&str>,
) -> Result<()> {
    let normalized = normalize_locale_tag(raw);
    ensure!(
        normalized.as_deref() == expected,
        "expected {:?} to normalize to {:?}, got {:?}",
        raw,
        expected,
        normalized
    );
    Ok(())
}

#[rstest]
fn resolve_session_locale_prefers_env_over_system() -> Result<()> {
    let env = StubEnv::with_locale("fr-FR");
    let system = StubSystemLocale::with_locale("es_ES.UTF-8");
    let resolved = resolve_session_locale(&env, &system);
    ensure!(
        resolved.as_deref() == Some("fr-FR"),
        "expected env locale to win, got {resolved:?}"
    );

    let resolved_fallback = resolve_session_locale(&StubEnv::default(), &system);
    ensure!(
        resolved_fallback.as_deref() == Some("es-ES"),
        "expected system locale fallback, got {resolved_fallback:?}"
    );
    Ok(())
}

#[rstest]
fn resolve_session_locale_skips_invalid_values() -> Result<()> {
    let env = StubEnv::with_locale("bad locale");
    let system = StubSystemLocale::with_locale("en_US");
    let resolved = resolve_session_locale(&env, &system);
    ensure!(
        resolved.as_deref() == Some("en-US"),
        "expected system locale fallback, got {resolved:?}"
    );

    let nothing = resolve_session_locale(&StubEnv::default(), &StubSystemLocale::with_locale("C"));
    ensure!(nothing.is_none(), "expected no locale, got {nothing:?}");
    Ok(())
}
