//! Plural category selection.
//!
//! A [`PluralPolicy`] maps a locale and a count onto a CLDR cardinal
//! category. [`CldrPlurals`] is the built-in policy: it picks a
//! [`PluralRule`] from the language subtag and lets callers override the rule
//! for individual locales.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// CLDR cardinal plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    /// Zero items (Arabic, Latvian, ...).
    Zero,
    /// Singular.
    One,
    /// Dual.
    Two,
    /// Paucal.
    Few,
    /// "Many" forms (Slavic genitive plural, ...).
    Many,
    /// General plural; every variant map should carry it.
    Other,
}

impl PluralCategory {
    /// Key used for this category inside a variant map.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A count supplied to a translation, split into integral and fractional
/// values so integer-only rules never see a fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PluralCount {
    /// Whole number; the sign is dropped because the rules only need magnitude.
    Integer(u64),
    /// Any count with a fractional part or outside the integer range.
    Decimal(f64),
}

impl PluralCount {
    /// Classify a JSON number.
    #[must_use]
    pub fn from_number(number: &Number) -> Self {
        if let Some(value) = number.as_u64() {
            return Self::Integer(value);
        }
        if let Some(value) = number.as_i64() {
            return Self::Integer(value.unsigned_abs());
        }
        let value = number.as_f64().unwrap_or_default();
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            // The bound keeps the cast exact.
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "value is integral and below 2^53"
            )]
            let whole = value.abs() as u64;
            return Self::Integer(whole);
        }
        Self::Decimal(value)
    }
}

impl From<u64> for PluralCount {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for PluralCount {
    fn from(value: i64) -> Self {
        Self::Integer(value.unsigned_abs())
    }
}

/// Built-in cardinal rule families.
///
/// Only whole numbers are classified beyond `other`, except for the French
/// family whose `one` covers the half-open range `[0, 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// `one` for exactly 1, else `other` (English, German, Spanish, ...).
    OneOther,
    /// `one` for 0 and 1, else `other` (French, Brazilian usage).
    ZeroOneAsOne,
    /// `one`/`few`/`many` by last digits (Russian, Ukrainian, Belarusian).
    EastSlavic,
    /// Like East Slavic but `one` only for exactly 1 (Polish).
    Polish,
    /// `one` for 1, `few` for 2–4, else `other` (Czech, Slovak).
    WestSlavic,
    /// Six-way rule (Arabic).
    Arabic,
    /// No plural distinction (Japanese, Chinese, Korean, ...).
    NoPlural,
}

impl PluralRule {
    /// Pick the rule family for a locale tag such as `ru` or `pt-br`.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "fr" | "ff" | "kab" | "hy" => Self::ZeroOneAsOne,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::WestSlavic,
            "ar" => Self::Arabic,
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" => Self::NoPlural,
            _ => Self::OneOther,
        }
    }

    /// Categorize `count` under this rule.
    #[must_use]
    pub fn categorize(self, count: PluralCount) -> PluralCategory {
        match count {
            PluralCount::Integer(n) => self.categorize_integer(n),
            PluralCount::Decimal(value) => match self {
                Self::ZeroOneAsOne if (0.0..2.0).contains(&value.abs()) => PluralCategory::One,
                _ => PluralCategory::Other,
            },
        }
    }

    fn categorize_integer(self, n: u64) -> PluralCategory {
        let last = n.rem_euclid(10);
        let last_two = n.rem_euclid(100);
        match self {
            Self::OneOther => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::ZeroOneAsOne => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::EastSlavic => {
                if last == 1 && last_two != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Polish => {
                if n == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::WestSlavic => match n {
                1 => PluralCategory::One,
                2..=4 => PluralCategory::Few,
                _ => PluralCategory::Other,
            },
            Self::Arabic => match (n, last_two) {
                (0, _) => PluralCategory::Zero,
                (1, _) => PluralCategory::One,
                (2, _) => PluralCategory::Two,
                (_, 3..=10) => PluralCategory::Few,
                (_, 11..=99) => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            Self::NoPlural => PluralCategory::Other,
        }
    }
}

/// Pluggable mapping from locale and count to plural category.
pub trait PluralPolicy: Send + Sync {
    /// Category to select for `count` in `locale`.
    fn category(&self, locale: &str, count: PluralCount) -> PluralCategory;
}

/// CLDR-derived policy with optional per-locale overrides.
///
/// # Examples
///
/// ```
/// use keyglot::plural::{CldrPlurals, PluralCategory, PluralCount, PluralPolicy, PluralRule};
///
/// let mut plurals = CldrPlurals::default();
/// assert_eq!(plurals.category("en", PluralCount::Integer(1)), PluralCategory::One);
/// assert_eq!(plurals.category("ru", PluralCount::Integer(3)), PluralCategory::Few);
///
/// plurals.set_rule("en-pirate", PluralRule::NoPlural);
/// assert_eq!(plurals.category("EN-Pirate", PluralCount::Integer(1)), PluralCategory::Other);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CldrPlurals {
    overrides: HashMap<String, PluralRule>,
}

impl CldrPlurals {
    /// Force `rule` for `locale` (matched case-insensitively).
    pub fn set_rule(&mut self, locale: impl AsRef<str>, rule: PluralRule) {
        self.overrides
            .insert(locale.as_ref().to_lowercase(), rule);
    }

    /// Rule used for `locale`, honouring overrides.
    #[must_use]
    pub fn rule_for(&self, locale: &str) -> PluralRule {
        self.overrides
            .get(&locale.to_lowercase())
            .copied()
            .unwrap_or_else(|| PluralRule::for_locale(locale))
    }
}

impl PluralPolicy for CldrPlurals {
    fn category(&self, locale: &str, count: PluralCount) -> PluralCategory {
        self.rule_for(locale).categorize(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", 0, PluralCategory::Other)]
    #[case("en", 1, PluralCategory::One)]
    #[case("en", 2, PluralCategory::Other)]
    #[case("en-gb", 1, PluralCategory::One)]
    #[case("fr", 0, PluralCategory::One)]
    #[case("fr", 2, PluralCategory::Other)]
    #[case("ru", 1, PluralCategory::One)]
    #[case("ru", 3, PluralCategory::Few)]
    #[case("ru", 5, PluralCategory::Many)]
    #[case("ru", 11, PluralCategory::Many)]
    #[case("ru", 21, PluralCategory::One)]
    #[case("ru", 112, PluralCategory::Many)]
    #[case("pl", 1, PluralCategory::One)]
    #[case("pl", 21, PluralCategory::Many)]
    #[case("pl", 22, PluralCategory::Few)]
    #[case("cs", 3, PluralCategory::Few)]
    #[case("cs", 5, PluralCategory::Other)]
    #[case("ar", 0, PluralCategory::Zero)]
    #[case("ar", 2, PluralCategory::Two)]
    #[case("ar", 105, PluralCategory::Few)]
    #[case("ar", 111, PluralCategory::Many)]
    #[case("ar", 100, PluralCategory::Other)]
    #[case("ja", 1, PluralCategory::Other)]
    fn integer_counts_follow_cldr(
        #[case] locale: &str,
        #[case] count: u64,
        #[case] expected: PluralCategory,
    ) {
        let plurals = CldrPlurals::default();
        assert_eq!(plurals.category(locale, PluralCount::Integer(count)), expected);
    }

    #[rstest]
    fn fractions_are_other_except_french_range() {
        assert_eq!(
            PluralRule::OneOther.categorize(PluralCount::Decimal(1.5)),
            PluralCategory::Other
        );
        assert_eq!(
            PluralRule::ZeroOneAsOne.categorize(PluralCount::Decimal(1.5)),
            PluralCategory::One
        );
    }

    #[rstest]
    #[case(serde_json::json!(2), PluralCount::Integer(2))]
    #[case(serde_json::json!(-1), PluralCount::Integer(1))]
    #[case(serde_json::json!(1.0), PluralCount::Integer(1))]
    #[case(serde_json::json!(0.5), PluralCount::Decimal(0.5))]
    fn counts_are_classified_from_json(
        #[case] value: serde_json::Value,
        #[case] expected: PluralCount,
    ) {
        let serde_json::Value::Number(number) = value else {
            panic!("expected a number, got {value:?}");
        };
        assert_eq!(PluralCount::from_number(&number), expected);
    }

    #[rstest]
    fn category_names_match_variant_keys() {
        assert_eq!(PluralCategory::Few.to_string(), "few");
        assert_eq!(
            serde_json::to_value(PluralCategory::Other).expect("serialize"),
            serde_json::json!("other")
        );
    }
}
