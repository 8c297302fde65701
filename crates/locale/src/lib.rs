// Locale identifiers and locale-derived formatting symbols

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated locale identifier: `language` or `language-REGION`.
///
/// Language is 2-3 ASCII letters (stored lowercase), region is 2 ASCII
/// letters (stored uppercase) or 3 digits (UN M.49). Anything longer -
/// scripts, variants, extensions - is out of scope for document metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    tag: String,
}

impl Locale {
    /// Parse and canonicalize a locale tag. Accepts `_` as a separator
    /// alias ("en_AU" == "en-AU").
    pub fn new(tag: &str) -> Result<Locale, LocaleError> {
        let mut parts = tag.split(|c| c == '-' || c == '_');

        let language = parts.next().unwrap_or("");
        if language.len() < 2
            || language.len() > 3
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LocaleError::Invalid { tag: tag.to_string() });
        }

        let region = match parts.next() {
            None => None,
            Some(region)
                if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                Some(region.to_ascii_uppercase())
            }
            Some(region) if region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()) => {
                Some(region.to_string())
            }
            Some(_) => return Err(LocaleError::Invalid { tag: tag.to_string() }),
        };

        if parts.next().is_some() {
            return Err(LocaleError::Invalid { tag: tag.to_string() });
        }

        let mut canonical = language.to_ascii_lowercase();
        if let Some(region) = region {
            canonical.push('-');
            canonical.push_str(&region);
        }
        Ok(Locale { tag: canonical })
    }

    /// Canonical tag, e.g. "en-AU".
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Lowercase language subtag, e.g. "en".
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }

    /// Region subtag if present, e.g. "AU".
    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').nth(1)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Locale::new(&tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> String {
        locale.tag
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    Invalid { tag: String },
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { tag } => write!(f, "Invalid locale {:?}", tag),
        }
    }
}

impl std::error::Error for LocaleError {}

/// The locale collaborator: everything the metadata registry may derive
/// from locale data. Implementations must answer without side effects.
pub trait LocaleContext {
    fn locale(&self) -> &Locale;
    fn decimal_separator(&self) -> char;
    fn grouping_separator(&self) -> char;
    fn negative_sign(&self) -> char;
    fn value_separator(&self) -> char;
}

/// A `LocaleContext` backed by a built-in symbol table.
///
/// Covers the languages Slate ships defaults for; unknown languages fall
/// back to the `en` row. A CLDR-backed context can replace this behind the
/// same trait without touching the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleSymbols {
    locale: Locale,
    decimal: char,
    grouping: char,
    negative: char,
    value: char,
}

impl LocaleSymbols {
    /// Look up the symbol row for `locale`.
    pub fn for_locale(locale: Locale) -> LocaleSymbols {
        let (decimal, grouping, value) = match locale.language() {
            // Comma-decimal languages
            "de" | "es" | "it" | "nl" | "pt" => (',', '.', ';'),
            // French groups with narrow spaces; ship the non-breaking space
            "fr" => (',', '\u{a0}', ';'),
            // en and everything unknown
            _ => ('.', ',', ','),
        };
        LocaleSymbols { locale, decimal, grouping, negative: '-', value }
    }

    /// A context with explicit symbols, for tests and host overrides.
    pub fn new(
        locale: Locale,
        decimal: char,
        grouping: char,
        negative: char,
        value: char,
    ) -> LocaleSymbols {
        LocaleSymbols { locale, decimal, grouping, negative, value }
    }
}

impl LocaleContext for LocaleSymbols {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn decimal_separator(&self) -> char {
        self.decimal
    }

    fn grouping_separator(&self) -> char {
        self.grouping
    }

    fn negative_sign(&self) -> char {
        self.negative
    }

    fn value_separator(&self) -> char {
        self.value
    }
}
