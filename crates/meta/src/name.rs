//! Property names: typed singleton keys into the metadata container.
//!
//! Every document setting is declared exactly once below as a
//! `pub static PropertyName<T>` bound at construction to the one
//! `ValueHandler<T>` that owns its validation, serialization, and locale
//! defaulting. Identity is the name string; two names never share a string,
//! and a name's value type never changes once registered.
//!
//! Adding a setting means adding one static plus a row in `registry::ALL` -
//! no match arm anywhere else in the crate.

use serde_json::Value;

use slate_format::{Pattern, PatternKind};
use slate_locale::{Locale, LocaleContext};

use crate::audit::AuditInfo;
use crate::email::EmailAddress;
use crate::error::MetadataError;
use crate::handler::{
    AuditInfoHandler, BoolHandler, CharHandler, EmailHandler, LocaleCharHandler, LocaleHandler,
    LocaleSymbol, NonNegativeIntHandler, PatternHandler, PluginNameSetHandler, PositiveIntHandler,
    RoundingModeHandler, SelectorHandler, TextHandler, ValueHandler, ViewportHandler,
};
use crate::plugin::{PluginNameSet, Selector};
use crate::value::{MetaValue, PropertyValue, RoundingMode, Viewport};

/// A typed, named metadata key. Construct as a static; the handler binding
/// is fixed for the lifetime of the name.
pub struct PropertyName<T: 'static> {
    name: &'static str,
    handler: &'static dyn ValueHandler<T>,
}

impl<T: MetaValue + 'static> PropertyName<T> {
    pub const fn new(name: &'static str, handler: &'static dyn ValueHandler<T>) -> PropertyName<T> {
        PropertyName { name, handler }
    }

    /// Stable external identifier; the JSON key and the text used in
    /// error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the bound handler's domain check, returning the value on
    /// success.
    pub fn check_value(&self, value: T) -> Result<T, MetadataError> {
        self.handler.check(self.name, &value)?;
        Ok(value)
    }

    /// The locale-derived default, if this property participates in locale
    /// defaulting. Never fails: non-locale-aware properties answer `None`.
    pub fn extract_locale_value(&self, ctx: &dyn LocaleContext) -> Option<T> {
        self.handler.locale_value(ctx)
    }
}

// Identity is the name string, so any two handles to the same registered
// name compare equal.
impl<T: 'static> PartialEq for PropertyName<T> {
    fn eq(&self, other: &PropertyName<T>) -> bool {
        self.name == other.name
    }
}

impl<T: 'static> Eq for PropertyName<T> {}

impl<T: 'static> PartialOrd for PropertyName<T> {
    fn partial_cmp(&self, other: &PropertyName<T>) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: 'static> Ord for PropertyName<T> {
    fn cmp(&self, other: &PropertyName<T>) -> std::cmp::Ordering {
        self.name.cmp(other.name)
    }
}

impl<T: 'static> std::fmt::Debug for PropertyName<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PropertyName").field(&self.name).finish()
    }
}

impl<T: 'static> std::fmt::Display for PropertyName<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased view of a `PropertyName`, for the dynamic paths: registry
/// lookup, container serialization, required-key checks, locale defaulting.
pub trait Property: Sync {
    fn name(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn marshal(&self, value: &PropertyValue) -> Value;
    fn unmarshal(&self, node: &Value) -> Result<PropertyValue, MetadataError>;
    fn locale_value(&self, ctx: &dyn LocaleContext) -> Option<PropertyValue>;
}

impl<T: MetaValue + 'static> Property for PropertyName<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> &'static str {
        self.handler.label()
    }

    fn marshal(&self, value: &PropertyValue) -> Value {
        // The container only hands this method values stored through the
        // same name, so the variant always matches.
        match T::from_value(value) {
            Some(value) => self.handler.marshal(value),
            None => Value::Null,
        }
    }

    fn unmarshal(&self, node: &Value) -> Result<PropertyValue, MetadataError> {
        let value = self.handler.unmarshal(self.name, node)?;
        self.handler.check(self.name, &value)?;
        Ok(value.into_value())
    }

    fn locale_value(&self, ctx: &dyn LocaleContext) -> Option<PropertyValue> {
        self.handler.locale_value(ctx).map(MetaValue::into_value)
    }
}

// ============================================================================
// The property set
// ============================================================================
//
// Kebab-case names throughout, except three frozen camelCase names that
// predate the convention and are pinned by the required-key error text.

pub static AUDIT_INFO: PropertyName<AuditInfo> =
    PropertyName::new("auditInfo", &AuditInfoHandler);

pub static CELL_CHARACTER_WIDTH: PropertyName<i64> =
    PropertyName::new("cell-character-width", &PositiveIntHandler);

pub static CREATOR: PropertyName<EmailAddress> = PropertyName::new("creator", &EmailHandler);

pub static DATE_FORMAT_PATTERN: PropertyName<Pattern> =
    PropertyName::new("date-format-pattern", &PatternHandler { kind: PatternKind::DateFormat });

pub static DATE_PARSE_PATTERN: PropertyName<Pattern> =
    PropertyName::new("date-parse-pattern", &PatternHandler { kind: PatternKind::DateParse });

pub static DATE_TIME_FORMAT_PATTERN: PropertyName<Pattern> = PropertyName::new(
    "date-time-format-pattern",
    &PatternHandler { kind: PatternKind::DateTimeFormat },
);

pub static DATE_TIME_PARSE_PATTERN: PropertyName<Pattern> = PropertyName::new(
    "date-time-parse-pattern",
    &PatternHandler { kind: PatternKind::DateTimeParse },
);

pub static DECIMAL_SEPARATOR: PropertyName<char> = PropertyName::new(
    "decimal-separator",
    &LocaleCharHandler { symbol: LocaleSymbol::DecimalSeparator },
);

pub static DEFAULT_YEAR: PropertyName<i64> =
    PropertyName::new("default-year", &PositiveIntHandler);

pub static EXPONENT_SYMBOL: PropertyName<char> =
    PropertyName::new("exponent-symbol", &CharHandler);

pub static FORMATTER: PropertyName<Selector> = PropertyName::new("formatter", &SelectorHandler);

pub static GENERAL_NUMBER_FORMAT_DIGIT_COUNT: PropertyName<i64> =
    PropertyName::new("general-number-format-digit-count", &NonNegativeIntHandler);

pub static GROUPING_SEPARATOR: PropertyName<char> = PropertyName::new(
    "grouping-separator",
    &LocaleCharHandler { symbol: LocaleSymbol::GroupingSeparator },
);

pub static HIDE_ZERO_VALUES: PropertyName<bool> =
    PropertyName::new("hideZeroValues", &BoolHandler);

pub static LOCALE: PropertyName<Locale> = PropertyName::new("locale", &LocaleHandler);

pub static NEGATIVE_SIGN: PropertyName<char> = PropertyName::new(
    "negative-sign",
    &LocaleCharHandler { symbol: LocaleSymbol::NegativeSign },
);

pub static NUMBER_FORMAT_PATTERN: PropertyName<Pattern> = PropertyName::new(
    "number-format-pattern",
    &PatternHandler { kind: PatternKind::NumberFormat },
);

pub static NUMBER_PARSE_PATTERN: PropertyName<Pattern> = PropertyName::new(
    "number-parse-pattern",
    &PatternHandler { kind: PatternKind::NumberParse },
);

pub static PLUGINS: PropertyName<PluginNameSet> =
    PropertyName::new("plugins", &PluginNameSetHandler);

pub static POSITIVE_SIGN: PropertyName<char> = PropertyName::new("positive-sign", &CharHandler);

pub static PRECISION: PropertyName<i64> = PropertyName::new("precision", &NonNegativeIntHandler);

pub static ROUNDING_MODE: PropertyName<RoundingMode> =
    PropertyName::new("roundingMode", &RoundingModeHandler);

pub static SPREADSHEET_NAME: PropertyName<String> =
    PropertyName::new("spreadsheet-name", &TextHandler);

pub static TEXT_FORMAT_PATTERN: PropertyName<Pattern> =
    PropertyName::new("text-format-pattern", &PatternHandler { kind: PatternKind::TextFormat });

pub static TIME_FORMAT_PATTERN: PropertyName<Pattern> =
    PropertyName::new("time-format-pattern", &PatternHandler { kind: PatternKind::TimeFormat });

pub static TIME_PARSE_PATTERN: PropertyName<Pattern> =
    PropertyName::new("time-parse-pattern", &PatternHandler { kind: PatternKind::TimeParse });

pub static VALUE_SEPARATOR: PropertyName<char> = PropertyName::new(
    "value-separator",
    &LocaleCharHandler { symbol: LocaleSymbol::ValueSeparator },
);

pub static VIEWPORT: PropertyName<Viewport> = PropertyName::new("viewport", &ViewportHandler);

/// The explicit table of every registered property.
///
/// Unmarshalling rejects keys missing from here, and `effective` walks it
/// for locale-aware defaults. Kept as one list rather than scattered
/// conditionals so "all known properties" has a single source of truth.
pub mod registry {
    use once_cell::sync::Lazy;
    use std::collections::BTreeMap;

    use super::*;

    /// Every property, ordered by name.
    static ALL: [&'static dyn Property; 28] = [
        &AUDIT_INFO,
        &CELL_CHARACTER_WIDTH,
        &CREATOR,
        &DATE_FORMAT_PATTERN,
        &DATE_PARSE_PATTERN,
        &DATE_TIME_FORMAT_PATTERN,
        &DATE_TIME_PARSE_PATTERN,
        &DECIMAL_SEPARATOR,
        &DEFAULT_YEAR,
        &EXPONENT_SYMBOL,
        &FORMATTER,
        &GENERAL_NUMBER_FORMAT_DIGIT_COUNT,
        &GROUPING_SEPARATOR,
        &HIDE_ZERO_VALUES,
        &LOCALE,
        &NEGATIVE_SIGN,
        &NUMBER_FORMAT_PATTERN,
        &NUMBER_PARSE_PATTERN,
        &PLUGINS,
        &POSITIVE_SIGN,
        &PRECISION,
        &ROUNDING_MODE,
        &SPREADSHEET_NAME,
        &TEXT_FORMAT_PATTERN,
        &TIME_FORMAT_PATTERN,
        &TIME_PARSE_PATTERN,
        &VALUE_SEPARATOR,
        &VIEWPORT,
    ];

    /// Properties a container must carry before consumers may rely on it.
    static REQUIRED: [&'static dyn Property; 4] =
        [&AUDIT_INFO, &HIDE_ZERO_VALUES, &LOCALE, &ROUNDING_MODE];

    static INDEX: Lazy<BTreeMap<&'static str, &'static dyn Property>> =
        Lazy::new(|| ALL.iter().map(|property| (property.name(), *property)).collect());

    pub fn all() -> &'static [&'static dyn Property] {
        &ALL
    }

    pub fn required() -> &'static [&'static dyn Property] {
        &REQUIRED
    }

    pub fn find(name: &str) -> Option<&'static dyn Property> {
        INDEX.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_locale::LocaleSymbols;

    #[test]
    fn test_registry_is_sorted_and_unique() {
        let names: Vec<&str> = registry::all().iter().map(|p| p.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert_eq!(registry::find("precision").map(|p| p.name()), Some("precision"));
        assert_eq!(registry::find("auditInfo").map(|p| p.name()), Some("auditInfo"));
        assert!(registry::find("audit-info").is_none());
        assert!(registry::find("no-such-property").is_none());
    }

    #[test]
    fn test_check_value_routes_to_handler() {
        assert!(CELL_CHARACTER_WIDTH.check_value(20).is_ok());
        let err = CELL_CHARACTER_WIDTH.check_value(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected int > 0, but got -1 for \"cell-character-width\""
        );
    }

    #[test]
    fn test_locale_aware_names_extract_values() {
        let ctx = LocaleSymbols::for_locale(Locale::new("en").unwrap());
        assert_eq!(GROUPING_SEPARATOR.extract_locale_value(&ctx), Some(','));
        assert_eq!(DECIMAL_SEPARATOR.extract_locale_value(&ctx), Some('.'));
        assert_eq!(NEGATIVE_SIGN.extract_locale_value(&ctx), Some('-'));
        assert_eq!(LOCALE.extract_locale_value(&ctx), Some(Locale::new("en").unwrap()));
    }

    #[test]
    fn test_non_locale_aware_names_extract_absent() {
        let ctx = LocaleSymbols::for_locale(Locale::new("en").unwrap());
        assert_eq!(POSITIVE_SIGN.extract_locale_value(&ctx), None);
        assert_eq!(EXPONENT_SYMBOL.extract_locale_value(&ctx), None);
        assert_eq!(CREATOR.extract_locale_value(&ctx), None);
        assert_eq!(PRECISION.extract_locale_value(&ctx), None);
    }

    #[test]
    fn test_property_name_identity_is_the_name_string() {
        assert_eq!(PRECISION, PropertyName::new("precision", &NonNegativeIntHandler));
        assert!(CELL_CHARACTER_WIDTH < PRECISION);
        assert_eq!(PRECISION.to_string(), "precision");
    }

    #[test]
    fn test_required_set_contents() {
        let names: Vec<&str> = registry::required().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["auditInfo", "hideZeroValues", "locale", "roundingMode"]);
    }
}
