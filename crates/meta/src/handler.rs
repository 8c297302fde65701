//! Value handlers: per-kind validation, marshalling, and locale defaulting.
//!
//! One stateless handler instance exists per distinct value kind. A handler
//! answers three questions for its kind: is this value acceptable for the
//! named property (`check`), what is its JSON form (`marshal` /
//! `unmarshal`, exact inverses), and does it have a locale-derived default
//! (`locale_value`, `None` unless the handler opts in).
//!
//! Error text produced here is user-facing contract; see `error.rs`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use slate_format::{Pattern, PatternKind};
use slate_locale::{Locale, LocaleContext};

use crate::audit::AuditInfo;
use crate::email::EmailAddress;
use crate::error::MetadataError;
use crate::plugin::{PluginNameSet, Selector};
use crate::value::{RoundingMode, Viewport};

/// Validation + serialization strategy for one value kind.
pub trait ValueHandler<T>: Sync {
    /// Display label for the kind, used in error messages.
    fn label(&self) -> &'static str;

    /// Domain constraint beyond the type itself. The default accepts:
    /// for most kinds the type system already did the work.
    fn check(&self, _name: &'static str, _value: &T) -> Result<(), MetadataError> {
        Ok(())
    }

    fn marshal(&self, value: &T) -> Value;

    /// Parse the marshalled node back. Shape errors become `Mismatch`,
    /// domain errors `InvalidValue`; `check` runs separately afterwards.
    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<T, MetadataError>;

    /// Locale-derived default. The capability is opt-in: handlers without
    /// one inherit this `None`, deterministically, for every context.
    fn locale_value(&self, _ctx: &dyn LocaleContext) -> Option<T> {
        None
    }
}

fn expect_str<'n>(
    name: &'static str,
    node: &'n Value,
) -> Result<&'n str, MetadataError> {
    node.as_str().ok_or_else(|| MetadataError::mismatch(name, "string", node))
}

fn one_char(name: &'static str, raw: &str, label: &'static str) -> Result<char, MetadataError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MetadataError::invalid_expected(name, raw, label)),
    }
}

// ============================================================================
// Primitive handlers
// ============================================================================

pub struct BoolHandler;

impl ValueHandler<bool> for BoolHandler {
    fn label(&self) -> &'static str {
        "Boolean"
    }

    fn marshal(&self, value: &bool) -> Value {
        Value::Bool(*value)
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<bool, MetadataError> {
        node.as_bool().ok_or_else(|| MetadataError::mismatch(name, "boolean", node))
    }
}

pub struct TextHandler;

impl ValueHandler<String> for TextHandler {
    fn label(&self) -> &'static str {
        "String"
    }

    // Any string is acceptable, the empty string included.
    fn marshal(&self, value: &String) -> Value {
        Value::String(value.clone())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<String, MetadataError> {
        expect_str(name, node).map(str::to_string)
    }
}

pub struct CharHandler;

impl ValueHandler<char> for CharHandler {
    fn label(&self) -> &'static str {
        "Character"
    }

    fn marshal(&self, value: &char) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<char, MetadataError> {
        one_char(name, expect_str(name, node)?, self.label())
    }
}

/// Which locale symbol a locale-aware character property derives from.
///
/// Each locale-aware property names its own symbol here rather than
/// inferring one from the value type, so adding another char property can
/// never silently inherit the wrong default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSymbol {
    DecimalSeparator,
    GroupingSeparator,
    NegativeSign,
    ValueSeparator,
}

pub struct LocaleCharHandler {
    pub symbol: LocaleSymbol,
}

impl ValueHandler<char> for LocaleCharHandler {
    fn label(&self) -> &'static str {
        "Character"
    }

    fn marshal(&self, value: &char) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<char, MetadataError> {
        one_char(name, expect_str(name, node)?, self.label())
    }

    fn locale_value(&self, ctx: &dyn LocaleContext) -> Option<char> {
        Some(match self.symbol {
            LocaleSymbol::DecimalSeparator => ctx.decimal_separator(),
            LocaleSymbol::GroupingSeparator => ctx.grouping_separator(),
            LocaleSymbol::NegativeSign => ctx.negative_sign(),
            LocaleSymbol::ValueSeparator => ctx.value_separator(),
        })
    }
}

// ============================================================================
// Bounded integers
// ============================================================================
//
// Two deliberately separate handlers: the registry has always reported
// strictly-positive and non-negative violations with different wording, and
// the wording is contract. Do not merge them.

pub struct PositiveIntHandler;

impl ValueHandler<i64> for PositiveIntHandler {
    fn label(&self) -> &'static str {
        "int"
    }

    fn check(&self, name: &'static str, value: &i64) -> Result<(), MetadataError> {
        if *value > 0 {
            Ok(())
        } else {
            Err(MetadataError::InvalidValue {
                name,
                value: value.to_string(),
                message: format!("Expected int > 0, but got {} for \"{}\"", value, name),
            })
        }
    }

    fn marshal(&self, value: &i64) -> Value {
        Value::from(*value)
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<i64, MetadataError> {
        node.as_i64().ok_or_else(|| MetadataError::mismatch(name, "integer", node))
    }
}

pub struct NonNegativeIntHandler;

impl ValueHandler<i64> for NonNegativeIntHandler {
    fn label(&self) -> &'static str {
        "int"
    }

    fn check(&self, name: &'static str, value: &i64) -> Result<(), MetadataError> {
        if *value >= 0 {
            Ok(())
        } else {
            Err(MetadataError::InvalidValue {
                name,
                value: value.to_string(),
                message: format!("Expected value >= 0, but got {} for \"{}\"", value, name),
            })
        }
    }

    fn marshal(&self, value: &i64) -> Value {
        Value::from(*value)
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<i64, MetadataError> {
        node.as_i64().ok_or_else(|| MetadataError::mismatch(name, "integer", node))
    }
}

// ============================================================================
// Structured string handlers
// ============================================================================

pub struct EmailHandler;

impl ValueHandler<EmailAddress> for EmailHandler {
    fn label(&self) -> &'static str {
        "EmailAddress"
    }

    fn marshal(&self, value: &EmailAddress) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<EmailAddress, MetadataError> {
        let raw = expect_str(name, node)?;
        EmailAddress::parse(raw)
            .map_err(|_| MetadataError::invalid_expected(name, raw, self.label()))
    }
}

pub struct LocaleHandler;

impl ValueHandler<Locale> for LocaleHandler {
    fn label(&self) -> &'static str {
        "Locale"
    }

    fn marshal(&self, value: &Locale) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<Locale, MetadataError> {
        let raw = expect_str(name, node)?;
        Locale::new(raw).map_err(|_| MetadataError::invalid_expected(name, raw, self.label()))
    }

    // The context's own identifier; the handler carries no fallback of its
    // own.
    fn locale_value(&self, ctx: &dyn LocaleContext) -> Option<Locale> {
        Some(ctx.locale().clone())
    }
}

pub struct RoundingModeHandler;

impl ValueHandler<RoundingMode> for RoundingModeHandler {
    fn label(&self) -> &'static str {
        "RoundingMode"
    }

    fn marshal(&self, value: &RoundingMode) -> Value {
        Value::String(value.as_str().to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<RoundingMode, MetadataError> {
        let raw = expect_str(name, node)?;
        RoundingMode::from_str(raw)
            .ok_or_else(|| MetadataError::invalid_expected(name, raw, self.label()))
    }
}

pub struct PatternHandler {
    pub kind: PatternKind,
}

impl ValueHandler<Pattern> for PatternHandler {
    fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// A pattern built for one kind cannot be stored under a property of
    /// another.
    fn check(&self, name: &'static str, value: &Pattern) -> Result<(), MetadataError> {
        if value.kind() == self.kind {
            Ok(())
        } else {
            Err(MetadataError::invalid_expected(name, value.text(), self.label()))
        }
    }

    fn marshal(&self, value: &Pattern) -> Value {
        Value::String(value.text().to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<Pattern, MetadataError> {
        let raw = expect_str(name, node)?;
        Pattern::parse(self.kind, raw)
            .map_err(|_| MetadataError::invalid_expected(name, raw, self.label()))
    }
}

pub struct PluginNameSetHandler;

impl ValueHandler<PluginNameSet> for PluginNameSetHandler {
    fn label(&self) -> &'static str {
        "PluginNameSet"
    }

    fn marshal(&self, value: &PluginNameSet) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(
        &self,
        name: &'static str,
        node: &Value,
    ) -> Result<PluginNameSet, MetadataError> {
        let raw = expect_str(name, node)?;
        PluginNameSet::parse(raw)
            .map_err(|_| MetadataError::invalid_expected(name, raw, self.label()))
    }
}

pub struct SelectorHandler;

impl ValueHandler<Selector> for SelectorHandler {
    fn label(&self) -> &'static str {
        "Selector"
    }

    fn marshal(&self, value: &Selector) -> Value {
        Value::String(value.to_string())
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<Selector, MetadataError> {
        let raw = expect_str(name, node)?;
        Selector::parse(raw).map_err(|_| MetadataError::invalid_expected(name, raw, self.label()))
    }
}

// ============================================================================
// Object-shaped handlers
// ============================================================================

pub struct ViewportHandler;

impl ValueHandler<Viewport> for ViewportHandler {
    fn label(&self) -> &'static str {
        "Viewport"
    }

    fn marshal(&self, value: &Viewport) -> Value {
        let mut map = Map::new();
        map.insert("column".to_string(), Value::from(value.column));
        map.insert("row".to_string(), Value::from(value.row));
        Value::Object(map)
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<Viewport, MetadataError> {
        let map = node
            .as_object()
            .ok_or_else(|| MetadataError::mismatch(name, "object", node))?;
        let field = |key: &'static str| -> Result<u32, MetadataError> {
            let node = map
                .get(key)
                .ok_or(MetadataError::Mismatch {
                    name: name.to_string(),
                    expected: "column/row object",
                    found: "object",
                })?;
            node.as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| MetadataError::mismatch(name, "32-bit integer", node))
        };
        Ok(Viewport { column: field("column")?, row: field("row")? })
    }
}

pub struct AuditInfoHandler;

const CREATED_BY: &str = "createdBy";
const CREATED_TIMESTAMP: &str = "createdTimestamp";
const MODIFIED_BY: &str = "modifiedBy";
const MODIFIED_TIMESTAMP: &str = "modifiedTimestamp";

impl AuditInfoHandler {
    fn email(
        name: &'static str,
        map: &Map<String, Value>,
        key: &'static str,
    ) -> Result<EmailAddress, MetadataError> {
        let raw = Self::field(name, map, key)?;
        EmailAddress::parse(raw)
            .map_err(|_| MetadataError::invalid_expected(name, raw, "EmailAddress"))
    }

    fn timestamp(
        name: &'static str,
        map: &Map<String, Value>,
        key: &'static str,
    ) -> Result<DateTime<Utc>, MetadataError> {
        let raw = Self::field(name, map, key)?;
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|_| MetadataError::invalid_expected(name, raw, "DateTime"))
    }

    fn field<'m>(
        name: &'static str,
        map: &'m Map<String, Value>,
        key: &'static str,
    ) -> Result<&'m str, MetadataError> {
        let node = map.get(key).ok_or(MetadataError::Mismatch {
            name: name.to_string(),
            expected: "audit object",
            found: "object",
        })?;
        expect_str(name, node)
    }
}

impl ValueHandler<AuditInfo> for AuditInfoHandler {
    fn label(&self) -> &'static str {
        "AuditInfo"
    }

    fn marshal(&self, value: &AuditInfo) -> Value {
        let mut map = Map::new();
        map.insert(CREATED_BY.to_string(), Value::String(value.created_by.to_string()));
        map.insert(
            CREATED_TIMESTAMP.to_string(),
            Value::String(value.created_timestamp.to_rfc3339()),
        );
        map.insert(MODIFIED_BY.to_string(), Value::String(value.modified_by.to_string()));
        map.insert(
            MODIFIED_TIMESTAMP.to_string(),
            Value::String(value.modified_timestamp.to_rfc3339()),
        );
        Value::Object(map)
    }

    fn unmarshal(&self, name: &'static str, node: &Value) -> Result<AuditInfo, MetadataError> {
        let map = node
            .as_object()
            .ok_or_else(|| MetadataError::mismatch(name, "object", node))?;
        Ok(AuditInfo {
            created_by: Self::email(name, map, CREATED_BY)?,
            created_timestamp: Self::timestamp(name, map, CREATED_TIMESTAMP)?,
            modified_by: Self::email(name, map, MODIFIED_BY)?,
            modified_timestamp: Self::timestamp(name, map, MODIFIED_TIMESTAMP)?,
        })
    }
}
