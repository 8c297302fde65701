// The sealed value universe of the metadata registry

use serde::{Deserialize, Serialize};
use std::fmt;

use slate_format::Pattern;
use slate_locale::Locale;

use crate::audit::AuditInfo;
use crate::email::EmailAddress;
use crate::plugin::{PluginNameSet, Selector};

/// Every value kind the registry can store, as a tagged variant.
///
/// The container holds `PropertyValue`s; typed access goes through the
/// `PropertyName` that performed the original check, so retrieving the
/// wrong variant is not reachable from the public API.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Audit(AuditInfo),
    Bool(bool),
    Char(char),
    Email(EmailAddress),
    Int(i64),
    Locale(Locale),
    Pattern(Pattern),
    Plugins(PluginNameSet),
    Rounding(RoundingMode),
    Selector(Selector),
    Text(String),
    Viewport(Viewport),
}

/// Conversion between a concrete value type and its `PropertyValue`
/// variant. Implemented exactly once per variant; new value kinds add a
/// variant and an impl here, nothing else.
pub trait MetaValue: Clone {
    fn into_value(self) -> PropertyValue;
    fn from_value(value: &PropertyValue) -> Option<&Self>;
}

macro_rules! meta_value {
    ($type:ty, $variant:ident) => {
        impl MetaValue for $type {
            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: &PropertyValue) -> Option<&Self> {
                match value {
                    PropertyValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

meta_value!(AuditInfo, Audit);
meta_value!(bool, Bool);
meta_value!(char, Char);
meta_value!(EmailAddress, Email);
meta_value!(i64, Int);
meta_value!(Locale, Locale);
meta_value!(Pattern, Pattern);
meta_value!(PluginNameSet, Plugins);
meta_value!(RoundingMode, Rounding);
meta_value!(Selector, Selector);
meta_value!(String, Text);
meta_value!(Viewport, Viewport);

/// How computed numbers are rounded to the document precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    Up,
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    HalfEven,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
            RoundingMode::HalfUp => "half-up",
            RoundingMode::HalfDown => "half-down",
            RoundingMode::HalfEven => "half-even",
        }
    }

    pub fn from_str(text: &str) -> Option<RoundingMode> {
        match text {
            "up" => Some(RoundingMode::Up),
            "down" => Some(RoundingMode::Down),
            "ceiling" => Some(RoundingMode::Ceiling),
            "floor" => Some(RoundingMode::Floor),
            "half-up" => Some(RoundingMode::HalfUp),
            "half-down" => Some(RoundingMode::HalfDown),
            "half-even" => Some(RoundingMode::HalfEven),
            _ => None,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-left cell of the visible grid, 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub column: u32,
    pub row: u32,
}

impl Viewport {
    pub fn new(column: u32, row: u32) -> Viewport {
        Viewport { column, row }
    }
}
