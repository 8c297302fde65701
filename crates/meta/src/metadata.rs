//! The immutable metadata container.
//!
//! An ordered mapping from property name to validated value. Every mutation
//! returns a fresh container; holders of earlier versions are never
//! affected, so containers can be shared across threads freely. Iteration
//! order is insertion order, which makes serialization deterministic:
//! replacing a value keeps its position, new keys append.

use serde_json::{Map, Value};
use std::fmt;

use slate_locale::LocaleContext;

use crate::error::MetadataError;
use crate::name::{registry, Property, PropertyName};
use crate::value::{MetaValue, PropertyValue};

#[derive(Clone)]
struct Entry {
    property: &'static dyn Property,
    value: PropertyValue,
}

/// One document's settings: an immutable, ordered set of validated
/// (property, value) pairs.
#[derive(Clone, Default)]
pub struct Metadata {
    entries: Vec<Entry>,
}

impl Metadata {
    pub fn new() -> Metadata {
        Metadata { entries: Vec::new() }
    }

    /// Validate `value` and return a container with it stored under `name`.
    ///
    /// A new key appends; an existing key is replaced in place, keeping its
    /// serialization position. On failure the receiver is untouched (it
    /// always is - containers are values).
    pub fn set<T: MetaValue + 'static>(
        &self,
        name: &'static PropertyName<T>,
        value: T,
    ) -> Result<Metadata, MetadataError> {
        let value = name.check_value(value)?.into_value();
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|entry| entry.property.name() == name.name()) {
            Some(entry) => entry.value = value,
            None => entries.push(Entry { property: name, value }),
        }
        Ok(Metadata { entries })
    }

    /// The stored value for `name`, if present. Type-safe: the stored
    /// variant always matches the name that checked it in.
    pub fn get<T: MetaValue + 'static>(&self, name: &PropertyName<T>) -> Option<&T> {
        self.find(name.name()).and_then(T::from_value)
    }

    /// The stored value by dynamic name, for callers walking the registry.
    pub fn get_value(&self, name: &str) -> Option<&PropertyValue> {
        self.find(name)
    }

    /// A container without `name`. Equal to the receiver when absent.
    pub fn remove(&self, name: &dyn Property) -> Metadata {
        Metadata {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.property.name() != name.name())
                .cloned()
                .collect(),
        }
    }

    /// Check that every property in `required` is present. Missing names
    /// are reported once, sorted, in a single error.
    pub fn require(&self, required: &[&'static dyn Property]) -> Result<(), MetadataError> {
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|property| self.find(property.name()).is_none())
            .map(|property| property.name())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        missing.dedup();
        Err(MetadataError::Missing { names: missing })
    }

    /// A container with locale-derived defaults filled in for every
    /// locale-aware property that is absent. Explicit values always win;
    /// derived entries append in registry order.
    pub fn effective(&self, ctx: &dyn LocaleContext) -> Metadata {
        let mut entries = self.entries.clone();
        for property in registry::all() {
            if self.find(property.name()).is_some() {
                continue;
            }
            if let Some(value) = property.locale_value(ctx) {
                entries.push(Entry { property: *property, value });
            }
        }
        Metadata { entries }
    }

    /// Serialize to an ordered JSON object, keys in iteration order.
    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|entry| (entry.property.name().to_string(), entry.property.marshal(&entry.value)))
            .collect()
    }

    /// Rebuild a container from its serialized form. Unknown keys are an
    /// error, never silently dropped; every value re-passes its handler.
    pub fn from_json(map: &Map<String, Value>) -> Result<Metadata, MetadataError> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, node) in map {
            let property = registry::find(key)
                .ok_or_else(|| MetadataError::UnknownProperty { name: key.clone() })?;
            let value = property.unmarshal(node)?;
            entries.push(Entry { property, value });
        }
        Ok(Metadata { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (name, value) pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.entries.iter().map(|entry| (entry.property.name(), &entry.value))
    }

    fn find(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|entry| entry.property.name() == name)
            .map(|entry| &entry.value)
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Metadata) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.property.name() == b.property.name() && a.value == b.value)
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|entry| (entry.property.name(), &entry.value)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::*;
    use crate::value::RoundingMode;
    use slate_locale::{Locale, LocaleSymbols};

    fn en_context() -> LocaleSymbols {
        LocaleSymbols::for_locale(Locale::new("en").unwrap())
    }

    #[test]
    fn test_empty_container() {
        let md = Metadata::new();
        assert!(md.is_empty());
        assert_eq!(md.get(&PRECISION), None);
    }

    #[test]
    fn test_set_and_get() {
        let md = Metadata::new().set(&PRECISION, 10).unwrap();
        assert_eq!(md.get(&PRECISION), Some(&10));
        assert_eq!(md.len(), 1);
    }

    #[test]
    fn test_set_failure_leaves_receiver_usable() {
        let md = Metadata::new().set(&PRECISION, 10).unwrap();
        assert!(md.set(&CELL_CHARACTER_WIDTH, 0).is_err());
        assert_eq!(md.get(&PRECISION), Some(&10));
        assert_eq!(md.len(), 1);
    }

    #[test]
    fn test_set_is_copy_on_write() {
        let before = Metadata::new().set(&PRECISION, 10).unwrap();
        let after = before.set(&PRECISION, 12).unwrap();
        assert_eq!(before.get(&PRECISION), Some(&10));
        assert_eq!(after.get(&PRECISION), Some(&12));
    }

    #[test]
    fn test_unrelated_keys_independent() {
        let md = Metadata::new()
            .set(&PRECISION, 10)
            .unwrap()
            .set(&HIDE_ZERO_VALUES, true)
            .unwrap();
        assert_eq!(md.get(&PRECISION), Some(&10));
        assert_eq!(md.get(&HIDE_ZERO_VALUES), Some(&true));
    }

    #[test]
    fn test_set_idempotent() {
        let once = Metadata::new().set(&HIDE_ZERO_VALUES, true).unwrap();
        let twice = once.set(&HIDE_ZERO_VALUES, true).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_replacement_keeps_position_and_new_keys_append() {
        let md = Metadata::new()
            .set(&PRECISION, 10)
            .unwrap()
            .set(&HIDE_ZERO_VALUES, true)
            .unwrap()
            .set(&PRECISION, 12)
            .unwrap()
            .set(&CELL_CHARACTER_WIDTH, 20)
            .unwrap();
        let names: Vec<&str> = md.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["precision", "hideZeroValues", "cell-character-width"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let md = Metadata::new().set(&PRECISION, 10).unwrap();
        let same = md.remove(&VIEWPORT);
        assert_eq!(md, same);
    }

    #[test]
    fn test_remove_present() {
        let md = Metadata::new()
            .set(&PRECISION, 10)
            .unwrap()
            .set(&HIDE_ZERO_VALUES, true)
            .unwrap();
        let removed = md.remove(&PRECISION);
        assert_eq!(removed.get(&PRECISION), None);
        assert_eq!(removed.get(&HIDE_ZERO_VALUES), Some(&true));
        // receiver untouched
        assert_eq!(md.get(&PRECISION), Some(&10));
    }

    #[test]
    fn test_require_passes_when_present() {
        let ctx = en_context();
        let md = Metadata::new()
            .set(&HIDE_ZERO_VALUES, false)
            .unwrap()
            .set(&ROUNDING_MODE, RoundingMode::HalfUp)
            .unwrap();
        assert!(md.require(&[&HIDE_ZERO_VALUES, &ROUNDING_MODE]).is_ok());
        // and the effective form still carries the explicit values
        assert_eq!(md.effective(&ctx).get(&HIDE_ZERO_VALUES), Some(&false));
    }

    #[test]
    fn test_require_reports_all_missing_sorted() {
        let err = Metadata::new()
            .require(&[&ROUNDING_MODE, &AUDIT_INFO, &HIDE_ZERO_VALUES])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Metadata missing: auditInfo, hideZeroValues, roundingMode"
        );
    }

    #[test]
    fn test_effective_fills_locale_defaults() {
        let md = Metadata::new().effective(&en_context());
        assert_eq!(md.get(&DECIMAL_SEPARATOR), Some(&'.'));
        assert_eq!(md.get(&GROUPING_SEPARATOR), Some(&','));
        assert_eq!(md.get(&NEGATIVE_SIGN), Some(&'-'));
        assert_eq!(md.get(&VALUE_SEPARATOR), Some(&','));
        assert_eq!(md.get(&LOCALE), Some(&Locale::new("en").unwrap()));
        // non-locale-aware properties stay absent
        assert_eq!(md.get(&POSITIVE_SIGN), None);
        assert_eq!(md.get(&PRECISION), None);
    }

    #[test]
    fn test_effective_never_overwrites_explicit_values() {
        let md = Metadata::new().set(&GROUPING_SEPARATOR, '\'').unwrap();
        let effective = md.effective(&en_context());
        assert_eq!(effective.get(&GROUPING_SEPARATOR), Some(&'\''));
    }

    #[test]
    fn test_effective_appends_after_explicit_entries() {
        let md = Metadata::new().set(&PRECISION, 10).unwrap();
        let names: Vec<&str> = md.effective(&en_context()).iter().map(|(n, _)| n).collect();
        assert_eq!(names[0], "precision");
        assert!(names[1..].contains(&"decimal-separator"));
    }

    #[test]
    fn test_to_json_preserves_order() {
        let md = Metadata::new()
            .set(&HIDE_ZERO_VALUES, true)
            .unwrap()
            .set(&PRECISION, 10)
            .unwrap();
        let json = md.to_json();
        let keys: Vec<&str> = json.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hideZeroValues", "precision"]);
    }

    #[test]
    fn test_json_round_trip() {
        let md = Metadata::new()
            .set(&PRECISION, 10)
            .unwrap()
            .set(&ROUNDING_MODE, RoundingMode::HalfEven)
            .unwrap()
            .set(&SPREADSHEET_NAME, "Q3 forecast".to_string())
            .unwrap();
        let back = Metadata::from_json(&md.to_json()).unwrap();
        assert_eq!(back, md);
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let mut map = Map::new();
        map.insert("color-scheme".to_string(), Value::String("dark".to_string()));
        let err = Metadata::from_json(&map).unwrap_err();
        assert_eq!(err.to_string(), "Unknown metadata property \"color-scheme\"");
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let mut map = Map::new();
        map.insert("precision".to_string(), Value::String("10".to_string()));
        let err = Metadata::from_json(&map).unwrap_err();
        assert_eq!(err.to_string(), "Metadata precision: expected integer, found string");
    }

    #[test]
    fn test_from_json_revalidates_domain() {
        let mut map = Map::new();
        map.insert("cell-character-width".to_string(), Value::from(-1));
        let err = Metadata::from_json(&map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected int > 0, but got -1 for \"cell-character-width\""
        );
    }
}
