// Plugin names, plugin name sets, and component selectors

use std::collections::BTreeSet;
use std::fmt;

/// A plugin name is `[A-Za-z][A-Za-z0-9-]*`. Returns the validated name.
fn check_name(name: &str) -> Result<&str, String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(format!("Invalid plugin name {:?}", name)),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(name)
    } else {
        Err(format!("Invalid plugin name {:?}", name))
    }
}

/// An ordered, de-duplicated set of plugin names.
///
/// Parses from and renders to the comma-separated form users type
/// ("chart, solver"). Iteration order is name order, which makes the
/// rendered form canonical regardless of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginNameSet {
    names: BTreeSet<String>,
}

impl PluginNameSet {
    /// Parse a comma-separated name list. Empty text is the empty set;
    /// empty segments ("a,,b") are rejected.
    pub fn parse(raw: &str) -> Result<PluginNameSet, String> {
        let mut names = BTreeSet::new();
        if raw.trim().is_empty() {
            return Ok(PluginNameSet { names });
        }
        for segment in raw.split(',') {
            let name = segment.trim();
            if name.is_empty() {
                return Err(format!("Empty plugin name in {:?}", raw));
            }
            check_name(name)?;
            names.insert(name.to_string());
        }
        Ok(PluginNameSet { names })
    }

    pub fn from_names<I, S>(names: I) -> Result<PluginNameSet, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            check_name(name.as_ref())?;
            set.insert(name.as_ref().to_string());
        }
        Ok(PluginNameSet { names: set })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for PluginNameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.names {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// A component selector: a plugin-style name plus an optional text payload,
/// e.g. `automatic` or `date-format dd/mm/yyyy`. The payload's meaning
/// belongs to the selected component; the registry stores it opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    name: String,
    text: String,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Selector, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(format!("Empty selector in {:?}", raw));
        }
        let (name, text) = match trimmed.split_once(char::is_whitespace) {
            Some((name, text)) => (name, text.trim()),
            None => (trimmed, ""),
        };
        check_name(name)?;
        Ok(Selector { name: name.to_string(), text: text.to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload after the name; empty when the selector is bare.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_and_dedupes() {
        let set = PluginNameSet::parse("solver, chart, solver").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "chart, solver");
        assert!(set.contains("chart"));
        assert!(!set.contains("pivot"));
    }

    #[test]
    fn test_empty_text_is_empty_set() {
        let set = PluginNameSet::parse("").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn test_empty_segment_rejected() {
        let err = PluginNameSet::parse("chart,, solver").unwrap_err();
        assert_eq!(err, "Empty plugin name in \"chart,, solver\"");
    }

    #[test]
    fn test_bad_names_rejected_with_raw_text() {
        assert!(PluginNameSet::parse("chart, 9lives").is_err());
        assert!(PluginNameSet::parse("bad name!").is_err());
        let err = PluginNameSet::parse("-leading").unwrap_err();
        assert!(err.contains("-leading"));
    }

    #[test]
    fn test_from_names() {
        let set = PluginNameSet::from_names(["solver", "chart"]).unwrap();
        assert_eq!(set.to_string(), "chart, solver");
        assert!(PluginNameSet::from_names(["ok", ""]).is_err());
    }

    #[test]
    fn test_bare_selector() {
        let selector = Selector::parse("automatic").unwrap();
        assert_eq!(selector.name(), "automatic");
        assert_eq!(selector.text(), "");
        assert_eq!(selector.to_string(), "automatic");
    }

    #[test]
    fn test_selector_with_payload() {
        let selector = Selector::parse("date-format dd/mm/yyyy").unwrap();
        assert_eq!(selector.name(), "date-format");
        assert_eq!(selector.text(), "dd/mm/yyyy");
        assert_eq!(selector.to_string(), "date-format dd/mm/yyyy");
    }

    #[test]
    fn test_selector_rejects_empty_and_bad_names() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("   ").is_err());
        assert!(Selector::parse("1st-thing payload").is_err());
    }
}
