//! Format and parse pattern types.
//!
//! A [`Pattern`] is an opaque, syntax-validated piece of pattern text bound
//! to a [`PatternKind`] ("dd/mm/yyyy" as a date format, "#,##0.00" as a
//! number format, ...). Construction goes through [`Pattern::parse`], so a
//! `Pattern` value is always well-formed for its kind. Actually rendering or
//! parsing cell values with a pattern lives with the formatting engine; this
//! crate owns syntax only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of pattern a piece of text is validated against.
///
/// Each kind allows a fixed alphabet of component characters; everything
/// else must appear inside a double-quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    DateFormat,
    DateParse,
    DateTimeFormat,
    DateTimeParse,
    NumberFormat,
    NumberParse,
    TextFormat,
    TimeFormat,
    TimeParse,
}

impl PatternKind {
    /// Display label, used verbatim in validation error messages.
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::DateFormat => "DateFormatPattern",
            PatternKind::DateParse => "DateParsePattern",
            PatternKind::DateTimeFormat => "DateTimeFormatPattern",
            PatternKind::DateTimeParse => "DateTimeParsePattern",
            PatternKind::NumberFormat => "NumberFormatPattern",
            PatternKind::NumberParse => "NumberParsePattern",
            PatternKind::TextFormat => "TextFormatPattern",
            PatternKind::TimeFormat => "TimeFormatPattern",
            PatternKind::TimeParse => "TimeParsePattern",
        }
    }

    /// Component characters legal for this kind (letters matched
    /// case-insensitively).
    fn components(&self) -> &'static str {
        match self {
            PatternKind::DateFormat | PatternKind::DateParse => "dmy",
            PatternKind::DateTimeFormat | PatternKind::DateTimeParse => "dmyhsa",
            PatternKind::NumberFormat | PatternKind::NumberParse => "0#?.,%$e()",
            PatternKind::TextFormat => "@*",
            PatternKind::TimeFormat | PatternKind::TimeParse => "hmsa",
        }
    }

    /// Maximum number of `;`-separated sections.
    ///
    /// Number format patterns carry up to four (positive;negative;zero;text),
    /// number parse patterns any number of alternatives, everything else
    /// exactly one.
    fn max_sections(&self) -> usize {
        match self {
            PatternKind::NumberFormat => 4,
            PatternKind::NumberParse => usize::MAX,
            _ => 1,
        }
    }

    fn is_component(&self, c: char) -> bool {
        self.components().contains(c.to_ascii_lowercase())
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Characters that may separate components in any kind of pattern.
fn is_separator(c: char) -> bool {
    matches!(c, '/' | '-' | ':' | ' ' | '.' | ',')
}

/// A validated pattern: kind plus canonical source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    kind: PatternKind,
    text: String,
}

impl Pattern {
    /// Validate `text` against `kind`.
    ///
    /// Walks the text once: double-quoted runs are opaque literals, `;`
    /// starts a new section (where the kind allows more than one), and every
    /// other character must be a component or separator for the kind.
    pub fn parse(kind: PatternKind, text: &str) -> Result<Pattern, PatternError> {
        if text.is_empty() {
            return Err(PatternError::Empty { kind });
        }

        let mut in_quote = false;
        let mut sections = 1usize;
        let mut section_len = 0usize;

        for c in text.chars() {
            if in_quote {
                if c == '"' {
                    in_quote = false;
                }
                section_len += 1;
                continue;
            }
            match c {
                '"' => {
                    in_quote = true;
                    section_len += 1;
                }
                ';' if kind.max_sections() > 1 => {
                    if section_len == 0 {
                        return Err(PatternError::EmptySection { kind, text: text.to_string() });
                    }
                    sections += 1;
                    section_len = 0;
                }
                c if kind.is_component(c) || is_separator(c) => {
                    section_len += 1;
                }
                c => {
                    return Err(PatternError::IllegalComponent {
                        kind,
                        component: c,
                        text: text.to_string(),
                    });
                }
            }
        }

        if in_quote {
            return Err(PatternError::UnterminatedQuote { kind, text: text.to_string() });
        }
        if section_len == 0 {
            return Err(PatternError::EmptySection { kind, text: text.to_string() });
        }
        if sections > kind.max_sections() {
            return Err(PatternError::TooManySections { kind, count: sections });
        }

        Ok(Pattern { kind, text: text.to_string() })
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The canonical pattern text, exactly as validated.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Why a piece of pattern text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Text is empty.
    Empty { kind: PatternKind },
    /// A `;`-separated section contains nothing.
    EmptySection { kind: PatternKind, text: String },
    /// A character outside the kind's alphabet, separators and quotes.
    IllegalComponent { kind: PatternKind, component: char, text: String },
    /// A `"` literal was opened but never closed.
    UnterminatedQuote { kind: PatternKind, text: String },
    /// More `;` sections than the kind allows.
    TooManySections { kind: PatternKind, count: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { kind } => write!(f, "Empty {}", kind.label()),
            Self::EmptySection { kind, text } => {
                write!(f, "Empty section in {} {:?}", kind.label(), text)
            }
            Self::IllegalComponent { kind, component, text } => {
                write!(f, "Invalid character {:?} in {} {:?}", component, kind.label(), text)
            }
            Self::UnterminatedQuote { kind, text } => {
                write!(f, "Unterminated quote in {} {:?}", kind.label(), text)
            }
            Self::TooManySections { kind, count } => {
                write!(f, "Expected at most 4 sections in {}, got {}", kind.label(), count)
            }
        }
    }
}

impl std::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_format_accepts_common_patterns() {
        assert!(Pattern::parse(PatternKind::DateFormat, "dd/mm/yyyy").is_ok());
        assert!(Pattern::parse(PatternKind::DateFormat, "yyyy-mm-dd").is_ok());
        assert!(Pattern::parse(PatternKind::DateFormat, "d.m.yy").is_ok());
        assert!(Pattern::parse(PatternKind::DateFormat, "dd mmm, yyyy").is_ok());
    }

    #[test]
    fn test_time_format_accepts_am_pm_marker() {
        assert!(Pattern::parse(PatternKind::TimeFormat, "hh:mm:ss").is_ok());
        assert!(Pattern::parse(PatternKind::TimeFormat, "h:mm a").is_ok());
    }

    #[test]
    fn test_number_format_accepts_grouping_and_currency() {
        assert!(Pattern::parse(PatternKind::NumberFormat, "#,##0.00").is_ok());
        assert!(Pattern::parse(PatternKind::NumberFormat, "$#,##0.00").is_ok());
        assert!(Pattern::parse(PatternKind::NumberFormat, "0.00%").is_ok());
        assert!(Pattern::parse(PatternKind::NumberFormat, "0.00E00").is_ok());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = Pattern::parse(PatternKind::DateFormat, "").unwrap_err();
        assert_eq!(err, PatternError::Empty { kind: PatternKind::DateFormat });
    }

    #[test]
    fn test_illegal_component_rejected_with_offender() {
        let err = Pattern::parse(PatternKind::DateFormat, "dd/mm/yyyy Q").unwrap_err();
        match err {
            PatternError::IllegalComponent { component, .. } => assert_eq!(component, 'Q'),
            other => panic!("expected IllegalComponent, got {:?}", other),
        }
    }

    #[test]
    fn test_time_components_rejected_in_date_pattern() {
        assert!(Pattern::parse(PatternKind::DateFormat, "hh:mm").is_err());
        // ...but fine in a date-time pattern
        assert!(Pattern::parse(PatternKind::DateTimeFormat, "dd/mm/yyyy hh:mm").is_ok());
    }

    #[test]
    fn test_quoted_literal_is_opaque() {
        assert!(Pattern::parse(PatternKind::NumberFormat, "0.00\" units\"").is_ok());
        assert!(Pattern::parse(PatternKind::DateFormat, "\"Week of\" dd/mm").is_ok());
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let err = Pattern::parse(PatternKind::NumberFormat, "0.00\" units").unwrap_err();
        assert!(matches!(err, PatternError::UnterminatedQuote { .. }));
    }

    #[test]
    fn test_number_format_sections() {
        assert!(Pattern::parse(PatternKind::NumberFormat, "0.00;(0.00)").is_ok());
        assert!(Pattern::parse(PatternKind::NumberFormat, "0;0;0;@").is_err()); // '(' fine, '@' not
        assert!(Pattern::parse(PatternKind::NumberFormat, "0;0;0;0;0").is_err());
        let err = Pattern::parse(PatternKind::NumberFormat, "0.00;;0").unwrap_err();
        assert!(matches!(err, PatternError::EmptySection { .. }));
    }

    #[test]
    fn test_sections_illegal_outside_number_patterns() {
        assert!(Pattern::parse(PatternKind::DateFormat, "dd/mm;yyyy").is_err());
    }

    #[test]
    fn test_display_is_source_text() {
        let pattern = Pattern::parse(PatternKind::TextFormat, "@").unwrap();
        assert_eq!(pattern.to_string(), "@");
        assert_eq!(pattern.kind(), PatternKind::TextFormat);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(PatternKind::DateFormat.label(), "DateFormatPattern");
        assert_eq!(PatternKind::NumberParse.label(), "NumberParsePattern");
    }
}
