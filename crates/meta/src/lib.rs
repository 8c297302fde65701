//! Slate document metadata: a typed, extensible property registry.
//!
//! Settings are declared once as `PropertyName` singletons (see `name`),
//! each bound to the one `ValueHandler` that owns the rules for its value
//! kind. Documents carry their settings in an immutable
//! [`Metadata`] container; every `set` routes through the property's
//! handler, so a stored value is always valid and the JSON form is always
//! deterministic.
//!
//! ```
//! use slate_meta::{Metadata, name};
//!
//! let md = Metadata::new()
//!     .set(&name::PRECISION, 10)?
//!     .set(&name::HIDE_ZERO_VALUES, true)?;
//! assert_eq!(md.get(&name::PRECISION), Some(&10));
//! # Ok::<(), slate_meta::MetadataError>(())
//! ```

pub mod audit;
pub mod email;
pub mod error;
pub mod handler;
pub mod metadata;
pub mod name;
pub mod plugin;
pub mod value;

pub use audit::AuditInfo;
pub use email::EmailAddress;
pub use error::MetadataError;
pub use metadata::Metadata;
pub use name::{registry, Property, PropertyName};
pub use plugin::{PluginNameSet, Selector};
pub use value::{MetaValue, PropertyValue, RoundingMode, Viewport};
