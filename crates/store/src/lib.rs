//! Metadata persistence seam.
//!
//! The registry core never touches storage or the system clock directly: a
//! [`MetadataStore`] loads and saves containers by [`DocumentId`], and any
//! timestamps it records come from an injected [`Clock`]. Backends get
//! last-writer-wins semantics and must tolerate concurrent callers;
//! [`MemoryStore`] is the reference implementation and the test double.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use slate_meta::Metadata;

/// Opaque, non-empty document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Result<DocumentId, StoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(StoreError::EmptyDocumentId);
        }
        Ok(DocumentId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zero-argument "now" supplier. Injected so persistence timestamps are
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The process clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> FixedClock {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Document ids must be non-empty.
    EmptyDocumentId,
    /// Backend failure (I/O, connection, ...), passed through untranslated.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDocumentId => write!(f, "Document id is empty"),
            Self::Backend(msg) => write!(f, "Store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Load/save metadata by document id, last-writer-wins.
pub trait MetadataStore: Send + Sync {
    fn load(&self, id: &DocumentId) -> Result<Option<Metadata>, StoreError>;
    fn save(&self, id: &DocumentId, metadata: &Metadata) -> Result<(), StoreError>;
}

struct StoredEntry {
    metadata: Metadata,
    saved_at: DateTime<Utc>,
}

/// In-memory store keyed by document id.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> MemoryStore {
        MemoryStore { clock, entries: RwLock::new(HashMap::new()) }
    }

    pub fn with_system_clock() -> MemoryStore {
        MemoryStore::new(Arc::new(SystemClock))
    }

    /// When `id` was last saved, if ever.
    pub fn saved_at(&self, id: &DocumentId) -> Option<DateTime<Utc>> {
        self.entries.read().get(id.as_str()).map(|entry| entry.saved_at)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataStore for MemoryStore {
    fn load(&self, id: &DocumentId) -> Result<Option<Metadata>, StoreError> {
        Ok(self.entries.read().get(id.as_str()).map(|entry| entry.metadata.clone()))
    }

    fn save(&self, id: &DocumentId, metadata: &Metadata) -> Result<(), StoreError> {
        let entry = StoredEntry { metadata: metadata.clone(), saved_at: self.clock.now() };
        self.entries.write().insert(id.as_str().to_string(), entry);
        Ok(())
    }
}
