//! Core traits and types for the object cache.

use serde_json::Value;
use url::Url;

use super::layer::LazyObject;

/// Implemented by every entity facade backed by a [`LazyObject`].
pub trait RemoteEntity {
  /// Entity type name for logging (e.g., "message", "chat")
  const KIND: &'static str;

  /// The lazily cached document behind this entity.
  fn object(&self) -> &LazyObject;

  fn id(&self) -> &str {
    self.object().id()
  }

  /// URL the document is refreshed from.
  fn url(&self) -> &Url {
    self.object().url()
  }

  /// Force the next field read to refetch.
  fn invalidate(&self) {
    self.object().invalidate()
  }
}

/// Result of a field read, including where the document came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRead {
  /// The field's value; `None` if the document has no such key
  pub value: Option<Value>,
  pub source: ReadSource,
}

/// Indicates where a field read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
  /// Cached document, no request made
  Cache,
  /// Document fetched during this read
  Network,
}
