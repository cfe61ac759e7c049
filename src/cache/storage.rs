//! In-memory state behind a single lazy object.

use serde_json::{Map, Value};

/// A remote entity's JSON document, keyed by field name.
pub type Document = Map<String, Value>;

/// Whether the next read may be served from the cached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
  Fresh,
  NeedsRefresh,
}

/// Last known document of one entity plus its freshness.
///
/// Only the owning [`LazyObject`](super::LazyObject) mutates this.
#[derive(Debug, Clone)]
pub struct RemoteState {
  payload: Document,
  freshness: Freshness,
}

impl RemoteState {
  /// Empty state; the first read will fetch.
  pub fn new() -> Self {
    Self {
      payload: Document::new(),
      freshness: Freshness::NeedsRefresh,
    }
  }

  /// State seeded with a document the caller already holds.
  pub fn seeded(payload: Document) -> Self {
    Self {
      payload,
      freshness: Freshness::Fresh,
    }
  }

  pub fn payload(&self) -> &Document {
    &self.payload
  }

  pub fn freshness(&self) -> Freshness {
    self.freshness
  }

  /// Decide whether `key` can be served from cache.
  ///
  /// A hit requires the key to exist (any value, including `null`, `0`,
  /// `""` and `false`) and the state to be fresh.
  pub(crate) fn lookup(&mut self, key: &str) -> Option<Value> {
    if self.freshness == Freshness::NeedsRefresh {
      return None;
    }
    let hit = self.payload.get(key).cloned();
    if hit.is_some() {
      self.freshness = Freshness::Fresh;
    }
    hit
  }

  /// Swap in a freshly fetched document.
  pub(crate) fn replace(&mut self, payload: Document) {
    self.payload = payload;
    self.freshness = Freshness::Fresh;
  }

  pub(crate) fn invalidate(&mut self) {
    self.freshness = Freshness::NeedsRefresh;
  }
}

impl Default for RemoteState {
  fn default() -> Self {
    Self::new()
  }
}
