//! Lazy object that pairs a cached document with its refresh endpoint.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};
use url::Url;

use super::storage::{Document, Freshness, RemoteState};
use super::traits::{FieldRead, ReadSource};
use crate::error::{json_type_name, FetchError, FetchResult};
use crate::http::Requester;

/// A remote entity whose JSON document is fetched on demand.
///
/// Reads are served from the cached document while it is fresh and holds
/// the requested key. Otherwise the whole document is fetched again from
/// [`url`](Self::url) and replaces the cache.
///
/// Concurrent misses are not de-duplicated: each issues its own request and
/// the last response to arrive wins.
pub struct LazyObject {
  id: String,
  url: Url,
  requester: Requester,
  state: Mutex<RemoteState>,
}

impl LazyObject {
  /// Create an object with an empty cache; the first read fetches.
  pub fn new(id: impl Into<String>, url: Url, requester: Requester) -> Self {
    Self::with_state(id.into(), url, requester, RemoteState::new())
  }

  /// Create an object whose cache already holds `payload`.
  ///
  /// Use this when the document came from another response (e.g. a list
  /// page) to avoid a redundant fetch.
  pub fn seeded(id: impl Into<String>, url: Url, requester: Requester, payload: Document) -> Self {
    Self::with_state(id.into(), url, requester, RemoteState::seeded(payload))
  }

  fn with_state(id: String, url: Url, requester: Requester, state: RemoteState) -> Self {
    Self {
      id,
      url,
      requester,
      state: Mutex::new(state),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  // Replacement is a single assignment, so a poisoned lock still guards a
  // consistent document.
  fn state(&self) -> MutexGuard<'_, RemoteState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Mark the document stale so the next read refetches it.
  pub fn invalidate(&self) {
    self.state().invalidate();
  }

  pub fn is_fresh(&self) -> bool {
    self.state().freshness() == Freshness::Fresh
  }

  /// Copy of the currently cached document, without fetching.
  pub fn snapshot(&self) -> Document {
    self.state().payload().clone()
  }

  /// Read `key`, fetching the document if it cannot be served from cache.
  pub async fn read(&self, key: &str) -> FetchResult<FieldRead> {
    let cached = self.state().lookup(key);
    if let Some(value) = cached {
      trace!(id = %self.id, key, "cache hit");
      return Ok(FieldRead {
        value: Some(value),
        source: ReadSource::Cache,
      });
    }

    let document = self.fetch().await?;
    let value = document.get(key).cloned();
    self.state().replace(document);

    Ok(FieldRead {
      value,
      source: ReadSource::Network,
    })
  }

  /// Read `key`, substituting `fallback` when a freshly fetched document
  /// lacks it.
  pub async fn get(&self, key: &str, fallback: Value) -> FetchResult<Value> {
    Ok(self.read(key).await?.value.unwrap_or(fallback))
  }

  /// Read `key` and deserialize it. Absent keys yield `None`.
  pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> FetchResult<Option<T>> {
    match self.read(key).await?.value {
      Some(value) => decode(key, value).map(Some),
      None => Ok(None),
    }
  }

  /// Like [`get_as`](Self::get_as), but an explicit `null` also yields `None`.
  pub async fn get_optional<T: DeserializeOwned>(&self, key: &str) -> FetchResult<Option<T>> {
    match self.read(key).await?.value {
      Some(Value::Null) | None => Ok(None),
      Some(value) => decode(key, value).map(Some),
    }
  }

  /// Fetch the document now, regardless of freshness.
  pub async fn refresh(&self) -> FetchResult<()> {
    let document = self.fetch().await?;
    self.state().replace(document);
    Ok(())
  }

  async fn fetch(&self) -> FetchResult<Document> {
    debug!(id = %self.id, url = %self.url, "refreshing document");
    match self.requester.get_json(&self.url, &[]).await? {
      Value::Object(document) => Ok(document),
      other => Err(FetchError::NotAnObject {
        url: self.url.to_string(),
        found: json_type_name(&other),
      }),
    }
  }
}

impl std::fmt::Debug for LazyObject {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LazyObject")
      .field("id", &self.id)
      .field("url", &self.url.as_str())
      .field("state", &*self.state())
      .finish()
  }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> FetchResult<T> {
  serde_json::from_value(value).map_err(|source| FetchError::Field {
    key: key.to_string(),
    source,
  })
}
