//! Page request options and the fetchers that honour them.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use tracing::{debug, warn};
use url::Url;

use super::page::{Cursor, CursorPage};
use crate::error::FetchResult;
use crate::http::{Method, Params, Requester};

pub const DEFAULT_PAGE_LIMIT: u32 = 25;

const RESERVED_PARAMS: [&str; 3] = ["limit", "prev", "next"];

/// Options for a single page request.
///
/// At most one of `prev`/`next` is normally set, matching the direction
/// being walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
  pub limit: u32,
  pub prev: Option<Cursor>,
  pub next: Option<Cursor>,
  /// Fetcher-specific query parameters. Cannot override `limit`, `prev` or `next`.
  pub extra: BTreeMap<String, String>,
}

impl Default for PageOptions {
  fn default() -> Self {
    Self {
      limit: DEFAULT_PAGE_LIMIT,
      prev: None,
      next: None,
      extra: BTreeMap::new(),
    }
  }
}

impl PageOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Page size; zero is raised to one.
  pub fn with_limit(mut self, limit: u32) -> Self {
    self.limit = limit.max(1);
    self
  }

  pub fn with_next(mut self, cursor: Cursor) -> Self {
    self.next = Some(cursor);
    self
  }

  pub fn with_prev(mut self, cursor: Cursor) -> Self {
    self.prev = Some(cursor);
    self
  }

  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.extra.insert(name.into(), value.into());
    self
  }

  /// Query parameters for this request. Paging keys always come from the
  /// options themselves.
  pub fn to_params(&self) -> Params {
    let mut params = vec![("limit".to_string(), self.limit.to_string())];
    if let Some(prev) = &self.prev {
      params.push(("prev".to_string(), prev.to_string()));
    }
    if let Some(next) = &self.next {
      params.push(("next".to_string(), next.to_string()));
    }

    for (name, value) in &self.extra {
      if RESERVED_PARAMS.contains(&name.as_str()) {
        warn!(param = %name, "ignoring extra param that collides with a paging key");
        continue;
      }
      params.push((name.clone(), value.clone()));
    }

    params
  }
}

/// Performs one page request.
///
/// Any `Fn(PageOptions) -> impl Future<Output = FetchResult<CursorPage<T>>>`
/// closure is a fetcher too.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
  async fn fetch_page(&self, options: &PageOptions) -> FetchResult<CursorPage<T>>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
  T: Send + 'static,
  F: Fn(PageOptions) -> Fut + Send + Sync,
  Fut: Future<Output = FetchResult<CursorPage<T>>> + Send + 'static,
{
  async fn fetch_page(&self, options: &PageOptions) -> FetchResult<CursorPage<T>> {
    self(options.clone()).await
  }
}

/// Fetches pages from a paged HTTP endpoint.
///
/// Expects `{ data: { [key]: { items, paging } } }` bodies; see
/// [`CursorPage::from_response`].
pub struct HttpPageFetcher<T> {
  requester: Requester,
  url: Url,
  key: Option<String>,
  method: Method,
  _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
  pub fn new(requester: Requester, url: Url) -> Self {
    Self {
      requester,
      url,
      key: None,
      method: Method::Get,
      _item: PhantomData,
    }
  }

  /// Read the page from `data[key]` instead of `data`.
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn with_method(mut self, method: Method) -> Self {
    self.method = method;
    self
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
  T: DeserializeOwned + Send + 'static,
{
  async fn fetch_page(&self, options: &PageOptions) -> FetchResult<CursorPage<T>> {
    debug!(url = %self.url, limit = options.limit, next = ?options.next, "fetching page");
    let body = self
      .requester
      .request_json(self.method, &self.url, &options.to_params())
      .await?;

    CursorPage::from_response(body, self.key.as_deref())
  }
}
