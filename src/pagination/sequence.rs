//! Lazy item streams that walk a paged endpoint cursor by cursor.

use futures::Stream;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

use super::fetcher::{PageFetcher, PageOptions};
use super::page::CursorPage;
use crate::error::{FetchError, FetchResult};

/// A forward-only stream of items spanning any number of pages.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = FetchResult<T>> + Send>>;

/// Walk pages from `fetcher`, starting with `options`, yielding items one
/// at a time.
///
/// Nothing is fetched until the stream is first polled. Each following page
/// is requested only once the previous page's items have been consumed,
/// reusing `options` with `next` set to the previous page's cursor. The
/// stream ends after a page without a next cursor; a failed fetch is yielded
/// as an `Err` and ends the stream.
pub fn paginate<T, F>(fetcher: Arc<F>, options: PageOptions) -> ItemStream<T>
where
  T: Send + 'static,
  F: PageFetcher<T> + ?Sized + 'static,
{
  Box::pin(async_stream::try_stream! {
    let mut options = options;
    let mut fetched = 0usize;

    loop {
      let page: CursorPage<T> = fetcher.fetch_page(&options).await?;
      fetched += 1;
      debug!(page = fetched, items = page.items.len(), last = page.is_last(), "page received");

      let CursorPage { items, next, .. } = page;
      for item in items {
        yield item;
      }

      match next {
        Some(cursor) => options.next = Some(cursor),
        None => break,
      }
    }
  })
}

/// Restartable source of pagination streams.
///
/// Every call to [`stream`](Self::stream) starts a new, independent walk
/// from the options it was built with.
pub struct Paginator<T, F: ?Sized> {
  fetcher: Arc<F>,
  options: PageOptions,
  _item: PhantomData<fn() -> T>,
}

impl<T, F> Paginator<T, F>
where
  T: Send + 'static,
  F: PageFetcher<T> + 'static,
{
  pub fn new(fetcher: F, options: PageOptions) -> Self {
    Self::shared(Arc::new(fetcher), options)
  }
}

impl<T, F> Paginator<T, F>
where
  T: Send + 'static,
  F: PageFetcher<T> + ?Sized + 'static,
{
  pub fn shared(fetcher: Arc<F>, options: PageOptions) -> Self {
    Self {
      fetcher,
      options,
      _item: PhantomData,
    }
  }

  pub fn options(&self) -> &PageOptions {
    &self.options
  }

  /// Start a fresh walk from the first page.
  pub fn stream(&self) -> ItemStream<T> {
    paginate(Arc::clone(&self.fetcher), self.options.clone())
  }

  /// Fetch only the first page.
  pub async fn first_page(&self) -> Result<CursorPage<T>, FetchError> {
    self.fetcher.fetch_page(&self.options).await
  }
}

impl<T, F: ?Sized> Clone for Paginator<T, F> {
  fn clone(&self) -> Self {
    Self {
      fetcher: Arc::clone(&self.fetcher),
      options: self.options.clone(),
      _item: PhantomData,
    }
  }
}
