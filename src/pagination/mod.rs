//! Cursor pagination over paged HTTP endpoints.
//!
//! A [`PageFetcher`] performs one page request and normalizes the response
//! into a [`CursorPage`]. [`paginate`] (or a [`Paginator`]) drives a fetcher
//! cursor by cursor and exposes the items as a single lazy stream.

mod fetcher;
mod page;
mod sequence;

pub use fetcher::{HttpPageFetcher, PageFetcher, PageOptions, DEFAULT_PAGE_LIMIT};
pub use page::{Cursor, CursorPage, RawCursors, RawPage, RawPaging};
pub use sequence::{paginate, ItemStream, Paginator};
