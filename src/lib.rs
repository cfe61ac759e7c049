//! Client-side object model for a remote chat API.
//!
//! Entities ([`chat::Message`], [`chat::Chat`], [`chat::ChatUser`]) are thin
//! accessor layers over a [`cache::LazyObject`], which fetches and caches
//! the entity's JSON document on demand. Paged listings are exposed as lazy
//! item streams by the [`pagination`] module.

pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;

pub use error::{FetchError, FetchResult, TransportError};
