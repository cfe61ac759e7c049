//! Typed facades over the chat API's entities.
//!
//! Each facade owns a [`LazyObject`](crate::cache::LazyObject) and exposes
//! named async accessors over its document. Facades hold no other state.

mod channel;
mod client;
mod message;
mod user;

pub use channel::Chat;
pub use client::ChatClient;
pub use message::{Message, MessageKind};
pub use user::ChatUser;

use serde_json::Value;

use crate::cache::Document;
use crate::error::{FetchError, FetchResult};

/// Identifier stored under `key`, accepting string or numeric ids.
fn document_id(document: &Document, key: &str) -> FetchResult<String> {
  match document.get(key) {
    Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
    Some(Value::Number(id)) => Ok(id.to_string()),
    _ => Err(FetchError::MissingId(key.to_string())),
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use std::sync::Arc;
  use url::Url;

  use super::ChatClient;
  use crate::http::mock::MockTransport;
  use crate::http::{Requester, StaticHeaders};

  pub const API: &str = "https://api-x.chat.test/v3";

  pub fn client() -> (ChatClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let requester = Requester::new(mock.clone(), Arc::new(StaticHeaders::default()));
    let client = ChatClient::new(Url::parse(API).unwrap(), requester).unwrap();
    (client, mock)
  }
}
