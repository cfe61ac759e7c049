use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{document_id, Chat, ChatClient};
use crate::cache::{Document, LazyObject, RemoteEntity};
use crate::error::{json_type_name, FetchError, FetchResult};

/// A user as seen from one chat.
#[derive(Debug)]
pub struct ChatUser {
  object: LazyObject,
  channel_url: String,
  client: ChatClient,
}

impl RemoteEntity for ChatUser {
  const KIND: &'static str = "user";

  fn object(&self) -> &LazyObject {
    &self.object
  }
}

impl ChatUser {
  pub(crate) fn new(client: ChatClient, user_id: &str, channel_url: &str) -> Self {
    let url = client.user_url(user_id);
    let object = LazyObject::new(user_id, url, client.requester().clone());
    Self {
      object,
      channel_url: channel_url.to_string(),
      client,
    }
  }

  pub(crate) fn seeded(
    client: ChatClient,
    user_id: &str,
    channel_url: &str,
    document: Document,
  ) -> Self {
    let url = client.user_url(user_id);
    let object = LazyObject::seeded(user_id, url, client.requester().clone(), document);
    Self {
      object,
      channel_url: channel_url.to_string(),
      client,
    }
  }

  /// Build a user from one item of a member listing.
  pub(crate) fn from_listing(
    client: &ChatClient,
    channel_url: &str,
    item: Value,
  ) -> FetchResult<Self> {
    match item {
      Value::Object(document) => {
        let user_id = document_id(&document, "user_id")?;
        Ok(Self::seeded(client.clone(), &user_id, channel_url, document))
      }
      other => Err(FetchError::NotAnObject {
        url: channel_url.to_string(),
        found: json_type_name(&other),
      }),
    }
  }

  pub fn channel_url(&self) -> &str {
    &self.channel_url
  }

  /// The chat this user was found in. The chat is not fetched.
  pub fn chat(&self) -> Chat {
    self.client.chat(&self.channel_url)
  }

  pub async fn nickname(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("nickname").await
  }

  pub async fn profile_url(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("profile_url").await
  }

  pub async fn is_online(&self) -> FetchResult<bool> {
    Ok(self.object.get_optional("is_online").await?.unwrap_or(false))
  }

  /// Last time the user was seen; `None` while online or never seen.
  pub async fn last_seen_at(&self) -> FetchResult<Option<DateTime<Utc>>> {
    let millis = self.object.get_optional::<i64>("last_seen_at").await?;
    Ok(
      millis
        .filter(|ms| *ms > 0)
        .and_then(DateTime::from_timestamp_millis),
    )
  }

  pub async fn role(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("role").await
  }

  pub async fn metadata(&self) -> FetchResult<Value> {
    self.object.get("metadata", Value::Object(Document::new())).await
  }
}
