use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

use super::{ChatClient, ChatUser, Message};
use crate::cache::{LazyObject, RemoteEntity};
use crate::error::FetchResult;
use crate::pagination::{paginate, HttpPageFetcher, ItemStream, PageOptions, Paginator};

/// A group chat, identified by its channel URL.
#[derive(Debug)]
pub struct Chat {
  object: LazyObject,
  client: ChatClient,
}

impl RemoteEntity for Chat {
  const KIND: &'static str = "chat";

  fn object(&self) -> &LazyObject {
    &self.object
  }
}

impl Chat {
  pub(crate) fn new(client: ChatClient, channel_url: &str) -> Self {
    let url = client.chat_url(channel_url);
    let object = LazyObject::new(channel_url, url, client.requester().clone());
    Self { object, client }
  }

  pub fn channel_url(&self) -> &str {
    self.object.id()
  }

  pub async fn name(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("name").await
  }

  pub async fn cover_url(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("cover_url").await
  }

  pub async fn member_count(&self) -> FetchResult<Option<u64>> {
    self.object.get_optional("member_count").await
  }

  /// Creation time; the API reports whole seconds.
  pub async fn created_at(&self) -> FetchResult<Option<DateTime<Utc>>> {
    let seconds = self.object.get_optional::<i64>("created_at").await?;
    Ok(seconds.and_then(|secs| DateTime::from_timestamp(secs, 0)))
  }

  pub async fn custom_type(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("custom_type").await
  }

  pub async fn is_frozen(&self) -> FetchResult<bool> {
    Ok(self.object.get_optional("freeze").await?.unwrap_or(false))
  }

  /// Free-form channel data string set by the channel operator.
  pub async fn data(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("data").await
  }

  /// A message in this chat. Nothing is fetched until it is read.
  pub fn message(&self, message_id: &str) -> Message {
    self.client.message(self.channel_url(), message_id)
  }

  /// Member documents of this chat, page by page.
  pub fn members(&self, limit: u32) -> Paginator<Value, HttpPageFetcher<Value>> {
    let options = self.client.page_options().with_limit(limit);
    Paginator::new(self.client.members_fetcher(self.channel_url()), options)
  }

  /// Members as user facades seeded with their listing documents.
  pub fn member_stream(&self, options: PageOptions) -> ItemStream<ChatUser> {
    let fetcher = Arc::new(self.client.members_fetcher::<Value>(self.channel_url()));
    let client = self.client.clone();
    let channel_url = self.channel_url().to_string();

    paginate::<Value, _>(fetcher, options)
      .map(move |item| {
        item.and_then(|document| ChatUser::from_listing(&client, &channel_url, document))
      })
      .boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chat::testing;
  use futures::TryStreamExt;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  fn members_page(users: &[&str], next: Option<&str>) -> Value {
    let items: Vec<Value> = users
      .iter()
      .map(|id| json!({"user_id": id, "nickname": format!("nick-{}", id)}))
      .collect();
    json!({
      "data": {
        "members": {
          "items": items,
          "paging": {
            "hasPrev": false,
            "hasNext": next.is_some(),
            "cursors": {"prev": null, "next": next.unwrap_or("stale")}
          }
        }
      }
    })
  }

  #[tokio::test]
  async fn test_chat_accessors() {
    let (client, mock) = testing::client();
    mock.push_json(
      200,
      json!({
        "name": "general",
        "member_count": 0,
        "created_at": 1_600_000_000,
        "freeze": false,
        "cover_url": null,
      }),
    );
    let chat = client.chat("chan_1");

    assert_eq!(chat.name().await.unwrap().as_deref(), Some("general"));
    assert_eq!(chat.member_count().await.unwrap(), Some(0));
    assert_eq!(
      chat.created_at().await.unwrap().map(|t| t.timestamp()),
      Some(1_600_000_000)
    );
    assert!(!chat.is_frozen().await.unwrap());
    assert_eq!(chat.cover_url().await.unwrap(), None);
    assert_eq!(mock.request_count(), 1);
  }

  #[tokio::test]
  async fn test_message_is_lazy() {
    let (client, mock) = testing::client();
    let message = client.chat("chan_1").message("9");

    assert_eq!(message.channel_url(), "chan_1");
    assert_eq!(mock.request_count(), 0);
  }

  #[tokio::test]
  async fn test_members_walk_all_pages() {
    let (client, mock) = testing::client();
    mock.push_json(200, members_page(&["a", "b"], Some("c1")));
    mock.push_json(200, members_page(&["c", "d"], Some("c2")));
    mock.push_json(200, members_page(&["e"], None));

    let members: Vec<Value> = client
      .chat("chan_1")
      .members(2)
      .stream()
      .try_collect()
      .await
      .unwrap();

    let ids: Vec<&str> = members
      .iter()
      .filter_map(|m| m["user_id"].as_str())
      .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0]
      .url
      .ends_with("/group_channels/chan_1/members"));
    assert_eq!(requests[0].param("next"), None);
    assert_eq!(requests[1].param("next"), Some("c1"));
    assert_eq!(requests[2].param("next"), Some("c2"));
    assert!(requests.iter().all(|r| r.param("limit") == Some("2")));
  }

  #[tokio::test]
  async fn test_member_stream_yields_seeded_users() {
    let (client, mock) = testing::client();
    mock.push_json(200, members_page(&["a"], Some("c1")));
    mock.push_json(500, json!({"error": "boom"}));

    let mut stream = client.chat("chan_1").member_stream(PageOptions::new());

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.id(), "a");
    assert_eq!(first.nickname().await.unwrap().as_deref(), Some("nick-a"));

    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(stream.next().await.is_none());
    assert_eq!(mock.request_count(), 2);
  }
}
