use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::{document_id, Chat, ChatClient, ChatUser};
use crate::cache::{LazyObject, RemoteEntity};
use crate::error::{json_type_name, FetchError, FetchResult};

/// Plain text messages report this `type`; anything else carries a file.
const TEXT_TYPE: &str = "MESG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
  Text,
  File,
}

impl MessageKind {
  fn from_type(message_type: Option<&str>) -> Self {
    match message_type {
      Some(TEXT_TYPE) => MessageKind::Text,
      _ => MessageKind::File,
    }
  }
}

/// A message sent by a user in a chat.
#[derive(Debug)]
pub struct Message {
  object: LazyObject,
  channel_url: String,
  client: ChatClient,
}

impl RemoteEntity for Message {
  const KIND: &'static str = "message";

  fn object(&self) -> &LazyObject {
    &self.object
  }
}

impl Message {
  pub(crate) fn new(client: ChatClient, channel_url: &str, id: &str) -> Self {
    let url = client.message_url(channel_url, id);
    let object = LazyObject::new(id, url, client.requester().clone());
    Self {
      object,
      channel_url: channel_url.to_string(),
      client,
    }
  }

  /// URL of the channel this message was addressed through.
  pub fn channel_url(&self) -> &str {
    &self.channel_url
  }

  /// Text content of this message.
  pub async fn content(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("message").await
  }

  /// The author, seeded with the user document embedded in the message.
  pub async fn author(&self) -> FetchResult<ChatUser> {
    match self.object.get("user", Value::Null).await? {
      Value::Object(document) => {
        let user_id = document_id(&document, "user_id")?;
        let channel_url = self.chat_url().await?;
        Ok(ChatUser::seeded(
          self.client.clone(),
          &user_id,
          &channel_url,
          document,
        ))
      }
      Value::Null => Err(FetchError::MissingId("user".to_string())),
      other => Err(FetchError::NotAnObject {
        url: self.object.url().to_string(),
        found: json_type_name(&other),
      }),
    }
  }

  /// The chat this message was sent in. The chat is not fetched.
  pub async fn chat(&self) -> FetchResult<Chat> {
    let channel_url = self.chat_url().await?;
    Ok(self.client.chat(&channel_url))
  }

  async fn chat_url(&self) -> FetchResult<String> {
    Ok(
      self
        .object
        .get_optional::<String>("channel_url")
        .await?
        .unwrap_or_else(|| self.channel_url.clone()),
    )
  }

  /// When the message was received, in whole seconds since the epoch.
  pub async fn received_at(&self) -> FetchResult<Option<i64>> {
    let millis = self.object.get_optional::<i64>("ts").await?;
    Ok(millis.map(|ms| ms / 1000))
  }

  pub async fn received_at_utc(&self) -> FetchResult<Option<DateTime<Utc>>> {
    let seconds = self.received_at().await?;
    Ok(seconds.and_then(|secs| DateTime::from_timestamp(secs, 0)))
  }

  pub async fn kind(&self) -> FetchResult<MessageKind> {
    let message_type = self.object.get_optional::<String>("type").await?;
    Ok(MessageKind::from_type(message_type.as_deref()))
  }

  /// MIME type of the attached file, if any.
  pub async fn file_mime(&self) -> FetchResult<Option<String>> {
    let message_type = self.object.get_optional::<String>("type").await?;
    Ok(message_type.filter(|t| t != TEXT_TYPE))
  }

  /// Metadata about the attached file; `{}` when there is none.
  pub async fn file_meta(&self) -> FetchResult<Value> {
    self.object.get("file", json!({})).await
  }

  pub async fn file_url(&self) -> FetchResult<Option<String>> {
    self.file_meta_str("url").await
  }

  pub async fn file_name(&self) -> FetchResult<Option<String>> {
    self.file_meta_str("name").await
  }

  async fn file_meta_str(&self, key: &str) -> FetchResult<Option<String>> {
    let meta = self.file_meta().await?;
    Ok(meta.get(key).and_then(Value::as_str).map(String::from))
  }

  pub async fn msg_id(&self) -> FetchResult<Option<i64>> {
    self.object.get_optional("msg_id").await
  }

  pub async fn channel_type(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("channel_type").await
  }

  pub async fn channel_id(&self) -> FetchResult<Option<i64>> {
    self.object.get_optional("channel_id").await
  }

  pub async fn is_guest_msg(&self) -> FetchResult<Option<bool>> {
    self.object.get_optional("is_guest_msg").await
  }

  pub async fn is_removed(&self) -> FetchResult<Option<bool>> {
    self.object.get_optional("is_removed").await
  }

  pub async fn sts(&self) -> FetchResult<Option<i64>> {
    self.object.get_optional("sts").await
  }

  pub async fn custom_type(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("custom_type").await
  }

  pub async fn mention_type(&self) -> FetchResult<Option<String>> {
    self.object.get_optional("mention_type").await
  }

  pub async fn mentioned_users(&self) -> FetchResult<Vec<Value>> {
    Ok(
      self
        .object
        .get_optional("mentioned_users")
        .await?
        .unwrap_or_default(),
    )
  }

  pub async fn is_op_msg(&self) -> FetchResult<Option<bool>> {
    self.object.get_optional("is_op_msg").await
  }

  pub async fn is_super(&self) -> FetchResult<Option<bool>> {
    self.object.get_optional("is_super").await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chat::testing;

  fn text_message() -> Value {
    json!({
      "msg_id": 42,
      "message": "hello",
      "type": "MESG",
      "ts": 1_700_000_123_456i64,
      "channel_url": "chan_1",
      "is_removed": false,
      "user": {"user_id": "u1", "nickname": "ana"},
    })
  }

  #[tokio::test]
  async fn test_text_message_accessors_share_one_fetch() {
    let (client, mock) = testing::client();
    mock.push_json(200, text_message());
    let message = client.message("chan_1", "42");

    assert_eq!(message.content().await.unwrap().as_deref(), Some("hello"));
    assert_eq!(message.kind().await.unwrap(), MessageKind::Text);
    assert_eq!(message.file_mime().await.unwrap(), None);
    assert_eq!(message.received_at().await.unwrap(), Some(1_700_000_123));
    assert_eq!(
      message.received_at_utc().await.unwrap().map(|t| t.timestamp()),
      Some(1_700_000_123)
    );
    assert_eq!(message.msg_id().await.unwrap(), Some(42));
    assert_eq!(message.is_removed().await.unwrap(), Some(false));
    assert_eq!(mock.request_count(), 1);
  }

  #[tokio::test]
  async fn test_file_message() {
    let (client, mock) = testing::client();
    mock.push_json(
      200,
      json!({
        "type": "image/png",
        "file": {"url": "https://cdn.test/a.png", "name": "a.png", "size": 10},
      }),
    );
    let message = client.message("chan_1", "43");

    assert_eq!(message.kind().await.unwrap(), MessageKind::File);
    assert_eq!(
      message.file_mime().await.unwrap().as_deref(),
      Some("image/png")
    );
    assert_eq!(
      message.file_url().await.unwrap().as_deref(),
      Some("https://cdn.test/a.png")
    );
    assert_eq!(message.file_name().await.unwrap().as_deref(), Some("a.png"));
    assert_eq!(mock.request_count(), 1);
  }

  #[tokio::test]
  async fn test_missing_file_meta_falls_back_to_empty() {
    let (client, mock) = testing::client();
    mock.push_json(200, text_message());
    mock.push_json(200, text_message());
    let message = client.message("chan_1", "42");

    // "file" is absent, so every read of it fetches and falls back
    assert_eq!(message.file_meta().await.unwrap(), json!({}));
    assert_eq!(message.file_url().await.unwrap(), None);
    assert_eq!(mock.request_count(), 2);
  }

  #[tokio::test]
  async fn test_author_is_seeded_from_message() {
    let (client, mock) = testing::client();
    mock.push_json(200, text_message());
    let message = client.message("chan_1", "42");

    let author = message.author().await.unwrap();
    assert_eq!(author.id(), "u1");
    assert_eq!(author.channel_url(), "chan_1");
    assert_eq!(author.nickname().await.unwrap().as_deref(), Some("ana"));
    assert_eq!(mock.request_count(), 1);
  }

  #[tokio::test]
  async fn test_author_without_user_document() {
    let (client, mock) = testing::client();
    mock.push_json(200, json!({"message": "system"}));
    let message = client.message("chan_1", "1");

    let err = message.author().await.unwrap_err();
    assert!(matches!(err, FetchError::MissingId(ref key) if key == "user"));
  }

  #[tokio::test]
  async fn test_chat_uses_channel_url_field() {
    let (client, mock) = testing::client();
    mock.push_json(200, json!({"channel_url": "other_chan"}));
    let message = client.message("chan_1", "42");

    let chat = message.chat().await.unwrap();
    assert_eq!(chat.id(), "other_chan");
    assert_eq!(mock.request_count(), 1);
  }
}
