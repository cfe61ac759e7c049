use async_trait::async_trait;
use reqwest::header::HeaderValue;
use std::collections::BTreeMap;

use crate::error::{FetchError, FetchResult};

pub type Headers = BTreeMap<String, String>;

/// Supplies the headers for each request, resolved right before sending.
#[async_trait]
pub trait HeaderProvider: Send + Sync {
  async fn headers(&self) -> FetchResult<Headers>;
}

/// A fixed set of headers.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(pub Headers);

#[async_trait]
impl HeaderProvider for StaticHeaders {
  async fn headers(&self) -> FetchResult<Headers> {
    Ok(self.0.clone())
  }
}

/// Authenticates every request with a chat session key.
#[derive(Debug, Clone)]
pub struct SessionHeaders {
  session_key: String,
  user_agent: Option<String>,
}

impl SessionHeaders {
  pub fn new(session_key: impl Into<String>) -> Self {
    Self {
      session_key: session_key.into(),
      user_agent: None,
    }
  }

  pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = Some(user_agent.into());
    self
  }
}

#[async_trait]
impl HeaderProvider for SessionHeaders {
  async fn headers(&self) -> FetchResult<Headers> {
    if self.session_key.is_empty() {
      return Err(FetchError::Headers("session key is empty".to_string()));
    }

    let mut headers = Headers::new();
    headers.insert("Session-Key".to_string(), header_value("Session-Key", &self.session_key)?);
    if let Some(agent) = &self.user_agent {
      headers.insert("User-Agent".to_string(), header_value("User-Agent", agent)?);
    }
    Ok(headers)
  }
}

fn header_value(name: &str, value: &str) -> FetchResult<String> {
  HeaderValue::from_str(value)
    .map(|_| value.to_string())
    .map_err(|_| {
      FetchError::Headers(format!("{} contains characters not allowed in a header", name))
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_session_headers() {
    let provider = SessionHeaders::new("abc").with_user_agent("lazychat/0.1");
    let headers = provider.headers().await.unwrap();

    assert_eq!(headers.get("Session-Key").map(String::as_str), Some("abc"));
    assert_eq!(
      headers.get("User-Agent").map(String::as_str),
      Some("lazychat/0.1")
    );
  }

  #[tokio::test]
  async fn test_unusable_session_key_is_rejected() {
    let empty = SessionHeaders::new("").headers().await.unwrap_err();
    assert!(matches!(empty, FetchError::Headers(_)));

    let broken = SessionHeaders::new("abc\ndef").headers().await.unwrap_err();
    assert!(matches!(broken, FetchError::Headers(ref msg) if msg.contains("Session-Key")));
  }

  #[tokio::test]
  async fn test_session_headers_without_agent() {
    let headers = SessionHeaders::new("abc").headers().await.unwrap();
    assert_eq!(headers.len(), 1);
  }
}
