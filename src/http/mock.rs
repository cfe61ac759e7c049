//! Scripted in-memory transport for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

use super::headers::Headers;
use super::transport::{HttpResponse, Method, Transport};
use crate::error::TransportError;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: Method,
  pub url: String,
  pub headers: Headers,
  pub params: Vec<(String, String)>,
}

impl RecordedRequest {
  pub fn param(&self, name: &str) -> Option<&str> {
    self
      .params
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }
}

enum Reply {
  Response(HttpResponse),
  Failure,
}

/// Replies with queued responses in order and records every request.
///
/// A request with nothing left in the queue panics.
#[derive(Default)]
pub struct MockTransport {
  replies: Mutex<VecDeque<Reply>>,
  requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_json(&self, status: u16, data: Value) {
    self
      .replies
      .lock()
      .unwrap()
      .push_back(Reply::Response(HttpResponse { status, data }));
  }

  /// Queue a transport-level failure (no usable response).
  pub fn push_failure(&self) {
    self.replies.lock().unwrap().push_back(Reply::Failure);
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.lock().unwrap().clone()
  }

  pub fn request_count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn request(
    &self,
    method: Method,
    url: &Url,
    headers: &Headers,
    params: &[(String, String)],
  ) -> Result<HttpResponse, TransportError> {
    self.requests.lock().unwrap().push(RecordedRequest {
      method,
      url: url.to_string(),
      headers: headers.clone(),
      params: params.to_vec(),
    });

    let reply = self.replies.lock().unwrap().pop_front();
    match reply {
      Some(Reply::Response(response)) => Ok(response),
      Some(Reply::Failure) => Err(TransportError::InvalidBody {
        url: url.to_string(),
        source: serde_json::from_str::<Value>("{").unwrap_err(),
      }),
      None => panic!("unexpected request to {url}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  #[should_panic(expected = "unexpected request to https://chat.test/a")]
  async fn test_exhausted_queue_panics() {
    let mock = MockTransport::new();
    let url = Url::parse("https://chat.test/a").unwrap();
    let _ = mock
      .request(Method::Get, &url, &Headers::new(), &[])
      .await;
  }

  #[tokio::test]
  async fn test_queued_failure_is_a_transport_error() {
    let mock = MockTransport::new();
    mock.push_failure();
    let url = Url::parse("https://chat.test/a").unwrap();

    let result = mock.request(Method::Get, &url, &Headers::new(), &[]).await;
    assert!(matches!(result, Err(TransportError::InvalidBody { .. })));
    assert_eq!(mock.request_count(), 1);
  }
}
