use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use super::headers::Headers;
use crate::error::TransportError;

/// Query parameters, in the order they are sent.
pub type Params = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
  #[default]
  Get,
  Post,
  Put,
  Delete,
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Delete => "DELETE",
    };
    f.write_str(name)
  }
}

impl From<Method> for reqwest::Method {
  fn from(method: Method) -> Self {
    match method {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
  pub status: u16,
  pub data: Value,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Performs one HTTP request and decodes the body as JSON.
///
/// Implementations return `Err` only when no response was obtained (or a
/// successful body could not be read); non-2xx responses are `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn request(
    &self,
    method: Method,
    url: &Url,
    headers: &Headers,
    params: &[(String, String)],
  ) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  pub fn new(timeout: Duration) -> reqwest::Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn request(
    &self,
    method: Method,
    url: &Url,
    headers: &Headers,
    params: &[(String, String)],
  ) -> Result<HttpResponse, TransportError> {
    let mut request = self.client.request(method.into(), url.clone()).query(params);
    for (name, value) in headers {
      request = request.header(name.as_str(), value.as_str());
    }

    let network = |source| TransportError::Network {
      url: url.to_string(),
      source,
    };

    let response = request.send().await.map_err(network)?;
    let status = response.status();
    let body = response.bytes().await.map_err(network)?;

    let data = if body.is_empty() {
      Value::Null
    } else {
      match serde_json::from_slice(&body) {
        Ok(data) => data,
        // Error pages are often HTML; keep the text so the status still surfaces
        Err(_) if !status.is_success() => Value::String(String::from_utf8_lossy(&body).into_owned()),
        Err(source) => {
          return Err(TransportError::InvalidBody {
            url: url.to_string(),
            source,
          })
        }
      }
    };

    Ok(HttpResponse {
      status: status.as_u16(),
      data,
    })
  }
}
