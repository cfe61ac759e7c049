use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::headers::HeaderProvider;
use super::transport::{Method, Transport};
use crate::error::{FetchError, FetchResult};

/// Transport plus header source. Cheap to clone.
#[derive(Clone)]
pub struct Requester {
  transport: Arc<dyn Transport>,
  headers: Arc<dyn HeaderProvider>,
}

impl Requester {
  pub fn new(transport: Arc<dyn Transport>, headers: Arc<dyn HeaderProvider>) -> Self {
    Self { transport, headers }
  }

  /// GET `url` and return the JSON body of a 2xx response.
  pub async fn get_json(&self, url: &Url, params: &[(String, String)]) -> FetchResult<Value> {
    self.request_json(Method::Get, url, params).await
  }

  /// Send one request and return the JSON body of a 2xx response.
  ///
  /// Any other status becomes [`FetchError::Status`] carrying the body.
  pub async fn request_json(
    &self,
    method: Method,
    url: &Url,
    params: &[(String, String)],
  ) -> FetchResult<Value> {
    let headers = self.headers.headers().await?;

    debug!(%method, %url, params = params.len(), "sending request");
    let response = self.transport.request(method, url, &headers, params).await?;

    if !response.is_success() {
      debug!(%url, status = response.status, "request rejected");
      return Err(FetchError::Status {
        url: url.to_string(),
        status: response.status,
        body: response.data,
      });
    }

    Ok(response.data)
  }
}

impl std::fmt::Debug for Requester {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Requester").finish_non_exhaustive()
  }
}
