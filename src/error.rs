//! Error types surfaced by the object cache and the pagination engine.

use thiserror::Error;

/// Failure of the HTTP layer itself.
///
/// A response with a non-2xx status is *not* a transport error; it comes back
/// as an ordinary response and is classified by the caller.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("request to {url} failed: {source}")]
  Network {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("response from {url} is not valid JSON: {source}")]
  InvalidBody {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Failure of a single remote read: an entity refresh or one page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error("{url} responded with status {status}")]
  Status {
    url: String,
    status: u16,
    body: serde_json::Value,
  },

  #[error("{url} returned {found} where a JSON object was expected")]
  NotAnObject { url: String, found: &'static str },

  #[error("failed to resolve request headers: {0}")]
  Headers(String),

  #[error("field '{key}' has an unexpected shape: {source}")]
  Field {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("document has no usable '{0}' identifier")]
  MissingId(String),
}

impl FetchError {
  /// Status code of an unsuccessful response, if that is what this is.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
  use serde_json::Value;
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

pub type FetchResult<T> = Result<T, FetchError>;
