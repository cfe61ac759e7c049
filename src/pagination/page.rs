//! Normalized page results and the wire shapes they are built from.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{FetchError, FetchResult};

/// Opaque position token issued by the server.
///
/// Servers may issue numeric tokens; they are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl<'de> Deserialize<'de> for Cursor {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
      Text(String),
      Number(serde_json::Number),
    }

    Ok(match Token::deserialize(deserializer)? {
      Token::Text(token) => Cursor(token),
      Token::Number(token) => Cursor(token.to_string()),
    })
  }
}

impl Cursor {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Cursor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// One page of items with the cursors to its neighbours.
///
/// A cursor is present only when the server says the neighbouring page
/// exists. A missing `next` is the end of the walk.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
  pub items: Vec<T>,
  pub prev: Option<Cursor>,
  pub next: Option<Cursor>,
}

impl<T> CursorPage<T> {
  pub fn is_last(&self) -> bool {
    self.next.is_none()
  }

  /// Normalize a raw paged response body.
  ///
  /// The page sits under the body's `data` field, or under `data[key]` when
  /// `key` is given.
  pub fn from_response(body: Value, key: Option<&str>) -> FetchResult<Self>
  where
    T: DeserializeOwned,
  {
    let mut body = body;
    let mut path = String::from("data");
    let mut data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    if let Some(key) = key {
      path.push('.');
      path.push_str(key);
      data = data.get_mut(key).map(Value::take).unwrap_or(Value::Null);
    }

    let raw: RawPage<T> =
      serde_json::from_value(data).map_err(|source| FetchError::Field { key: path, source })?;
    Ok(raw.into())
  }
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RawPage<T> {
  #[serde(default = "Vec::new")]
  pub items: Vec<T>,
  #[serde(default)]
  pub paging: RawPaging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaging {
  #[serde(default)]
  pub has_prev: bool,
  #[serde(default)]
  pub has_next: bool,
  #[serde(default)]
  pub cursors: RawCursors,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCursors {
  pub prev: Option<Cursor>,
  pub next: Option<Cursor>,
}

impl<T> From<RawPage<T>> for CursorPage<T> {
  fn from(raw: RawPage<T>) -> Self {
    let RawPaging {
      has_prev,
      has_next,
      cursors,
    } = raw.paging;

    // The flags decide; a token flagged inactive is dropped
    Self {
      items: raw.items,
      prev: cursors.prev.filter(|_| has_prev),
      next: cursors.next.filter(|_| has_next),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn test_inactive_next_cursor_is_dropped() {
    let body = json!({
      "data": {
        "items": [1, 2],
        "paging": {"hasPrev": false, "hasNext": false, "cursors": {"prev": "P", "next": "X"}}
      }
    });

    let page = CursorPage::<u32>::from_response(body, None).unwrap();
    assert_eq!(page.items, vec![1, 2]);
    assert_eq!(page.prev, None);
    assert_eq!(page.next, None);
    assert!(page.is_last());
  }

  #[test]
  fn test_active_cursors_are_kept() {
    let body = json!({
      "data": {
        "items": [],
        "paging": {"hasPrev": true, "hasNext": true, "cursors": {"prev": "P", "next": "N"}}
      }
    });

    let page = CursorPage::<u32>::from_response(body, None).unwrap();
    assert_eq!(page.prev, Some(Cursor::new("P")));
    assert_eq!(page.next, Some(Cursor::new("N")));
  }

  #[test]
  fn test_has_next_without_token_is_last() {
    let body = json!({
      "data": {"items": [1], "paging": {"hasNext": true, "cursors": {}}}
    });

    let page = CursorPage::<u32>::from_response(body, None).unwrap();
    assert!(page.is_last());
  }

  #[test]
  fn test_numeric_cursor_is_kept_as_text() {
    let body = json!({
      "data": {"items": [1], "paging": {"hasNext": true, "cursors": {"next": 12345}}}
    });

    let page = CursorPage::<u32>::from_response(body, None).unwrap();
    assert_eq!(page.next, Some(Cursor::new("12345")));
  }

  #[test]
  fn test_nested_key() {
    let body = json!({
      "data": {
        "members": {
          "items": [{"user_id": "a"}],
          "paging": {"hasPrev": false, "hasNext": true, "cursors": {"next": "N"}}
        }
      }
    });

    let page = CursorPage::<Value>::from_response(body, Some("members")).unwrap();
    assert_eq!(page.items, vec![json!({"user_id": "a"})]);
    assert_eq!(page.next.as_ref().map(Cursor::as_str), Some("N"));
  }

  #[test]
  fn test_missing_nested_key_is_an_error() {
    let body = json!({"data": {"items": []}});

    let err = CursorPage::<Value>::from_response(body, Some("members")).unwrap_err();
    assert!(matches!(err, FetchError::Field { ref key, .. } if key == "data.members"));
  }
}
