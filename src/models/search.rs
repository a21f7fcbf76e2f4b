//! Ad search payloads: rows, batches, paging cursor and response shapes.

use serde_json::{Map, Value};

use crate::error::preview;
use crate::{Error, Result};

/// One search row. The row schema is defined by the portal and kept opaque.
pub type Record = Map<String, Value>;

/// The rows of one page, in server order.
pub type RecordBatch = Vec<Record>;

/// Keys under which a keyed response may carry its rows, in priority order.
pub const ROW_KEYS: [&str; 3] = ["adBookDatas", "items", "data"];

/// Name of the paging object inside a search body.
pub const PAGING_PARAMS: &str = "pagingParams";

/// The `take`/`skip` cursor embedded in a search request body.
///
/// A body looks like `{"pagingParams": {"take": 100, "skip": 0}, "filter": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingParams {
    /// Page size
    pub take: u64,
    /// Offset of the first row of the page
    pub skip: u64,
}

impl PagingParams {
    /// Read the cursor from a search body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `pagingParams.take` is missing or not a
    /// positive integer, or `pagingParams.skip` is missing or not a
    /// non-negative integer.
    pub fn read(body: &Value) -> Result<Self> {
        let params = body
            .get(PAGING_PARAMS)
            .and_then(Value::as_object)
            .ok_or_else(|| Error::InvalidInput(format!("search body has no `{PAGING_PARAMS}` object")))?;

        let take = params
            .get("take")
            .and_then(Value::as_u64)
            .filter(|take| *take > 0)
            .ok_or_else(|| {
                Error::InvalidInput(format!("`{PAGING_PARAMS}.take` must be a positive integer"))
            })?;
        let skip = params.get("skip").and_then(Value::as_u64).ok_or_else(|| {
            Error::InvalidInput(format!("`{PAGING_PARAMS}.skip` must be a non-negative integer"))
        })?;

        Ok(Self { take, skip })
    }

    /// Cursor for the page after this one, `None` if the offset would overflow.
    pub fn next(self) -> Option<Self> {
        self.skip.checked_add(self.take).map(|skip| Self {
            take: self.take,
            skip,
        })
    }

    /// Write this cursor back into a search body, leaving every other field alone.
    pub(crate) fn write(self, body: &mut Value) {
        if let Some(params) = body.get_mut(PAGING_PARAMS).and_then(Value::as_object_mut) {
            params.insert("take".to_string(), Value::from(self.take));
            params.insert("skip".to_string(), Value::from(self.skip));
        }
    }

    /// Whether a page of `rows` rows may be followed by another page.
    pub fn is_full_page(&self, rows: usize) -> bool {
        rows as u64 >= self.take
    }
}

/// A search response after shape detection.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPayload {
    /// The body was a bare array of rows.
    Rows(Vec<Value>),
    /// The body was an object that may carry rows under one of [`ROW_KEYS`].
    Keyed(Map<String, Value>),
}

impl SearchPayload {
    /// Parse a raw response body.
    ///
    /// Accepts a JSON array, a JSON object, or a JSON string whose content is
    /// itself an array or object (double-encoded bodies).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponseType`] for anything else.
    pub fn parse(text: &str) -> Result<Self> {
        let value = match serde_json::from_str::<Value>(text) {
            Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner).map_err(|_| {
                Error::UnexpectedResponseType {
                    observed: format!("string ({})", preview(&inner)),
                }
            })?,
            Ok(value) => value,
            Err(_) => {
                return Err(Error::UnexpectedResponseType {
                    observed: format!("non-JSON text ({})", preview(text)),
                })
            }
        };
        Self::from_value(value)
    }

    /// Classify an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(rows) => Ok(SearchPayload::Rows(rows)),
            Value::Object(map) => Ok(SearchPayload::Keyed(map)),
            other => Err(Error::UnexpectedResponseType {
                observed: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Extract the page rows.
    ///
    /// For keyed payloads the first key of [`ROW_KEYS`] holding a non-empty
    /// value wins; when none does the page is empty.
    pub fn into_rows(self) -> Result<RecordBatch> {
        match self {
            SearchPayload::Rows(rows) => into_records(rows),
            SearchPayload::Keyed(mut map) => {
                for key in ROW_KEYS {
                    match map.remove(key) {
                        Some(value) if is_blank(&value) => continue,
                        Some(Value::Array(rows)) => return into_records(rows),
                        Some(other) => {
                            return Err(Error::UnexpectedResponseType {
                                observed: format!("{} under `{key}`", json_type_name(&other)),
                            })
                        }
                        None => continue,
                    }
                }
                Ok(Vec::new())
            }
        }
    }
}

fn into_records(rows: Vec<Value>) -> Result<RecordBatch> {
    rows.into_iter()
        .map(|row| match row {
            Value::Object(record) => Ok(record),
            other => Err(Error::UnexpectedResponseType {
                observed: format!("array containing {}", json_type_name(&other)),
            }),
        })
        .collect()
}

// null, false, 0, "" and empty containers
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(text: &str) -> Result<RecordBatch> {
        SearchPayload::parse(text)?.into_rows()
    }

    #[test]
    fn test_bare_array() {
        let batch = rows(r#"[{"serial":"A1"},{"serial":"A2"}]"#).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0]["serial"], "A1");
    }

    #[test]
    fn test_double_encoded_array_matches_raw_array() {
        let raw = r#"[{"serial":"A1"}]"#;
        let encoded = serde_json::to_string(raw).unwrap();
        assert_eq!(rows(&encoded).unwrap(), rows(raw).unwrap());
    }

    #[test]
    fn test_key_priority() {
        let body = json!({
            "adBookDatas": [{"k": "ad"}],
            "items": [{"k": "items"}],
            "data": [{"k": "data"}]
        });
        let batch = rows(&body.to_string()).unwrap();
        assert_eq!(batch[0]["k"], "ad");

        let body = json!({"items": [{"k": "items"}], "data": [{"k": "data"}]});
        let batch = rows(&body.to_string()).unwrap();
        assert_eq!(batch[0]["k"], "items");

        let body = json!({"data": [{"k": "data"}], "total": 1});
        let batch = rows(&body.to_string()).unwrap();
        assert_eq!(batch[0]["k"], "data");
    }

    #[test]
    fn test_empty_or_null_key_falls_through() {
        let body = json!({"adBookDatas": [], "items": null, "data": [{"k": "data"}]});
        let batch = rows(&body.to_string()).unwrap();
        assert_eq!(batch[0]["k"], "data");
    }

    #[test]
    fn test_object_without_row_keys_is_empty_page() {
        assert!(rows(r#"{"total": 0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_bare_number_is_rejected() {
        match rows("42") {
            Err(Error::UnexpectedResponseType { observed }) => assert_eq!(observed, "number"),
            other => panic!("expected UnexpectedResponseType, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_text_is_rejected() {
        match rows("<html>502 Bad Gateway</html>") {
            Err(Error::UnexpectedResponseType { observed }) => {
                assert!(observed.starts_with("non-JSON text"))
            }
            other => panic!("expected UnexpectedResponseType, got {other:?}"),
        }
    }

    #[test]
    fn test_string_wrapping_a_scalar_is_rejected() {
        assert!(matches!(
            rows(r#""7""#),
            Err(Error::UnexpectedResponseType { .. })
        ));
    }

    #[test]
    fn test_rows_must_be_objects() {
        assert!(matches!(
            rows("[1, 2]"),
            Err(Error::UnexpectedResponseType { .. })
        ));
    }

    #[test]
    fn test_paging_params_read_and_advance() {
        let mut body = json!({"pagingParams": {"take": 2, "skip": 0}, "filter": {"x": 1}});
        let cursor = PagingParams::read(&body).unwrap();
        assert_eq!(cursor, PagingParams { take: 2, skip: 0 });
        assert!(cursor.is_full_page(2));
        assert!(!cursor.is_full_page(1));

        cursor.next().unwrap().write(&mut body);
        assert_eq!(body["pagingParams"]["skip"], 2);
        assert_eq!(body["filter"]["x"], 1);
    }

    #[test]
    fn test_next_cursor_at_offset_limit() {
        let cursor = PagingParams { take: 2, skip: u64::MAX - 2 };
        assert_eq!(cursor.next(), Some(PagingParams { take: 2, skip: u64::MAX }));
        assert_eq!(PagingParams { take: 2, skip: u64::MAX - 1 }.next(), None);
    }

    #[test]
    fn test_paging_params_rejects_bad_cursor() {
        assert!(PagingParams::read(&json!({"filter": {}})).is_err());
        assert!(PagingParams::read(&json!({"pagingParams": {"take": 0, "skip": 0}})).is_err());
        assert!(PagingParams::read(&json!({"pagingParams": {"take": 5}})).is_err());
        assert!(PagingParams::read(&json!({"pagingParams": {"take": 5, "skip": -1}})).is_err());
    }
}
