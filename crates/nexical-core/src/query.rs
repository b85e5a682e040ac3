//! Nested filter serialization for query strings.
//!
//! Filter objects are flattened depth-first in insertion order. Nested
//! object keys are joined with [`KEY_DELIMITER`], arrays collapse into a
//! single comma-joined value, and `null` entries are dropped:
//!
//! ```rust
//! use nexical_core::query::build_query;
//! use serde_json::json;
//!
//! let query = build_query(&json!({
//!     "user": { "name": "John", "profile": { "age": 30 } },
//!     "tags": ["a", "b"],
//!     "deleted": null,
//! }))
//! .unwrap();
//!
//! assert_eq!(query, "?user__name=John&user__profile__age=30&tags=a%2Cb");
//! ```
//!
//! Any `Serialize` type works as a filter tree, so typed filter structs with
//! `Option` fields serialize their `None`s as `null` and drop out the same way.
//! Owned serde values cannot contain reference cycles.

use crate::value::to_query_string;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

/// Delimiter placed between a parent key and a nested key.
pub const KEY_DELIMITER: &str = "__";

/// Errors raised while turning filters into query parameters.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The filters serialized to something other than an object.
    #[error("Query filters must serialize to an object, got {0}")]
    NotAnObject(&'static str),

    /// The filters could not be serialized at all.
    #[error("Failed to serialize query filters: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flatten a filter tree into ordered key/value pairs.
///
/// A top-level `null` (for example `()` or `None`) is treated as an empty
/// filter set.
///
/// # Errors
///
/// Returns [`QueryError::NotAnObject`] when the filters serialize to a
/// scalar or array, and [`QueryError::Serialization`] when serialization fails.
pub fn flatten_query<T>(filters: &T) -> Result<Vec<(String, String)>, QueryError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(filters)? {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            let mut pairs = Vec::new();
            flatten_into(&mut pairs, None, &map);
            Ok(pairs)
        }
        other => Err(QueryError::NotAnObject(kind_of(&other))),
    }
}

fn flatten_into(pairs: &mut Vec<(String, String)>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}{KEY_DELIMITER}{key}"),
            None => key.clone(),
        };

        match value {
            Value::Null => {}
            Value::Object(nested) => flatten_into(pairs, Some(&full_key), nested),
            scalar_or_array => pairs.push((full_key, to_query_string(scalar_or_array))),
        }
    }
}

/// Form-urlencode pairs as `key=value` joined by `&`, without a leading `?`.
pub fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Build a query string from a filter tree.
///
/// Returns an empty string when no pairs survive flattening, otherwise the
/// encoded pairs prefixed with `?`.
///
/// # Errors
///
/// See [`flatten_query`].
pub fn build_query<T>(filters: &T) -> Result<String, QueryError>
where
    T: Serialize + ?Sized,
{
    let pairs = flatten_query(filters)?;
    if pairs.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("?{}", encode_query(&pairs)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::empty(json!({}), "")]
    #[case::scalars(json!({"foo": "bar", "baz": 123}), "?foo=bar&baz=123")]
    #[case::insertion_order(json!({"b": "x", "a": 1}), "?b=x&a=1")]
    #[case::nested(
        json!({"user": {"name": "John", "profile": {"age": 30}}, "active": true}),
        "?user__name=John&user__profile__age=30&active=true"
    )]
    #[case::nulls_dropped(json!({"foo": "bar", "baz": null, "empty": ""}), "?foo=bar&empty=")]
    #[case::arrays(json!({"tags": ["a", "b", "c"]}), "?tags=a%2Cb%2Cc")]
    #[case::mixed(
        json!({"where": {"status": "active", "type": "user"}, "orderBy": "createdAt", "limit": 10}),
        "?where__status=active&where__type=user&orderBy=createdAt&limit=10"
    )]
    #[case::falsy_scalars_kept(json!({"zero": 0, "off": false}), "?zero=0&off=false")]
    #[case::exponent_floats(json!({"a": 1e21, "b": 1e-7}), "?a=1e%2B21&b=1e-7")]
    #[case::empty_nested(json!({"where": {}}), "")]
    #[case::only_nulls(json!({"a": null, "b": {"c": null}}), "")]
    fn test_build_query(#[case] filters: Value, #[case] expected: &str) {
        assert_eq!(build_query(&filters).unwrap(), expected);
    }

    #[test]
    fn test_values_are_form_encoded() {
        let query = build_query(&json!({"q": "hello world", "path": "a/b&c=d"})).unwrap();
        assert_eq!(query, "?q=hello+world&path=a%2Fb%26c%3Dd");
    }

    #[test]
    fn test_keys_are_form_encoded() {
        let query = build_query(&json!({"sort by": {"field name": "x"}})).unwrap();
        assert_eq!(query, "?sort+by__field+name=x");
    }

    #[test]
    fn test_flatten_pairs() {
        let pairs = flatten_query(&json!({"where": {"id": 5}, "ids": [1, 2]})).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("where__id".to_string(), "5".to_string()),
                ("ids".to_string(), "1,2".to_string()),
            ]
        );
    }

    #[test]
    fn test_typed_filters() {
        #[derive(Serialize)]
        struct Profile {
            verified: bool,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct UserFilters {
            role: Option<String>,
            profile: Profile,
            order_by: Option<&'static str>,
        }

        let filters = UserFilters {
            role: None,
            profile: Profile { verified: true },
            order_by: Some("createdAt"),
        };

        assert_eq!(
            build_query(&filters).unwrap(),
            "?profile__verified=true&orderBy=createdAt"
        );
    }

    #[test]
    fn test_unit_is_empty() {
        assert_eq!(build_query(&()).unwrap(), "");
        assert_eq!(build_query(&None::<Value>).unwrap(), "");
    }

    #[test]
    fn test_non_object_rejected() {
        let err = build_query(&json!(["a"])).unwrap_err();
        assert!(matches!(err, QueryError::NotAnObject("an array")));

        let err = build_query(&42).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query filters must serialize to an object, got a number"
        );
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query::<&str, &str>(&[]), "");
        assert_eq!(encode_query(&[("a", "1"), ("b", "x y")]), "a=1&b=x+y");
    }
}
