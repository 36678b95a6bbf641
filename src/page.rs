//! Payload contract
//!
//! The queue and the pagination driver are agnostic of the payload shape.
//! All they need is the [`Page`] trait: an optional continuation token and
//! an optional protocol-level error embedded in an otherwise valid body.
//!
//! [`Envelope`] covers the common `{ data, includes, meta, errors }` layout
//! where `meta.next_token` carries the cursor for the next page.

use crate::error::Error;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// A decoded page of results
pub trait Page: Send + 'static {
    /// Opaque token to request the next page, if more data may exist
    fn continuation_token(&self) -> Option<&str>;

    /// Error reported by the API alongside (or instead of) data
    fn protocol_error(&self) -> Option<Error> {
        None
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Generic JSON response envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = JsonValue> {
    /// Primary payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Expanded objects referenced by `data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<JsonValue>,

    /// Pagination metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Problems reported by the API
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiProblem>,
}

/// Pagination metadata of an [`Envelope`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newest_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_id: Option<String>,

    /// Token for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token: Option<String>,
}

/// A single problem object returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

impl ApiProblem {
    /// One-line human readable description
    pub fn summary(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{title}: {detail}"),
            (Some(title), None) => title.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => self
                .problem_type
                .clone()
                .unwrap_or_else(|| "unknown problem".to_string()),
        }
    }
}

impl<T> Envelope<T> {
    /// Number of results reported by `meta`, if any
    pub fn result_count(&self) -> Option<u64> {
        self.meta.as_ref().and_then(|m| m.result_count)
    }
}

impl<T: Send + 'static> Page for Envelope<T> {
    fn continuation_token(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.next_token.as_deref())
            .filter(|t| !t.is_empty())
    }

    fn protocol_error(&self) -> Option<Error> {
        if self.errors.is_empty() {
            None
        } else {
            Some(Error::api(self.errors.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_continuation_token() {
        let page: Envelope = serde_json::from_value(json!({
            "data": [{"id": "1"}],
            "meta": {"result_count": 1, "next_token": "t1"}
        }))
        .unwrap();

        assert_eq!(page.continuation_token(), Some("t1"));
        assert_eq!(page.result_count(), Some(1));
        assert!(page.protocol_error().is_none());
    }

    #[test]
    fn test_envelope_empty_token_is_absent() {
        let page: Envelope = serde_json::from_value(json!({
            "data": [],
            "meta": {"next_token": ""}
        }))
        .unwrap();
        assert_eq!(page.continuation_token(), None);

        let page: Envelope = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(page.continuation_token(), None);
    }

    #[test]
    fn test_envelope_partial_errors() {
        let page: Envelope = serde_json::from_value(json!({
            "data": [{"id": "1"}],
            "errors": [{
                "title": "Not Found Error",
                "detail": "Could not find tweet with ids: [2].",
                "type": "https://api.example.com/problems/resource-not-found",
                "parameter": "ids",
                "value": "2"
            }]
        }))
        .unwrap();

        assert!(page.data.is_some());
        let err = page.protocol_error().unwrap();
        match err {
            Error::Api { problems } => {
                assert_eq!(problems.len(), 1);
                assert_eq!(problems[0].parameter.as_deref(), Some("ids"));
                assert_eq!(
                    problems[0].problem_type.as_deref(),
                    Some("https://api.example.com/problems/resource-not-found")
                );
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_envelope() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            id: String,
            text: String,
        }

        let page: Envelope<Vec<Item>> = serde_json::from_value(json!({
            "data": [{"id": "10", "text": "hello"}]
        }))
        .unwrap();

        assert_eq!(
            page.data,
            Some(vec![Item {
                id: "10".to_string(),
                text: "hello".to_string()
            }])
        );
    }

    #[test]
    fn test_problem_summary() {
        let problem = ApiProblem {
            detail: Some("Too Many Requests".to_string()),
            ..Default::default()
        };
        assert_eq!(problem.summary(), "Too Many Requests");
        assert_eq!(ApiProblem::default().summary(), "unknown problem");
    }
}
