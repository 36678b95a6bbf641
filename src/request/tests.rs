//! Tests for request/response value types

use super::*;
use crate::error::Error;
use crate::page::{ApiProblem, Envelope, Meta};
use crate::types::{Method, QueryParams};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

fn params(pairs: &[(&str, &str)]) -> QueryParams {
    let mut query = QueryParams::new();
    for (key, value) in pairs {
        query
            .entry((*key).to_string())
            .or_default()
            .push((*value).to_string());
    }
    query
}

fn page_with_token(token: Option<&str>) -> Envelope {
    Envelope {
        data: Some(serde_json::json!([{"id": "1"}])),
        meta: Some(Meta {
            next_token: token.map(str::to_string),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ============================================================================
// Request Construction
// ============================================================================

#[test]
fn test_request_new() {
    let req = Request::get("https://api.example.com/2/users/42/tweets").unwrap();
    assert_eq!(req.method(), Method::GET);
    assert_eq!(
        req.url().as_str(),
        "https://api.example.com/2/users/42/tweets"
    );
    assert!(req.query().is_empty());
    assert!(req.body().is_none());
    assert_eq!(req.round(), 0);
}

#[test]
fn test_request_invalid_url() {
    let err = Request::get("not a url").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn test_request_moves_url_query_into_params() {
    let req = Request::get("https://api.example.com/search?q=rust&ids=1&ids=2").unwrap();

    assert_eq!(req.url().query(), None);
    assert_eq!(req.query(), &params(&[("ids", "1"), ("ids", "2"), ("q", "rust")]));
}

#[test]
fn test_request_builders() {
    let req = Request::post("https://api.example.com/items")
        .unwrap()
        .with_query_pair("max_results", "100")
        .with_header("X-Trace", "abc")
        .with_json_body(&serde_json::json!({"name": "x"}))
        .unwrap();

    assert_eq!(req.method(), Method::POST);
    assert_eq!(req.query_value("max_results"), Some("100"));
    assert_eq!(req.headers().get("X-Trace"), Some(&"abc".to_string()));
    assert_eq!(
        req.headers().get("Content-Type"),
        Some(&"application/json".to_string())
    );
    assert_eq!(req.body().unwrap().as_ref(), br#"{"name":"x"}"#);
}

#[test]
fn test_full_url_renders_query() {
    let req = Request::get("https://api.example.com/tweets")
        .unwrap()
        .with_query(params(&[("ids", "1"), ("ids", "2"), ("expansions", "author_id")]));

    assert_eq!(
        req.full_url().as_str(),
        "https://api.example.com/tweets?expansions=author_id&ids=1&ids=2"
    );
}

// ============================================================================
// Pagination Primitives
// ============================================================================

#[test]
fn test_merge_query_keeps_unrelated_keys() {
    let mut req = Request::get("https://api.example.com/tweets")
        .unwrap()
        .with_query(params(&[("max_results", "10"), ("tweet.fields", "created_at")]));

    req.merge_query(params(&[("pagination_token", "t1")]));

    assert_eq!(
        req.query(),
        &params(&[
            ("max_results", "10"),
            ("pagination_token", "t1"),
            ("tweet.fields", "created_at"),
        ])
    );
}

#[test]
fn test_merge_query_overwrites_existing_key() {
    let mut req = Request::get("https://api.example.com/tweets")
        .unwrap()
        .with_query(params(&[("pagination_token", "t1")]));

    req.merge_query(params(&[("pagination_token", "t2")]));

    assert_eq!(req.query().get("pagination_token"), Some(&vec!["t2".to_string()]));
}

#[test]
fn test_reset_state_clears_dispatch_metadata() {
    let mut req = Request::get("https://api.example.com/tweets").unwrap();
    req.mark_dispatched(Instant::now());
    req.mark_completed();
    assert!(req.state().dispatched_at.is_some());
    assert!(req.state().elapsed.is_some());

    req.reset_state();
    assert_eq!(req.state(), &RoundState::default());
}

#[test]
fn test_next_round_is_pure() {
    let mut original = Request::get("https://api.example.com/tweets")
        .unwrap()
        .with_query(params(&[("max_results", "10")]));
    original.mark_dispatched(Instant::now());

    let next = original.next_round("pagination_token", "t1");

    // original untouched
    assert_eq!(original.query_value("pagination_token"), None);
    assert!(original.state().dispatched_at.is_some());
    assert_eq!(original.round(), 0);

    assert_eq!(next.query_value("pagination_token"), Some("t1"));
    assert_eq!(next.query_value("max_results"), Some("10"));
    assert_eq!(next.round(), 1);
    assert!(next.state().dispatched_at.is_none());
    assert_eq!(next.url(), original.url());
}

#[test]
fn test_two_rounds_keep_user_keys_and_latest_token() {
    let seed = Request::get("https://api.example.com/users/1/mentions")
        .unwrap()
        .with_query(params(&[("max_results", "5"), ("start_time", "2021-01-01T00:00:00Z")]));

    let second = seed
        .next_round("pagination_token", "t1")
        .next_round("pagination_token", "t2");

    assert_eq!(
        second.query(),
        &params(&[
            ("max_results", "5"),
            ("pagination_token", "t2"),
            ("start_time", "2021-01-01T00:00:00Z"),
        ])
    );
    assert_eq!(second.round(), 2);
}

// ============================================================================
// Response
// ============================================================================

#[test]
fn test_response_from_ok_result() {
    let req = Request::get("https://api.example.com/tweets").unwrap();
    let res = Response::from_result(req, Ok(page_with_token(Some("t1"))));

    assert!(res.is_ok());
    assert!(res.payload().is_some());
    assert_eq!(res.continuation_token(), Some("t1"));
}

#[test]
fn test_response_from_err_result() {
    let req = Request::get("https://api.example.com/tweets").unwrap();
    let res: Response<Envelope> = Response::from_result(req, Err(Error::http_status(503, "")));

    assert!(!res.is_ok());
    assert!(res.payload().is_none());
    assert_eq!(res.continuation_token(), None);
}

#[test]
fn test_response_partial_success_carries_both() {
    let mut page = page_with_token(Some("t9"));
    page.errors.push(ApiProblem {
        title: Some("Authorization Error".to_string()),
        ..Default::default()
    });

    let req = Request::get("https://api.example.com/tweets").unwrap();
    let (request, payload, error) = Response::from_result(req, Ok(page)).into_parts();

    assert_eq!(request.round(), 0);
    assert!(payload.is_some());
    assert!(matches!(error, Some(Error::Api { .. })));
}

#[test]
fn test_response_empty_token_is_none() {
    let req = Request::get("https://api.example.com/tweets").unwrap();
    let res = Response::from_result(req, Ok(page_with_token(Some(""))));
    assert_eq!(res.continuation_token(), None);
}
