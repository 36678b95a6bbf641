//! Tests for CLI module

use super::runner::{parse_headers, parse_query};
use super::*;
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_fetch() {
    let cli = Cli::try_parse_from([
        "pagequeue",
        "fetch",
        "https://api.example.com/2/users/42/tweets",
        "-q",
        "max_results=10",
        "-H",
        "Authorization: Bearer abc",
        "--halt-on-error",
        "--max-pages",
        "3",
        "--interval-ms",
        "250",
    ])
    .unwrap();

    match cli.command {
        Commands::Fetch {
            call,
            no_auto,
            halt_on_error,
            max_pages,
        } => {
            assert_eq!(call.url, "https://api.example.com/2/users/42/tweets");
            assert_eq!(call.query, vec!["max_results=10".to_string()]);
            assert_eq!(call.header, vec!["Authorization: Bearer abc".to_string()]);
            assert_eq!(call.interval_ms, Some(250));
            assert!(!no_auto);
            assert!(halt_on_error);
            assert_eq!(max_pages, Some(3));
        }
        other => panic!("Expected Fetch, got {other:?}"),
    }
    assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "pagequeue",
        "validate",
        "-C",
        "client.yaml",
        "--verbose",
        "--format",
        "pretty",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Validate));
    assert_eq!(cli.config.unwrap().to_str(), Some("client.yaml"));
    assert!(cli.verbose);
    assert_eq!(cli.format, OutputFormat::Pretty);
}

#[test]
fn test_get_requires_url() {
    assert!(Cli::try_parse_from(["pagequeue", "get"]).is_err());
}

#[test]
fn test_parse_query_accumulates() {
    let query = parse_query(&[
        "ids=1".to_string(),
        "ids=2".to_string(),
        "expansions=author_id".to_string(),
    ])
    .unwrap();

    assert_eq!(query.get("ids"), Some(&vec!["1".to_string(), "2".to_string()]));
    assert_eq!(query.get("expansions"), Some(&vec!["author_id".to_string()]));
}

#[test]
fn test_parse_query_keeps_equals_in_value() {
    let query = parse_query(&["query=a=b".to_string()]).unwrap();
    assert_eq!(query.get("query"), Some(&vec!["a=b".to_string()]));
}

#[test]
fn test_parse_headers() {
    let headers = parse_headers(&["Authorization: Bearer a:b".to_string()]).unwrap();
    assert_eq!(
        headers,
        vec![("Authorization".to_string(), "Bearer a:b".to_string())]
    );
}

#[test]
fn test_malformed_pairs_rejected() {
    assert!(matches!(
        parse_query(&["novalue".to_string()]),
        Err(Error::InvalidConfigValue { .. })
    ));
    assert!(matches!(
        parse_headers(&[": empty key".to_string()]),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[tokio::test]
async fn test_validate_without_config_fails() {
    let cli = Cli::try_parse_from(["pagequeue", "validate"]).unwrap();
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}
