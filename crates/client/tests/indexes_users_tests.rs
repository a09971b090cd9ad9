//! Index and user helper tests against a mock Splunk server.
//!
//! # Invariants
//! - Listings request `count=0` so Splunk returns every entry
//! - Index names come back in server order, identically on repeated calls
//! - Usernames are percent-encoded as a single path segment
//! - Failures are envelopes, never errors

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};

#[tokio::test]
async fn test_get_indexes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/indexes"))
        .and(query_param("output_mode", "json"))
        .and(query_param("count", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [
                {"name": "main", "content": {"totalEventCount": 100}},
                {"name": "_audit", "content": {"totalEventCount": 5}},
                {"name": "firewall", "content": {}}
            ]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let first = serde_json::to_value(service.get_indexes().await).unwrap();
    let second = serde_json::to_value(service.get_indexes().await).unwrap();

    assert_eq!(
        first,
        json!({"success": true, "indexes": ["main", "_audit", "firewall"], "count": 3})
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_get_indexes_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/indexes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "messages": [{"type": "ERROR", "text": "Internal error"}]
        })))
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_indexes().await).unwrap();

    assert_eq!(value["success"], json!(false));
    assert!(value["error"].as_str().unwrap().contains("Internal error"));
}

#[tokio::test]
async fn test_get_all_users() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/authentication/users"))
        .and(query_param("count", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [{"name": "admin"}, {"name": "analyst"}]
        })))
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_all_users().await).unwrap();

    assert_eq!(
        value,
        json!({"success": true, "usernames": ["admin", "analyst"], "count": 2})
    );
}

#[tokio::test]
async fn test_get_user_info_encodes_username() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/authentication/users/CORP%5Cjohn%20doe"))
        .and(query_param("output_mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [{
                "name": "CORP\\john doe",
                "content": {"realname": "John Doe", "roles": ["user"]}
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_user_info("CORP\\john doe").await).unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["username"], json!("CORP\\john doe"));
    assert_eq!(value["user"]["content"]["realname"], json!("John Doe"));
}

#[tokio::test]
async fn test_get_user_info_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/authentication/users/nobody"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "messages": [{"type": "ERROR", "text": "User does not exist: nobody"}]
        })))
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_user_info("nobody").await).unwrap();

    assert_eq!(value["success"], json!(false));
    assert_eq!(value["username"], json!("nobody"));
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .contains("User does not exist")
    );
}
