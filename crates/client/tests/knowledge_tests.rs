//! Knowledge object reader tests against a mock Splunk server.
//!
//! # Invariants
//! - Every supported category hits its own REST path with `output_mode=json` and `count`
//! - `alerts` reads saved searches filtered by `alert_type=*`
//! - Entries are projected to `{name, title, disabled, app, owner}`
//! - Unknown categories never reach the server

mod common;

use common::*;
use serde_json::json;
use splunk_client::KnowledgeObjectType;
use wiremock::matchers::{method, path, query_param};

#[tokio::test]
async fn test_every_type_uses_its_endpoint() {
    for object_type in KnowledgeObjectType::ALL {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(object_type.endpoint()))
            .and(query_param("output_mode", "json"))
            .and(query_param("count", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"entry": [{"name": format!("{object_type}-1")}]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = http_service(&mock_server, 1);
        let value = serde_json::to_value(
            service
                .get_knowledge_objects(object_type.as_str(), 100)
                .await,
        )
        .unwrap();

        assert_eq!(value["success"], json!(true), "{object_type}: {value}");
        assert_eq!(value["type"], json!(object_type.as_str()));
        assert_eq!(value["count"], json!(1));
        assert_eq!(
            value["objects"][0]["title"],
            json!(format!("{object_type}-1"))
        );
    }
}

#[tokio::test]
async fn test_alerts_filter_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/searches"))
        .and(query_param("search", "alert_type=*"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [{
                "name": "High CPU",
                "content": {"disabled": 1, "alert_type": "number of events"},
                "acl": {"app": "ops", "owner": "nobody"}
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_knowledge_objects("alerts", 5).await).unwrap();

    assert_eq!(
        value,
        json!({
            "success": true,
            "type": "alerts",
            "count": 1,
            "objects": [{
                "name": "High CPU",
                "title": "High CPU",
                "disabled": true,
                "app": "ops",
                "owner": "nobody"
            }]
        })
    );
}

#[tokio::test]
async fn test_disabled_string_forms() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/macros"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entry": [
                {"name": "a", "content": {"disabled": "1"}},
                {"name": "b", "content": {"disabled": "false"}},
                {"name": "c", "content": {"disabled": "true"}},
                {"name": "d", "content": {}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_knowledge_objects("macros", 100).await).unwrap();

    let disabled: Vec<_> = value["objects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["disabled"].as_bool().unwrap())
        .collect();
    assert_eq!(disabled, vec![true, false, true, false]);
}

#[tokio::test]
async fn test_unknown_type_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value =
        serde_json::to_value(service.get_knowledge_objects("event_types", 100).await).unwrap();

    assert_eq!(
        value,
        json!({"success": false, "error": "Unsupported type: event_types"})
    );
}

#[tokio::test]
async fn test_malformed_body_is_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/ui/views"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let service = http_service(&mock_server, 1);
    let value = serde_json::to_value(service.get_knowledge_objects("views", 100).await).unwrap();

    assert_eq!(value["success"], json!(false));
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .contains("/services/data/ui/views")
    );
}
