//! HTTP transport tests against a local mock server

use graphql_door::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> DoorClientConfig {
    DoorClientConfig::builder()
        .endpoint(format!("{}/graphql", server.uri()))
        .header("x-tenant", "acme")
        .build()
}

#[tokio::test]
async fn test_query_many_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("x-tenant", "acme"))
        .and(header("authorization", "Bearer abc"))
        .and(body_partial_json(json!({
            "variables": { "queryParams": { "query": "status:open" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "invoice": { "queryMany": [{ "id": "1" }, { "id": "2" }] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DoorClient::with_config(config_for(&server))
        .unwrap()
        .with_token(TokenSource::fixed("abc"));

    let invoices: Vec<Value> = client
        .query_many("Invoice", &QueryParamsInput::new().query("status:open"), &["id"])
        .await
        .unwrap();

    assert_eq!(invoices, vec![json!({ "id": "1" }), json!({ "id": "2" })]);
}

#[tokio::test]
async fn test_graphql_errors_are_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Cannot query field \"queryMany\"" }]
        })))
        .mount(&server)
        .await;

    let client = DoorClient::with_config(config_for(&server)).unwrap();
    let err = client.count("Invoice", "").await.unwrap_err();

    assert!(err.is_graphql_error());
    assert_eq!(err.graphql_errors().map(|e| e.len()), Some(1));
}

#[tokio::test]
async fn test_http_status_errors_are_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = DoorClient::with_config(config_for(&server)).unwrap();
    let err = client.delete("Invoice", "1").await.unwrap_err();

    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_transport_returns_data_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "query": "query { invoice { latest { id } } }" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "invoice": { "latest": { "id": "5" } } }
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    let data = transport
        .request("query { invoice { latest { id } } }", Value::Null, &[])
        .await
        .unwrap();

    assert_eq!(data, json!({ "invoice": { "latest": { "id": "5" } } }));
}
