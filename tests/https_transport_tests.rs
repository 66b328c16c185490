use std::time::Duration;

use navability_sdk::services::{self, VariableFilter};
use navability_sdk::{
    Client, EnvelopePolicy, GraphqlRequest, HttpsTransport, SdkConfig, SdkError, Transport,
    TransportError, Variable, VariableType,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_posts_query_and_returns_data() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "query": "query { ping }",
            "variables": {"id": 1},
            "operationName": "ping"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ping": "pong"}})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpsTransport::new(server.uri())?;
    let request =
        GraphqlRequest::new("query { ping }", json!({"id": 1})).with_operation_name("ping");
    let data = transport.query(request).await?;
    assert_eq!(data, json!({"ping": "pong"}));
    Ok(())
}

#[tokio::test]
async fn test_graphql_errors_surface() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Cannot query field \"foo\" on type \"Query\"",
                        "locations": [{"line": 1, "column": 9}]}]
        })))
        .mount(&server)
        .await;

    let transport = HttpsTransport::new(server.uri())?;
    match transport.query(GraphqlRequest::new("query { foo }", json!({}))).await {
        Err(TransportError::GraphqlErrors(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.contains("foo"));
            assert_eq!(errors[0].locations[0].line, 1);
        }
        other => panic!("expected GraphQL errors, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_http_status_errors_keep_body() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let transport = HttpsTransport::new(server.uri())?;
    match transport.mutate(GraphqlRequest::new("mutation { x }", json!({}))).await {
        Err(TransportError::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected HTTP status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_data_is_protocol_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let transport = HttpsTransport::new(server.uri())?;
    let result = transport.query(GraphqlRequest::new("query { x }", json!({}))).await;
    assert!(matches!(result, Err(TransportError::Protocol(_))), "got {:?}", result);
    Ok(())
}

#[tokio::test]
async fn test_request_timeout() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = HttpsTransport::with_options(server.uri(), Duration::from_millis(50), None)?;
    let result = transport.query(GraphqlRequest::new("query { x }", json!({}))).await;
    assert!(matches!(result, Err(TransportError::Timeout(_))), "got {:?}", result);
    Ok(())
}

#[tokio::test]
async fn test_bearer_token_sent() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .expect(1)
        .mount(&server)
        .await;

    let transport =
        HttpsTransport::with_options(server.uri(), Duration::from_secs(5), Some("secret-token"))?;
    assert_eq!(
        transport.query(GraphqlRequest::new("query { ok }", json!({}))).await?,
        json!({"ok": true})
    );
    Ok(())
}

#[tokio::test]
async fn test_services_over_https() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "sdk_add_variable"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"addVariable": "req-1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "sdk_get_variables"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"users": [{"robots": [{"sessions": [{
                "variables": [{"label": "x0", "tags": ["VARIABLE"]}]
            }]}]}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SdkConfig {
        api_url: Some(server.uri()),
        ..SdkConfig::default()
    };
    let transport = HttpsTransport::from_config(&config)?;
    let client = Client::new("u", "r", "s");

    let variable = Variable::new("x0", VariableType::Point2);
    let ack = services::add_variable(&transport, &client, &variable).await?;
    assert_eq!(ack, json!({"addVariable": "req-1"}));

    let labels =
        services::ls(&transport, &client, &VariableFilter::default(), EnvelopePolicy::Strict)
            .await?;
    assert_eq!(labels, vec!["x0".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let transport = HttpsTransport::with_options("http://127.0.0.1:9", Duration::from_secs(2), None)
        .expect("client builds");
    let result = services::solve_session(&transport, &Client::new("u", "r", "s")).await;
    assert!(matches!(result, Err(SdkError::Transport(_))), "got {:?}", result);
}
