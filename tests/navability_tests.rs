use std::sync::Arc;

use navability_sdk::{
    BlockingNavAbility, Client, EnvelopePolicy, MockTransport, NavAbility, QueryDetail,
    SdkConfig, SdkError, Variable, VariableFilter, VariableQueryResult, VariableType,
};
use serde_json::{json, Value};

fn envelope(key: &str, entities: Value) -> Value {
    json!({"users": [{"robots": [{"sessions": [{ key: entities }]}]}]})
}

#[tokio::test]
async fn test_handle_uses_configured_envelope_policy() -> Result<(), Box<dyn std::error::Error>> {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(json!({"users": []}))
            .with_response(json!({"users": []})),
    );
    let client = Client::new("u", "r", "s");

    let strict = NavAbility::new(mock.clone(), client.clone());
    assert!(matches!(strict.ls().await, Err(SdkError::Envelope(_))));

    let lenient = NavAbility::new(mock.clone(), client).with_config(SdkConfig {
        envelope_policy: EnvelopePolicy::Lenient,
        ..SdkConfig::default()
    });
    assert!(lenient.ls().await?.is_empty());
    assert_eq!(mock.pending(), 0);
    Ok(())
}

#[tokio::test]
async fn test_handle_scopes_requests_to_client() -> Result<(), Box<dyn std::error::Error>> {
    let mock = Arc::new(MockTransport::new().with_response(envelope("variables", json!([]))));
    let nva = NavAbility::new(mock.clone(), Client::new("Guest", "Bot", "S1"));

    let result = nva
        .get_variables(QueryDetail::Full, &VariableFilter::default())
        .await?;
    assert_eq!(result, VariableQueryResult::Full(Vec::new()));

    let variables = mock.last_request().expect("request recorded").request.variables;
    assert_eq!(variables["userId"], json!("Guest"));
    assert_eq!(variables["robotIds"], json!(["Bot"]));
    assert_eq!(variables["sessionIds"], json!(["S1"]));
    Ok(())
}

#[test]
fn test_blocking_facade_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(MockTransport::acknowledgment("addVariable"))
            .with_response(envelope("variables", json!([{"label": "x0", "tags": ["VARIABLE"]}])))
            .with_response(envelope("factors", json!([])))
            .with_response(MockTransport::acknowledgment("solveSession")),
    );
    let nva = BlockingNavAbility::with_transport(mock.clone(), Client::new("u", "r", "s"))?;

    let ack = nva.add_variable(&Variable::new("x0", VariableType::Pose2))?;
    assert!(ack["addVariable"].is_string());
    assert_eq!(nva.ls()?, vec!["x0".to_string()]);
    assert!(nva.lsf()?.is_empty());
    assert!(nva.solve_session()?["solveSession"].is_string());
    assert_eq!(mock.requests().len(), 4);
    Ok(())
}

#[test]
fn test_https_handle_rejects_invalid_config() {
    let config = SdkConfig {
        api_url: Some("ftp://example.com".to_string()),
        ..SdkConfig::default()
    };
    let result = NavAbility::https(config, Client::new("u", "r", "s"));
    assert!(matches!(result, Err(SdkError::Config(_))));
}
