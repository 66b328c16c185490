use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use navability_sdk::transport::websocket::GRAPHQL_TRANSPORT_WS;
use navability_sdk::{GraphqlRequest, Transport, TransportError, WebSocketTransport};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

/// How the test server answers the subscribe message
#[derive(Clone)]
enum Reply {
    Next(Value),
    Error(Value),
    CompleteOnly,
    PingThenNext(Value),
    PingBeforeAck(Value),
    NoAck,
}

async fn read_json(ws: &mut WebSocketStream<tokio::net::TcpStream>) -> Option<Value> {
    while let Some(Ok(message)) = ws.next().await {
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).ok();
        }
    }
    None
}

async fn send_json(ws: &mut WebSocketStream<tokio::net::TcpStream>, value: Value) {
    let _ = ws.send(Message::Text(value.to_string())).await;
}

/// Serve one connection, reporting the subscribe payload and whether the
/// client sent `complete`
async fn serve_once(reply: Reply) -> (String, oneshot::Receiver<(Value, bool)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("ws://{}", listener.local_addr().expect("addr"));
    let (seen_tx, seen_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let callback =
            |_request: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
                response.headers_mut().insert(
                    SEC_WEBSOCKET_PROTOCOL,
                    HeaderValue::from_static(GRAPHQL_TRANSPORT_WS),
                );
                Ok(response)
            };
        let mut ws = accept_hdr_async(stream, callback).await.expect("handshake");

        let init = read_json(&mut ws).await.expect("connection_init");
        assert_eq!(init["type"], json!("connection_init"));
        if let Reply::NoAck = reply {
            tokio::time::sleep(Duration::from_millis(500)).await;
            return;
        }
        if let Reply::PingBeforeAck(_) = reply {
            send_json(&mut ws, json!({"type": "ping"})).await;
            let pong = read_json(&mut ws).await.expect("pong before ack");
            assert_eq!(pong["type"], json!("pong"));
        }
        send_json(&mut ws, json!({"type": "connection_ack"})).await;

        let subscribe = read_json(&mut ws).await.expect("subscribe");
        assert_eq!(subscribe["type"], json!("subscribe"));
        let id = subscribe["id"].clone();
        let payload = subscribe["payload"].clone();

        match reply {
            Reply::Next(result) | Reply::PingBeforeAck(result) => {
                send_json(&mut ws, json!({"type": "next", "id": id, "payload": result})).await;
            }
            Reply::PingThenNext(result) => {
                send_json(&mut ws, json!({"type": "ping"})).await;
                let pong = read_json(&mut ws).await.expect("pong");
                assert_eq!(pong["type"], json!("pong"));
                send_json(&mut ws, json!({"type": "next", "id": id, "payload": result})).await;
            }
            Reply::Error(errors) => {
                send_json(&mut ws, json!({"type": "error", "id": id, "payload": errors})).await;
            }
            Reply::CompleteOnly => {
                send_json(&mut ws, json!({"type": "complete", "id": id})).await;
            }
            Reply::NoAck => unreachable!(),
        }

        let completed = matches!(
            read_json(&mut ws).await,
            Some(message) if message["type"] == json!("complete")
        );
        let _ = seen_tx.send((payload, completed));
        let _ = ws.close(None).await;
    });

    (url, seen_rx)
}

#[tokio::test]
async fn test_subscribe_next_complete() -> Result<(), Box<dyn std::error::Error>> {
    let (url, seen) = serve_once(Reply::Next(json!({"data": {"addVariable": "req-9"}}))).await;
    let transport = WebSocketTransport::new(url);

    let request = GraphqlRequest::new("mutation { addVariable }", json!({"variable": {}}))
        .with_operation_name("sdk_add_variable");
    let data = transport.mutate(request).await?;
    assert_eq!(data, json!({"addVariable": "req-9"}));

    let (payload, completed) = seen.await?;
    assert_eq!(payload["query"], json!("mutation { addVariable }"));
    assert_eq!(payload["variables"], json!({"variable": {}}));
    assert_eq!(payload["operationName"], json!("sdk_add_variable"));
    assert!(completed, "client should send complete after next");
    Ok(())
}

#[tokio::test]
async fn test_ping_answered_with_pong() -> Result<(), Box<dyn std::error::Error>> {
    let (url, _seen) = serve_once(Reply::PingThenNext(json!({"data": {"ok": true}}))).await;
    let data = WebSocketTransport::new(url)
        .query(GraphqlRequest::new("query { ok }", json!({})))
        .await?;
    assert_eq!(data, json!({"ok": true}));
    Ok(())
}

#[tokio::test]
async fn test_ping_before_ack_answered() -> Result<(), Box<dyn std::error::Error>> {
    let (url, seen) = serve_once(Reply::PingBeforeAck(json!({"data": {"ok": true}}))).await;
    let data = WebSocketTransport::new(url)
        .query(GraphqlRequest::new("query { ok }", json!({})))
        .await?;
    assert_eq!(data, json!({"ok": true}));

    let (payload, completed) = seen.await?;
    assert_eq!(payload["query"], json!("query { ok }"));
    assert!(completed);
    Ok(())
}

#[tokio::test]
async fn test_next_with_errors() {
    let (url, _seen) = serve_once(Reply::Next(json!({
        "data": null,
        "errors": [{"message": "Variable \"$userId\" of required type \"ID!\" was not provided."}]
    })))
    .await;

    let result = WebSocketTransport::new(url)
        .query(GraphqlRequest::new("query { users }", json!({})))
        .await;
    match result {
        Err(TransportError::GraphqlErrors(errors)) => {
            assert!(errors[0].message.contains("$userId"))
        }
        other => panic!("expected GraphQL errors, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_message() {
    let (url, _seen) = serve_once(Reply::Error(json!([{"message": "Syntax Error"}]))).await;

    let result = WebSocketTransport::new(url)
        .query(GraphqlRequest::new("query {", json!({})))
        .await;
    match result {
        Err(TransportError::GraphqlErrors(errors)) => assert_eq!(errors[0].message, "Syntax Error"),
        other => panic!("expected GraphQL errors, got {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_without_result() {
    let (url, _seen) = serve_once(Reply::CompleteOnly).await;

    let result = WebSocketTransport::new(url)
        .query(GraphqlRequest::new("query { x }", json!({})))
        .await;
    assert!(matches!(result, Err(TransportError::Protocol(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_missing_ack_times_out() {
    let (url, _seen) = serve_once(Reply::NoAck).await;

    let result = WebSocketTransport::new(url)
        .with_timeout(Duration::from_millis(100))
        .query(GraphqlRequest::new("query { x }", json!({})))
        .await;
    assert!(matches!(result, Err(TransportError::Timeout(_))), "got {:?}", result);
}
