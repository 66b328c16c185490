//! GraphQL over WebSocket (`graphql-transport-ws`).
//!
//! Every operation opens its own connection, runs a single subscribe/next
//! exchange and closes the socket again.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::config::SdkConfig;
use crate::logging::{LogFeature, RoundTripTimer};
use crate::transport::{GraphqlError, GraphqlRequest, GraphqlResponse, Transport, TransportError};
use crate::{log_transport_debug, log_transport_warn};

/// Sub-protocol negotiated with the server
pub const GRAPHQL_TRANSPORT_WS: &str = "graphql-transport-ws";

/// Id used for the single operation sent per connection
const OPERATION_ID: &str = "1";

/// graphql-transport-ws protocol message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProtocolMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ProtocolMessage {
    fn new(message_type: &str, id: Option<&str>, payload: Option<Value>) -> Self {
        Self {
            message_type: message_type.to_string(),
            id: id.map(str::to_string),
            payload,
        }
    }
}

/// Transport that runs each GraphQL operation over a fresh WebSocket
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
    timeout: Duration,
    init_payload: Option<Value>,
}

impl WebSocketTransport {
    /// Create a transport with a 30 second handshake/response timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            init_payload: None,
        }
    }

    /// Create a transport from SDK configuration
    pub fn from_config(config: &SdkConfig) -> Self {
        Self::new(config.ws_url()).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Payload sent with `connection_init`, e.g. authorization claims
    pub fn with_init_payload(mut self, payload: Value) -> Self {
        self.init_payload = Some(payload);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn execute(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        let timer = RoundTripTimer::new(LogFeature::Transport, request.describe());

        let mut ws_request = self.url.as_str().into_client_request()?;
        ws_request.headers_mut().insert(
            SEC_WEBSOCKET_PROTOCOL,
            HeaderValue::from_static(GRAPHQL_TRANSPORT_WS),
        );

        let (mut stream, _) = tokio::time::timeout(self.timeout, connect_async(ws_request))
            .await
            .map_err(|_| TransportError::Timeout(format!("connecting to {}", self.url)))??;
        log_transport_debug!("Connected to {}", self.url);

        let init = ProtocolMessage::new("connection_init", None, self.init_payload.clone());
        send_message(&mut stream, &init).await?;

        self.await_ack(&mut stream).await?;

        let subscribe = ProtocolMessage::new(
            "subscribe",
            Some(OPERATION_ID),
            Some(serde_json::to_value(&request)?),
        );
        send_message(&mut stream, &subscribe).await?;

        let result = self.await_result(&mut stream).await;

        if let Err(e) = stream.close(None).await {
            log_transport_warn!("Failed to close websocket cleanly: {}", e);
        }
        timer.finish();
        result
    }

    /// Pings may arrive before the server acknowledges the connection
    async fn await_ack<S>(&self, stream: &mut S) -> Result<(), TransportError>
    where
        S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    {
        loop {
            let message = self.next_message(stream, "connection_ack").await?;
            match message.message_type.as_str() {
                "connection_ack" => return Ok(()),
                "ping" => {
                    let pong = ProtocolMessage::new("pong", None, message.payload);
                    send_message(stream, &pong).await?;
                }
                "pong" => {}
                other => {
                    return Err(TransportError::Protocol(format!(
                        "expected connection_ack, got {}",
                        other
                    )));
                }
            }
        }
    }

    async fn await_result<S>(&self, stream: &mut S) -> Result<Value, TransportError>
    where
        S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    {
        loop {
            let message = self.next_message(stream, "operation result").await?;
            match message.message_type.as_str() {
                "next" => {
                    let payload = message.payload.ok_or_else(|| {
                        TransportError::Protocol("'next' message without payload".to_string())
                    })?;
                    let response: GraphqlResponse = serde_json::from_value(payload)?;
                    let complete = ProtocolMessage::new("complete", Some(OPERATION_ID), None);
                    send_message(stream, &complete).await?;
                    return response.into_data();
                }
                "error" => {
                    return Err(TransportError::GraphqlErrors(decode_errors(message.payload)));
                }
                "complete" => {
                    return Err(TransportError::Protocol(
                        "operation completed without a result".to_string(),
                    ));
                }
                "ping" => {
                    let pong = ProtocolMessage::new("pong", None, message.payload);
                    send_message(stream, &pong).await?;
                }
                "pong" => {}
                other => {
                    return Err(TransportError::Protocol(format!(
                        "unexpected websocket message: {}",
                        other
                    )));
                }
            }
        }
    }

    async fn next_message<S>(
        &self,
        stream: &mut S,
        waiting_for: &str,
    ) -> Result<ProtocolMessage, TransportError>
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        tokio::time::timeout(self.timeout, read_protocol_message(stream, waiting_for))
            .await
            .map_err(|_| TransportError::Timeout(format!("waiting for {}", waiting_for)))?
    }
}

async fn read_protocol_message<S>(
    stream: &mut S,
    waiting_for: &str,
) -> Result<ProtocolMessage, TransportError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => return Ok(serde_json::from_str(&text)?),
            Message::Binary(bytes) => return Ok(serde_json::from_slice(&bytes)?),
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Err(TransportError::Protocol(format!(
        "connection closed while waiting for {}",
        waiting_for
    )))
}

async fn send_message<S>(stream: &mut S, message: &ProtocolMessage) -> Result<(), TransportError>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let text = serde_json::to_string(message)?;
    stream.send(Message::Text(text)).await?;
    Ok(())
}

/// `error` payloads are a list of GraphQL errors, some servers send a single one
fn decode_errors(payload: Option<Value>) -> Vec<GraphqlError> {
    let errors = payload.and_then(|value| {
        if value.is_array() {
            serde_json::from_value::<Vec<GraphqlError>>(value).ok()
        } else {
            serde_json::from_value::<GraphqlError>(value)
                .ok()
                .map(|err| vec![err])
        }
    });
    errors.unwrap_or_else(|| {
        vec![GraphqlError {
            message: "unspecified websocket error".to_string(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }]
    })
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn query(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.execute(request).await
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_message_omits_empty_fields() {
        let init = ProtocolMessage::new("connection_init", None, None);
        assert_eq!(
            serde_json::to_value(&init).unwrap(),
            json!({"type": "connection_init"})
        );
    }

    #[test]
    fn test_decode_errors_accepts_list_or_single() {
        let list = decode_errors(Some(json!([{"message": "a"}, {"message": "b"}])));
        assert_eq!(list.len(), 2);

        let single = decode_errors(Some(json!({"message": "only"})));
        assert_eq!(single[0].message, "only");

        let missing = decode_errors(None);
        assert_eq!(missing.len(), 1);
    }
}
