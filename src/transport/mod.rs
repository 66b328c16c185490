//! Transport abstraction over GraphQL query/mutation execution.
//!
//! Service functions only ever see [`Transport`]; the concrete HTTPS and
//! WebSocket clients live in submodules.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod https;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod websocket;

pub use https::HttpsTransport;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use websocket::WebSocketTransport;

/// A GraphQL document plus its variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    /// Query or mutation text
    pub query: String,
    /// Variables object
    pub variables: Value,
    /// Optional operation name
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    /// Create a new request
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    /// Attach an operation name
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Short description used in log lines
    pub fn describe(&self) -> String {
        match &self.operation_name {
            Some(name) => name.clone(),
            None => self
                .query
                .split_whitespace()
                .take(2)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of a response `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// GraphQL response container.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Data if the server reported no errors
    pub fn into_data(self) -> Result<Value, TransportError> {
        if !self.errors.is_empty() {
            return Err(TransportError::GraphqlErrors(self.errors));
        }
        self.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| TransportError::Protocol("missing GraphQL data".to_string()))
    }
}

/// Errors raised while executing a GraphQL operation
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// HTTP/network error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP response status error.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus { status: u16, body: String },

    /// WebSocket connection error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// GraphQL-level errors returned by the server.
    #[error("GraphQL errors: {}", format_errors(.0))]
    GraphqlErrors(Vec<GraphqlError>),

    /// GraphQL protocol violation.
    #[error("GraphQL protocol error: {0}")]
    Protocol(String),

    /// The operation did not finish in time.
    #[error("Timed out: {0}")]
    Timeout(String),
}

fn format_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Json(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(err.to_string())
    }
}

/// Executes GraphQL operations against the NavAbility API.
///
/// Implementations return the `data` mapping of a successful response and
/// fail on network errors, malformed documents, or a non-empty `errors` array.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a query document
    async fn query(&self, request: GraphqlRequest) -> Result<Value, TransportError>;

    /// Execute a mutation document
    async fn mutate(&self, request: GraphqlRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn query(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        (**self).query(request).await
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        (**self).mutate(request).await
    }
}
