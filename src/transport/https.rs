//! GraphQL over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::SdkConfig;
use crate::logging::{LogFeature, RoundTripTimer};
use crate::transport::{GraphqlRequest, GraphqlResponse, Transport, TransportError};

/// Longest response body kept in an `HttpStatus` error
const MAX_ERROR_BODY: usize = 4096;

/// Transport that POSTs GraphQL documents to an HTTPS endpoint
#[derive(Debug, Clone)]
pub struct HttpsTransport {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpsTransport {
    /// Create a transport with a 30 second timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_options(endpoint, Duration::from_secs(30), None)
    }

    /// Create a transport from SDK configuration
    pub fn from_config(config: &SdkConfig) -> Result<Self, TransportError> {
        Self::with_options(config.api_url(), config.timeout(), None)
    }

    /// Create a transport with an explicit timeout and optional bearer token
    pub fn with_options(
        endpoint: impl Into<String>,
        timeout: Duration,
        bearer_token: Option<&str>,
    ) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| TransportError::Http(format!("invalid bearer token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        let timer = RoundTripTimer::new(LogFeature::Transport, request.describe());

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            });
        }

        let response: GraphqlResponse = serde_json::from_slice(&bytes)?;
        timer.finish();
        response.into_data()
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn query(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.execute(request).await
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.execute(request).await
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
