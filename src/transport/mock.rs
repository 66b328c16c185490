use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::transport::{GraphqlRequest, Transport, TransportError};

/// Which trait method received a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A request seen by the mock, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub kind: OperationKind,
    pub request: GraphqlRequest,
}

/// Mock transport for tests: replays queued responses and records requests
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful `data` mapping
    pub fn with_response(self, data: Value) -> Self {
        self.push_response(data);
        self
    }

    /// Queue a transport failure
    pub fn with_error(self, error: TransportError) -> Self {
        self.push_error(error);
        self
    }

    pub fn push_response(&self, data: Value) {
        lock(&self.responses).push_back(Ok(data));
    }

    pub fn push_error(&self, error: TransportError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// A mutation acknowledgment `{ <field>: <fresh request id> }`
    pub fn acknowledgment(field: &str) -> Value {
        let mut ack = serde_json::Map::new();
        ack.insert(
            field.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        Value::Object(ack)
    }

    /// Everything received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    /// Number of queued responses not yet consumed
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }

    fn handle(
        &self,
        kind: OperationKind,
        request: GraphqlRequest,
    ) -> Result<Value, TransportError> {
        lock(&self.requests).push(RecordedRequest { kind, request });

        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Protocol(
                    "no mock response queued".to_string(),
                ))
            })
    }
}

/// Poisoning is ignored so queued state stays visible
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Transport for MockTransport {
    async fn query(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.handle(OperationKind::Query, request)
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value, TransportError> {
        self.handle(OperationKind::Mutation, request)
    }
}
