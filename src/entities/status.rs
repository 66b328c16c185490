use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::entities::Client;
use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader};

pub const STATE_COMPLETE: &str = "Complete";
pub const STATE_FAILED: &str = "Failed";

/// Progress report the server publishes for a mutation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub request_id: String,
    pub action: String,
    pub state: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl StatusMessage {
    pub fn is_complete(&self) -> bool {
        self.state == STATE_COMPLETE
    }

    pub fn is_failed(&self) -> bool {
        self.state == STATE_FAILED
    }
}

impl EntitySchema for StatusMessage {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("statusMessage", value)?;
        let client = match reader.raw("client") {
            Some(raw) => Some(Client::load(raw).map_err(|e| e.nested("client"))?),
            None => None,
        };
        Ok(Self {
            request_id: reader.required("requestId")?,
            action: reader.or_default("action")?,
            state: reader.required("state")?,
            timestamp: reader.timestamp("timestamp")?,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_server_message() {
        let message = StatusMessage::load(&json!({
            "requestId": "5c0a3a2e",
            "action": "addVariable",
            "state": "Complete",
            "timestamp": "2021-11-01T10:00:00.000Z",
            "client": {"userId": "u", "robotId": "r", "sessionId": "s"}
        }))
        .unwrap();
        assert!(message.is_complete());
        assert!(!message.is_failed());
        assert_eq!(message.client, Some(Client::new("u", "r", "s")));
        assert_eq!(StatusMessage::load(&message.dump().unwrap()).unwrap(), message);
    }

    #[test]
    fn test_incomplete_client_names_path() {
        let err = StatusMessage::load(&json!({
            "requestId": "1",
            "state": "Pending",
            "timestamp": "2021-11-01T10:00:00Z",
            "client": {"userId": "u"}
        }))
        .unwrap_err();
        assert_eq!(err.field, "client.robotId");
    }
}
