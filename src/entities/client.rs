use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader};

/// Addresses one session of one robot of one user on the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    user_id: String,
    robot_id: String,
    session_id: String,
}

impl Client {
    pub fn new(
        user_id: impl Into<String>,
        robot_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            robot_id: robot_id.into(),
            session_id: session_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn robot_id(&self) -> &str {
        &self.robot_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl EntitySchema for Client {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("client", value)?;
        Ok(Self {
            user_id: reader.required("userId")?,
            robot_id: reader.required("robotId")?,
            session_id: reader.required("sessionId")?,
        })
    }
}
