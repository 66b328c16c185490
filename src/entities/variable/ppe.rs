use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader};

/// Point parameter estimate computed by a solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ppe {
    pub solve_key: String,
    pub suggested: Vec<f64>,
    pub max: Vec<f64>,
    pub mean: Vec<f64>,
    pub last_updated_timestamp: DateTime<Utc>,
}

impl Ppe {
    /// Estimate with identical suggested/max/mean values
    pub fn new(solve_key: impl Into<String>, estimate: Vec<f64>) -> Self {
        Self {
            solve_key: solve_key.into(),
            suggested: estimate.clone(),
            max: estimate.clone(),
            mean: estimate,
            last_updated_timestamp: Utc::now(),
        }
    }
}

impl EntitySchema for Ppe {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("ppe", value)?;
        Ok(Self {
            solve_key: reader.or_else("solveKey", || "default".to_string())?,
            suggested: reader.or_default("suggested")?,
            max: reader.or_default("max")?,
            mean: reader.or_default("mean")?,
            last_updated_timestamp: reader.timestamp_or_now("lastUpdatedTimestamp")?,
        })
    }
}
