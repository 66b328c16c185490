use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::factor::InferenceType;
use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader};

/// Default inflation applied by the solver to a new factor
pub const DEFAULT_INFLATION: f64 = 3.0;

/// Solver-side payload of a factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorData {
    pub eliminated: bool,
    pub potentialused: bool,
    #[serde(rename = "edgeIDs")]
    pub edge_ids: Vec<i64>,
    pub fnc: InferenceType,
    pub multihypo: Vec<f64>,
    pub certainhypo: Vec<usize>,
    pub nullhypo: f64,
    #[serde(rename = "solveInProgress")]
    pub solve_in_progress: i32,
    pub inflation: f64,
}

impl FactorData {
    /// Fresh data where every connected variable is a certain hypothesis
    pub fn new(fnc: InferenceType) -> Self {
        let certainhypo = (1..=fnc.arity()).collect();
        Self {
            eliminated: false,
            potentialused: false,
            edge_ids: Vec::new(),
            fnc,
            multihypo: Vec::new(),
            certainhypo,
            nullhypo: 0.0,
            solve_in_progress: 0,
            inflation: DEFAULT_INFLATION,
        }
    }
}

impl EntitySchema for FactorData {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    /// Accepts the mapping or its JSON text encoding
    fn load(value: &Value) -> Result<Self, ValidationError> {
        let parsed;
        let value = match value {
            Value::String(text) => {
                parsed = serde_json::from_str::<Value>(text)
                    .map_err(|e| ValidationError::new("data", e.to_string()))?;
                &parsed
            }
            other => other,
        };
        let reader = FieldReader::new("data", value)?;
        let fnc: InferenceType = reader.required("fnc")?;
        fnc.validate().map_err(|e| e.nested("fnc"))?;
        let arity = fnc.arity();

        Ok(Self {
            eliminated: reader.or_default("eliminated")?,
            potentialused: reader.or_default("potentialused")?,
            edge_ids: reader.or_default("edgeIDs")?,
            multihypo: reader.or_default("multihypo")?,
            certainhypo: reader.or_else("certainhypo", || (1..=arity).collect())?,
            nullhypo: reader.or_default("nullhypo")?,
            solve_in_progress: reader.or_default("solveInProgress")?,
            inflation: reader.or_else("inflation", || DEFAULT_INFLATION)?,
            fnc,
        })
    }
}
