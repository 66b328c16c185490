//! Factor entities, their measurement models and three projections.

mod distributions;
mod factor_data;
mod inference_types;

pub use distributions::Distribution;
pub use factor_data::{FactorData, DEFAULT_INFLATION};
pub use inference_types::InferenceType;

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader, PackedSchema, DFG_VERSION};

/// Tag every factor carries unless told otherwise
pub const FACTOR_TAG: &str = "FACTOR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorSkeleton {
    pub label: String,
    pub tags: BTreeSet<String>,
    #[serde(rename = "_variableOrderSymbols")]
    pub variable_order_symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorSummary {
    pub label: String,
    pub tags: BTreeSet<String>,
    #[serde(rename = "_variableOrderSymbols")]
    pub variable_order_symbols: Vec<String>,
    #[serde(rename = "fncType")]
    pub fnc_type: String,
    pub solvable: i32,
    pub timestamp: DateTime<Utc>,
    pub nstime: String,
    #[serde(rename = "_version")]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    pub label: String,
    pub tags: BTreeSet<String>,
    #[serde(rename = "_variableOrderSymbols")]
    pub variable_order_symbols: Vec<String>,
    #[serde(rename = "fncType")]
    pub fnc_type: String,
    pub solvable: i32,
    pub timestamp: DateTime<Utc>,
    pub nstime: String,
    #[serde(rename = "_version")]
    pub version: String,
    pub data: FactorData,
}

impl Factor {
    /// New solvable factor over `variables` in order.
    ///
    /// The label defaults to the concatenated variable labels plus `f1`,
    /// so a factor between `x0` and `x1` is `x0x1f1`.
    pub fn new<I, S>(variables: I, fnc: InferenceType) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variable_order_symbols: Vec<String> = variables.into_iter().map(Into::into).collect();
        if variable_order_symbols.len() != fnc.arity() {
            return Err(ValidationError::new(
                "_variableOrderSymbols",
                format!(
                    "{} connects {} variable(s), got {}",
                    fnc.fnc_type(),
                    fnc.arity(),
                    variable_order_symbols.len()
                ),
            ));
        }
        fnc.validate().map_err(|e| e.nested("data.fnc"))?;

        Ok(Self {
            label: format!("{}f1", variable_order_symbols.concat()),
            tags: BTreeSet::from([FACTOR_TAG.to_string()]),
            variable_order_symbols,
            fnc_type: fnc.fnc_type().to_string(),
            solvable: 1,
            timestamp: Utc::now(),
            nstime: "0".to_string(),
            version: DFG_VERSION.to_string(),
            data: FactorData::new(fnc),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_solvable(mut self, solvable: i32) -> Self {
        self.solvable = solvable;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn skeleton(&self) -> FactorSkeleton {
        FactorSkeleton {
            label: self.label.clone(),
            tags: self.tags.clone(),
            variable_order_symbols: self.variable_order_symbols.clone(),
        }
    }

    pub fn summary(&self) -> FactorSummary {
        FactorSummary {
            label: self.label.clone(),
            tags: self.tags.clone(),
            variable_order_symbols: self.variable_order_symbols.clone(),
            fnc_type: self.fnc_type.clone(),
            solvable: self.solvable,
            timestamp: self.timestamp,
            nstime: self.nstime.clone(),
            version: self.version.clone(),
        }
    }
}

impl EntitySchema for FactorSkeleton {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("factor", value)?;
        Ok(Self {
            label: reader.required("label")?,
            tags: reader.or_default("tags")?,
            variable_order_symbols: reader.or_default("_variableOrderSymbols")?,
        })
    }
}

impl EntitySchema for FactorSummary {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let skeleton = FactorSkeleton::load(value)?;
        let reader = FieldReader::new("factor", value)?;
        Ok(Self {
            label: skeleton.label,
            tags: skeleton.tags,
            variable_order_symbols: skeleton.variable_order_symbols,
            fnc_type: reader.required("fncType")?,
            solvable: reader.or_default("solvable")?,
            timestamp: reader.timestamp("timestamp")?,
            nstime: reader.or_else("nstime", || "0".to_string())?,
            version: reader.or_else("_version", || DFG_VERSION.to_string())?,
        })
    }
}

impl EntitySchema for Factor {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let summary = FactorSummary::load(value)?;
        let reader = FieldReader::new("factor", value)?;
        let raw = reader
            .raw("data")
            .ok_or_else(|| ValidationError::new("data", "missing required field"))?;
        let data = FactorData::load(raw).map_err(|e| {
            if e.field == "data" {
                e
            } else {
                e.nested("data")
            }
        })?;

        Ok(Self {
            label: summary.label,
            tags: summary.tags,
            variable_order_symbols: summary.variable_order_symbols,
            fnc_type: summary.fnc_type,
            solvable: summary.solvable,
            timestamp: summary.timestamp,
            nstime: summary.nstime,
            version: summary.version,
            data,
        })
    }
}

impl PackedSchema for Factor {
    /// Packed form with the solver payload and tags encoded as JSON text
    fn dumps_packed(&self) -> SdkResult<String> {
        let packed = json!({
            "label": self.label,
            "_version": self.version,
            "_variableOrderSymbols": self.variable_order_symbols,
            "data": serde_json::to_string(&self.data)?,
            "tags": serde_json::to_string(&self.tags)?,
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "nstime": self.nstime,
            "fnctype": self.fnc_type,
            "solvable": self.solvable,
        });
        Ok(serde_json::to_string(&packed)?)
    }
}

impl From<Factor> for FactorSummary {
    fn from(factor: Factor) -> Self {
        factor.summary()
    }
}

impl From<Factor> for FactorSkeleton {
    fn from(factor: Factor) -> Self {
        factor.skeleton()
    }
}

impl From<FactorSummary> for FactorSkeleton {
    fn from(summary: FactorSummary) -> Self {
        FactorSkeleton {
            label: summary.label,
            tags: summary.tags,
            variable_order_symbols: summary.variable_order_symbols,
        }
    }
}
