//! Variable entities and their three projections.
//!
//! `VariableSkeleton` ⊂ `VariableSummary` ⊂ `Variable` in field coverage.

mod node_data;
mod ppe;
mod variable_type;

pub use node_data::{VariableNodeData, DEFAULT_PARTICLES};
pub use ppe::Ppe;
pub use variable_type::VariableType;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader, PackedSchema, DFG_VERSION};

/// Tag every variable carries unless told otherwise
pub const VARIABLE_TAG: &str = "VARIABLE";

/// Solve key used for the solver data created with a new variable
pub const DEFAULT_SOLVE_KEY: &str = "default";

/// Label and tags only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSkeleton {
    pub label: String,
    pub tags: BTreeSet<String>,
}

/// Skeleton plus type, estimates and bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSummary {
    pub label: String,
    pub tags: BTreeSet<String>,
    pub variable_type: VariableType,
    #[serde(serialize_with = "crate::schema::keyed::serialize")]
    pub ppes: BTreeMap<String, Ppe>,
    pub solvable: i32,
    pub timestamp: DateTime<Utc>,
    pub nstime: String,
    #[serde(rename = "_version")]
    pub version: String,
}

/// Every field the API exposes for a variable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub label: String,
    pub tags: BTreeSet<String>,
    pub variable_type: VariableType,
    #[serde(serialize_with = "crate::schema::keyed::serialize")]
    pub ppes: BTreeMap<String, Ppe>,
    pub solvable: i32,
    pub timestamp: DateTime<Utc>,
    pub nstime: String,
    #[serde(rename = "_version")]
    pub version: String,
    #[serde(serialize_with = "crate::schema::keyed::serialize")]
    pub solver_data: BTreeMap<String, VariableNodeData>,
    pub small_data: String,
}

impl Variable {
    /// New solvable variable tagged `VARIABLE` with default solver data
    pub fn new(label: impl Into<String>, variable_type: VariableType) -> Self {
        let mut solver_data = BTreeMap::new();
        solver_data.insert(
            DEFAULT_SOLVE_KEY.to_string(),
            VariableNodeData::new(variable_type, DEFAULT_SOLVE_KEY),
        );
        Self {
            label: label.into(),
            tags: BTreeSet::from([VARIABLE_TAG.to_string()]),
            variable_type,
            ppes: BTreeMap::new(),
            solvable: 1,
            timestamp: Utc::now(),
            nstime: "0".to_string(),
            version: DFG_VERSION.to_string(),
            solver_data,
            small_data: "{}".to_string(),
        }
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

    pub fn with_ppe(mut self, ppe: Ppe) -> Self {
        self.ppes.insert(ppe.solve_key.clone(), ppe);
        self
    }

    /// Arbitrary user metadata, stored as JSON text
    pub fn with_small_data(mut self, small_data: &Value) -> SdkResult<Self> {
        self.small_data = serde_json::to_string(small_data)?;
        Ok(self)
    }

    pub fn skeleton(&self) -> VariableSkeleton {
        VariableSkeleton {
            label: self.label.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn summary(&self) -> VariableSummary {
        VariableSummary {
            label: self.label.clone(),
            tags: self.tags.clone(),
            variable_type: self.variable_type,
            ppes: self.ppes.clone(),
            solvable: self.solvable,
            timestamp: self.timestamp,
            nstime: self.nstime.clone(),
            version: self.version.clone(),
        }
    }
}

impl EntitySchema for VariableSkeleton {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("variable", value)?;
        Ok(Self {
            label: reader.required("label")?,
            tags: reader.or_default("tags")?,
        })
    }
}

impl EntitySchema for VariableSummary {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("variable", value)?;
        Ok(Self {
            label: reader.required("label")?,
            tags: reader.or_default("tags")?,
            variable_type: reader.required("variableType")?,
            ppes: reader.keyed_list("ppes", "solveKey", Ppe::load)?,
            solvable: reader.or_default("solvable")?,
            timestamp: reader.timestamp("timestamp")?,
            nstime: reader.or_else("nstime", || "0".to_string())?,
            version: reader.or_else("_version", || DFG_VERSION.to_string())?,
        })
    }
}

impl EntitySchema for Variable {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        let summary = VariableSummary::load(value)?;
        let reader = FieldReader::new("variable", value)?;
        let variable_type = summary.variable_type;
        let solver_data = reader.keyed_list("solverData", "solveKey", |item| {
            VariableNodeData::load_for(item, Some(variable_type))
        })?;
        for (key, data) in &solver_data {
            data.check_dimensions(variable_type)
                .map_err(|e| e.nested(&format!("solverData.{}", key)))?;
        }

        Ok(Self {
            label: summary.label,
            tags: summary.tags,
            variable_type,
            ppes: summary.ppes,
            solvable: summary.solvable,
            timestamp: summary.timestamp,
            nstime: summary.nstime,
            version: summary.version,
            solver_data,
            small_data: reader.or_else("smallData", || "{}".to_string())?,
        })
    }
}

impl PackedSchema for Variable {
    /// Packed form with nested dictionaries encoded as JSON text
    fn dumps_packed(&self) -> SdkResult<String> {
        let packed = json!({
            "label": self.label,
            "dataEntry": "{}",
            "nstime": self.nstime,
            "variableType": self.variable_type.qualified_name(),
            "dataEntryType": "{}",
            "ppeDict": serde_json::to_string(&self.ppes)?,
            "solverDataDict": serde_json::to_string(&self.solver_data)?,
            "smallData": self.small_data,
            "solvable": self.solvable,
            "tags": serde_json::to_string(&self.tags)?,
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "_version": self.version,
        });
        Ok(serde_json::to_string(&packed)?)
    }
}

impl From<Variable> for VariableSummary {
    fn from(variable: Variable) -> Self {
        variable.summary()
    }
}

impl From<Variable> for VariableSkeleton {
    fn from(variable: Variable) -> Self {
        variable.skeleton()
    }
}

impl From<VariableSummary> for VariableSkeleton {
    fn from(summary: VariableSummary) -> Self {
        VariableSkeleton {
            label: summary.label,
            tags: summary.tags,
        }
    }
}
