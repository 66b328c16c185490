use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::variable::VariableType;
use crate::error::{SdkResult, ValidationError};
use crate::schema::{dump_serialized, EntitySchema, FieldReader};

/// Number of particles a fresh belief carries per dimension
pub const DEFAULT_PARTICLES: usize = 100;

/// Solver state of a variable for one solve key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNodeData {
    pub vecval: Vec<f64>,
    pub dimval: usize,
    pub vecbw: Vec<f64>,
    pub dimbw: usize,
    #[serde(rename = "BayesNetOutVertIDs")]
    pub bayes_net_out_vert_ids: Vec<String>,
    #[serde(rename = "dimIDs")]
    pub dim_ids: Vec<usize>,
    pub dims: usize,
    pub eliminated: bool,
    #[serde(rename = "BayesNetVertID")]
    pub bayes_net_vert_id: String,
    pub separator: Vec<String>,
    pub initialized: bool,
    #[serde(rename = "infoPerCoord")]
    pub info_per_coord: Vec<f64>,
    pub ismargin: bool,
    pub dontmargin: bool,
    #[serde(rename = "solveInProgress")]
    pub solve_in_progress: i32,
    #[serde(rename = "solvedCount")]
    pub solved_count: i32,
    #[serde(rename = "solveKey")]
    pub solve_key: String,
    #[serde(rename = "variableType")]
    pub variable_type: VariableType,
}

impl VariableNodeData {
    /// Uninitialized solver data sized for `variable_type`
    pub fn new(variable_type: VariableType, solve_key: impl Into<String>) -> Self {
        let dims = variable_type.dims();
        Self {
            vecval: vec![0.0; dims * DEFAULT_PARTICLES],
            dimval: dims,
            vecbw: vec![0.0; dims],
            dimbw: dims,
            bayes_net_out_vert_ids: Vec::new(),
            dim_ids: (0..dims).collect(),
            dims,
            eliminated: false,
            bayes_net_vert_id: "_null".to_string(),
            separator: Vec::new(),
            initialized: false,
            info_per_coord: vec![0.0; dims],
            ismargin: false,
            dontmargin: false,
            solve_in_progress: 0,
            solved_count: 0,
            solve_key: solve_key.into(),
            variable_type,
        }
    }

    /// Check the numerical payload against the owning variable's type
    pub fn check_dimensions(&self, variable_type: VariableType) -> Result<(), ValidationError> {
        let expected = variable_type.dims();
        if self.dims != expected {
            return Err(ValidationError::new(
                "dims",
                format!(
                    "{} has {} dimensions, solver data declares {}",
                    variable_type.short_name(),
                    expected,
                    self.dims
                ),
            ));
        }
        if self.vecval.len() % expected != 0 {
            return Err(ValidationError::new(
                "vecval",
                format!(
                    "length {} is not a multiple of {} dimensions",
                    self.vecval.len(),
                    expected
                ),
            ));
        }
        Ok(())
    }

    /// Load solver data, taking the type from the owning variable when absent
    pub fn load_for(
        value: &Value,
        variable_type: Option<VariableType>,
    ) -> Result<Self, ValidationError> {
        let reader = FieldReader::new("solverData", value)?;
        let variable_type = match (reader.optional("variableType")?, variable_type) {
            (Some(declared), _) => declared,
            (None, Some(owner)) => owner,
            (None, None) => {
                return Err(ValidationError::new("variableType", "missing required field"))
            }
        };
        let dims: usize = reader.or_else("dims", || variable_type.dims())?;

        let data = Self {
            vecval: reader.or_default("vecval")?,
            dimval: reader.or_else("dimval", || dims)?,
            vecbw: reader.or_default("vecbw")?,
            dimbw: reader.or_else("dimbw", || dims)?,
            bayes_net_out_vert_ids: reader.or_default("BayesNetOutVertIDs")?,
            dim_ids: reader.or_default("dimIDs")?,
            dims,
            eliminated: reader.or_default("eliminated")?,
            bayes_net_vert_id: reader.or_else("BayesNetVertID", || "_null".to_string())?,
            separator: reader.or_default("separator")?,
            initialized: reader.or_default("initialized")?,
            info_per_coord: reader.or_default("infoPerCoord")?,
            ismargin: reader.or_default("ismargin")?,
            dontmargin: reader.or_default("dontmargin")?,
            solve_in_progress: reader.or_default("solveInProgress")?,
            solved_count: reader.or_default("solvedCount")?,
            solve_key: reader.or_else("solveKey", || "default".to_string())?,
            variable_type,
        };
        data.check_dimensions(variable_type)?;
        Ok(data)
    }
}

impl EntitySchema for VariableNodeData {
    fn dump(&self) -> SdkResult<Value> {
        dump_serialized(self)
    }

    fn load(value: &Value) -> Result<Self, ValidationError> {
        Self::load_for(value, None)
    }
}
