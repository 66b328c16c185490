//! Detail levels for multi-entity queries and the typed results they decode to.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::entities::{
    Factor, FactorSkeleton, FactorSummary, Variable, VariableSkeleton, VariableSummary,
};
use crate::error::ValidationError;
use crate::schema::EntitySchema;

/// How much of each entity a query fetches.
///
/// Field coverage nests: `Full` ⊇ `Summary` ⊇ `Skeleton` ⊇ `Label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryDetail {
    /// Raw entries, returned untouched
    Label,
    #[default]
    Skeleton,
    Summary,
    Full,
}

impl QueryDetail {
    /// Include flag for the summary fragment
    pub fn fields_summary(&self) -> bool {
        matches!(self, QueryDetail::Summary | QueryDetail::Full)
    }

    /// Include flag for the full fragment
    pub fn fields_full(&self) -> bool {
        matches!(self, QueryDetail::Full)
    }
}

impl fmt::Display for QueryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryDetail::Label => "LABEL",
            QueryDetail::Skeleton => "SKELETON",
            QueryDetail::Summary => "SUMMARY",
            QueryDetail::Full => "FULL",
        };
        f.write_str(name)
    }
}

impl FromStr for QueryDetail {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LABEL" => Ok(QueryDetail::Label),
            "SKELETON" => Ok(QueryDetail::Skeleton),
            "SUMMARY" => Ok(QueryDetail::Summary),
            "FULL" => Ok(QueryDetail::Full),
            _ => Err(ValidationError::new(
                "detail",
                format!("unknown detail level '{}'", s),
            )),
        }
    }
}

fn load_all<T: EntitySchema>(entries: &[Value]) -> Result<Vec<T>, ValidationError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            T::load(entry).map_err(|e| {
                crate::log_schema_warn!("Failed to decode entry {}: {}", index, e);
                e.nested(&index.to_string())
            })
        })
        .collect()
}

fn label_of(entry: &Value) -> Option<String> {
    entry.get("label").and_then(Value::as_str).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariableQueryResult {
    Label(Vec<Value>),
    Skeleton(Vec<VariableSkeleton>),
    Summary(Vec<VariableSummary>),
    Full(Vec<Variable>),
}

impl VariableQueryResult {
    /// Decode raw entries with the schema `detail` selects
    pub fn decode(detail: QueryDetail, entries: &[Value]) -> Result<Self, ValidationError> {
        Ok(match detail {
            QueryDetail::Label => VariableQueryResult::Label(entries.to_vec()),
            QueryDetail::Skeleton => VariableQueryResult::Skeleton(load_all(entries)?),
            QueryDetail::Summary => VariableQueryResult::Summary(load_all(entries)?),
            QueryDetail::Full => VariableQueryResult::Full(load_all(entries)?),
        })
    }

    /// Result with no entities at the given level
    pub fn empty(detail: QueryDetail) -> Self {
        match detail {
            QueryDetail::Label => VariableQueryResult::Label(Vec::new()),
            QueryDetail::Skeleton => VariableQueryResult::Skeleton(Vec::new()),
            QueryDetail::Summary => VariableQueryResult::Summary(Vec::new()),
            QueryDetail::Full => VariableQueryResult::Full(Vec::new()),
        }
    }

    pub fn detail(&self) -> QueryDetail {
        match self {
            VariableQueryResult::Label(_) => QueryDetail::Label,
            VariableQueryResult::Skeleton(_) => QueryDetail::Skeleton,
            VariableQueryResult::Summary(_) => QueryDetail::Summary,
            VariableQueryResult::Full(_) => QueryDetail::Full,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VariableQueryResult::Label(items) => items.len(),
            VariableQueryResult::Skeleton(items) => items.len(),
            VariableQueryResult::Summary(items) => items.len(),
            VariableQueryResult::Full(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels in response order; raw entries without a label are skipped
    pub fn labels(&self) -> Vec<String> {
        match self {
            VariableQueryResult::Label(items) => items.iter().filter_map(label_of).collect(),
            VariableQueryResult::Skeleton(items) => items.iter().map(|v| v.label.clone()).collect(),
            VariableQueryResult::Summary(items) => items.iter().map(|v| v.label.clone()).collect(),
            VariableQueryResult::Full(items) => items.iter().map(|v| v.label.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FactorQueryResult {
    Label(Vec<Value>),
    Skeleton(Vec<FactorSkeleton>),
    Summary(Vec<FactorSummary>),
    Full(Vec<Factor>),
}

impl FactorQueryResult {
    pub fn decode(detail: QueryDetail, entries: &[Value]) -> Result<Self, ValidationError> {
        Ok(match detail {
            QueryDetail::Label => FactorQueryResult::Label(entries.to_vec()),
            QueryDetail::Skeleton => FactorQueryResult::Skeleton(load_all(entries)?),
            QueryDetail::Summary => FactorQueryResult::Summary(load_all(entries)?),
            QueryDetail::Full => FactorQueryResult::Full(load_all(entries)?),
        })
    }

    pub fn empty(detail: QueryDetail) -> Self {
        match detail {
            QueryDetail::Label => FactorQueryResult::Label(Vec::new()),
            QueryDetail::Skeleton => FactorQueryResult::Skeleton(Vec::new()),
            QueryDetail::Summary => FactorQueryResult::Summary(Vec::new()),
            QueryDetail::Full => FactorQueryResult::Full(Vec::new()),
        }
    }

    pub fn detail(&self) -> QueryDetail {
        match self {
            FactorQueryResult::Label(_) => QueryDetail::Label,
            FactorQueryResult::Skeleton(_) => QueryDetail::Skeleton,
            FactorQueryResult::Summary(_) => QueryDetail::Summary,
            FactorQueryResult::Full(_) => QueryDetail::Full,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FactorQueryResult::Label(items) => items.len(),
            FactorQueryResult::Skeleton(items) => items.len(),
            FactorQueryResult::Summary(items) => items.len(),
            FactorQueryResult::Full(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Vec<String> {
        match self {
            FactorQueryResult::Label(items) => items.iter().filter_map(label_of).collect(),
            FactorQueryResult::Skeleton(items) => items.iter().map(|f| f.label.clone()).collect(),
            FactorQueryResult::Summary(items) => items.iter().map(|f| f.label.clone()).collect(),
            FactorQueryResult::Full(items) => items.iter().map(|f| f.label.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_include_flags() {
        assert!(!QueryDetail::Label.fields_summary());
        assert!(!QueryDetail::Skeleton.fields_summary());
        assert!(QueryDetail::Summary.fields_summary());
        assert!(!QueryDetail::Summary.fields_full());
        assert!(QueryDetail::Full.fields_summary());
        assert!(QueryDetail::Full.fields_full());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("full".parse::<QueryDetail>().unwrap(), QueryDetail::Full);
        assert_eq!("SKELETON".parse::<QueryDetail>().unwrap(), QueryDetail::Skeleton);
        assert_eq!("everything".parse::<QueryDetail>().unwrap_err().field, "detail");
    }

    #[test]
    fn test_label_passthrough_keeps_entries() {
        let entries = vec![json!({"label": "x0", "extra": true}), json!({"label": "x1"})];
        let result = VariableQueryResult::decode(QueryDetail::Label, &entries).unwrap();
        assert_eq!(result, VariableQueryResult::Label(entries));
        assert_eq!(result.labels(), vec!["x0", "x1"]);
    }

    #[test]
    fn test_skeleton_decode() {
        let entries = vec![
            json!({"label": "x0", "tags": ["VARIABLE"]}),
            json!({"label": "x1", "tags": ["VARIABLE", "POSE"]}),
        ];
        let result = VariableQueryResult::decode(QueryDetail::Skeleton, &entries).unwrap();
        assert_eq!(result.detail(), QueryDetail::Skeleton);
        assert_eq!(result.len(), 2);
        assert_eq!(result.labels(), vec!["x0", "x1"]);
    }

    #[test]
    fn test_decode_error_names_entry_index() {
        let entries = vec![json!({"label": "f0"}), json!({"tags": ["FACTOR"]})];
        let err = FactorQueryResult::decode(QueryDetail::Skeleton, &entries).unwrap_err();
        assert_eq!(err.field, "1.label");
    }

    #[test]
    fn test_empty_matches_detail() {
        let result = FactorQueryResult::empty(QueryDetail::Summary);
        assert!(result.is_empty());
        assert_eq!(result.detail(), QueryDetail::Summary);
    }
}
