//! Domain entities exchanged with the graph service

pub mod client;
pub mod factor;
pub mod status;
pub mod variable;

pub use client::Client;
pub use factor::{
    Distribution, Factor, FactorData, FactorSkeleton, FactorSummary, InferenceType, FACTOR_TAG,
};
pub use status::StatusMessage;
pub use variable::{
    Ppe, Variable, VariableNodeData, VariableSkeleton, VariableSummary, VariableType,
    DEFAULT_SOLVE_KEY, VARIABLE_TAG,
};
