//! # NavAbility SDK
//!
//! Client library for building and querying factor graphs hosted by the
//! NavAbility service over GraphQL.
//!
//! ## Example
//!
//! ```rust,no_run
//! use navability_sdk::{
//!     Client, NavAbility, QueryDetail, SdkConfig, Variable, VariableFilter, VariableType,
//! };
//!
//! # async fn run() -> navability_sdk::SdkResult<()> {
//! let client = Client::new("Guest", "MyRobot", "Session1");
//! let nva = NavAbility::https(SdkConfig::default(), client)?;
//!
//! nva.add_variable(&Variable::new("x0", VariableType::Pose2)).await?;
//! let labels = nva.ls().await?;
//! let summaries = nva
//!     .get_variables(QueryDetail::Summary, &VariableFilter::default())
//!     .await?;
//! # let _ = (labels, summaries);
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod config;
pub mod entities;
pub mod envelope;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod navability;
pub mod query_detail;
pub mod schema;
pub mod services;
pub mod transport;

pub use blocking::BlockingNavAbility;
pub use config::{ConfigError, EnvelopePolicy, Environment, SdkConfig};
pub use entities::{
    Client, Distribution, Factor, FactorData, FactorSkeleton, FactorSummary, InferenceType, Ppe,
    StatusMessage, Variable, VariableNodeData, VariableSkeleton, VariableSummary, VariableType,
};
pub use envelope::unwrap_envelope;
pub use error::{EnvelopeError, EnvelopeLevel, SdkError, SdkResult, ValidationError};
pub use navability::NavAbility;
pub use query_detail::{FactorQueryResult, QueryDetail, VariableQueryResult};
pub use schema::{EntitySchema, PackedSchema, DFG_VERSION};
pub use services::{FactorFilter, VariableFilter, WaitOptions};
pub use transport::{GraphqlRequest, HttpsTransport, Transport, TransportError, WebSocketTransport};

#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;
