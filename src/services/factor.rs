use serde_json::{json, Value};

use crate::config::EnvelopePolicy;
use crate::entities::{Client, Factor, FACTOR_TAG};
use crate::error::SdkResult;
use crate::graphql::{
    with_fragments, GQL_ADD_FACTOR, GQL_FRAGMENT_FACTORS, GQL_GET_FACTOR, GQL_GET_FACTORS,
};
use crate::query_detail::{FactorQueryResult, QueryDetail};
use crate::schema::{EntitySchema, PackedSchema};
use crate::services::{check_label_regex, session_entities, single_entity, DEFAULT_LABEL_REGEX};
use crate::transport::{GraphqlRequest, Transport};
use crate::{log_mutation_debug, log_mutation_info, log_query_debug};

/// Server-side filter for factor queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorFilter {
    pub regex: String,
    pub tags: Vec<String>,
    pub solvable: i32,
}

impl Default for FactorFilter {
    fn default() -> Self {
        Self {
            regex: DEFAULT_LABEL_REGEX.to_string(),
            tags: vec![FACTOR_TAG.to_string()],
            solvable: 0,
        }
    }
}

impl FactorFilter {
    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = regex.into();
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
}

pub async fn add_factor<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    factor: &Factor,
) -> SdkResult<Value> {
    let variables = json!({
        "factor": {
            "client": client.dump()?,
            "packedData": factor.dumps_packed()?,
        }
    });
    log_mutation_debug!("addFactor variables: {}", variables);

    let request =
        GraphqlRequest::new(GQL_ADD_FACTOR, variables).with_operation_name("sdk_add_factor");
    let result = transport.mutate(request).await?;
    log_mutation_info!("addFactor '{}' acknowledged: {}", factor.label, result);
    Ok(result)
}

pub async fn get_factors<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    detail: QueryDetail,
    filter: &FactorFilter,
    policy: EnvelopePolicy,
) -> SdkResult<FactorQueryResult> {
    check_label_regex(&filter.regex)?;

    let variables = json!({
        "userId": client.user_id(),
        "robotIds": [client.robot_id()],
        "sessionIds": [client.session_id()],
        "factor_label_regexp": filter.regex,
        "factor_tags": filter.tags,
        "solvable": filter.solvable,
        "fields_summary": detail.fields_summary(),
        "fields_full": detail.fields_full(),
    });
    log_query_debug!("get_factors variables: {}", variables);

    let request = GraphqlRequest::new(
        with_fragments(GQL_FRAGMENT_FACTORS, GQL_GET_FACTORS),
        variables,
    )
    .with_operation_name("sdk_get_factors");
    let response = transport.query(request).await?;
    log_query_debug!("get_factors result: {}", response);

    match session_entities(&response, "factors", policy)? {
        Some(entries) => Ok(FactorQueryResult::decode(detail, entries)?),
        None => Ok(FactorQueryResult::empty(detail)),
    }
}

pub async fn get_factor<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    label: &str,
) -> SdkResult<Option<Factor>> {
    let mut variables = client.dump()?;
    variables["label"] = Value::String(label.to_string());
    log_query_debug!("get_factor variables: {}", variables);

    let request = GraphqlRequest::new(
        with_fragments(GQL_FRAGMENT_FACTORS, GQL_GET_FACTOR),
        variables,
    )
    .with_operation_name("sdk_get_factor");
    let response = transport.query(request).await?;
    log_query_debug!("get_factor result: {}", response);

    match single_entity(&response, "factors", "factor", label)? {
        Some(entry) => Ok(Some(Factor::load(entry)?)),
        None => Ok(None),
    }
}

pub async fn list_factors<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    filter: &FactorFilter,
    policy: EnvelopePolicy,
) -> SdkResult<Vec<String>> {
    let result = get_factors(transport, client, QueryDetail::Skeleton, filter, policy).await?;
    Ok(result.labels())
}

/// Shorthand for [`list_factors`]
pub async fn lsf<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    filter: &FactorFilter,
    policy: EnvelopePolicy,
) -> SdkResult<Vec<String>> {
    list_factors(transport, client, filter, policy).await
}
