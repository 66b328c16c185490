use serde_json::{json, Value};

use crate::config::EnvelopePolicy;
use crate::entities::{Client, Variable, VARIABLE_TAG};
use crate::error::SdkResult;
use crate::graphql::{
    with_fragments, GQL_ADD_VARIABLE, GQL_FRAGMENT_VARIABLES, GQL_GET_VARIABLE, GQL_GET_VARIABLES,
};
use crate::query_detail::{QueryDetail, VariableQueryResult};
use crate::schema::{EntitySchema, PackedSchema};
use crate::services::{check_label_regex, session_entities, single_entity, DEFAULT_LABEL_REGEX};
use crate::transport::{GraphqlRequest, Transport};
use crate::{log_mutation_debug, log_mutation_info, log_query_debug};

/// Server-side filter for variable queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableFilter {
    /// Label pattern, checked locally before sending
    pub regex: String,
    /// Variables must carry all of these tags
    pub tags: Vec<String>,
    /// Minimum solvable flag
    pub solvable: i32,
}

impl Default for VariableFilter {
    fn default() -> Self {
        Self {
            regex: DEFAULT_LABEL_REGEX.to_string(),
            tags: vec![VARIABLE_TAG.to_string()],
            solvable: 0,
        }
    }
}

impl VariableFilter {
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

/// Add a variable to the client's session, returning the raw acknowledgment
pub async fn add_variable<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    variable: &Variable,
) -> SdkResult<Value> {
    let variables = json!({
        "variable": {
            "client": client.dump()?,
            "packedData": variable.dumps_packed()?,
        }
    });
    log_mutation_debug!("addVariable variables: {}", variables);

    let request =
        GraphqlRequest::new(GQL_ADD_VARIABLE, variables).with_operation_name("sdk_add_variable");
    let result = transport.mutate(request).await?;
    log_mutation_info!("addVariable '{}' acknowledged: {}", variable.label, result);
    Ok(result)
}

/// Fetch the session's variables at the requested detail level
pub async fn get_variables<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    detail: QueryDetail,
    filter: &VariableFilter,
    policy: EnvelopePolicy,
) -> SdkResult<VariableQueryResult> {
    check_label_regex(&filter.regex)?;

    let variables = json!({
        "userId": client.user_id(),
        "robotIds": [client.robot_id()],
        "sessionIds": [client.session_id()],
        "variable_label_regexp": filter.regex,
        "variable_tags": filter.tags,
        "solvable": filter.solvable,
        "fields_summary": detail.fields_summary(),
        "fields_full": detail.fields_full(),
    });
    log_query_debug!("get_variables variables: {}", variables);

    let request = GraphqlRequest::new(
        with_fragments(GQL_FRAGMENT_VARIABLES, GQL_GET_VARIABLES),
        variables,
    )
    .with_operation_name("sdk_get_variables");
    let response = transport.query(request).await?;
    log_query_debug!("get_variables result: {}", response);

    match session_entities(&response, "variables", policy)? {
        Some(entries) => Ok(VariableQueryResult::decode(detail, entries)?),
        None => Ok(VariableQueryResult::empty(detail)),
    }
}

/// Fetch one variable in full, `None` if the session has no such label
pub async fn get_variable<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    label: &str,
) -> SdkResult<Option<Variable>> {
    let mut variables = client.dump()?;
    variables["label"] = Value::String(label.to_string());
    log_query_debug!("get_variable variables: {}", variables);

    let request = GraphqlRequest::new(
        with_fragments(GQL_FRAGMENT_VARIABLES, GQL_GET_VARIABLE),
        variables,
    )
    .with_operation_name("sdk_get_variable");
    let response = transport.query(request).await?;
    log_query_debug!("get_variable result: {}", response);

    match single_entity(&response, "variables", "variable", label)? {
        Some(entry) => Ok(Some(Variable::load(entry)?)),
        None => Ok(None),
    }
}

/// Labels of the session's variables
pub async fn list_variables<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    filter: &VariableFilter,
    policy: EnvelopePolicy,
) -> SdkResult<Vec<String>> {
    let result = get_variables(transport, client, QueryDetail::Skeleton, filter, policy).await?;
    Ok(result.labels())
}

/// Shorthand for [`list_variables`]
pub async fn ls<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
    filter: &VariableFilter,
    policy: EnvelopePolicy,
) -> SdkResult<Vec<String>> {
    list_variables(transport, client, filter, policy).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_built_per_call() {
        let mut first = VariableFilter::default();
        first.tags.push("POSE".to_string());
        let second = VariableFilter::default();
        assert_eq!(second.tags, vec!["VARIABLE".to_string()]);
        assert_eq!(second.regex, ".*");
        assert_eq!(second.solvable, 0);
    }

    #[test]
    fn test_filter_builders() {
        let filter = VariableFilter::default()
            .with_regex("x\\d+")
            .with_tags(["VARIABLE", "LANDMARK"])
            .with_solvable(1);
        assert_eq!(filter.regex, "x\\d+");
        assert_eq!(filter.tags.len(), 2);
        assert_eq!(filter.solvable, 1);
    }
}
