use serde_json::{json, Value};

use crate::entities::Client;
use crate::error::SdkResult;
use crate::graphql::GQL_SOLVE_SESSION;
use crate::schema::EntitySchema;
use crate::transport::{GraphqlRequest, Transport};
use crate::{log_mutation_debug, log_mutation_info};

/// Ask the server to solve the client's session, returning the raw acknowledgment
pub async fn solve_session<T: Transport + ?Sized>(
    transport: &T,
    client: &Client,
) -> SdkResult<Value> {
    let variables = json!({ "client": client.dump()? });
    log_mutation_debug!("solveSession variables: {}", variables);

    let request = GraphqlRequest::new(GQL_SOLVE_SESSION, variables)
        .with_operation_name("sdk_solve_session");
    let result = transport.mutate(request).await?;
    log_mutation_info!(
        "solveSession for {}/{}/{} acknowledged: {}",
        client.user_id(),
        client.robot_id(),
        client.session_id(),
        result
    );
    Ok(result)
}
