use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde_json::{json, Value};

use crate::config::SdkConfig;
use crate::entities::StatusMessage;
use crate::error::{SdkError, SdkResult, ValidationError};
use crate::graphql::{GQL_GET_STATUS_LATEST, GQL_GET_STATUS_MESSAGES};
use crate::schema::EntitySchema;
use crate::transport::{GraphqlRequest, Transport};
use crate::{log_status_debug, log_status_info};

/// Polling cadence and budget for [`wait_for_completion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl WaitOptions {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            poll_interval: config.status_poll_interval(),
            timeout: config.status_timeout(),
        }
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from_config(&SdkConfig::default())
    }
}

/// Request id carried by a mutation acknowledgment such as `{"addVariable": "<id>"}`
pub fn acknowledged_request_id(acknowledgment: &Value) -> Option<&str> {
    acknowledgment
        .as_object()?
        .values()
        .find_map(Value::as_str)
}

/// Every status message for a request, oldest first
pub async fn get_status_messages<T: Transport + ?Sized>(
    transport: &T,
    request_id: &str,
) -> SdkResult<Vec<StatusMessage>> {
    let request = GraphqlRequest::new(GQL_GET_STATUS_MESSAGES, json!({ "id": request_id }))
        .with_operation_name("sdk_get_status_messages");
    let response = transport.query(request).await?;
    log_status_debug!("statusMessages for {}: {}", request_id, response);

    let entries = response
        .get("statusMessages")
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::new("statusMessages", "missing from response"))?;
    let mut messages = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            StatusMessage::load(entry).map_err(|e| e.nested(&format!("statusMessages.{}", index)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    messages.sort_by_key(|message| message.timestamp);
    Ok(messages)
}

/// Most recent status of a request, `None` before the server has reported any
pub async fn get_status_latest<T: Transport + ?Sized>(
    transport: &T,
    request_id: &str,
) -> SdkResult<Option<StatusMessage>> {
    let request = GraphqlRequest::new(GQL_GET_STATUS_LATEST, json!({ "id": request_id }))
        .with_operation_name("sdk_get_status_latest");
    let response = transport.query(request).await?;
    log_status_debug!("statusLatest for {}: {}", request_id, response);

    match response.get("statusLatest").filter(|value| !value.is_null()) {
        Some(entry) => Ok(Some(
            StatusMessage::load(entry).map_err(|e| e.nested("statusLatest"))?,
        )),
        None => Ok(None),
    }
}

/// Latest status per request id; requests without any status are left out
pub async fn get_statuses_latest<T, S>(
    transport: &T,
    request_ids: &[S],
) -> SdkResult<BTreeMap<String, StatusMessage>>
where
    T: Transport + ?Sized,
    S: AsRef<str>,
{
    let mut latest = BTreeMap::new();
    for request_id in request_ids {
        let request_id = request_id.as_ref();
        if let Some(message) = get_status_latest(transport, request_id).await? {
            latest.insert(request_id.to_string(), message);
        }
    }
    Ok(latest)
}

/// Poll until every request is complete.
///
/// A request reporting `Failed` ends the wait with [`SdkError::Status`];
/// running past `options.timeout` ends it with [`SdkError::Timeout`].
pub async fn wait_for_completion<T, S>(
    transport: &T,
    request_ids: &[S],
    options: &WaitOptions,
) -> SdkResult<()>
where
    T: Transport + ?Sized,
    S: AsRef<str>,
{
    let deadline = tokio::time::Instant::now() + options.timeout;
    let mut pending: BTreeSet<String> = request_ids
        .iter()
        .map(|id| id.as_ref().to_string())
        .collect();

    loop {
        let ids: Vec<&String> = pending.iter().collect();
        let statuses = get_statuses_latest(transport, &ids).await?;
        for (request_id, message) in &statuses {
            if message.is_failed() {
                return Err(SdkError::Status {
                    request_id: request_id.clone(),
                    state: message.state.clone(),
                });
            }
            if message.is_complete() {
                log_status_info!("Request {} complete ({})", request_id, message.action);
                pending.remove(request_id);
            }
        }

        if pending.is_empty() {
            return Ok(());
        }
        if tokio::time::Instant::now() + options.poll_interval > deadline {
            return Err(SdkError::Timeout(format!(
                "{} request(s) still pending after {:?}: {}",
                pending.len(),
                options.timeout,
                pending.iter().cloned().collect::<Vec<_>>().join(", ")
            )));
        }
        log_status_debug!("Waiting on {} request(s)", pending.len());
        tokio::time::sleep(options.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledged_request_id() {
        assert_eq!(
            acknowledged_request_id(&json!({"addVariable": "abc-123"})),
            Some("abc-123")
        );
        assert_eq!(acknowledged_request_id(&json!({"addVariable": null})), None);
        assert_eq!(acknowledged_request_id(&json!("abc")), None);
    }

    #[test]
    fn test_wait_options_follow_config() {
        let config = SdkConfig {
            status_poll_interval_ms: 250,
            status_timeout_secs: 5,
            ..SdkConfig::default()
        };
        let options = WaitOptions::from_config(&config);
        assert_eq!(options.poll_interval, Duration::from_millis(250));
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}
