//! Validation of the `users[0].robots[0].sessions[0].<entities>` response shape.

use serde_json::Value;

use crate::error::{EnvelopeError, EnvelopeLevel};

/// Exactly one entry under `level`, never coerced from zero or many
fn single<'a>(parent: &'a Value, level: EnvelopeLevel) -> Result<&'a Value, EnvelopeError> {
    let entries = parent
        .get(level.key())
        .and_then(Value::as_array)
        .ok_or(EnvelopeError::Missing { level })?;
    match entries.as_slice() {
        [only] => Ok(only),
        _ => Err(EnvelopeError::WrongCount {
            level,
            count: entries.len(),
        }),
    }
}

/// Walk the envelope down to the session's `key` list
pub fn unwrap_envelope<'a>(response: &'a Value, key: &str) -> Result<&'a [Value], EnvelopeError> {
    let user = single(response, EnvelopeLevel::Users)?;
    let robot = single(user, EnvelopeLevel::Robots)?;
    let session = single(robot, EnvelopeLevel::Sessions)?;
    session
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| EnvelopeError::MissingEntities {
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(entities: Value) -> Value {
        json!({"users": [{"robots": [{"sessions": [{"variables": entities}]}]}]})
    }

    #[test]
    fn test_unwraps_single_scope() {
        let response = wrap(json!([{"label": "x0"}, {"label": "x1"}]));
        let entries = unwrap_envelope(&response, "variables").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["label"], json!("x1"));
    }

    #[test]
    fn test_empty_entity_list_is_valid() {
        let response = wrap(json!([]));
        assert!(unwrap_envelope(&response, "variables").unwrap().is_empty());
    }

    #[test]
    fn test_two_users_rejected() {
        let response = json!({"users": [{"robots": []}, {"robots": []}]});
        assert_eq!(
            unwrap_envelope(&response, "variables").unwrap_err(),
            EnvelopeError::WrongCount {
                level: EnvelopeLevel::Users,
                count: 2
            }
        );
    }

    #[test]
    fn test_zero_robots_rejected() {
        let response = json!({"users": [{"robots": []}]});
        let err = unwrap_envelope(&response, "variables").unwrap_err();
        assert_eq!(err.level(), Some(EnvelopeLevel::Robots));
    }

    #[test]
    fn test_missing_sessions_rejected() {
        let response = json!({"users": [{"robots": [{"name": "r"}]}]});
        assert_eq!(
            unwrap_envelope(&response, "variables").unwrap_err(),
            EnvelopeError::Missing {
                level: EnvelopeLevel::Sessions
            }
        );
    }

    #[test]
    fn test_missing_users_rejected() {
        let err = unwrap_envelope(&json!({"user": []}), "variables").unwrap_err();
        assert_eq!(err.level(), Some(EnvelopeLevel::Users));
    }

    #[test]
    fn test_session_without_entities_rejected() {
        let response = wrap(json!(null));
        assert_eq!(
            unwrap_envelope(&response, "factors").unwrap_err(),
            EnvelopeError::MissingEntities {
                key: "factors".to_string()
            }
        );
    }
}
