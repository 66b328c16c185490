//! Async service functions.
//!
//! Each function assembles one GraphQL operation and its variables, sends it
//! through the injected [`Transport`](crate::transport::Transport), validates
//! the response envelope and decodes the entities.

pub mod factor;
pub mod solve;
pub mod status;
pub mod variable;

pub use factor::{
    add_factor, get_factor, get_factors, list_factors, lsf, FactorFilter,
};
pub use solve::solve_session;
pub use status::{
    get_status_latest, get_status_messages, get_statuses_latest, wait_for_completion,
    WaitOptions,
};
pub use variable::{
    add_variable, get_variable, get_variables, list_variables, ls, VariableFilter,
};

use serde_json::Value;

use crate::config::EnvelopePolicy;
use crate::envelope::unwrap_envelope;
use crate::error::{SdkError, SdkResult, ValidationError};

/// Matches every label
pub const DEFAULT_LABEL_REGEX: &str = ".*";

/// Reject label filters that no regex dialect accepts.
///
/// Only structure is checked: groups and character classes must balance and
/// the pattern may not end inside an escape. Everything else, lookaround and
/// backreferences included, is left for the server to interpret.
pub(crate) fn check_label_regex(pattern: &str) -> Result<(), ValidationError> {
    let invalid = |message: &str| Err(ValidationError::new("regexFilter", message));
    let mut chars = pattern.chars().peekable();
    let mut depth = 0usize;
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return invalid("pattern ends with an unfinished escape");
                }
            }
            '[' if !in_class => {
                in_class = true;
                chars.next_if_eq(&'^');
                // a leading ']' is a literal member
                chars.next_if_eq(&']');
            }
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                if depth == 0 {
                    return invalid("unopened group ')'");
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if in_class {
        invalid("unclosed character class")
    } else if depth > 0 {
        invalid("unclosed group")
    } else {
        Ok(())
    }
}

/// Session entities under `key`, or `None` when a lenient policy swallowed an
/// envelope error
pub(crate) fn session_entities<'a>(
    response: &'a Value,
    key: &str,
    policy: EnvelopePolicy,
) -> SdkResult<Option<&'a [Value]>> {
    match unwrap_envelope(response, key) {
        Ok(entries) => Ok(Some(entries)),
        Err(err) => match policy {
            EnvelopePolicy::Strict => Err(SdkError::Envelope(err)),
            EnvelopePolicy::Lenient => {
                match err.level() {
                    Some(level) => crate::log_query_warn!(
                        "Invalid response envelope at '{}' while reading {}: {}; returning no results",
                        level,
                        key,
                        err
                    ),
                    None => crate::log_query_warn!(
                        "Invalid response envelope while reading {}: {}; returning no results",
                        key,
                        err
                    ),
                }
                Ok(None)
            }
        },
    }
}

/// The single entity a one-label lookup may return
pub(crate) fn single_entity<'a>(
    response: &'a Value,
    key: &str,
    entity: &'static str,
    label: &str,
) -> SdkResult<Option<&'a Value>> {
    let entries = unwrap_envelope(response, key)?;
    match entries {
        [] => Ok(None),
        [only] => Ok(Some(only)),
        many => Err(SdkError::AmbiguousResult {
            entity,
            label: label.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EnvelopeError, EnvelopeLevel};
    use serde_json::json;

    #[test]
    fn test_invalid_regex_names_filter() {
        let err = check_label_regex("x[0-").unwrap_err();
        assert_eq!(err.field, "regexFilter");
        assert!(check_label_regex(DEFAULT_LABEL_REGEX).is_ok());
    }

    #[test]
    fn test_regex_structure_only() {
        assert!(check_label_regex("x(?!0)\\d+").is_ok());
        assert!(check_label_regex("(?<=l)\\d(a)\\1").is_ok());
        assert!(check_label_regex("[]()]+").is_ok());
        assert!(check_label_regex("x\\(").is_ok());

        assert!(check_label_regex("x(").is_err());
        assert!(check_label_regex("x)").is_err());
        assert!(check_label_regex("x\\").is_err());
        assert!(check_label_regex("[^x").is_err());
    }

    #[test]
    fn test_session_entities_policies() {
        let response = json!({"users": []});
        match session_entities(&response, "variables", EnvelopePolicy::Strict) {
            Err(SdkError::Envelope(EnvelopeError::WrongCount { level, count })) => {
                assert_eq!(level, EnvelopeLevel::Users);
                assert_eq!(count, 0);
            }
            other => panic!("expected envelope error, got {:?}", other),
        }
        assert!(session_entities(&response, "variables", EnvelopePolicy::Lenient)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_single_entity_counts() {
        let wrap = |entities: Value| {
            json!({"users": [{"robots": [{"sessions": [{"factors": entities}]}]}]})
        };

        let empty = wrap(json!([]));
        assert!(single_entity(&empty, "factors", "factor", "f0")
            .unwrap()
            .is_none());

        let two = wrap(json!([{"label": "f0"}, {"label": "f0"}]));
        match single_entity(&two, "factors", "factor", "f0") {
            Err(SdkError::AmbiguousResult { count, .. }) => assert_eq!(count, 2),
            other => panic!("expected ambiguous result, got {:?}", other),
        }
    }
}
