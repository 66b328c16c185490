//! GraphQL documents sent to the NavAbility API

pub mod mutations;
pub mod queries;

pub use mutations::{GQL_ADD_FACTOR, GQL_ADD_VARIABLE, GQL_SOLVE_SESSION};
pub use queries::{
    GQL_FRAGMENT_FACTORS, GQL_FRAGMENT_VARIABLES, GQL_GET_FACTOR, GQL_GET_FACTORS,
    GQL_GET_STATUS_LATEST, GQL_GET_STATUS_MESSAGES, GQL_GET_VARIABLE, GQL_GET_VARIABLES,
};

/// Prepend the fragment definitions an operation spreads
pub fn with_fragments(fragments: &str, operation: &str) -> String {
    format!("{}{}", fragments, operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_define_spread_fragments() {
        let cases = [
            (GQL_FRAGMENT_VARIABLES, GQL_GET_VARIABLES),
            (GQL_FRAGMENT_VARIABLES, GQL_GET_VARIABLE),
            (GQL_FRAGMENT_FACTORS, GQL_GET_FACTORS),
            (GQL_FRAGMENT_FACTORS, GQL_GET_FACTOR),
        ];
        for (fragments, operation) in cases {
            let document = with_fragments(fragments, operation);
            for spread in operation.split("...").skip(1) {
                let name = spread.split_whitespace().next().unwrap_or_default();
                assert!(
                    document.contains(&format!("fragment {} on", name)),
                    "fragment {} undefined",
                    name
                );
            }
        }
    }

    #[test]
    fn test_mutations_take_expected_arguments() {
        assert!(GQL_ADD_VARIABLE.contains("addVariable(variable: $variable)"));
        assert!(GQL_ADD_FACTOR.contains("addFactor(factor: $factor)"));
        assert!(GQL_SOLVE_SESSION.contains("solveSession(client: $client)"));
    }
}
