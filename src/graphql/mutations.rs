pub const GQL_ADD_VARIABLE: &str = r#"
mutation sdk_add_variable($variable: FactorGraphInput!) {
  addVariable(variable: $variable)
}
"#;

pub const GQL_ADD_FACTOR: &str = r#"
mutation sdk_add_factor($factor: FactorGraphInput!) {
  addFactor(factor: $factor)
}
"#;

pub const GQL_SOLVE_SESSION: &str = r#"
mutation sdk_solve_session($client: ClientInput!) {
  solveSession(client: $client)
}
"#;
