pub const GQL_FRAGMENT_VARIABLES: &str = r#"
fragment ppe_fields on PPE {
  solveKey
  suggested
  max
  mean
  lastUpdatedTimestamp {
    formatted
  }
}

fragment solverdata_fields on SOLVERDATA {
  vecval
  dimval
  vecbw
  dimbw
  BayesNetOutVertIDs
  dimIDs
  dims
  eliminated
  BayesNetVertID
  separator
  initialized
  infoPerCoord
  ismargin
  dontmargin
  solveInProgress
  solvedCount
  solveKey
  variableType
}

fragment variable_skeleton_fields on VARIABLE {
  label
  tags
}

fragment variable_summary_fields on VARIABLE {
  timestamp {
    formatted
  }
  nstime
  variableType
  solvable
  ppes {
    ...ppe_fields
  }
  _version
}

fragment variable_full_fields on VARIABLE {
  smallData
  solverData {
    ...solverdata_fields
  }
}
"#;

pub const GQL_GET_VARIABLES: &str = r#"
query sdk_get_variables(
  $userId: ID!
  $robotIds: [ID!]!
  $sessionIds: [ID!]!
  $variable_label_regexp: String = ".*"
  $variable_tags: [String] = ["VARIABLE"]
  $solvable: Int = 0
  $fields_summary: Boolean! = false
  $fields_full: Boolean! = false
) {
  users(where: { id: $userId }) {
    name
    robots(where: { name_IN: $robotIds }) {
      name
      sessions(where: { name_IN: $sessionIds }) {
        variables(
          where: {
            label_MATCHES: $variable_label_regexp
            tags_INCLUDES: $variable_tags
            solvable_GTE: $solvable
          }
        ) {
          ...variable_skeleton_fields
          ...variable_summary_fields @include(if: $fields_summary)
          ...variable_full_fields @include(if: $fields_full)
        }
      }
    }
  }
}
"#;

pub const GQL_GET_VARIABLE: &str = r#"
query sdk_get_variable(
  $userId: ID!
  $robotId: ID!
  $sessionId: ID!
  $label: String!
) {
  users(where: { id: $userId }) {
    name
    robots(where: { name: $robotId }) {
      name
      sessions(where: { name: $sessionId }) {
        variables(where: { label: $label }) {
          ...variable_skeleton_fields
          ...variable_summary_fields
          ...variable_full_fields
        }
      }
    }
  }
}
"#;

pub const GQL_FRAGMENT_FACTORS: &str = r#"
fragment factor_skeleton_fields on FACTOR {
  label
  tags
  _variableOrderSymbols
}

fragment factor_summary_fields on FACTOR {
  timestamp {
    formatted
  }
  nstime
  fncType
  solvable
  _version
}

fragment factor_full_fields on FACTOR {
  data
}
"#;

pub const GQL_GET_FACTORS: &str = r#"
query sdk_get_factors(
  $userId: ID!
  $robotIds: [ID!]!
  $sessionIds: [ID!]!
  $factor_label_regexp: String = ".*"
  $factor_tags: [String] = ["FACTOR"]
  $solvable: Int = 0
  $fields_summary: Boolean! = false
  $fields_full: Boolean! = false
) {
  users(where: { id: $userId }) {
    name
    robots(where: { name_IN: $robotIds }) {
      name
      sessions(where: { name_IN: $sessionIds }) {
        factors(
          where: {
            label_MATCHES: $factor_label_regexp
            tags_INCLUDES: $factor_tags
            solvable_GTE: $solvable
          }
        ) {
          ...factor_skeleton_fields
          ...factor_summary_fields @include(if: $fields_summary)
          ...factor_full_fields @include(if: $fields_full)
        }
      }
    }
  }
}
"#;

pub const GQL_GET_FACTOR: &str = r#"
query sdk_get_factor(
  $userId: ID!
  $robotId: ID!
  $sessionId: ID!
  $label: String!
) {
  users(where: { id: $userId }) {
    name
    robots(where: { name: $robotId }) {
      name
      sessions(where: { name: $sessionId }) {
        factors(where: { label: $label }) {
          ...factor_skeleton_fields
          ...factor_summary_fields
          ...factor_full_fields
        }
      }
    }
  }
}
"#;

pub const GQL_GET_STATUS_MESSAGES: &str = r#"
query sdk_get_status_messages($id: ID!) {
  statusMessages(id: $id) {
    requestId
    action
    state
    timestamp
    client {
      userId
      robotId
      sessionId
    }
  }
}
"#;

pub const GQL_GET_STATUS_LATEST: &str = r#"
query sdk_get_status_latest($id: ID!) {
  statusLatest(id: $id) {
    requestId
    action
    state
    timestamp
    client {
      userId
      robotId
      sessionId
    }
  }
}
"#;
