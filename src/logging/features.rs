//! Feature-specific logging macros and utilities
//!
//! Every SDK log line carries a feature target so applications can filter
//! e.g. `RUST_LOG=navability::transport=debug` without touching the rest.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Query,
    Mutation,
    Transport,
    Status,
    Schema,
}

impl LogFeature {
    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Query => "navability::query",
            LogFeature::Mutation => "navability::mutation",
            LogFeature::Transport => "navability::transport",
            LogFeature::Status => "navability::status",
            LogFeature::Schema => "navability::schema",
        }
    }
}

// Query-specific logging macros
#[macro_export]
macro_rules! log_query_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "navability::query", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_query_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "navability::query", $($arg)*)
    };
}

// Mutation-specific logging macros
#[macro_export]
macro_rules! log_mutation_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "navability::mutation", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_mutation_info {
    ($($arg:tt)*) => {
        log::info!(target: "navability::mutation", $($arg)*)
    };
}

// Transport-specific logging macros
#[macro_export]
macro_rules! log_transport_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "navability::transport", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_transport_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "navability::transport", $($arg)*)
    };
}

// Status-specific logging macros
#[macro_export]
macro_rules! log_status_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "navability::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_status_info {
    ($($arg:tt)*) => {
        log::info!(target: "navability::status", $($arg)*)
    };
}

// Schema-specific logging macros
#[macro_export]
macro_rules! log_schema_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "navability::schema", $($arg)*)
    };
}

/// Logs how long a single round trip took
pub struct RoundTripTimer {
    start: std::time::Instant,
    feature: LogFeature,
    operation: String,
}

impl RoundTripTimer {
    pub fn new(feature: LogFeature, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        log::debug!(target: feature.target(), "Sending {}", operation);
        Self {
            start: std::time::Instant::now(),
            feature,
            operation,
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        log::debug!(
            target: self.feature.target(),
            "{} completed in {:?}",
            self.operation,
            duration
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_targets_are_namespaced() {
        for feature in [
            LogFeature::Query,
            LogFeature::Mutation,
            LogFeature::Transport,
            LogFeature::Status,
            LogFeature::Schema,
        ] {
            assert!(feature.target().starts_with("navability::"));
        }
    }
}
