//! Observable events of the query engine
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,

    // Query lifecycle
    /// Query handed to the engine
    QueryReceived,
    /// Native request and residual stages built
    QueryPlanned,
    /// Identifiers returned by the store
    NativeFetchComplete,
    /// Materialization for the residual sort begins
    ResidualSortBegin,
    /// Residual sort done
    ResidualSortComplete,
    /// Result stream exhausted
    QueryExecuted,
    /// Result stream dropped before exhaustion
    QueryAbandoned,
    /// Query failed validation
    QueryRejected,

    // Failures
    /// The record store rejected or failed the native request
    StoreFailed,
    /// A record field could not be resolved
    ResolutionFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryReceived => "QUERY_BEGIN",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::NativeFetchComplete => "NATIVE_FETCH_COMPLETE",
            Event::ResidualSortBegin => "RESIDUAL_SORT_BEGIN",
            Event::ResidualSortComplete => "RESIDUAL_SORT_COMPLETE",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryAbandoned => "QUERY_ABANDONED",
            Event::QueryRejected => "QUERY_REJECTED",

            Event::StoreFailed => "STORE_FAILED",
            Event::ResolutionFailed => "RESOLUTION_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryPlanned
            | Event::NativeFetchComplete
            | Event::ResidualSortBegin
            | Event::ResidualSortComplete => Severity::Trace,
            Event::ConfigLoaded
            | Event::QueryReceived
            | Event::QueryExecuted
            | Event::QueryAbandoned => Severity::Info,
            Event::QueryRejected => Severity::Warn,
            Event::StoreFailed | Event::ResolutionFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
