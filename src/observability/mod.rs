//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Scope-based begin/complete/abandoned tracing
//!
//! Observability is read-only: a failed log write never changes what a
//! query returns.
//!
//! # Usage
//!
//! ```ignore
//! use media_query::observability::{Event, Logger, Severity};
//!
//! let logger = Logger::new(Severity::Info);
//! logger.log_event(Event::QueryPlanned, &[("query_id", "...")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{Lifecycle, ObservationScope, Timer};
