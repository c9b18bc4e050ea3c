//! ObservationScope for automatic begin/complete logging
//!
//! - Logs the begin event on creation
//! - Logs the complete event when `complete()` is called
//! - Logs the abandoned event on drop if never completed

use std::cell::Cell;
use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// The three events a scope logs over its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub begin: Event,
    pub complete: Event,
    pub abandoned: Event,
}

impl Lifecycle {
    /// Lifecycle of one query execution
    pub const QUERY: Lifecycle = Lifecycle {
        begin: Event::QueryReceived,
        complete: Event::QueryExecuted,
        abandoned: Event::QueryAbandoned,
    };
}

/// A scope that automatically logs begin and complete events
///
/// # Usage
///
/// ```ignore
/// let scope = ObservationScope::new(logger, Lifecycle::QUERY, &[("query_id", &id)]);
/// // ... do work ...
/// scope.complete(&[("returned", "3")]); // logs QUERY_COMPLETE
/// // if never completed, logs QUERY_ABANDONED on drop
/// ```
///
/// Fields given at creation are repeated on every line the scope logs.
#[derive(Debug)]
pub struct ObservationScope {
    logger: Logger,
    lifecycle: Lifecycle,
    completed: Cell<bool>,
    fields: Vec<(&'static str, String)>,
    timer: Timer,
}

impl ObservationScope {
    /// Create a new observation scope; logs the begin event immediately
    pub fn new(logger: Logger, lifecycle: Lifecycle, fields: &[(&'static str, &str)]) -> Self {
        logger.log_event(lifecycle.begin, fields);

        Self {
            logger,
            lifecycle,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Logs a standalone event carrying the scope's fields
    pub fn log(&self, event: Event, extra_fields: &[(&str, &str)]) {
        self.logger.log_event(event, &self.merged(extra_fields));
    }

    /// Mark the scope as successfully completed with additional fields
    pub fn complete(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_ms();
        let mut fields = self.merged(extra_fields);
        fields.push(("elapsed_ms", elapsed.as_str()));
        self.logger.log_event(self.lifecycle.complete, &fields);
    }

    /// Mark the scope as failed; logs `event` with the reason
    pub fn fail(self, event: Event, reason: &str) {
        self.completed.set(true);
        let fields = self.merged(&[("reason", reason)]);
        self.logger.log_event(event, &fields);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn merged<'s>(&'s self, extra_fields: &[(&'s str, &'s str)]) -> Vec<(&'s str, &'s str)> {
        let mut all: Vec<(&str, &str)> = self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all.extend(extra_fields.iter().copied());
        all
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed.get() {
            let elapsed = self.timer.elapsed_ms();
            let fields = self.merged(&[("elapsed_ms", elapsed.as_str())]);
            self.logger.log_event(self.lifecycle.abandoned, &fields);
        }
    }
}

/// A simple duration timer for logging elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
