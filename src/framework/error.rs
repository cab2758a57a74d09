//! # Framework Errors
//!
//! Error types shared by the dispatcher and the work items it runs.
//!
//! A work item reports *logical* failure by
//! returning `Ok(false)` (a soft failure, surfaced as
//! [`OrderOutcome::Rejected`](crate::model::OrderOutcome::Rejected)), and
//! reports *faults* through [`TaskError`]. Only faults and interruption become
//! a [`DispatchError`].

use thiserror::Error;

/// Faults raised by a single work item.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    /// The work item hit an unrecoverable fault (including a panic).
    #[error("Task fault: {0}")]
    Fault(String),

    /// The work item was interrupted while blocked (pool shutdown or abort).
    #[error("Task interrupted")]
    Interrupted,
}

/// Hard failures returned by [`Dispatcher::dispatch`](crate::framework::Dispatcher::dispatch).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The dispatcher was asked to stop while waiting for its work items.
    #[error("Interrupted while waiting for order tasks")]
    Interrupted,

    /// A work item terminated with a fault instead of a result.
    #[error("Task '{task}' failed: {reason}")]
    TaskExecution { task: String, reason: String },
}

/// Unified per-item result: `Ok(true)` success, `Ok(false)` soft failure, `Err` fault.
pub type TaskResult = Result<bool, TaskError>;
