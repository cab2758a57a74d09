//! Results of dispatching one order.

use serde::{Deserialize, Serialize};

/// Outcome of a single work item, as seen after the barrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: String,
    pub succeeded: bool,
}

impl TaskReport {
    pub fn new(task: impl Into<String>, succeeded: bool) -> Self {
        Self {
            task: task.into(),
            succeeded,
        }
    }
}

/// Result of an order that ran to the end without a hard failure.
///
/// `reports` holds the inspected items in submission order. For a rejected
/// order it stops at the first failing item, which is the last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderOutcome {
    /// Every work item reported success.
    Completed { reports: Vec<TaskReport> },
    /// `task` was the first work item, in submission order, to report failure.
    Rejected { task: String, reports: Vec<TaskReport> },
}

impl OrderOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderOutcome::Completed { .. })
    }

    pub fn failed_task(&self) -> Option<&str> {
        match self {
            OrderOutcome::Completed { .. } => None,
            OrderOutcome::Rejected { task, .. } => Some(task.as_str()),
        }
    }

    pub fn reports(&self) -> &[TaskReport] {
        match self {
            OrderOutcome::Completed { reports } | OrderOutcome::Rejected { reports, .. } => reports,
        }
    }
}
