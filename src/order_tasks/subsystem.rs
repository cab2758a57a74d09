use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::framework::{TaskContext, TaskResult, Work};

/// A simulated update of one external subsystem.
///
/// Logs `"{label}: {order}"`, blocks for `latency`, then reports success.
/// If the pool shuts down during the wait, the interruption surfaces as a
/// fault of this task.
#[derive(Debug, Clone)]
pub struct SubsystemUpdate {
    label: &'static str,
    latency: Duration,
}

impl SubsystemUpdate {
    pub fn new(label: &'static str, latency: Duration) -> Self {
        Self { label, latency }
    }
}

#[async_trait]
impl Work for SubsystemUpdate {
    async fn run(&self, ctx: TaskContext) -> TaskResult {
        ctx.log(&format!("{}: {}", self.label, ctx.order));
        ctx.simulate_latency(self.latency).await?;
        debug!(label = self.label, order = %ctx.order, "Subsystem updated");
        Ok(true)
    }
}
