//! The order-processing steps: inventory, shipping, and accounting.
//!
//! Each step is a [`SubsystemUpdate`]: it logs which subsystem it is updating
//! for the order, waits out the simulated external-system latency, and reports
//! success. None of them call a real system, and the latency is fixed at
//! [`TASK_LATENCY`].

pub mod subsystem;

pub use subsystem::*;

use std::time::Duration;

use crate::framework::TaskDescriptor;

pub const INVENTORY: &str = "inventory";
pub const SHIPPING: &str = "shipping";
pub const ACCOUNTING: &str = "accounting";

/// Simulated external-system latency of every step.
pub const TASK_LATENCY: Duration = Duration::from_millis(1000);

/// Updates inventory for the order.
pub fn inventory() -> TaskDescriptor {
    TaskDescriptor::new(INVENTORY, SubsystemUpdate::new("Inventory update", TASK_LATENCY))
}

/// Notifies the shipping system of the order.
pub fn shipping() -> TaskDescriptor {
    TaskDescriptor::new(SHIPPING, SubsystemUpdate::new("Shipping system notification", TASK_LATENCY))
}

/// Updates the accounting system for the order.
pub fn accounting() -> TaskDescriptor {
    TaskDescriptor::new(ACCOUNTING, SubsystemUpdate::new("Accounting system update", TASK_LATENCY))
}

/// Creates the default task list, in submission order.
pub fn new() -> Vec<TaskDescriptor> {
    vec![inventory(), shipping(), accounting()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::RecordingLog;
    use crate::framework::{PoolScope, TaskContext, TaskPool, WorkerPool};
    use crate::model::OrderNumber;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_default_steps_take_fixed_latency() {
        let pool = TaskPool::new(5);
        let log = Arc::new(RecordingLog::new());

        let start = tokio::time::Instant::now();
        let mut scope = PoolScope::open(&pool).unwrap();
        for task in new() {
            let ctx = TaskContext::new(OrderNumber::from("Order#1"), log.clone(), pool.shutdown_token());
            scope.submit(&task, ctx);
        }
        let results = scope.join_all().await.unwrap();
        let elapsed = start.elapsed();

        assert!(results.iter().all(|result| *result == Ok(true)));
        assert!(elapsed >= TASK_LATENCY, "steps skipped their latency: {elapsed:?}");
        assert!(elapsed < TASK_LATENCY * 2, "steps were serialised: {elapsed:?}");
    }

    #[test]
    fn test_default_task_list_order() {
        let names: Vec<_> = new()
            .iter()
            .map(|task| task.name().to_string())
            .collect();
        assert_eq!(names, vec![INVENTORY, SHIPPING, ACCOUNTING]);
    }
}
