use std::sync::Arc;

use tracing::{info, instrument};

use crate::framework::{DispatchError, Dispatcher, OrderLog, TaskDescriptor, TaskPool, TracingLog, WorkerPool};
use crate::model::{OrderNumber, OrderOutcome};

/// Workers in the pool built by [`OrderService::new`]; more than the three
/// default steps, so none of them queues behind another.
pub const POOL_SIZE: usize = 5;

/// Entry point for processing orders.
///
/// `OrderService` owns:
/// - **The pool**: one long-lived [`TaskPool`] reused by every order
/// - **The dispatcher**: fans each order's steps out to the pool
/// - **The task list**: the steps run for every order, in submission order
///
/// # Example
///
/// ```ignore
/// let service = OrderService::new();
///
/// match service.order("Order#1234").await? {
///     OrderOutcome::Completed { .. } => { /* all steps succeeded */ }
///     OrderOutcome::Rejected { task, .. } => { /* `task` reported failure */ }
/// }
///
/// service.shutdown().await;
/// ```
pub struct OrderService<P: WorkerPool + ?Sized = TaskPool> {
    dispatcher: Dispatcher<P>,
    tasks: Vec<TaskDescriptor>,
}

impl OrderService<TaskPool> {
    /// Builds the service: a [`TaskPool`] of [`POOL_SIZE`], the default
    /// inventory/shipping/accounting steps, and a [`TracingLog`].
    pub fn new() -> Self {
        let pool = Arc::new(TaskPool::new(POOL_SIZE));
        let tasks = crate::order_tasks::new();
        info!(pool_size = pool.capacity(), tasks = tasks.len(), "Order service started");
        Self::with_parts(pool, Arc::new(TracingLog), tasks)
    }

    /// Shuts the pool down and waits for in-flight orders to release it.
    ///
    /// Orders still waiting on their steps fail with
    /// [`DispatchError::Interrupted`].
    pub async fn shutdown(self) {
        info!("Shutting down order service...");
        let pool = self.dispatcher.pool().clone();
        drop(self.dispatcher);
        pool.shutdown();
        pool.drained().await;
        info!("Order service shutdown complete.");
    }
}

impl Default for OrderService<TaskPool> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: WorkerPool + ?Sized> OrderService<P> {
    /// Assembles a service from an existing pool, log, and task list.
    pub fn with_parts(pool: Arc<P>, log: Arc<dyn OrderLog>, tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            dispatcher: Dispatcher::new(pool, log),
            tasks,
        }
    }

    pub fn pool(&self) -> &Arc<P> {
        self.dispatcher.pool()
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    /// Runs every step for `order` concurrently.
    ///
    /// Returns `Ok(Completed)` when every step succeeded, `Ok(Rejected)` when
    /// a step reported failure, and `Err` when a step faulted or the pool was
    /// shut down while waiting.
    #[instrument(skip(self, order))]
    pub async fn order(&self, order: impl Into<OrderNumber>) -> Result<OrderOutcome, DispatchError> {
        let order = order.into();
        self.dispatcher.dispatch(&order, &self.tasks).await
    }
}
