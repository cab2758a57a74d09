//! # Core Dispatch Framework
//!
//! This module defines the generic building blocks for fanning independent
//! work items out to a bounded pool and fanning their results back in.
//!
//! ## Key Types
//!
//! - [`Work`]: The trait every unit of work implements (closures included).
//! - [`TaskDescriptor`]: A named, cloneable handle to a unit of work.
//! - [`WorkerPool`]: The pool contract; [`TaskPool`] is the production pool.
//! - [`PoolScope`]: The per-call lease that owns submitted work.
//! - [`Dispatcher`]: Submits a task list, waits for all of it, inspects results.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::framework::error::{DispatchError, TaskError, TaskResult};
use crate::model::{OrderNumber, OrderOutcome, TaskReport};

/// Aggregate line logged when every work item succeeded.
pub const ALL_SUCCEEDED_MESSAGE: &str = "All order processing tasks were completed successfully.";

/// Prefix of the line logged on the first soft failure.
pub const SOME_FAILED_MESSAGE: &str = "Some tasks have failed.";

/// Prefix of the line logged when a work item faults.
pub const TASK_FAULTED_MESSAGE: &str = "Order processing task faulted.";

// =============================================================================
// 1. INJECTED CAPABILITIES
// =============================================================================

/// Fire-and-forget sink for the human-readable order log.
///
/// The dispatcher and every work item write their user-visible lines here
/// instead of a process-wide logger, so tests can swap in a
/// [`RecordingLog`](crate::framework::mock::RecordingLog).
pub trait OrderLog: Send + Sync {
    fn log(&self, message: &str);
}

/// [`OrderLog`] that forwards every line to `tracing` at `INFO`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl OrderLog for TracingLog {
    fn log(&self, message: &str) {
        info!("{message}");
    }
}

/// Blocks for `duration`, failing with [`TaskError::Interrupted`] if `shutdown`
/// fires first.
pub async fn simulate_latency(duration: Duration, shutdown: &CancellationToken) -> Result<(), TaskError> {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
            warn!(?duration, "Interrupt occurred during simulated latency");
            Err(TaskError::Interrupted)
        }
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Everything a work item receives when it runs.
#[derive(Clone)]
pub struct TaskContext {
    pub order: OrderNumber,
    log: Arc<dyn OrderLog>,
    shutdown: CancellationToken,
}

impl TaskContext {
    pub fn new(order: OrderNumber, log: Arc<dyn OrderLog>, shutdown: CancellationToken) -> Self {
        Self { order, log, shutdown }
    }

    /// Writes a line to the injected order log.
    pub fn log(&self, message: &str) {
        self.log.log(message);
    }

    /// [`simulate_latency`] bound to the owning pool's shutdown signal.
    pub async fn simulate_latency(&self, duration: Duration) -> Result<(), TaskError> {
        simulate_latency(duration, &self.shutdown).await
    }
}

impl Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext").field("order", &self.order).finish_non_exhaustive()
    }
}

// =============================================================================
// 2. UNITS OF WORK
// =============================================================================

/// A unit of work that can be scheduled on a [`WorkerPool`].
///
/// Any `Fn(TaskContext) -> impl Future<Output = TaskResult>` closure is a
/// `Work`, so a task list can be assembled from plain closures in tests.
#[async_trait]
pub trait Work: Send + Sync + 'static {
    async fn run(&self, ctx: TaskContext) -> TaskResult;
}

#[async_trait]
impl<F, Fut> Work for F
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    async fn run(&self, ctx: TaskContext) -> TaskResult {
        (self)(ctx).await
    }
}

/// A named unit of work. Cheap to clone; the body is shared.
#[derive(Clone)]
pub struct TaskDescriptor {
    name: Arc<str>,
    work: Arc<dyn Work>,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>, work: impl Work) -> Self {
        Self {
            name: Arc::from(name.into()),
            work: Arc::new(work),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor").field("name", &self.name).finish_non_exhaustive()
    }
}

// =============================================================================
// 3. THE POOL
// =============================================================================

/// Contract for a bounded pool that work items run on.
///
/// Capacity is expressed as semaphore permits: a work item holds one permit for
/// its whole execution. The shutdown token is the interruption signal for both
/// waiting dispatchers and sleeping work items.
///
/// [`acquire`](WorkerPool::acquire) and [`release`](WorkerPool::release) are
/// called by [`PoolScope`] exactly once each per dispatch.
pub trait WorkerPool: Send + Sync + 'static {
    fn capacity(&self) -> usize;

    fn permits(&self) -> Arc<Semaphore>;

    fn shutdown_token(&self) -> CancellationToken;

    fn acquire(&self) {}

    fn release(&self) {}
}

/// Long-lived pool of tokio tasks bounded by a semaphore.
///
/// Owned by the caller and shared across orders, so repeated dispatches reuse
/// the same capacity.
pub struct TaskPool {
    capacity: usize,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    open_scopes: AtomicUsize,
    idle: Notify,
}

impl TaskPool {
    /// Creates a pool running at most `capacity` work items at once.
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
            shutdown: CancellationToken::new(),
            open_scopes: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    /// Number of dispatches currently holding a scope on this pool.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Interrupts every waiting dispatcher and sleeping work item, and refuses
    /// new scopes from now on.
    pub fn shutdown(&self) {
        info!(capacity = self.capacity, open_scopes = self.open_scopes(), "Pool shutting down");
        self.shutdown.cancel();
        self.permits.close();
    }

    /// Resolves once no scope is open on this pool.
    pub async fn drained(&self) {
        loop {
            let notified = self.idle.notified();
            if self.open_scopes() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl WorkerPool for TaskPool {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn permits(&self) -> Arc<Semaphore> {
        self.permits.clone()
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn acquire(&self) {
        let open = self.open_scopes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(open_scopes = open, "Scope acquired");
    }

    fn release(&self) {
        let open = self.open_scopes.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(open_scopes = open, "Scope released");
        if open == 0 {
            self.idle.notify_waiters();
        }
    }
}

// =============================================================================
// 4. THE SCOPE (per-dispatch lease)
// =============================================================================

/// A single dispatch's hold on a [`WorkerPool`].
///
/// Owns every work item submitted through it. Dropping the scope aborts
/// whatever is still running and releases the pool, whichever path the
/// dispatch exits through.
pub struct PoolScope<'a, P: WorkerPool + ?Sized> {
    pool: &'a P,
    tasks: JoinSet<(usize, TaskResult)>,
    positions: HashMap<task::Id, usize>,
}

impl<'a, P: WorkerPool + ?Sized> PoolScope<'a, P> {
    /// Opens a scope, or fails with [`DispatchError::Interrupted`] if the pool
    /// is already shut down.
    pub fn open(pool: &'a P) -> Result<Self, DispatchError> {
        if pool.shutdown_token().is_cancelled() {
            warn!("Refusing to open scope on a shut down pool");
            return Err(DispatchError::Interrupted);
        }
        pool.acquire();
        if pool.shutdown_token().is_cancelled() {
            // Shutdown raced the acquire.
            pool.release();
            warn!("Pool shut down while opening scope");
            return Err(DispatchError::Interrupted);
        }
        Ok(Self {
            pool,
            tasks: JoinSet::new(),
            positions: HashMap::new(),
        })
    }

    /// Number of submitted work items not yet joined.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Submits `task` and returns its submission position.
    ///
    /// The work item waits for a pool permit before running, so at most
    /// `capacity` items execute at once.
    pub fn submit(&mut self, task: &TaskDescriptor, ctx: TaskContext) -> usize {
        let position = self.positions.len();
        let permits = self.pool.permits();
        let shutdown = self.pool.shutdown_token();
        let work = task.work.clone();
        let name = task.name.clone();

        let handle = self.tasks.spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return (position, Err(TaskError::Interrupted)),
                permit = permits.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return (position, Err(TaskError::Interrupted)),
                },
            };
            debug!(task = %name, "Task started");
            let result = work.run(ctx).await;
            debug!(task = %name, ?result, "Task finished");
            (position, result)
        });
        self.positions.insert(handle.id(), position);
        position
    }

    /// Waits for every submitted work item and returns their results in
    /// submission order.
    ///
    /// This is a barrier: it only returns once all items have finished, unless
    /// the pool's shutdown signal fires first.
    pub async fn join_all(&mut self) -> Result<Vec<TaskResult>, DispatchError> {
        let shutdown = self.pool.shutdown_token();
        let mut results: Vec<Option<TaskResult>> = vec![None; self.positions.len()];

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    warn!("Interrupted while waiting for tasks");
                    return Err(DispatchError::Interrupted);
                }
                next = self.tasks.join_next_with_id() => next,
            };

            match next {
                None => break,
                Some(Ok((_, (position, result)))) => {
                    results[position] = Some(result);
                }
                Some(Err(join_error)) => {
                    let Some(&position) = self.positions.get(&join_error.id()) else {
                        error!(error = %join_error, "Join error for unknown task");
                        continue;
                    };
                    results[position] = Some(Err(fault_from_join(join_error)));
                }
            }
        }

        Ok(results
            .into_iter()
            .map(|result| result.unwrap_or(Err(TaskError::Interrupted)))
            .collect())
    }
}

impl<P: WorkerPool + ?Sized> Drop for PoolScope<'_, P> {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            debug!(pending = self.tasks.len(), "Aborting unfinished tasks");
            self.tasks.abort_all();
        }
        self.pool.release();
    }
}

fn fault_from_join(join_error: JoinError) -> TaskError {
    if join_error.is_cancelled() {
        return TaskError::Interrupted;
    }
    let payload = join_error.into_panic();
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    };
    TaskError::Fault(message)
}

// =============================================================================
// 5. THE DISPATCHER
// =============================================================================

/// Fans a task list out to a [`WorkerPool`] and fans the results back in.
///
/// The dispatcher holds no per-order state; one instance serves any number of
/// orders, sequentially or concurrently.
pub struct Dispatcher<P: WorkerPool + ?Sized> {
    pool: Arc<P>,
    log: Arc<dyn OrderLog>,
}

impl<P: WorkerPool + ?Sized> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            log: self.log.clone(),
        }
    }
}

impl<P: WorkerPool + ?Sized> Dispatcher<P> {
    pub fn new(pool: Arc<P>, log: Arc<dyn OrderLog>) -> Self {
        Self { pool, log }
    }

    pub fn pool(&self) -> &Arc<P> {
        &self.pool
    }

    /// Runs every task for `order` concurrently and inspects the results in
    /// submission order.
    ///
    /// - All `Ok(true)`: logs [`ALL_SUCCEEDED_MESSAGE`], returns
    ///   [`OrderOutcome::Completed`].
    /// - First `Ok(false)`: logs [`SOME_FAILED_MESSAGE`] naming that task and
    ///   returns [`OrderOutcome::Rejected`]; later results are not inspected.
    /// - First `Err`: logs [`TASK_FAULTED_MESSAGE`] naming that task and the
    ///   fault, returns [`DispatchError::TaskExecution`].
    ///
    /// Sibling tasks are never cancelled because of another task's failure.
    /// The pool scope is released on every exit path.
    #[instrument(skip(self, order, tasks), fields(order = %order, tasks = tasks.len()))]
    pub async fn dispatch(&self, order: &OrderNumber, tasks: &[TaskDescriptor]) -> Result<OrderOutcome, DispatchError> {
        let mut scope = PoolScope::open(self.pool.as_ref())?;

        for task in tasks {
            let ctx = TaskContext::new(order.clone(), self.log.clone(), self.pool.shutdown_token());
            scope.submit(task, ctx);
        }
        debug!(capacity = self.pool.capacity(), "Tasks submitted");

        let results = scope.join_all().await?;

        let mut reports = Vec::with_capacity(tasks.len());
        for (task, result) in tasks.iter().zip(results) {
            match result {
                Ok(true) => reports.push(TaskReport::new(task.name(), true)),
                Ok(false) => {
                    reports.push(TaskReport::new(task.name(), false));
                    warn!(task = task.name(), "Task reported failure");
                    self.log.log(&format!("{SOME_FAILED_MESSAGE} ({})", task.name()));
                    return Ok(OrderOutcome::Rejected {
                        task: task.name().to_string(),
                        reports,
                    });
                }
                Err(e) => {
                    error!(task = task.name(), error = %e, "Task faulted");
                    self.log.log(&format!("{TASK_FAULTED_MESSAGE} ({}: {e})", task.name()));
                    return Err(DispatchError::TaskExecution {
                        task: task.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.log.log(ALL_SUCCEEDED_MESSAGE);
        Ok(OrderOutcome::Completed { reports })
    }
}
